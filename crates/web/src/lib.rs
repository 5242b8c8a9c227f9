//! Web tooling for the order-entry front end
//!
//! This crate provides the development and build side of the front end:
//! - Configuration (`order-entry.toml` plus environment overrides)
//! - Dev server that proxies `/api` to the backend and serves static files
//! - Preview server for the build output
//! - Static build into `dist/` with an asset manifest

#![warn(missing_docs)]

pub mod build_output;
pub mod config;
pub mod error;
pub mod proxy;
pub mod server;

pub use build_output::{build, BuildReport, BuiltFile};
pub use config::{BuildConfig, Mode, ProxyConfig, ServerConfig, WebConfig};
pub use error::{WebError, WebResult};
pub use server::{dev_router, preview_router, serve};
