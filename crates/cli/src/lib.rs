//! Terminal output helpers for the order-entry tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Plain-text tables for lookup results
//! - Spinners around network calls

#![warn(missing_docs)]

pub mod output;
pub mod progress;
