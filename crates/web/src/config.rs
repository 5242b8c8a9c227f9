//! Dev server and build configuration
//!
//! Settings come from an optional `order-entry.toml` and are then overridden
//! by the environment:
//! - `PORT`: dev and preview port
//! - `ORDER_ENTRY_API_URL` / `VITE_API_URL`: proxy target and `__API_URL__`
//! - `ORDER_ENTRY_ENV` / `NODE_ENV`: `production` switches to production mode

use crate::error::{WebError, WebResult};
use order_entry_api_client::config::{API_URL_ENV, VITE_API_URL_ENV};
use order_entry_api_client::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the dev and preview servers
pub const DEFAULT_PORT: u16 = 3000;

const CONFIG_CANDIDATES: [&str; 2] = ["order-entry.toml", ".config/order-entry.toml"];

/// Build mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local development
    #[default]
    Development,
    /// Production build
    Production,
}

impl Mode {
    /// Parse a mode name; anything other than `production`/`prod` is development
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Whether this is a production build
    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Dev server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Proxy settings for backend calls made through the dev server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path prefix that is forwarded
    pub prefix: String,
    /// Backend origin requests are forwarded to
    pub target: String,
    /// Rewrite the `Host` header to the target's host
    pub change_origin: bool,
    /// Verify the target's TLS certificate
    pub secure: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            target: DEFAULT_API_URL.to_string(),
            change_origin: true,
            secure: false,
        }
    }
}

impl ProxyConfig {
    /// Whether `path` is forwarded to the backend
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Build output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory
    pub out_dir: PathBuf,
    /// Include source maps; defaults to "not production"
    pub sourcemap: Option<bool>,
    /// Empty the output directory before building
    pub empty_out_dir: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dist"),
            sourcemap: None,
            empty_out_dir: true,
        }
    }
}

/// Web tooling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Directory with the static front-end sources
    pub root: PathBuf,
    /// Build mode
    pub mode: Mode,
    /// Dev server
    pub server: ServerConfig,
    /// Preview server
    pub preview: ServerConfig,
    /// Backend proxy
    pub proxy: ProxyConfig,
    /// Build output
    pub build: BuildConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            mode: Mode::default(),
            server: ServerConfig::default(),
            preview: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            proxy: ProxyConfig::default(),
            build: BuildConfig::default(),
        }
    }
}

impl WebConfig {
    /// Load from `path`, or from the first config file found, then apply
    /// environment overrides. No file means defaults.
    pub fn load(path: Option<&Path>) -> WebResult<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let config = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => Self::default(),
        };

        Ok(config.apply_env())
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
            self.preview.port = port;
        }

        if let Some(url) = lookup(API_URL_ENV).or_else(|| lookup(VITE_API_URL_ENV)) {
            self.proxy.target = url;
        }

        if let Some(mode) = lookup("ORDER_ENTRY_ENV").or_else(|| lookup("NODE_ENV")) {
            self.mode = Mode::parse(&mode);
        }

        self
    }

    /// Point the proxy and the built `__API_URL__` at `url`
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.proxy.target = url.into();
        self
    }

    /// Backend URL baked into the build as `__API_URL__`
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.proxy.target
    }

    /// Whether source maps are emitted
    #[must_use]
    pub fn sourcemap(&self) -> bool {
        self.build.sourcemap.unwrap_or(!self.mode.is_production())
    }

    /// Compile-time constants exposed to the front end
    #[must_use]
    pub fn defines(&self) -> Vec<(&'static str, serde_json::Value)> {
        vec![
            ("__API_URL__", serde_json::Value::from(self.api_url())),
            (
                "__IS_PRODUCTION__",
                serde_json::Value::from(self.mode.is_production()),
            ),
        ]
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> WebResult<WebConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| WebError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| WebError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}
