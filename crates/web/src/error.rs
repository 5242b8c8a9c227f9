//! Error types for the web tooling

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for web tooling operations
pub type WebResult<T> = Result<T, WebError>;

/// Web tooling errors
#[derive(Error, Debug)]
pub enum WebError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ReadConfig {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the schema
    #[error("Failed to parse config file {path}: {source}")]
    ParseConfig {
        /// File that was parsed
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// Filesystem error during a build or while serving
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Static root does not exist
    #[error("Static root not found: {0}")]
    MissingRoot(PathBuf),

    /// Output directory overlaps the static root
    #[error("Output directory {out_dir} overlaps static root {root}")]
    OverlappingDirs {
        /// Static root
        root: PathBuf,
        /// Output directory
        out_dir: PathBuf,
    },

    /// Proxy HTTP client could not be built
    #[error("Failed to build proxy client: {0}")]
    ProxyClient(#[from] reqwest::Error),

    /// Manifest serialization failed
    #[error("Failed to write manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl WebError {
    /// Wrap an I/O error with the path it happened at
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
