//! Error types for kitbag
//!
//! All modules use `KitbagResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for kitbag operations
pub type KitbagResult<T> = Result<T, KitbagError>;

/// All errors that can occur in kitbag
#[derive(Error, Debug)]
pub enum KitbagError {
    // Cache addressing errors
    #[error("cache entries must stay within the cache directory: {pathname:?} escapes it")]
    PathEscape { pathname: String },

    #[error("either a tool name or an explicit cache root must be supplied")]
    Construction,

    // Fetch errors
    #[error("network error fetching {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to download {url}, got status code {status}")]
    Download { url: String, status: u16 },

    #[error("archive extraction failed: {reason}")]
    Extract { reason: String },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {name}")]
    FetchFailed {
        name: String,
        #[source]
        source: Box<KitbagError>,
    },

    // Configuration errors
    #[error("invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("failed to create config directory {path}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl KitbagError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a fetch failure, preserving the underlying cause for diagnostics
    pub fn fetch_failed(name: impl Into<String>, source: KitbagError) -> Self {
        Self::FetchFailed {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PathEscape { .. } => {
                Some("Use a pathname relative to the cache root, without '..' segments")
            }
            Self::Construction => {
                Some("Pass --name or --cache-root (or set cache.name in the config file)")
            }
            Self::Download { .. } => Some("Check the URL and any required request headers"),
            _ => None,
        }
    }
}
