//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where they
//! need to surface configuration problems.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file {path}: {source}")]
    ConfigFile {
        path:   String,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `rf-core`.
pub type CoreResult<T> = Result<T, CoreError>;
