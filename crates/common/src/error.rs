//! Error types shared across Tosoku crates.

use std::path::PathBuf;

/// Top-level error type for Tosoku operations.
#[derive(Debug, thiserror::Error)]
pub enum TosokuError {
    #[error("Scenario error: {message}")]
    Scenario { message: String },

    #[error("Share code error: {message}")]
    ShareCode { message: String },

    #[error("Trace error: {message}")]
    Trace { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using TosokuError.
pub type TosokuResult<T> = Result<T, TosokuError>;

impl TosokuError {
    pub fn scenario(msg: impl Into<String>) -> Self {
        Self::Scenario {
            message: msg.into(),
        }
    }

    pub fn share_code(msg: impl Into<String>) -> Self {
        Self::ShareCode {
            message: msg.into(),
        }
    }

    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace {
            message: msg.into(),
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
