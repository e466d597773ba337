// ── Core error types ──
//
// Gateway failures never appear here: the sync controllers fold them
// into their snapshots as plain message strings (the UI only ever
// renders text). CoreError covers the local concerns -- preference
// storage and configuration.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}
