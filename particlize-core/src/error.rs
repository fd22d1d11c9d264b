//! Error types for particlize

use thiserror::Error;

/// Main error type for particlize operations
///
/// Nothing in this taxonomy is fatal to the process: every variant is
/// surfaced to the user as a notification and leaves the session usable.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown sprite preset: {0}")]
    UnknownSprite(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Render error: {0}")]
    Render(String),
}

/// Result type alias for particlize operations
pub type Result<T> = std::result::Result<T, Error>;
