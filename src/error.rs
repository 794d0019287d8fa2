//! Error types for the micromouse crate

use thiserror::Error;

/// Main error type for the micromouse crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid heading '{heading}' (expected one of: up, down, left, right, u, d, l, r)")]
    InvalidHeading { heading: String },

    #[error("invalid sensor reading {readings:?}: {reason}")]
    InvalidSensor { readings: Vec<i64>, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid maze: {message}")]
    InvalidMaze { message: String },

    #[error("position ({x}, {y}) is outside a {dim}x{dim} maze")]
    PositionOutOfBounds { x: i64, y: i64, dim: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
