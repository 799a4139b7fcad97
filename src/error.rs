//! Error type shared by the selection core, codecs and bindings.

/// Errors raised by this crate.
///
/// Only the configuration, codec and I/O paths surface these to callers.
/// Inside the edge tracer an [`SelectError::OutOfBounds`] just ends the
/// current ray.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// A luminance sample was requested outside the image.
    #[error("sample at ({x}, {y}) is outside the image")]
    OutOfBounds { x: i64, y: i64 },

    /// A configuration value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raw data does not match the requested dimensions.
    #[error("data is {actual} bytes, expected {expected} for the requested size")]
    WrongSize { expected: usize, actual: usize },

    /// A tool operation was called in a state that does not allow it.
    #[error("invalid tool state: {0}")]
    InvalidState(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SelectError>;
