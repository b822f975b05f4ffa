//! Error types shared across Cuekit crates.

/// Top-level error type for Cuekit operations.
#[derive(Debug, thiserror::Error)]
pub enum CuekitError {
    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Invalid timing: start {start}s, end {end}s (start must be >= 0 and end > start)")]
    InvalidTiming { start: f64, end: f64 },

    #[error("Subtitle text must not be empty")]
    EmptyText,

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Transcoding error: {message}")]
    Transcoding { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CuekitError.
pub type CuekitResult<T> = Result<T, CuekitError>;

impl CuekitError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn invalid_timing(start: f64, end: f64) -> Self {
        Self::InvalidTiming { start, end }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: msg.into(),
        }
    }

    pub fn transcoding(msg: impl Into<String>) -> Self {
        Self::Transcoding {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
