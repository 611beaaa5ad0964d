//! Error types for Pulse services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PulseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PulseError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Stream unavailable: {0}")]
    StreamUnavailable(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PulseError {
    /// Client input errors are detected locally and never worth retrying.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidDuration(_) | Self::InvalidDimension(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::InvalidDuration(_) => "INVALID_DURATION",
            Self::InvalidDimension(_) => "INVALID_DIMENSION",
            Self::StreamUnavailable(_) => "STREAM_UNAVAILABLE",
            Self::MalformedFrame(_) => "MALFORMED_FRAME",
            Self::EmptyResult(_) => "EMPTY_RESULT",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
