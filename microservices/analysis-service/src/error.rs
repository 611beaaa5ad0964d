//! Error responses for the Analysis Service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pulse_core::PulseError;
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline failure as seen by HTTP clients
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(#[from] pub PulseError);

impl Error {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PulseError::MissingParameter(_)
            | PulseError::InvalidDuration(_)
            | PulseError::InvalidDimension(_) => StatusCode::BAD_REQUEST,
            PulseError::EmptyResult(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PulseError::StreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            PulseError::MalformedFrame(_) | PulseError::Config(_) | PulseError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.0.is_client_error() {
            tracing::warn!(error = %self.0, code = self.0.error_code(), "Analysis rejected");
        } else {
            tracing::error!(error = %self.0, code = self.0.error_code(), "Analysis failed");
        }

        let body = Json(json!({
            "error": self.0.to_string(),
            "code": self.0.error_code()
        }));

        (status, body).into_response()
    }
}
