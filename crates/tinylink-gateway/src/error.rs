use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tinylink_core::ShortenerError;
use tracing::{debug, error, warn};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),

    /// The request body or its encoding could not be understood.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A stored target cannot be written into a `Location` header.
    #[error("stored target is not a usable redirect location: {0}")]
    UnusableTarget(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Shortener(ShortenerError::MalformedInput(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Shortener(ShortenerError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Shortener(ShortenerError::TokenCollision { .. }) => StatusCode::CONFLICT,
            Self::Shortener(ShortenerError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnusableTarget(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        } else if status == StatusCode::CONFLICT {
            warn!(error = %self, "request rejected");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
