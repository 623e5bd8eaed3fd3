use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unusable path: {0}")]
    Path(#[from] PathRejection),
    #[error("unusable body: {0}")]
    Body(#[from] JsonRejection),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // rejected requests fail like a query the database refused
            AppError::Database(_) | AppError::Path(_) | AppError::Body(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match self {
            AppError::NotFound(message) => message.to_string(),
            other => {
                tracing::error!(error = %other, "request failed");
                INTERNAL_ERROR.to_string()
            }
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Response for a handler that panicked; the payload only goes to the log.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, "Something broke!").into_response()
}
