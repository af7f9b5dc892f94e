use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::DuplicateEmail | DomainError::DuplicateTitle => StatusCode::CONFLICT,
                DomainError::InvalidCredentials | DomainError::Unauthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                DomainError::Forbidden => StatusCode::FORBIDDEN,
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
                DomainError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Session(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// What the client is allowed to see. Transport and internal detail stays
/// in the server log.
fn public_message(err: &DomainError) -> String {
    match err {
        DomainError::TransportFailure(_) => "failed to send email".to_string(),
        DomainError::Unexpected(_) => "internal error".to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(err) => error!(error = %err, "request failed"),
            AppError::Session(err) => error!(error = %err, "session failure"),
            AppError::Domain(err) if status.is_server_error() => {
                error!(error = %err, "request failed");
            }
            AppError::Domain(_) => {}
        }

        let error = match self {
            AppError::Domain(err) => public_message(&err),
            AppError::Session(_) | AppError::Internal(_) => "internal error".to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
