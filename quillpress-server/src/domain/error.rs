use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("email is already registered")]
    DuplicateEmail,

    #[error("a post with that title already exists")]
    DuplicateTitle,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("mail transport failed: {0}")]
    TransportFailure(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}
