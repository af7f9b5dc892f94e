use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::domain::identity::{AuthenticatedUser, Identity};
use crate::domain::user::{Role, User};
use crate::presentation::app_error::AppError;

pub(crate) const SESSION_USER_KEY: &str = "user";

/// What a login leaves behind in the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SessionUser {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) role: Role,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
        }
    }
}

impl From<SessionUser> for AuthenticatedUser {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
        }
    }
}

/// Resolves the caller from the session cookie. Absent or empty sessions
/// come through as `Identity::Anonymous` rather than a rejection; the
/// route decides what anonymity means.
#[derive(Debug, Clone)]
pub(crate) struct CurrentIdentity(pub(crate) Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(anyhow::anyhow!(msg)))?;

        let identity = match session.get::<SessionUser>(SESSION_USER_KEY).await? {
            Some(user) => Identity::Authenticated(user.into()),
            None => Identity::Anonymous,
        };

        Ok(Self(identity))
    }
}
