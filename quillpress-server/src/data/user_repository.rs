use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

/// An account row as persisted: the public identity plus the password hash
/// that never leaves the data layer except for verification.
#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    /// Inserts a new account. The very first account in the store becomes
    /// the admin; everyone after it is a regular user.
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
}
