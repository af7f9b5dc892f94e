use argon2::{
    Argon2,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    hasher: Argon2<'static>,
}

impl<R: UserRepository> AuthService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$cXVpbGxwcmVzcy1kdW1teQ$hxP7jU2tPek8mJ84g6m3Hm4gM1rSnCg3Ggkk3s91/0M";

    pub(crate) fn new(repo: R) -> Self {
        Self {
            repo,
            hasher: Argon2::default(),
        }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;
        let password_hash = self.hash_password(&req.password)?;

        self.repo
            .create_user(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
            })
            .await
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        let Some(creds) = self.repo.find_by_email(&req.email).await? else {
            // burn one verification so the timing matches the found-user path
            match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                Ok(()) | Err(DomainError::InvalidCredentials) => {}
                Err(err) => return Err(err),
            }
            return Err(DomainError::InvalidCredentials);
        };

        self.verify_password(&req.password, &creds.password_hash)?;
        Ok(creds.user)
    }

    fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, raw_password: &str, password_hash: &str) -> Result<(), DomainError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        match self.hasher.verify_password(raw_password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(PasswordHashError::Password) => Err(DomainError::InvalidCredentials),
            Err(err) => Err(DomainError::Unexpected(err.to_string())),
        }
    }
}
