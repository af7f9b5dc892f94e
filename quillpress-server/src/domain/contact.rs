use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ContactMessage {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) message: String,
}

impl ContactMessage {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let name = require_text("name", &self.name)?;
        let phone = require_text("phone", &self.phone)?;
        let message = require_text("message", &self.message)?;

        let email = self.email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(DomainError::Validation {
                field: "email",
                message: "must be a valid email",
            });
        }

        Ok(Self {
            name,
            email,
            phone,
            message,
        })
    }
}

fn require_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation {
            field,
            message: "must not be empty",
        });
    }
    Ok(value.to_string())
}
