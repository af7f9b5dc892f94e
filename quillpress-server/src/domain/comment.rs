use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) author_id: i64,
    pub(crate) post_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NewCommentRequest {
    pub(crate) text: String,
}

impl NewCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "comment",
                message: "must not be empty",
            });
        }
        Ok(self)
    }
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        text: impl Into<String>,
        author_id: i64,
        post_id: i64,
    ) -> Result<Self, DomainError> {
        for (field, value) in [("id", id), ("author_id", author_id), ("post_id", post_id)] {
            if value <= 0 {
                return Err(DomainError::Validation {
                    field,
                    message: "must be > 0",
                });
            }
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "comment",
                message: "must not be empty",
            });
        }

        Ok(Self {
            id,
            text,
            author_id,
            post_id,
        })
    }
}
