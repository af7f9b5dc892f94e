use serde::{Deserialize, Serialize};
use validator::ValidateUrl;

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) date: String,
    pub(crate) body: String,
    pub(crate) img_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) img_url: String,
    pub(crate) body: String,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_short_text("title", &self.title)?,
            subtitle: normalize_short_text("subtitle", &self.subtitle)?,
            img_url: normalize_img_url(&self.img_url)?,
            body: normalize_body(&self.body)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) img_url: String,
    pub(crate) body: String,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_short_text("title", &self.title)?,
            subtitle: normalize_short_text("subtitle", &self.subtitle)?,
            img_url: normalize_img_url(&self.img_url)?,
            body: normalize_body(&self.body)?,
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        author_id: i64,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        date: impl Into<String>,
        body: impl Into<String>,
        img_url: impl Into<String>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let date = date.into();
        if date.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "date",
                message: "must not be empty",
            });
        }

        Ok(Self {
            id,
            author_id,
            title: normalize_short_text("title", &title.into())?,
            subtitle: normalize_short_text("subtitle", &subtitle.into())?,
            date,
            body: normalize_body(&body.into())?,
            img_url: normalize_img_url(&img_url.into())?,
        })
    }
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn normalize_short_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() || value.len() > 250 {
        return Err(DomainError::Validation {
            field,
            message: "must be 1..250 chars",
        });
    }
    Ok(value.to_string())
}

fn normalize_img_url(img_url: &str) -> Result<String, DomainError> {
    let img_url = img_url.trim();
    if img_url.len() > 250 || !img_url.validate_url() {
        return Err(DomainError::Validation {
            field: "img_url",
            message: "must be a valid URL",
        });
    }
    Ok(img_url.to_string())
}

fn normalize_body(body: &str) -> Result<String, DomainError> {
    // Bodies keep interior whitespace and markup exactly as submitted.
    if body.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "body",
            message: "must not be empty",
        });
    }
    Ok(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::{CreatePostRequest, DomainError, Post, UpdatePostRequest};

    fn sample_request() -> CreatePostRequest {
        CreatePostRequest {
            title: "A Title".to_string(),
            subtitle: "A subtitle".to_string(),
            img_url: "https://images.example.com/cover.png".to_string(),
            body: "Some body".to_string(),
        }
    }

    #[test]
    fn create_request_rejects_empty_title() {
        let req = CreatePostRequest {
            title: "   ".to_string(),
            ..sample_request()
        };
        let err = req.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn create_request_rejects_bad_img_url() {
        let req = CreatePostRequest {
            img_url: "not-a-url".to_string(),
            ..sample_request()
        };
        let err = req.validate().expect_err("img_url must be rejected");
        assert_validation_field(err, "img_url");
    }

    #[test]
    fn update_request_rejects_blank_body() {
        let req = UpdatePostRequest {
            title: "A Title".to_string(),
            subtitle: "A subtitle".to_string(),
            img_url: "https://images.example.com/cover.png".to_string(),
            body: "  \n ".to_string(),
        };
        let err = req.validate().expect_err("body must be rejected");
        assert_validation_field(err, "body");
    }

    #[test]
    fn create_request_trims_title_and_subtitle() {
        let req = CreatePostRequest {
            title: "  A Title  ".to_string(),
            subtitle: "  A subtitle  ".to_string(),
            ..sample_request()
        };
        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "A Title");
        assert_eq!(validated.subtitle, "A subtitle");
    }

    #[test]
    fn post_new_builds_post() {
        let post = Post::new(
            1,
            7,
            "A Title",
            "A subtitle",
            "January 02, 2024",
            "Body",
            "https://images.example.com/cover.png",
        )
        .expect("post should be created");

        assert_eq!(post.id, 1);
        assert_eq!(post.author_id, 7);
        assert_eq!(post.date, "January 02, 2024");
    }

    #[test]
    fn post_new_rejects_non_positive_author_id() {
        let err = Post::new(
            1,
            0,
            "A Title",
            "A subtitle",
            "January 02, 2024",
            "Body",
            "https://images.example.com/cover.png",
        )
        .expect_err("author_id must be > 0");
        assert_validation_field(err, "author_id");
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
