use axum::{
    Json,
    extract::{Form, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use validator::Validate;

use crate::domain::contact::ContactMessage;
use crate::domain::error::DomainError;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::flash::{self, Flash, FlashLevel};
use crate::presentation::handlers::{validation_flash_message, viewer};
use crate::presentation::middleware::identity::CurrentIdentity;

/// Field names follow the site's form markup.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ContactForm {
    #[validate(length(min = 1, max = 250, message = "name must not be empty"))]
    pub(crate) username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 1, max = 50, message = "phone must not be empty"))]
    pub(crate) phone: String,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub(crate) message: String,
}

/// Pages with no data of their own: about, contact, and the auth forms.
#[derive(Debug, Serialize)]
pub(crate) struct SitePage {
    pub(crate) logged_in: bool,
    pub(crate) user_id: Option<i64>,
    pub(crate) flashes: Vec<Flash>,
}

pub(crate) async fn site_page(
    session: Session,
    identity: CurrentIdentity,
) -> AppResult<Json<SitePage>> {
    let (logged_in, user_id) = viewer(&identity.0);

    Ok(Json(SitePage {
        logged_in,
        user_id,
        flashes: flash::take_flashes(&session).await?,
    }))
}

pub(crate) async fn send_contact(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContactForm>,
) -> AppResult<Redirect> {
    if let Err(errors) = form.validate() {
        flash::push_flash_with_level(
            &session,
            validation_flash_message(&errors),
            FlashLevel::Error,
        )
        .await?;
        return Ok(Redirect::to("/contact"));
    }

    let msg = ContactMessage {
        name: form.username,
        email: form.email,
        phone: form.phone,
        message: form.message,
    };

    match state.contact_service.send_contact_message(msg).await {
        Ok(()) => {
            flash::push_flash_with_level(&session, "Email sent successfully.", FlashLevel::Success)
                .await?;
        }
        Err(DomainError::TransportFailure(_)) => {
            flash::push_flash_with_level(&session, "Failed to send email.", FlashLevel::Error)
                .await?;
        }
        Err(err @ DomainError::Validation { .. }) => {
            flash::push_flash_with_level(&session, err.to_string(), FlashLevel::Error).await?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Redirect::to("/contact"))
}
