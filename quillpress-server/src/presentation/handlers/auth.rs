use axum::{
    extract::{Form, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

use crate::application::gate;
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::flash;
use crate::presentation::handlers::validation_flash_message;
use crate::presentation::middleware::identity::{CurrentIdentity, SESSION_USER_KEY, SessionUser};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterForm {
    #[validate(length(min = 1, max = 250, message = "name must be 1-250 characters"))]
    pub(crate) name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginForm {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub(crate) password: String,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> AppResult<Redirect> {
    if let Err(errors) = form.validate() {
        flash::push_flash(&session, validation_flash_message(&errors)).await?;
        return Ok(Redirect::to("/register"));
    }

    let req = RegisterRequest {
        name: form.name,
        email: form.email,
        password: form.password,
    };

    match state.auth_service.register(req).await {
        // a fresh account still has to sign in
        Ok(_) => Ok(Redirect::to("/login")),
        Err(DomainError::DuplicateEmail) => {
            flash::push_flash(&session, "Provided email is already registered.").await?;
            Ok(Redirect::to("/register"))
        }
        Err(err @ DomainError::Validation { .. }) => {
            flash::push_flash(&session, err.to_string()).await?;
            Ok(Redirect::to("/register"))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Redirect> {
    // a malformed login reads the same as a wrong one
    if form.validate().is_err() {
        flash::push_flash(&session, "Invalid email or password.").await?;
        return Ok(Redirect::to("/login"));
    }

    let req = LoginRequest {
        email: form.email,
        password: form.password,
    };

    match state.auth_service.login(req).await {
        Ok(user) => {
            // the session id rotates before the user is bound to it
            session.cycle_id().await?;
            session
                .insert(SESSION_USER_KEY, SessionUser::from(user))
                .await?;
            Ok(Redirect::to("/"))
        }
        Err(DomainError::Validation { .. } | DomainError::InvalidCredentials) => {
            flash::push_flash(&session, "Invalid email or password.").await?;
            Ok(Redirect::to("/login"))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn logout(session: Session, identity: CurrentIdentity) -> AppResult<Redirect> {
    gate::require_authenticated(&identity.0)?;

    session.flush().await?;
    Ok(Redirect::to("/"))
}
