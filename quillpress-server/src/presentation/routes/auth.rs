use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::auth::{login, logout, register};
use crate::presentation::handlers::pages::site_page;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(site_page).post(login))
        .route("/register", get(site_page).post(register))
        .route("/logout", get(logout))
}
