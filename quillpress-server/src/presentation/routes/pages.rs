use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::pages::{send_contact, site_page};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(site_page))
        .route("/contact", get(site_page).post(send_contact))
}
