use std::time::Duration;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::infrastructure::settings::Settings;

pub(crate) fn apply_trace(router: Router) -> Router {
    router.layer(TraceLayer::new_for_http())
}

pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.http_request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ))
}

/// Signed session cookie over an in-process store. The cookie expires when
/// the browser session ends, so closing the browser signs the reader out.
pub(crate) fn apply_session(router: Router, settings: &Settings) -> Router {
    // Key::from wants 64 bytes of material; Settings::from_env enforces that
    let key = Key::from(settings.session_secret.as_bytes());

    let layer = SessionManagerLayer::new(MemoryStore::default())
        .with_signed(key)
        .with_name("quillpress-session")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(settings.secure_cookies)
        .with_expiry(Expiry::OnSessionEnd);

    router.layer(layer)
}
