use std::sync::Arc;

use anyhow::Result;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::blog_service::BlogService;
use application::contact_service::ContactService;
use data::repositories::sqlite::comment_repository::SqliteCommentRepository;
use data::repositories::sqlite::post_repository::SqlitePostRepository;
use data::repositories::sqlite::user_repository::SqliteUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::mailer::{create_mailer, sender_mailbox};
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let auth_service = Arc::new(AuthService::new(SqliteUserRepository::new(pool.clone())));
    let blog_service = Arc::new(BlogService::new(
        SqlitePostRepository::new(pool.clone()),
        SqliteCommentRepository::new(pool),
    ));
    let contact_service = Arc::new(ContactService::new(
        create_mailer(&settings)?,
        sender_mailbox(&settings)?,
    ));

    let state = AppState::new(auth_service, blog_service, contact_service);

    server::run_http(&settings, state).await
}
