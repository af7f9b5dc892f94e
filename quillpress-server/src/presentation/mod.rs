use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::contact_service::ContactService;
use crate::data::repositories::sqlite::comment_repository::SqliteCommentRepository;
use crate::data::repositories::sqlite::post_repository::SqlitePostRepository;
use crate::data::repositories::sqlite::user_repository::SqliteUserRepository;

pub(crate) mod app_error;
pub(crate) mod flash;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<SqliteUserRepository>>,
    pub(crate) blog_service: Arc<BlogService<SqlitePostRepository, SqliteCommentRepository>>,
    pub(crate) contact_service: Arc<ContactService>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService<SqliteUserRepository>>,
        blog_service: Arc<BlogService<SqlitePostRepository, SqliteCommentRepository>>,
        contact_service: Arc<ContactService>,
    ) -> Self {
        Self {
            auth_service,
            blog_service,
            contact_service,
        }
    }
}
