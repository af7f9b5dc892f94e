use axum::{
    Router,
    routing::{get, post},
};

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    add_comment, create_post, delete_post, edit_post_page, get_post, list_posts, new_post_page,
    update_post,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/post/{id}", get(get_post).post(add_comment))
        .route("/new-post", get(new_post_page).post(create_post))
        .route("/edit-post/{id}", get(edit_post_page).post(update_post))
        // deletion changes state, so it only answers POST
        .route("/delete/{id}", post(delete_post))
}
