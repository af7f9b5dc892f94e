use axum::{
    Json,
    extract::{Form, Path, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use validator::Validate;

use crate::application::gate;
use crate::domain::comment::{Comment, NewCommentRequest};
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::flash::{self, Flash};
use crate::presentation::handlers::{validation_flash_message, viewer};
use crate::presentation::middleware::identity::CurrentIdentity;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PostForm {
    #[validate(length(min = 1, max = 250, message = "title must be 1-250 characters"))]
    pub(crate) title: String,
    #[validate(length(min = 1, max = 250, message = "subtitle must be 1-250 characters"))]
    pub(crate) subtitle: String,
    #[validate(url(message = "img_url must be a valid URL"))]
    pub(crate) img_url: String,
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub(crate) body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CommentForm {
    #[validate(length(min = 1, message = "comment must not be empty"))]
    pub(crate) comment: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) author_id: i64,
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) date: String,
    pub(crate) body: String,
    pub(crate) img_url: String,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            subtitle: post.subtitle,
            date: post.date,
            body: post.body,
            img_url: post.img_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) author_id: i64,
    pub(crate) post_id: i64,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author_id: comment.author_id,
            post_id: comment.post_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HomePage {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) logged_in: bool,
    pub(crate) user_id: Option<i64>,
    pub(crate) flashes: Vec<Flash>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostPage {
    pub(crate) post: PostDto,
    pub(crate) comments: Vec<CommentDto>,
    pub(crate) logged_in: bool,
    pub(crate) user_id: Option<i64>,
    pub(crate) flashes: Vec<Flash>,
}

/// Editor page for both the blank and the prefilled form.
#[derive(Debug, Serialize)]
pub(crate) struct PostFormPage {
    pub(crate) post: Option<PostDto>,
    pub(crate) logged_in: bool,
    pub(crate) user_id: Option<i64>,
    pub(crate) flashes: Vec<Flash>,
}

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
) -> AppResult<Json<HomePage>> {
    let posts = state.blog_service.list_posts().await?;
    let (logged_in, user_id) = viewer(&identity.0);

    Ok(Json(HomePage {
        posts: posts.into_iter().map(PostDto::from).collect(),
        logged_in,
        user_id,
        flashes: flash::take_flashes(&session).await?,
    }))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
    Path(id): Path<i64>,
) -> AppResult<Json<PostPage>> {
    let detail = state.blog_service.get_post(id).await?;
    let (logged_in, user_id) = viewer(&identity.0);

    Ok(Json(PostPage {
        post: detail.post.into(),
        comments: detail.comments.into_iter().map(CommentDto::from).collect(),
        logged_in,
        user_id,
        flashes: flash::take_flashes(&session).await?,
    }))
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> AppResult<Redirect> {
    let back = format!("/post/{id}");

    if let Err(errors) = form.validate() {
        flash::push_flash(&session, validation_flash_message(&errors)).await?;
        return Ok(Redirect::to(&back));
    }

    let req = NewCommentRequest { text: form.comment };

    match state.blog_service.add_comment(&identity.0, id, req).await {
        Ok(_) => Ok(Redirect::to(&back)),
        // the write is dropped; the viewer is nudged, not rejected
        Err(DomainError::Unauthenticated) => {
            flash::push_flash(&session, "Please login to post comment.").await?;
            Ok(Redirect::to(&back))
        }
        Err(err @ DomainError::Validation { .. }) => {
            flash::push_flash(&session, err.to_string()).await?;
            Ok(Redirect::to(&back))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn new_post_page(
    session: Session,
    identity: CurrentIdentity,
) -> AppResult<Json<PostFormPage>> {
    gate::require_admin(&identity.0)?;
    let (logged_in, user_id) = viewer(&identity.0);

    Ok(Json(PostFormPage {
        post: None,
        logged_in,
        user_id,
        flashes: flash::take_flashes(&session).await?,
    }))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
    Form(form): Form<PostForm>,
) -> AppResult<Redirect> {
    gate::require_admin(&identity.0)?;

    if let Err(errors) = form.validate() {
        flash::push_flash(&session, validation_flash_message(&errors)).await?;
        return Ok(Redirect::to("/new-post"));
    }

    let req = CreatePostRequest {
        title: form.title,
        subtitle: form.subtitle,
        img_url: form.img_url,
        body: form.body,
    };

    match state.blog_service.create_post(&identity.0, req).await {
        Ok(_) => Ok(Redirect::to("/")),
        Err(DomainError::DuplicateTitle) => {
            flash::push_flash(&session, "A post with that title already exists.").await?;
            Ok(Redirect::to("/new-post"))
        }
        Err(err @ DomainError::Validation { .. }) => {
            flash::push_flash(&session, err.to_string()).await?;
            Ok(Redirect::to("/new-post"))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn edit_post_page(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
    Path(id): Path<i64>,
) -> AppResult<Json<PostFormPage>> {
    gate::require_admin(&identity.0)?;

    let detail = state.blog_service.get_post(id).await?;
    let (logged_in, user_id) = viewer(&identity.0);

    Ok(Json(PostFormPage {
        post: Some(detail.post.into()),
        logged_in,
        user_id,
        flashes: flash::take_flashes(&session).await?,
    }))
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    session: Session,
    identity: CurrentIdentity,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> AppResult<Redirect> {
    gate::require_admin(&identity.0)?;

    let back = format!("/edit-post/{id}");
    if let Err(errors) = form.validate() {
        flash::push_flash(&session, validation_flash_message(&errors)).await?;
        return Ok(Redirect::to(&back));
    }

    let req = UpdatePostRequest {
        title: form.title,
        subtitle: form.subtitle,
        img_url: form.img_url,
        body: form.body,
    };

    match state.blog_service.update_post(&identity.0, id, req).await {
        Ok(post) => Ok(Redirect::to(&format!("/post/{}", post.id))),
        Err(DomainError::DuplicateTitle) => {
            flash::push_flash(&session, "A post with that title already exists.").await?;
            Ok(Redirect::to(&back))
        }
        Err(err @ DomainError::Validation { .. }) => {
            flash::push_flash(&session, err.to_string()).await?;
            Ok(Redirect::to(&back))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    identity: CurrentIdentity,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.blog_service.delete_post(&identity.0, id).await?;
    Ok(Redirect::to("/"))
}
