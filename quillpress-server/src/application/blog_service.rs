use chrono::{Local, NaiveDate};

use crate::application::gate;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::comment::{Comment, NewCommentRequest};
use crate::domain::error::DomainError;
use crate::domain::identity::Identity;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: Post,
    pub(crate) comments: Vec<Comment>,
}

pub(crate) struct BlogService<P: PostRepository, C: CommentRepository> {
    posts: P,
    comments: C,
}

impl<P: PostRepository, C: CommentRepository> BlogService<P, C> {
    pub(crate) fn new(posts: P, comments: C) -> Self {
        Self { posts, comments }
    }

    pub(crate) async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.posts.list_posts().await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .get_post(id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {id}")))?;
        let comments = self.comments.list_for_post(id).await?;

        Ok(PostDetail { post, comments })
    }

    pub(crate) async fn create_post(
        &self,
        identity: &Identity,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let author = gate::require_admin(identity)?;
        let req = req.validate()?;

        let new_post = NewPost {
            author_id: author.id,
            title: req.title,
            subtitle: req.subtitle,
            date: format_publication_date(Local::now().date_naive()),
            body: req.body,
            img_url: req.img_url,
        };
        self.posts.create_post(new_post).await
    }

    pub(crate) async fn update_post(
        &self,
        identity: &Identity,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        gate::require_admin(identity)?;
        let req = req.validate()?;

        let patch = PostPatch {
            title: req.title,
            subtitle: req.subtitle,
            img_url: req.img_url,
            body: req.body,
        };
        self.posts
            .update_post(post_id, patch)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(
        &self,
        identity: &Identity,
        post_id: i64,
    ) -> Result<(), DomainError> {
        gate::require_admin(identity)?;

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(())
    }

    pub(crate) async fn add_comment(
        &self,
        identity: &Identity,
        post_id: i64,
        req: NewCommentRequest,
    ) -> Result<Comment, DomainError> {
        let author = gate::require_authenticated(identity)?;
        let req = req.validate()?;

        self.posts
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;

        let new_comment = NewComment {
            text: req.text,
            author_id: author.id,
            post_id,
        };
        self.comments.create_comment(new_comment).await
    }
}

pub(crate) fn format_publication_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
