use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    author_id: i64,
    title: String,
    subtitle: String,
    date: String,
    body: String,
    img_url: String,
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO blog_posts (author_id, title, subtitle, date, body, img_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, author_id, title, subtitle, date, body, img_url
            "#,
        )
        .bind(input.author_id)
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(&input.date)
        .bind(&input.body)
        .bind(&input.img_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
            id,
            author_id,
            title,
            subtitle,
            date,
            body,
            img_url
            FROM blog_posts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(
        &self,
        post_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE blog_posts
            SET title = ?2,
                subtitle = ?3,
                img_url = ?4,
                body = ?5
            WHERE id = ?1
            RETURNING id, author_id, title, subtitle, date, body, img_url
            "#,
        )
        .bind(post_id)
        .bind(&patch.title)
        .bind(&patch.subtitle)
        .bind(&patch.img_url)
        .bind(&patch.body)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM blog_posts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                id,
                author_id,
                title,
                subtitle,
                date,
                body,
                img_url
            FROM blog_posts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.author_id,
        row.title,
        row.subtitle,
        row.date,
        row.body,
        row.img_url,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.message().contains("blog_posts.title") {
            return DomainError::DuplicateTitle;
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::NotFound("author".to_string());
        }
    }
    DomainError::Unexpected(err.to_string())
}
