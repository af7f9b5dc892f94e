use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        // The role is decided inside the INSERT; two racing registrations
        // never both see an empty table.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO user (name, email, password_hash, role)
            VALUES (
                ?1,
                ?2,
                ?3,
                CASE WHEN EXISTS (SELECT 1 FROM user) THEN 'user' ELSE 'admin' END
            )
            RETURNING id, name, email, role
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        map_row_to_user(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(
            r#"
            SELECT
            id,
            name,
            email,
            password_hash,
            role
            FROM user
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        if let Some(r) = row {
            let user = map_row_to_user(UserRow {
                id: r.id,
                name: r.name,
                email: r.email,
                role: r.role,
            })?;

            Ok(Some(UserCredentials {
                user,
                password_hash: r.password_hash,
            }))
        } else {
            Ok(None)
        }
    }
}

fn map_row_to_user(row: UserRow) -> Result<User, DomainError> {
    let role = row.role.parse()?;
    User::new(row.id, row.name, row.email, role)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_user_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
        && db_err.message().contains("user.email")
    {
        return DomainError::DuplicateEmail;
    }
    DomainError::Unexpected(err.to_string())
}
