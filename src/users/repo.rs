use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::users::{
    repo_types::User,
    store::{StoreError, UserStore},
};

/// PostgreSQL store. The `users_email_lower_idx` unique index is the
/// authoritative uniqueness guard.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn write_error(e: sqlx::Error, what: &'static str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::EmailTaken,
        _ => StoreError::Unexpected(anyhow::Error::new(e).context(what)),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_digest, remember_token, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_digest, remember_token, created_at, updated_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_remember_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_digest, remember_token, created_at, updated_at
            FROM users
            WHERE remember_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .context("find user by remember token")?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_digest, remember_token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_digest, remember_token, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_digest)
        .bind(&user.remember_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "insert user"))
    }

    async fn update(&self, user: &User) -> Result<User, StoreError> {
        let id = user.id.ok_or(StoreError::NotFound)?;
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_digest = $4, remember_token = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_digest, remember_token, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_digest)
        .bind(&user.remember_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "update user"))?
        .ok_or(StoreError::NotFound)
    }
}
