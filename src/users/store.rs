use async_trait::async_trait;
use uuid::Uuid;

use crate::users::repo_types::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email has already been taken")]
    EmailTaken,
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Persistence collaborator. Implementations must enforce case-insensitive
/// email uniqueness themselves; the model's check is only a fast path.
#[async_trait]
pub trait UserStore: std::fmt::Debug + Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_remember_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Persists an unsaved user and returns it with id and timestamps set.
    async fn insert(&self, user: &User) -> Result<User, StoreError>;

    async fn update(&self, user: &User) -> Result<User, StoreError>;
}
