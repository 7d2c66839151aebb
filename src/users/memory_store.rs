use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::{
    repo_types::User,
    store::{StoreError, UserStore},
};

/// Process-local store, used by tests and single-node tooling.
#[derive(Debug, Default)]
pub struct InMemoryUserStore(RwLock<HashMap<Uuid, User>>);

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.0.read().await.len()
    }
}

fn email_in_use(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| u.id != except && u.email.to_lowercase() == email.to_lowercase())
}

// Only persisted columns survive.
fn stored(user: &User) -> User {
    User {
        password: None,
        password_confirmation: None,
        ..user.clone()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.0.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        Ok(self
            .0
            .read()
            .await
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn find_by_remember_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .0
            .read()
            .await
            .values()
            .find(|u| u.remember_token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, StoreError> {
        let mut guard = self.0.write().await;

        if email_in_use(&guard, &user.email, None) {
            return Err(StoreError::EmailTaken);
        }

        let now = OffsetDateTime::now_utc();
        let id = Uuid::new_v4();
        let record = User {
            id: Some(id),
            created_at: Some(now),
            updated_at: Some(now),
            ..stored(user)
        };
        guard.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, user: &User) -> Result<User, StoreError> {
        let id = user.id.ok_or(StoreError::NotFound)?;
        let mut guard = self.0.write().await;

        let created_at = guard.get(&id).ok_or(StoreError::NotFound)?.created_at;
        if email_in_use(&guard, &user.email, Some(id)) {
            return Err(StoreError::EmailTaken);
        }

        let record = User {
            created_at,
            updated_at: Some(OffsetDateTime::now_utc()),
            ..stored(user)
        };
        guard.insert(id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User {
            name: "Example".into(),
            email: email.into(),
            password_digest: Some("digest".into()),
            remember_token: Some("token".into()),
            password: Some("abcdef".into()),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_drops_transients() {
        let store = InMemoryUserStore::new();
        let saved = store.insert(&user("user@example.com")).await.unwrap();

        let id = saved.id.expect("id assigned");
        assert!(saved.created_at.is_some());
        assert!(saved.password.is_none());
        assert_eq!(store.find_by_id(id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn unique_index_is_case_insensitive() {
        let store = InMemoryUserStore::new();
        store.insert(&user("user@example.com")).await.unwrap();

        let err = store.insert(&user("USER@EXAMPLE.COM")).await.unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn find_by_email_ignores_case() {
        let store = InMemoryUserStore::new();
        let saved = store.insert(&user("user@example.com")).await.unwrap();

        assert_eq!(store.find_by_email("User@Example.COM").await.unwrap(), Some(saved));
        assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_keeps_own_email_and_rejects_others() {
        let store = InMemoryUserStore::new();
        let mut first = store.insert(&user("first@example.com")).await.unwrap();
        store.insert(&user("second@example.com")).await.unwrap();

        first.name = "Renamed".into();
        let updated = store.update(&first).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.created_at, first.created_at);

        first.email = "Second@example.com".into();
        assert!(matches!(store.update(&first).await, Err(StoreError::EmailTaken)));
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let store = InMemoryUserStore::new();
        assert!(matches!(
            store.update(&user("a@b.com")).await,
            Err(StoreError::NotFound)
        ));

        let mut ghost = user("a@b.com");
        ghost.id = Some(Uuid::new_v4());
        assert!(matches!(store.update(&ghost).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn find_by_remember_token() {
        let store = InMemoryUserStore::new();
        let saved = store.insert(&user("user@example.com")).await.unwrap();

        assert_eq!(store.find_by_remember_token("token").await.unwrap(), Some(saved));
        assert!(store.find_by_remember_token("nope").await.unwrap().is_none());
    }
}
