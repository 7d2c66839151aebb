use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record. `password` and `password_confirmation` only live in memory.
#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct User {
    pub id: Option<Uuid>, // None until the first save
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: Option<String>, // Argon2 PHC string
    #[serde(skip_serializing)]
    pub remember_token: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub password: Option<String>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub password_confirmation: Option<String>,
}

/// Same record means same id; unsaved users equal nothing.
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Sign-up / profile form input.
#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl From<UserParams> for User {
    fn from(params: UserParams) -> Self {
        Self {
            name: params.name,
            email: params.email,
            password: params.password,
            password_confirmation: params.password_confirmation,
            ..Self::default()
        }
    }
}
