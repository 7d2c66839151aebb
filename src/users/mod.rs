pub mod memory_store;
pub mod model;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod store;
pub mod token;
pub mod validation;

pub use memory_store::InMemoryUserStore;
pub use model::SaveError;
pub use repo::PgUserStore;
pub use repo_types::{User, UserParams};
pub use services::{find_by_remember_token, sign_in, SignInError};
pub use store::{StoreError, UserStore};
pub use validation::{Field, Rule, ValidationErrors};
