use tracing::{debug, info, instrument, warn};

use crate::users::{
    password::{self, PasswordError},
    repo_types::User,
    store::{StoreError, UserStore},
    token,
    validation::{self, is_blank, Field, Rule, ValidationErrors},
};

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Hash(PasswordError),
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            name: name.into(),
            email: email.into(),
            password_confirmation: Some(password.clone()),
            password: Some(password),
            ..Self::default()
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate_attributes(&self) -> ValidationErrors {
        validation::validate_attributes(self)
    }

    /// Every rule, including email uniqueness against `store`. Does not mutate.
    pub async fn validate(&self, store: &dyn UserStore) -> Result<ValidationErrors, StoreError> {
        let mut errors = self.validate_attributes();

        if !is_blank(&self.email) {
            if let Some(existing) = store.find_by_email(&self.email).await? {
                if existing.id != self.id {
                    errors.add(Field::Email, Rule::Taken);
                }
            }
        }

        Ok(errors)
    }

    pub async fn is_valid(&self, store: &dyn UserStore) -> Result<bool, StoreError> {
        Ok(self.validate(store).await?.is_empty())
    }

    /// Validates, then persists with a lower-cased email, a fresh digest when a
    /// password was assigned and a remember token if none exists yet. `self`
    /// is only replaced once the store accepted the record.
    #[instrument(skip(self, store), fields(user_id = ?self.id))]
    pub async fn save(&mut self, store: &dyn UserStore) -> Result<User, SaveError> {
        let errors = self.validate(store).await?;
        if !errors.is_empty() {
            warn!(errors = %errors, "user validation failed");
            return Err(SaveError::Invalid(errors));
        }

        let mut record = self.clone();
        record.email = record.email.to_lowercase();
        if let Some(plain) = record.password.as_deref() {
            record.password_digest = Some(password::hash(plain).map_err(SaveError::Hash)?);
        }
        if record.remember_token.as_deref().map_or(true, is_blank) {
            record.remember_token = Some(token::new_remember_token());
        }

        let saved = if record.is_persisted() {
            store.update(&record).await
        } else {
            store.insert(&record).await
        }
        .map_err(|e| {
            warn!(error = %e, email = %record.email, "user store rejected save");
            e
        })?;

        info!(user_id = ?saved.id, email = %saved.email, "user saved");
        *self = saved.clone();
        Ok(saved)
    }

    /// `Some(self)` when `candidate` matches the stored digest, `None` otherwise.
    pub fn authenticate(&self, candidate: &str) -> Result<Option<&User>, PasswordError> {
        let Some(digest) = self.password_digest.as_deref() else {
            debug!(user_id = ?self.id, "authenticate without digest");
            return Ok(None);
        };
        if password::verify(candidate, digest)? {
            Ok(Some(self))
        } else {
            Ok(None)
        }
    }

    /// Replaces the token in memory; the next save or store update persists it.
    pub fn regenerate_remember_token(&mut self) -> &str {
        self.remember_token.insert(token::new_remember_token())
    }
}
