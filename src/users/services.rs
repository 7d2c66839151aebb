use tracing::{error, info, instrument, warn};

use crate::users::{
    password::PasswordError,
    repo_types::User,
    store::{StoreError, UserStore},
    validation::is_blank,
};

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("No user with that email")]
    UnknownEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Password(PasswordError),
}

/// Checks credentials and rotates the remember token of the matching user.
#[instrument(skip(store, password))]
pub async fn sign_in(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, SignInError> {
    let email = email.trim();

    let Some(mut user) = store.find_by_email(email).await? else {
        warn!(email = %email, "sign in with unknown email");
        return Err(SignInError::UnknownEmail);
    };

    let matched = user.authenticate(password).map_err(|e| {
        error!(error = %e, user_id = ?user.id, "verify password failed");
        SignInError::Password(e)
    })?;
    if matched.is_none() {
        warn!(email = %email, user_id = ?user.id, "sign in with invalid password");
        return Err(SignInError::InvalidCredentials);
    }

    user.regenerate_remember_token();
    let user = store.update(&user).await?;

    info!(user_id = ?user.id, "user signed in");
    Ok(user)
}

/// Resolves a remember-me token; blank tokens never hit the store.
pub async fn find_by_remember_token(
    store: &dyn UserStore,
    token: &str,
) -> Result<Option<User>, StoreError> {
    if is_blank(token) {
        return Ok(None);
    }
    store.find_by_remember_token(token).await
}
