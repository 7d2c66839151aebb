use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("stored password digest is malformed: {0}")]
    MalformedDigest(password_hash::Error),
}

/// Argon2 PHC string of `plain` under a fresh random salt.
pub fn hash(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            PasswordError::Hash(e)
        })
}

/// `Ok(false)` on mismatch; only an unparsable digest is an error.
pub fn verify(plain: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
        error!(error = %e, "argon2 digest parse error");
        PasswordError::MalformedDigest(e)
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedDigest(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_its_password() {
        let stored = hash("abcdef").expect("hashing should succeed");
        assert!(stored.starts_with("$argon2"));
        assert!(verify("abcdef", &stored).expect("verify should succeed"));
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let stored = hash("foobar").expect("hashing should succeed");
        assert!(!verify("invalid_pw", &stored).expect("mismatch should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash("foobar").unwrap();
        let b = hash("foobar").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("foobar"));
    }

    #[test]
    fn malformed_digest_is_typed_error() {
        let err = verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, PasswordError::MalformedDigest(_)));
    }
}
