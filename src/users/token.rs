use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

pub const REMEMBER_TOKEN_LEN: usize = 32;

/// Fresh opaque remember-me token drawn from the OS CSPRNG.
pub fn new_remember_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(REMEMBER_TOKEN_LEN)
        .map(char::from)
        .collect()
}
