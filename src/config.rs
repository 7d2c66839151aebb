use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let url = var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS: {v}"))?,
            None => 10,
        };
        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_max_connections() {
        let env = vars(&[("DATABASE_URL", "postgres://localhost/accounts")]);
        let config = AppConfig::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.database.url, "postgres://localhost/accounts");
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn reads_max_connections() {
        let env = vars(&[
            ("DATABASE_URL", "postgres://localhost/accounts"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
        ]);
        let config = AppConfig::from_vars(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.database.max_connections, 3);
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = AppConfig::from_vars(|_| None).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn garbage_max_connections_is_an_error() {
        let env = vars(&[
            ("DATABASE_URL", "postgres://localhost/accounts"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
        ]);
        assert!(AppConfig::from_vars(|k| env.get(k).cloned()).is_err());
    }
}
