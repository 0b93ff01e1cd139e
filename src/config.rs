use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

/// Where the database lives: either a full URL or the discrete `PG_*` pieces.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: Option<String>,
        database: String,
    },
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match self {
            DatabaseConfig::Url(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid Postgres URL"),
            DatabaseConfig::Parts {
                host,
                port,
                user,
                password,
                database,
            } => {
                let mut options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .database(database);
                if let Some(password) = password {
                    options = options.password(password);
                }
                Ok(options)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(url),
            None => DatabaseConfig::Parts {
                host: lookup("PG_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: lookup("PG_PORT")
                    .unwrap_or_else(|| "5432".to_string())
                    .parse()
                    .context("PG_PORT must be a valid number")?,
                user: lookup("PG_USER").context("PG_USER or DATABASE_URL must be set")?,
                password: lookup("PG_PASSWORD"),
                database: lookup("PG_DATABASE")
                    .context("PG_DATABASE or DATABASE_URL must be set")?,
            },
        };

        Ok(Self {
            database,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn database_url_takes_precedence() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://app:secret@db:5432/shop"),
            ("PG_HOST", "ignored"),
        ]))
        .unwrap();

        assert_eq!(
            config.database,
            DatabaseConfig::Url("postgres://app:secret@db:5432/shop".to_string())
        );
        assert!(config.database.connect_options().is_ok());
    }

    #[test]
    fn discrete_variables_with_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PG_USER", "app"),
            ("PG_DATABASE", "shop"),
        ]))
        .unwrap();

        assert_eq!(
            config.database,
            DatabaseConfig::Parts {
                host: "localhost".to_string(),
                port: 5432,
                user: "app".to_string(),
                password: None,
                database: "shop".to_string(),
            }
        );
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn discrete_variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PG_HOST", "db.internal"),
            ("PG_PORT", "6543"),
            ("PG_USER", "app"),
            ("PG_PASSWORD", "secret"),
            ("PG_DATABASE", "shop"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        match config.database {
            DatabaseConfig::Parts { host, port, password, .. } => {
                assert_eq!(host, "db.internal");
                assert_eq!(port, 6543);
                assert_eq!(password.as_deref(), Some("secret"));
            }
            other => panic!("expected discrete parts, got {other:?}"),
        }
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn missing_user_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("PG_DATABASE", "shop")])).unwrap_err();
        assert!(err.to_string().contains("PG_USER"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/shop"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
