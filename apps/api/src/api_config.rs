use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use moonlight_core::AppError;
use tracing_subscriber::EnvFilter;

const MIN_EDITOR_TOKEN_LENGTH: usize = 32;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Backing store selected by `ARTICLE_STORE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleStoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub article_store: ArticleStoreConfig,
    pub frontend_url: String,
    pub editor_api_token: String,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let article_store = parse_article_store(
            env::var("ARTICLE_STORE").ok().as_deref(),
            env::var("DATABASE_URL").ok(),
            env::var("DATABASE_MAX_CONNECTIONS").ok().as_deref(),
        )?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let editor_api_token = validate_editor_token(required_env("EDITOR_API_TOKEN")?)?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        Ok(Self {
            migrate_only,
            article_store,
            frontend_url,
            editor_api_token,
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_article_store(
    kind: Option<&str>,
    database_url: Option<String>,
    max_connections: Option<&str>,
) -> Result<ArticleStoreConfig, AppError> {
    match kind.map(str::trim).unwrap_or("postgres") {
        "postgres" => {
            let database_url = database_url
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    AppError::Validation(
                        "DATABASE_URL is required when ARTICLE_STORE is 'postgres'".to_owned(),
                    )
                })?;
            let max_connections = max_connections
                .map(|value| {
                    value.parse::<u32>().map_err(|error| {
                        AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
                    })
                })
                .transpose()?
                .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);

            Ok(ArticleStoreConfig::Postgres {
                database_url,
                max_connections,
            })
        }
        "memory" => Ok(ArticleStoreConfig::Memory),
        other => Err(AppError::Validation(format!(
            "ARTICLE_STORE must be either 'postgres' or 'memory', got '{other}'"
        ))),
    }
}

fn validate_editor_token(token: String) -> Result<String, AppError> {
    if token.trim().len() < MIN_EDITOR_TOKEN_LENGTH {
        return Err(AppError::Validation(format!(
            "EDITOR_API_TOKEN must be at least {MIN_EDITOR_TOKEN_LENGTH} characters"
        )));
    }

    Ok(token.trim().to_owned())
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

#[cfg(test)]
mod tests {
    use super::{ArticleStoreConfig, parse_article_store, validate_editor_token};

    #[test]
    fn article_store_defaults_to_postgres_and_needs_database_url() {
        assert!(parse_article_store(None, None, None).is_err());

        let store = parse_article_store(
            None,
            Some("postgres://localhost/moonlight".to_owned()),
            None,
        );
        assert_eq!(
            store.ok(),
            Some(ArticleStoreConfig::Postgres {
                database_url: "postgres://localhost/moonlight".to_owned(),
                max_connections: 10,
            })
        );
    }

    #[test]
    fn article_store_accepts_memory_and_rejects_unknown_kinds() {
        assert_eq!(
            parse_article_store(Some("memory"), None, None).ok(),
            Some(ArticleStoreConfig::Memory)
        );
        assert!(parse_article_store(Some("sqlite"), None, None).is_err());
        assert!(
            parse_article_store(
                Some("postgres"),
                Some("postgres://localhost/moonlight".to_owned()),
                Some("many"),
            )
            .is_err()
        );
    }

    #[test]
    fn editor_token_must_be_long_enough() {
        assert!(validate_editor_token("short".to_owned()).is_err());
        assert!(validate_editor_token("x".repeat(32)).is_ok());
    }
}
