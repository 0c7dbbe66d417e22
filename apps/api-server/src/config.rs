//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use wayfarer_infra::JwtConfig;
use wayfarer_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    pub jwt: JwtConfig,
    /// Upper bound on the listing page size. Unbounded when unset.
    pub max_page_limit: Option<u64>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
            connect_timeout: Duration::from_secs(
                parse_var("DB_CONNECT_TIMEOUT_SECS").unwrap_or(10),
            ),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            jwt: JwtConfig::from_env(),
            max_page_limit: parse_var("MAX_PAGE_LIMIT").filter(|n| *n > 0),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
