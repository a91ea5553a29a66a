//! Application configuration loaded from environment variables.

use std::env;

use fabula_core::services::{AuthorizationPolicy, DenialMode};
use fabula_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub policy: AuthorizationPolicy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            policy: Self::parse_policy(),
        }
    }

    /// The authorization policy is resolved here, once; handlers never
    /// re-derive it.
    fn parse_policy() -> AuthorizationPolicy {
        let staff_override = env::var("AUTH_STAFF_OVERRIDE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let denial_mode = match env::var("AUTH_DENIAL_MODE") {
            Ok(v) if v.eq_ignore_ascii_case("redirect") => DenialMode::Redirect,
            _ => DenialMode::Forbidden,
        };

        AuthorizationPolicy {
            staff_override,
            denial_mode,
        }
    }
}
