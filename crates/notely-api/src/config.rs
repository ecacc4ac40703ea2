//! Server configuration from environment variables.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use tracing::warn;

use notely_db::pool::DEFAULT_MAX_CONNECTIONS;

/// Default allowed CORS origin.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Default database URL.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/notely";

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Raw comma-separated CORS allow-list.
    pub allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.db_max_connections),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            allowed_origins: std::env::var("ALLOWED_ORIGINS").unwrap_or(defaults.allowed_origins),
        }
    }

    /// Listen address.
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Parse the CORS allow-list.
    ///
    /// Blank input yields the default origin; invalid entries are skipped
    /// with a warning.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.trim().is_empty() {
            return vec![HeaderValue::from_static(DEFAULT_ALLOWED_ORIGINS)];
        }

        self.allowed_origins
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match trimmed.parse::<HeaderValue>() {
                    Ok(v) => Some(v),
                    Err(e) => {
                        warn!("Invalid CORS origin '{}': {}", trimmed, e);
                        None
                    }
                }
            })
            .collect()
    }
}
