//! Configuration types and loading
//!
//! Sources are layered: built-in defaults, an optional `league.toml`, then
//! `LEAGUE__SECTION__KEY` environment variables. `DATABASE_URL`, `HOST` and
//! `PORT` are honoured last so the usual platform variables keep working.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub application: ApplicationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; the in-memory store is used when unset
    #[serde(default)]
    pub url: Option<String>,
    pub pool_size: u32,
    pub min_connections: u32,
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplicationConfig {
    /// Application name reported by the API root
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_seconds: 60,
            },
            database: DatabaseConfig {
                url: None,
                pool_size: 10,
                min_connections: 2,
                pool_timeout_seconds: 30,
            },
            application: ApplicationConfig {
                name: "leagueApp".to_string(),
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config source error: {0}")]
    Source(#[from] ::config::ConfigError),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from `league.toml` (optional) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("league")
    }

    /// Load configuration using `file_stem` as the optional config file name
    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut config: AppConfig = ::config::Config::builder()
            .set_default("server.host", defaults.server.host.clone())?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "server.request_timeout_seconds",
                defaults.server.request_timeout_seconds as i64,
            )?
            .set_default("database.pool_size", i64::from(defaults.database.pool_size))?
            .set_default(
                "database.min_connections",
                i64::from(defaults.database.min_connections),
            )?
            .set_default(
                "database.pool_timeout_seconds",
                defaults.database.pool_timeout_seconds as i64,
            )?
            .set_default("application.name", defaults.application.name.clone())?
            .add_source(::config::File::with_name(file_stem).required(false))
            .add_source(
                ::config::Environment::with_prefix("LEAGUE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = Some(url);
            }
        }
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a valid port", port),
            })?;
        }
        Ok(())
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.pool_size, 10);
        assert!(config.database.url.is_none());
        assert_eq!(config.application.name, "leagueApp");
    }

    #[test]
    fn test_server_addr() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9000;
        let addr = config.server_addr();
        assert_eq!(addr.port(), 9000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_invalid_host_falls_back_to_unspecified() {
        let mut config = AppConfig::default();
        config.server.host = "not-an-ip".to_string();
        assert!(config.server_addr().ip().is_unspecified());
    }
}
