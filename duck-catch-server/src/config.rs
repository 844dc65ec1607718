//! Environment Configuration
//!
//! Gateway settings read from the process environment, with defaults for
//! everything.

use std::net::{Ipv4Addr, SocketAddr};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default store connection string.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://achievements.db";

/// Default CORS origin (the front-end dev server).
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Default gateway address used by clients.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:4000";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `PORT` is not a valid port number.
    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),
}

/// Origins accepted by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    /// `*`
    Any,
    /// One exact origin
    Exact(String),
}

impl AllowedOrigin {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "*" => AllowedOrigin::Any,
            origin => AllowedOrigin::Exact(origin.to_string()),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Store connection string (`memory` for the in-process store).
    pub database_url: String,
    /// CORS origin.
    pub allowed_origin: AllowedOrigin,
    /// Server version string.
    pub version: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            allowed_origin: AllowedOrigin::Exact(DEFAULT_ALLOWED_ORIGIN.to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl GatewayConfig {
    /// Read `PORT`, `DATABASE_URL` and `ALLOWED_ORIGIN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
            config.bind_addr.set_port(port);
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            config.database_url = url.trim().to_string();
        }
        if let Some(origin) = lookup("ALLOWED_ORIGIN").filter(|v| !v.trim().is_empty()) {
            config.allowed_origin = AllowedOrigin::parse(&origin);
        }

        Ok(config)
    }
}

/// Gateway base URL for clients: `GATEWAY_URL` or the local default.
pub fn gateway_url_from_env() -> String {
    std::env::var("GATEWAY_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 4000);
        assert_eq!(config.database_url, "sqlite://achievements.db");
        assert_eq!(
            config.allowed_origin,
            AllowedOrigin::Exact("http://localhost:5173".into())
        );
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "memory"),
            ("ALLOWED_ORIGIN", "*"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.database_url, "memory");
        assert_eq!(config.allowed_origin, AllowedOrigin::Any);
    }

    #[test]
    fn test_invalid_port() {
        let err = GatewayConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("eighty".into()));
        assert!(GatewayConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }
}
