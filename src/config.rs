//! Server configuration from environment variables.
//!
//! - `DATABASE_URL` - PostgreSQL connection string (default `postgres://localhost/ecommerce`)
//! - `BIND_ADDR` - listen address (default `127.0.0.1:3000`)
//! - `MAX_CONNECTIONS` - pool size (default 5)
//! - `BODY_LIMIT_BYTES` - largest accepted request body (default 64 KiB)

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/ecommerce";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub body_limit: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let bind_addr = parse_or("BIND_ADDR", lookup("BIND_ADDR"), || {
            SocketAddr::from_str(DEFAULT_BIND_ADDR).map_err(|e| e.to_string())
        })?;
        let max_connections = parse_or("MAX_CONNECTIONS", lookup("MAX_CONNECTIONS"), || {
            Ok(DEFAULT_MAX_CONNECTIONS)
        })?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
        let body_limit = parse_or("BODY_LIMIT_BYTES", lookup("BODY_LIMIT_BYTES"), || Ok(DEFAULT_BODY_LIMIT))?;
        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            body_limit,
        })
    }
}

fn parse_or<T>(
    var: &'static str,
    raw: Option<String>,
    default: impl FnOnce() -> Result<T, String>,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(s) => s.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: format!("{:?}: {}", s, e),
        }),
        None => default().map_err(|reason| ConfigError::Invalid { var, reason }),
    }
}
