use std::{net::IpAddr, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Loads configuration from the process environment. Call
/// [`crate::bootstrap::init_env`] first so `.env` values are visible.
pub fn load() -> Result<DotEnvyConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig, ConfigError> {
    let server = Server {
        host: parse_or(&lookup, "SERVER_HOST", IpAddr::from([0, 0, 0, 0]))?,
        port: parse_or(&lookup, "SERVER_PORT", 3000)?,
    };

    let database = Database {
        url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
        max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
    };

    Ok(DotEnvyConfig { server, database })
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
