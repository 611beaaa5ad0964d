//! Configuration management for microservices

use crate::error::{PulseError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_port: u16,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "unknown".to_string()),
            http_port: parse_env("HTTP_PORT", 8080)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
pub fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| PulseError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Read a human readable duration such as `5m` or `1h30m`.
pub fn duration_env(key: &str, default: Duration) -> Result<Duration> {
    match env::var(key) {
        Ok(raw) => humantime::parse_duration(&raw)
            .map_err(|e| PulseError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
