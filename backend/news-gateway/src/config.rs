//! Configuration for the news gateway
//!
//! Loads settings from `.env` (local development) and the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub services: ServiceEndpoints,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub news_service: String,
    pub comments_service: String,
    pub censor_service: String,
}

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Per-request timeout of the HTTP client
    pub downstream: Duration,
    /// Budget shared by all sub-calls of one aggregate request
    pub aggregate: Duration,
    /// Budget of the synchronous policy check
    pub policy: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |name: &str, default: &str| {
            lookup(name)
                .unwrap_or_else(|| default.to_string())
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            },
            services: ServiceEndpoints {
                news_service: url("NEWS_SERVICE_URL", "http://localhost:80"),
                comments_service: url("COMMENTS_SERVICE_URL", "http://localhost:8081"),
                censor_service: url("CENSOR_SERVICE_URL", "http://localhost:8082"),
            },
            timeouts: TimeoutConfig {
                downstream: Duration::from_millis(parse_or(&lookup, "DOWNSTREAM_TIMEOUT_MS", 2000)?),
                aggregate: Duration::from_millis(parse_or(&lookup, "AGGREGATE_TIMEOUT_MS", 3000)?),
                policy: Duration::from_millis(parse_or(&lookup, "POLICY_TIMEOUT_MS", 1000)?),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
