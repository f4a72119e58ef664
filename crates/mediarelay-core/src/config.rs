//! Configuration module
//!
//! This module provides the configuration for the relay service: server settings,
//! the upstream leg (timeout, body strategy), the failure policy and the media catalog.
//! Everything is resolved once at startup; request handling never re-reads the environment.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DEFAULT_ERROR_DETAIL_MAX_CHARS, DEFAULT_UPSTREAM_TIMEOUT_MS};

// Common constants
const SERVER_PORT: u16 = 4000;
const BUFFERED_BODY_MAX_MB: usize = 64;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// What the stream endpoint does when the origin fails before any byte reached the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// 302 to the stored origin URL so the client can fetch it directly.
    #[default]
    Redirect,
    /// 502 with a JSON body describing the upstream failure.
    BadGateway,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Redirect => "redirect",
            FailurePolicy::BadGateway => "bad_gateway",
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redirect" => Ok(FailurePolicy::Redirect),
            "bad_gateway" | "bad-gateway" | "502" => Ok(FailurePolicy::BadGateway),
            other => Err(anyhow::anyhow!(
                "STREAM_FAILURE_POLICY must be 'redirect' or 'bad_gateway', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the upstream body is exposed to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyStrategy {
    /// Incremental byte source, consumed lazily while relaying.
    #[default]
    Streaming,
    /// Whole body read into memory before relaying. Portability fallback only.
    Buffered,
}

impl BodyStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyStrategy::Streaming => "streaming",
            BodyStrategy::Buffered => "buffered",
        }
    }
}

impl FromStr for BodyStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "streaming" | "stream" => Ok(BodyStrategy::Streaming),
            "buffered" | "buffer" => Ok(BodyStrategy::Buffered),
            other => Err(anyhow::anyhow!(
                "UPSTREAM_BODY_STRATEGY must be 'streaming' or 'buffered', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for BodyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
    pub http_concurrency_limit: usize,
}

/// Relay configuration
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub base: BaseConfig,
    // Upstream leg
    pub upstream_timeout_ms: u64,
    pub body_strategy: BodyStrategy,
    pub buffered_body_max_bytes: usize,
    // Failure handling
    pub failure_policy: FailurePolicy,
    pub error_detail_max_chars: usize,
    // Metadata store
    pub catalog_path: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<RelayConfig>);

impl Config {
    fn as_relay(&self) -> &RelayConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_relay().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = RelayConfig::from_vars(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config(Box::new(RelayConfig::from_vars(lookup)?)))
    }

    pub fn server_port(&self) -> u16 {
        self.as_relay().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_relay().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_relay().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_relay().base.log_format
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_relay().base.http_concurrency_limit
    }

    pub fn upstream_timeout_ms(&self) -> u64 {
        self.as_relay().upstream_timeout_ms
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.as_relay().upstream_timeout_ms)
    }

    pub fn body_strategy(&self) -> BodyStrategy {
        self.as_relay().body_strategy
    }

    pub fn buffered_body_max_bytes(&self) -> usize {
        self.as_relay().buffered_body_max_bytes
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.as_relay().failure_policy
    }

    pub fn error_detail_max_chars(&self) -> usize {
        self.as_relay().error_detail_max_chars
    }

    pub fn catalog_path(&self) -> Option<&str> {
        self.as_relay().catalog_path.as_deref()
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl RelayConfig {
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT").map(|s| s.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            log_format,
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        let failure_policy = match lookup("STREAM_FAILURE_POLICY") {
            Some(value) => value.parse()?,
            None => FailurePolicy::default(),
        };

        let body_strategy = match lookup("UPSTREAM_BODY_STRATEGY") {
            Some(value) => value.parse()?,
            None => BodyStrategy::default(),
        };

        Ok(RelayConfig {
            base,
            upstream_timeout_ms: lookup("UPSTREAM_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_MS),
            body_strategy,
            buffered_body_max_bytes: lookup("BUFFERED_BODY_MAX_MB")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(BUFFERED_BODY_MAX_MB)
                * 1024
                * 1024,
            failure_policy,
            error_detail_max_chars: lookup("UPSTREAM_ERROR_DETAIL_MAX_CHARS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_ERROR_DETAIL_MAX_CHARS),
            catalog_path: lookup("MEDIA_CATALOG_PATH").filter(|s| !s.trim().is_empty()),
        })
    }
}
