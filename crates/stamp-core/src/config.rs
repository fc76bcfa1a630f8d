//! Configuration module
//!
//! Settings are read once at process start and then passed around explicitly.
//! Nothing outside this module reads the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::models::PinataCredential;

const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";
const DEFAULT_PINATA_GATEWAY_URL: &str = "https://gateway.pinata.cloud";
const IMAGE_UPLOAD_TIMEOUT_SECS: u64 = 30;
const METADATA_UPLOAD_TIMEOUT_SECS: u64 = 10;
const MAX_UPLOAD_SIZE_BYTES: usize = 100 * 1024 * 1024;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Output format of the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Pinning service settings
#[derive(Clone, Debug)]
pub struct PinataConfig {
    /// `None` keeps the server up; every upload then fails with a configuration error.
    pub credential: Option<PinataCredential>,
    pub api_url: String,
    pub gateway_url: String,
    pub image_timeout: Duration,
    pub metadata_timeout: Duration,
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            credential: None,
            api_url: DEFAULT_PINATA_API_URL.to_string(),
            gateway_url: DEFAULT_PINATA_GATEWAY_URL.to_string(),
            image_timeout: Duration::from_secs(IMAGE_UPLOAD_TIMEOUT_SECS),
            metadata_timeout: Duration::from_secs(METADATA_UPLOAD_TIMEOUT_SECS),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// `ENVIRONMENT` / `APP_ENV`, lowercased. `None` when neither is set.
    pub environment: Option<String>,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    pub max_upload_size_bytes: usize,
    pub log_format: LogFormat,
    pub pinata: PinataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            environment: None,
            cors_origins: vec!["*".to_string()],
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            log_format: LogFormat::Pretty,
            pinata: PinataConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match get("PORT").or_else(|| get("SERVER_PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            None => DEFAULT_SERVER_PORT,
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .map(|env| env.trim().to_lowercase());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match get("LOG_FORMAT").map(|s| s.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let pinata = PinataConfig {
            credential: get("PINATA_JWT").and_then(PinataCredential::new),
            api_url: get("PINATA_API_URL")
                .unwrap_or_else(|| DEFAULT_PINATA_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gateway_url: get("PINATA_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_PINATA_GATEWAY_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            image_timeout: Duration::from_secs(parse_or(
                &get,
                "PINATA_IMAGE_TIMEOUT_SECS",
                IMAGE_UPLOAD_TIMEOUT_SECS,
            )?),
            metadata_timeout: Duration::from_secs(parse_or(
                &get,
                "PINATA_METADATA_TIMEOUT_SECS",
                METADATA_UPLOAD_TIMEOUT_SECS,
            )?),
        };

        let config = Config {
            server_port,
            environment,
            cors_origins,
            http_concurrency_limit: parse_or(&get, "HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT)?,
            max_upload_size_bytes: parse_or(&get, "MAX_UPLOAD_SIZE_BYTES", MAX_UPLOAD_SIZE_BYTES)?,
            log_format,
            pinata,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_deref(), Some("production" | "prod"))
    }

    /// Only an explicit `development`/`dev` counts; an unset environment does not.
    pub fn is_development(&self) -> bool {
        matches!(self.environment.as_deref(), Some("development" | "dev"))
    }

    /// Environment name for logs
    pub fn environment_name(&self) -> &str {
        self.environment.as_deref().unwrap_or("unset")
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (key, url) in [
            ("PINATA_API_URL", &self.pinata.api_url),
            ("PINATA_GATEWAY_URL", &self.pinata.gateway_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got '{}'", key, url));
            }
        }

        if self.pinata.image_timeout.is_zero() || self.pinata.metadata_timeout.is_zero() {
            return Err(anyhow::anyhow!("Pinata upload timeouts cannot be 0"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES cannot be 0"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production. \
                Please set specific allowed origins via CORS_ORIGINS."
            ));
        }

        Ok(())
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}
