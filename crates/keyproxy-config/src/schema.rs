//! Configuration structures and environment parsing.
//!
//! **Environment variables:**
//! - `GEMINI_API_KEY`: upstream credential (no default; requests fail without it)
//! - `GEMINI_API_BASE_URL`: upstream host (default: https://generativelanguage.googleapis.com)
//! - `GEMINI_API_VERSION`: API version path segment (default: v1beta)
//! - `GEMINI_MODEL`: model id (default: gemini-1.5-flash-latest)
//! - `REQUEST_TIMEOUT_SECS`: upstream timeout; unset means the HTTP client default
//! - `HOST` / `PORT`: standalone bind address (default: 0.0.0.0:3000)
//! - `API_BASE_PATH`: mount prefix for the forwarding routes (default: /api)

use secrecy::SecretString;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_PATH: &str = "/api";

#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    /// Upstream credential. `None` when unset or blank.
    pub api_key: Option<SecretString>,
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_version: String,
    pub model: String,
    /// `None` leaves the timeout to the HTTP client.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Always starts with `/`, never ends with `/`, never the site root.
    pub base_path: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl ProxyConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = non_empty("GEMINI_API_KEY").map(SecretString::from);

        let timeout = match non_empty("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ConfigError::invalid("REQUEST_TIMEOUT_SECS", &raw, "expected whole seconds")
                })?;
                if secs == 0 {
                    return Err(ConfigError::invalid(
                        "REQUEST_TIMEOUT_SECS",
                        &raw,
                        "must be greater than zero",
                    ));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::invalid("PORT", &raw, "expected a port number"))?,
            None => DEFAULT_PORT,
        };

        let base_path = match non_empty("API_BASE_PATH") {
            Some(raw) => normalize_base_path(&raw)?,
            None => DEFAULT_BASE_PATH.to_string(),
        };

        Ok(Self {
            api_key,
            upstream: UpstreamConfig {
                base_url: non_empty("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_version: non_empty("GEMINI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout,
            },
            server: ServerConfig {
                host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
                base_path,
            },
        })
    }
}

impl UpstreamConfig {
    /// Endpoint for `generateContent`, without the credential.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            self.model
        )
    }
}

impl ServerConfig {
    pub fn with_base_path(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_path = normalize_base_path(raw)?;
        Ok(self)
    }
}

/// Canonicalize a mount prefix to `/segment[/segment...]`.
///
/// The site root is rejected so API routes never share a namespace with
/// whatever serves static assets alongside the proxy.
pub fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(
            "API_BASE_PATH",
            raw,
            "must not be the site root",
        ));
    }
    if trimmed.contains(char::is_whitespace) {
        return Err(ConfigError::invalid(
            "API_BASE_PATH",
            raw,
            "must not contain whitespace",
        ));
    }
    Ok(format!("/{}", trimmed))
}
