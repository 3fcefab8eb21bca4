//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup and shared read-only with every request.

use std::env;
use std::fmt;

use thiserror::Error;
use tracing::warn;

/// Default route of the artifact webhook endpoint.
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhooks/artifact";

/// Route of the health check; the webhook cannot share it.
pub const HEALTH_PATH: &str = "/health";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WEBHOOK_SECRET must be set to the shared webhook signing secret")]
    MissingSecret,

    #[error("WEBHOOK_PATH {0:?} collides with a built-in route")]
    ReservedWebhookPath(String),
}

/// Shared secret used to verify webhook signatures.
///
/// The value is only reachable through [`WebhookSecret::as_bytes`]; `Debug`
/// output is redacted so the secret never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wrap a secret value. Blank secrets are rejected.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(value))
    }

    /// Raw key material for the HMAC.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<REDACTED>)")
    }
}

/// EdgeKV namespace access token, sent with every item write.
#[derive(Clone, PartialEq, Eq)]
pub struct EdgeKvToken(String);

impl EdgeKvToken {
    /// Wrap a token value. Blank tokens are rejected.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EdgeKvToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EdgeKvToken(<REDACTED>)")
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Route of the artifact webhook endpoint
    pub webhook_path: String,

    /// Shared secret for `X-Hub-Signature` verification
    pub webhook_secret: WebhookSecret,

    /// Maximum number of body bytes read from a webhook request
    pub max_body_bytes: usize,

    // =========================================================================
    // EdgeKV Configuration
    // =========================================================================

    /// Base URL of the EdgeKV HTTP API. Unset means an in-memory store.
    pub edgekv_url: Option<String>,

    /// EdgeKV namespace records are written to
    pub edgekv_namespace: String,

    /// EdgeKV group records are written to
    pub edgekv_group: String,

    /// Access token for the EdgeKV namespace
    pub edgekv_token: Option<EdgeKvToken>,

    /// HTTP timeout for EdgeKV writes in milliseconds
    pub edgekv_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_secret = lookup("WEBHOOK_SECRET")
            .and_then(WebhookSecret::new)
            .ok_or(ConfigError::MissingSecret)?;

        let webhook_path = lookup("WEBHOOK_PATH")
            .map(|p| p.trim().to_string())
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string());
        if webhook_path.trim_end_matches('/') == HEALTH_PATH {
            return Err(ConfigError::ReservedWebhookPath(webhook_path));
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080),

            webhook_path,

            webhook_secret,

            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", 1024 * 1024),

            edgekv_url: lookup("EDGEKV_URL")
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),

            edgekv_namespace: non_blank_or(&lookup, "EDGEKV_NAMESPACE", "default"),

            edgekv_group: non_blank_or(&lookup, "EDGEKV_GROUP", "default"),

            edgekv_token: lookup("EDGEKV_TOKEN").and_then(EdgeKvToken::new),

            edgekv_timeout_ms: parse_or(&lookup, "EDGEKV_TIMEOUT_MS", 5000),
        })
    }
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

fn non_blank_or<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
