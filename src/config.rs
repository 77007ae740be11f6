//! Configuration management for Gemini Relay
//!
//! Configuration is loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::proxy::{FallbackConfig, PayloadShape, UpstreamTarget};

/// Default GenerateMessage endpoint (first default target)
pub const DEFAULT_MESSAGE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta2/models/chat-bison-001:generateMessage";

/// Default GenerateContent endpoint (second default target)
pub const DEFAULT_CONTENT_URL: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-1.5-flash:generateContent";

/// Default per-attempt timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Upstream API key (checked per request, not at startup)
    pub gemini_api_key: Option<String>,
    /// Explicit upstream URL overriding the default targets
    pub gemini_api_url: Option<String>,
    /// First default target, called with the GenerateMessage shape
    pub gemini_message_url: String,
    /// Second default target, called with the GenerateContent shape
    pub gemini_content_url: String,
    /// Wall-clock budget for a single upstream attempt (in milliseconds)
    pub upstream_timeout_ms: u64,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("RELAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("RELAY_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid RELAY_PORT")?,

            gemini_api_key: non_blank_var("GEMINI_API_KEY"),
            gemini_api_url: non_blank_var("GEMINI_API_URL"),
            gemini_message_url: non_blank_var("GEMINI_MESSAGE_URL")
                .unwrap_or_else(|| DEFAULT_MESSAGE_URL.to_string()),
            gemini_content_url: non_blank_var("GEMINI_CONTENT_URL")
                .unwrap_or_else(|| DEFAULT_CONTENT_URL.to_string()),
            upstream_timeout_ms: env::var("GEMINI_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
                .parse()
                .context("Invalid GEMINI_TIMEOUT_MS")?,

            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Build the orchestrator configuration from the loaded settings
    pub fn fallback_config(&self) -> FallbackConfig {
        FallbackConfig {
            override_url: self.gemini_api_url.clone(),
            api_key: self.gemini_api_key.clone(),
            timeout: Duration::from_millis(self.upstream_timeout_ms),
            default_targets: vec![
                UpstreamTarget::new(&self.gemini_message_url, PayloadShape::GenerateMessage),
                UpstreamTarget::new(&self.gemini_content_url, PayloadShape::GenerateContent),
            ],
        }
    }
}

/// Read an environment variable, treating blank values as unset
fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
