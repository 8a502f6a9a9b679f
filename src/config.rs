//! Runtime configuration for tool packages.
//!
//! Values come from three layers, later layers winning: built-in defaults, an
//! optional YAML file, then environment variables.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MINIMAX_BASE_URL` | `minimax.base_url` |
//! | `MINIMAX_POLL_INTERVAL_MS` | `minimax.poll_interval_ms` |
//! | `MINIMAX_MAX_POLL_ATTEMPTS` | `minimax.max_poll_attempts` |
//! | `AI_HTTP_TIMEOUT_SECS` | `minimax.request_timeout_secs` |
//! | `AI_PROXY_URL` | `minimax.proxy_url` |
//! | `TOOL_UPLOAD_URL` | `upload.endpoint` |
//! | `TOOL_UPLOAD_TOKEN` | `upload.token` |

use crate::transport::TransportOptions;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MINIMAX_BASE_URL: &str = "https://api.minimaxi.com/v1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub minimax: MinimaxConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub request_timeout_secs: u64,
    pub proxy_url: Option<String>,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MINIMAX_BASE_URL.to_string(),
            poll_interval_ms: 1_000,
            max_poll_attempts: 180,
            request_timeout_secs: 60,
            proxy_url: None,
        }
    }
}

impl MinimaxConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: Duration::from_secs(self.request_timeout_secs),
            proxy_url: self.proxy_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Multipart upload endpoint of the storage service. Uploads are disabled when unset.
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            request_timeout_secs: 30,
        }
    }
}

impl PluginConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid YAML configuration: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MINIMAX_BASE_URL") {
            self.minimax.base_url = v;
        }
        if let Some(v) = lookup("MINIMAX_POLL_INTERVAL_MS") {
            self.minimax.poll_interval_ms = parse_var("MINIMAX_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("MINIMAX_MAX_POLL_ATTEMPTS") {
            self.minimax.max_poll_attempts = parse_var("MINIMAX_MAX_POLL_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("AI_HTTP_TIMEOUT_SECS") {
            self.minimax.request_timeout_secs = parse_var("AI_HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("AI_PROXY_URL") {
            self.minimax.proxy_url = Some(v);
        }
        if let Some(v) = lookup("TOOL_UPLOAD_URL") {
            self.upload.endpoint = Some(v);
        }
        if let Some(v) = lookup("TOOL_UPLOAD_TOKEN") {
            self.upload.token = Some(v);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        check_url("minimax.base_url", &self.minimax.base_url)?;
        if let Some(proxy) = &self.minimax.proxy_url {
            check_url("minimax.proxy_url", proxy)?;
        }
        if self.minimax.max_poll_attempts == 0 {
            return Err(Error::configuration_with_context(
                "max_poll_attempts must be at least 1",
                ErrorContext::new()
                    .with_field_path("minimax.max_poll_attempts")
                    .with_source("config_validator"),
            ));
        }
        if self.minimax.request_timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "request_timeout_secs must be at least 1",
                ErrorContext::new()
                    .with_field_path("minimax.request_timeout_secs")
                    .with_source("config_validator"),
            ));
        }
        if let Some(endpoint) = &self.upload.endpoint {
            check_url("upload.endpoint", endpoint)?;
        }
        if self.upload.request_timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "request_timeout_secs must be at least 1",
                ErrorContext::new()
                    .with_field_path("upload.request_timeout_secs")
                    .with_source("config_validator"),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        Error::configuration_with_context(
            format!("{} is not a valid number: {:?}", key, value),
            ErrorContext::new().with_source("config_env"),
        )
    })
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| {
        Error::configuration_with_context(
            format!("Invalid URL {:?}: {}", value, e),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("config_validator"),
        )
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::configuration_with_context(
            format!("Unsupported URL scheme: {}", other),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("config_validator"),
        )),
    }
}
