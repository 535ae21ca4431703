use reqwest::Url;
use std::time::Duration;

use super::AppConfig;
use crate::client::http::DEFAULT_ENDPOINT;
use crate::core::{AppError, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Fully resolved settings for talking to the chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    pub user_id: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientSettings {
    /// Applies `overrides` on top of `config` and validates the result.
    pub fn resolve(config: AppConfig, overrides: AppConfig) -> Result<Self> {
        let merged = config.overlay(overrides);

        let endpoint = merged
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        validate_endpoint(&endpoint)?;

        let timeout_secs = merged.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AppError::Config("timeout must be at least one second".into()));
        }

        let user_id = merged.user_id.filter(|id| !id.trim().is_empty());

        Ok(Self {
            endpoint,
            user_id,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| AppError::Config(format!("invalid endpoint '{endpoint}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::Config(format!(
            "endpoint '{endpoint}' must use http or https, not '{other}'"
        ))),
    }
}
