//! Configuration loading and defaults for runway-tools.

use anyhow::Result;

// === Types ===

/// Resolved retry policy for transport-level retries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub enabled: bool,
    pub max_retries: u32,
    pub initial_delay: f64,
    pub max_delay: f64,
    pub exponential_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            initial_delay: 1.0,
            max_delay: 60.0,
            exponential_base: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Compute the backoff delay for a retry attempt.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> std::time::Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.initial_delay * self.exponential_base.powi(exponent);
        let delay = delay.min(self.max_delay);
        std::time::Duration::from_secs_f64(delay)
    }
}

/// Resolved configuration, including defaults and environment overrides.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_secret: Option<String>,
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub retry: Option<RetryPolicy>,
}

// === Config Loading ===

impl Config {
    /// Load configuration from the environment (reading `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();
        if let Ok(value) = std::env::var("RUNWAYML_API_SECRET") {
            config.api_secret = Some(value);
        }
        if let Ok(value) = std::env::var("RUNWAY_BASE_URL") {
            config.base_url = Some(value);
        }
        if let Ok(value) = std::env::var("RUNWAY_API_VERSION") {
            config.api_version = Some(value);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate that critical config fields are well-formed.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref secret) = self.api_secret
            && secret.trim().is_empty()
        {
            anyhow::bail!("RUNWAYML_API_SECRET cannot be an empty string");
        }
        Ok(())
    }

    /// Return the Runway base URL (normalized, no trailing slash).
    #[must_use]
    pub fn runway_base_url(&self) -> String {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.dev.runwayml.com".to_string());
        base.trim_end_matches('/').to_string()
    }

    /// Return the `X-Runway-Version` header value.
    #[must_use]
    pub fn runway_api_version(&self) -> String {
        self.api_version
            .clone()
            .unwrap_or_else(|| "2024-11-06".to_string())
    }

    /// Whether a non-empty credential is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_secret
            .as_ref()
            .is_some_and(|secret| !secret.trim().is_empty())
    }

    /// Resolve the retry policy, falling back to defaults.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default()
    }
}

// === Unit Tests ===
