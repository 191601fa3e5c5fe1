//! Session configuration: credentials, environment, timeout, raw logging.
//!
//! RULE: A config is immutable once handed to a client.
//! Overrides happen before construction, never after.

use crate::types::Environment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 60;

fn default_timeout() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub client_id:   String,
    pub secret:      String,
    pub environment: Environment,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub connection_timeout_secs: u64,
    /// Emit every raw request/response pair to the raw logger.
    #[serde(default)]
    pub raw_logging: bool,
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>, environment: Environment) -> Self {
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
            environment,
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            raw_logging: false,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    pub fn with_raw_logging(mut self, enabled: bool) -> Self {
        self.raw_logging = enabled;
        self
    }

    /// Load from a JSON file.
    /// In tests, use ClientConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ClientConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Apply `PLAID_CLIENT_ID`, `PLAID_SECRET`, `PLAID_ENV` and
    /// `PLAID_TIMEOUT_SECS` on top of the current values.
    pub fn with_env_overrides(self) -> anyhow::Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Same as `with_env_overrides`, reading from an arbitrary lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("PLAID_CLIENT_ID") {
            self.client_id = id;
        }
        if let Some(secret) = lookup("PLAID_SECRET") {
            self.secret = secret;
        }
        if let Some(env) = lookup("PLAID_ENV") {
            self.environment = env.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        if let Some(timeout) = lookup("PLAID_TIMEOUT_SECS") {
            self.connection_timeout_secs = timeout
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PLAID_TIMEOUT_SECS '{timeout}': {e}"))?;
        }
        Ok(self)
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Config with hardcoded sandbox credentials for use in tests.
    pub fn default_test() -> Self {
        Self::new("test_id", "test_secret", Environment::Development)
    }
}
