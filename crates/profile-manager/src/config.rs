//! Manager configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for a single-host deployment.

use profile_acl::Identity;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::retry::RetryConfig;

/// Configuration errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Profile manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Prefix for generated profile handles.
    pub handle_prefix: String,

    /// Reject imports and renames that reuse an existing profile name.
    pub unique_names: bool,

    /// Identities holding management rights on every profile.
    pub administrators: Vec<Identity>,

    /// Upper bound for a single identity resolver call, in milliseconds.
    pub resolver_timeout_ms: u64,

    /// Upper bound for a single backing store call, in milliseconds.
    pub store_timeout_ms: u64,

    /// Retry policy for idempotent store reads.
    pub retry: RetryConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            handle_prefix: "/profiles".to_string(),
            unique_names: false,
            administrators: vec![Identity::ROOT],
            resolver_timeout_ms: 2_000,
            store_timeout_ms: 5_000,
            retry: RetryConfig::default(),
        }
    }
}

impl ManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PROFILE_HANDLE_PREFIX`: Prefix for new handles (default: /profiles)
    /// - `PROFILE_UNIQUE_NAMES`: Enforce unique names (default: false)
    /// - `PROFILE_ADMIN_IDS`: Comma-separated administrator ids (default: 0)
    /// - `PROFILE_RESOLVER_TIMEOUT_MS`: Resolver timeout (default: 2000)
    /// - `PROFILE_STORE_TIMEOUT_MS`: Store timeout (default: 5000)
    /// - `PROFILE_MAX_RETRIES`: Attempts for store reads (default: 3)
    ///
    /// Unparseable administrator ids are skipped with a warning.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            handle_prefix: std::env::var("PROFILE_HANDLE_PREFIX").unwrap_or(default.handle_prefix),
            unique_names: std::env::var("PROFILE_UNIQUE_NAMES")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.unique_names),
            administrators: std::env::var("PROFILE_ADMIN_IDS")
                .map(|s| parse_identities(&s))
                .unwrap_or(default.administrators),
            resolver_timeout_ms: std::env::var("PROFILE_RESOLVER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.resolver_timeout_ms),
            store_timeout_ms: std::env::var("PROFILE_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.store_timeout_ms),
            retry: std::env::var("PROFILE_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(RetryConfig::with_max_attempts)
                .unwrap_or(default.retry),
        }
    }

    /// Set the administrator identities.
    pub fn with_administrators(mut self, administrators: impl IntoIterator<Item = Identity>) -> Self {
        self.administrators = administrators.into_iter().collect();
        self
    }

    /// Enable or disable unique name enforcement.
    pub fn with_unique_names(mut self, unique_names: bool) -> Self {
        self.unique_names = unique_names;
        self
    }

    /// Set the resolver timeout.
    pub fn with_resolver_timeout(mut self, timeout: Duration) -> Self {
        self.resolver_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the store retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Get the resolver timeout as a Duration.
    pub fn resolver_timeout(&self) -> Duration {
        Duration::from_millis(self.resolver_timeout_ms)
    }

    /// Get the store timeout as a Duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Check if an identity is an administrator.
    pub fn is_admin(&self, identity: Identity) -> bool {
        self.administrators.contains(&identity)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.handle_prefix.starts_with('/') {
            return Err(ConfigError::invalid(
                "PROFILE_HANDLE_PREFIX",
                "handle prefix must start with '/'",
            ));
        }
        if self.resolver_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "PROFILE_RESOLVER_TIMEOUT_MS",
                "timeout must be greater than zero",
            ));
        }
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "PROFILE_STORE_TIMEOUT_MS",
                "timeout must be greater than zero",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "PROFILE_MAX_RETRIES",
                "at least one attempt is required",
            ));
        }
        let base = self.retry.exponential_base;
        if !base.is_finite() || base < 1.0 {
            return Err(ConfigError::invalid(
                "retry.exponential_base",
                format!("backoff base must be a finite number >= 1.0, got {base}"),
            ));
        }
        Ok(())
    }
}

fn parse_identities(value: &str) -> Vec<Identity> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let identity = Identity::parse(token);
            if identity.is_none() {
                tracing::warn!(token, "Ignoring invalid administrator id");
            }
            identity
        })
        .collect()
}
