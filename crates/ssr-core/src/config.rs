//! Configuration module for page routing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown unranked function policy `{0}` (expected `below` or `above`)")]
    UnknownPolicy(String),

    #[error("Base URL should start with `/` but got `{0}`")]
    InvalidBaseUrl(String),
}

/// Where route-function matches without an explicit precedence rank
/// relative to route strings and filesystem routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrankedFunctionPolicy {
    /// Below every route-string and filesystem match
    #[default]
    BelowDeclarative,
    /// Above route strings and filesystem routes, below numeric precedences
    AboveDeclarative,
}

impl FromStr for UnrankedFunctionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "below" | "below_declarative" => Ok(Self::BelowDeclarative),
            "above" | "above_declarative" => Ok(Self::AboveDeclarative),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for UnrankedFunctionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnrankedFunctionPolicy::BelowDeclarative => write!(f, "below"),
            UnrankedFunctionPolicy::AboveDeclarative => write!(f, "above"),
        }
    }
}

/// Router configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Base URL the app is served under (e.g. `/shop`), stripped from
    /// the pathname before routing
    pub base_url: Option<String>,

    /// Rank of route functions that don't state a precedence
    pub unranked_function_policy: UnrankedFunctionPolicy,
}

impl RouterConfig {
    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the unranked route function policy
    pub fn with_unranked_function_policy(mut self, policy: UnrankedFunctionPolicy) -> Self {
        self.unranked_function_policy = policy;
        self
    }

    /// Semantic checks that serde can't express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with('/') {
                return Err(ConfigError::InvalidBaseUrl(base_url.clone()));
            }
        }
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        RouterConfig::default().with_env_overrides()
    }

    /// Override fields with the environment variables that are set and valid.
    ///
    /// Unset or rejected variables leave the current value untouched.
    pub fn with_env_overrides(self) -> Self {
        self.overlay(|key| std::env::var(key).ok())
    }

    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Base URL
        if let Some(base_url) = lookup("SSR_BASE_URL") {
            let base_url = base_url.trim();
            if base_url.starts_with('/') {
                self.base_url = Some(base_url.to_string());
            } else if !base_url.is_empty() {
                warn!(base_url = %base_url, "Ignoring SSR_BASE_URL without leading slash");
            }
        }

        // Unranked route functions
        if let Some(policy) = lookup("SSR_UNRANKED_FUNCTIONS") {
            match policy.parse() {
                Ok(policy) => self.unranked_function_policy = policy,
                Err(err) => warn!(error = %err, "Ignoring SSR_UNRANKED_FUNCTIONS"),
            }
        }

        self
    }
}
