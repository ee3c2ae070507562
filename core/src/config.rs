//! Client configuration.
//!
//! # Design
//! The service base address is the only setting. It comes from the
//! environment, falling back to a local default, and is resolved through a
//! lookup function so tests never touch process-wide variables.

use std::env;

/// Base address used when `TODO_API_BASE` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable holding the service base address.
pub const BASE_URL_ENV: &str = "TODO_API_BASE";

/// Where the todo service lives. The only setting the client has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
