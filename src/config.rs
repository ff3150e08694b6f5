// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the CRPT client.
//!
//! Defaults target the production GIS MT host and the published quota of
//! 100 document submissions per minute.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Top-level client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// API base URL (default: https://ismp.crpt.ru)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Product group used when a submission does not name one
    #[serde(default)]
    pub default_product_group: Option<String>,

    /// Bearer token; never serialized or printed
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// TCP connect timeout in milliseconds (default: 20000)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Outgoing request quota
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Outgoing request quota: `limit` requests per rolling window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window (default: 100)
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Window length in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_base_url() -> String {
    "https://ismp.crpt.ru".to_string()
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_connect_timeout_ms() -> u64 {
    20_000
}

fn default_limit() -> u32 {
    100
}

fn default_window_ms() -> u64 {
    60_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_product_group: None,
            token: None,
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_ms: default_window_ms(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// - `CRPT_BASE_URL`: API base URL
    /// - `CRPT_PRODUCT_GROUP`: default product group
    /// - `CRPT_TOKEN`: bearer token
    /// - `CRPT_USER_AGENT`: User-Agent header
    /// - `CRPT_CONNECT_TIMEOUT_MS`: connect timeout
    /// - `CRPT_RATE_LIMIT`: requests per window
    /// - `CRPT_RATE_WINDOW_MS`: window length
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            base_url: lookup("CRPT_BASE_URL").unwrap_or(defaults.base_url),
            default_product_group: lookup("CRPT_PRODUCT_GROUP")
                .filter(|group| !group.trim().is_empty()),
            token: lookup("CRPT_TOKEN")
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty()),
            user_agent: lookup("CRPT_USER_AGENT").unwrap_or(defaults.user_agent),
            connect_timeout_ms: parse_var(
                &lookup,
                "CRPT_CONNECT_TIMEOUT_MS",
                defaults.connect_timeout_ms,
            )?,
            rate_limit: RateLimitConfig {
                limit: parse_var(&lookup, "CRPT_RATE_LIMIT", defaults.rate_limit.limit)?,
                window_ms: parse_var(
                    &lookup,
                    "CRPT_RATE_WINDOW_MS",
                    defaults.rate_limit.window_ms,
                )?,
            },
        })
    }

    /// Get the connect timeout duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("default_product_group", &self.default_product_group)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        None => Ok(default),
    }
}
