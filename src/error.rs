// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the CRPT client.

use crate::validator::ValidationError;
use thiserror::Error;

/// Errors raised by the admission controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimiterError {
    #[error("Invalid rate limiter configuration: {0}")]
    Configuration(String),

    #[error("Cancelled while waiting for a rate limit slot")]
    Cancelled,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors returned by document submission.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Limiter(#[from] LimiterError),

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationError>),

    #[error("Product group is required: configure a default or pass one explicitly")]
    MissingProductGroup,

    #[error("Bearer token is not set or is blank")]
    MissingToken,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the submission never reached the server.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Limiter(LimiterError::Cancelled))
    }
}

fn join_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;
