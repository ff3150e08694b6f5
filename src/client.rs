// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP client for the GIS MT unified document creation method.
//!
//! `POST /api/v3/lk/documents/create?pg=<product group>` with body
//! `{document_format, product_document, signature, type, product_group}`,
//! where `product_document` is the Base64 of the document JSON. Every call
//! passes through the shared [`RateLimiter`] after validation and before
//! the request is sent.

use crate::config::Config;
use crate::document::Document;
use crate::error::{ClientError, ConfigError, Result};
use crate::limiter::{CancelSignal, RateLimiter};
use crate::token::{FixedTokenProvider, TokenProvider};
use crate::validator::{DocumentValidator, ValidationResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

const CREATE_PATH: &str = "/api/v3/lk/documents/create";
const DOCUMENT_FORMAT: &str = "MANUAL";
const DOCUMENT_TYPE: &str = "LP_INTRODUCE_GOODS";
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Body of the unified create method.
#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    document_format: &'a str,
    /// Base64(JSON)
    product_document: String,
    signature: &'a str,
    #[serde(rename = "type")]
    document_type: &'a str,
    /// Duplicates the `pg` query parameter
    product_group: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default, rename = "errorMessage")]
    error_message_camel: Option<String>,
}

/// Rate-limited CRPT document client.
///
/// Cheap to share behind an [`Arc`]; all submissions made through one
/// client draw from the same quota.
pub struct CrptClient {
    http: reqwest::Client,
    endpoint: Url,
    limiter: Arc<RateLimiter>,
    tokens: Arc<dyn TokenProvider>,
    validator: DocumentValidator,
    default_product_group: Option<String>,
    user_agent: String,
}

impl fmt::Debug for CrptClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrptClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("limiter", &self.limiter)
            .field("default_product_group", &self.default_product_group)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl CrptClient {
    pub fn builder() -> CrptClientBuilder {
        CrptClientBuilder::default()
    }

    /// Build a client from loaded configuration.
    pub fn from_config(config: &Config, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let limiter = RateLimiter::from_config(&config.rate_limit)?;
        let mut builder = CrptClient::builder()
            .base_url(&config.base_url)
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout())
            .token_provider(tokens)
            .rate_limiter(Arc::new(limiter));
        if let Some(group) = &config.default_product_group {
            builder = builder.default_product_group(group);
        }
        builder.build()
    }

    /// The limiter guarding this client's submissions.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Submit a document under the default product group.
    ///
    /// Returns the identifier GIS MT assigned to the created document.
    pub async fn create_document(&self, document: &Document, signature: &str) -> Result<Uuid> {
        self.submit(document, signature, None, None).await
    }

    /// Submit a document under an explicit product group.
    pub async fn create_document_in(
        &self,
        document: &Document,
        signature: &str,
        product_group: &str,
    ) -> Result<Uuid> {
        self.submit(document, signature, Some(product_group), None)
            .await
    }

    /// Submit a document, giving up if `cancel` fires while waiting for a
    /// rate limit slot.
    ///
    /// A cancelled submission never reaches the server and fails with
    /// [`ClientError::Limiter`]; see [`ClientError::is_cancelled`].
    pub async fn create_document_with_cancel(
        &self,
        document: &Document,
        signature: &str,
        product_group: Option<&str>,
        cancel: &CancelSignal,
    ) -> Result<Uuid> {
        self.submit(document, signature, product_group, Some(cancel))
            .await
    }

    async fn submit(
        &self,
        document: &Document,
        signature: &str,
        product_group: Option<&str>,
        cancel: Option<&CancelSignal>,
    ) -> Result<Uuid> {
        let product_group = product_group
            .or(self.default_product_group.as_deref())
            .ok_or(ClientError::MissingProductGroup)?;

        if let ValidationResult::Invalid(errors) =
            self.validator.validate(document, signature, product_group)
        {
            info!(product_group, issues = errors.len(), "Submission rejected locally");
            return Err(ClientError::Validation(errors));
        }
        let token = self.require_token()?;

        match cancel {
            Some(cancel) => self.limiter.acquire_with_cancel(cancel).await?,
            None => self.limiter.acquire().await,
        }

        let product_document = STANDARD.encode(serde_json::to_vec(document)?);
        let body = CreateRequest {
            document_format: DOCUMENT_FORMAT,
            product_document,
            signature: signature.trim(),
            document_type: DOCUMENT_TYPE,
            product_group,
        };

        debug!(endpoint = %self.endpoint, product_group, "Sending document");
        let response = self
            .http
            .post(self.endpoint.clone())
            .query(&[("pg", product_group)])
            .bearer_auth(&token)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let id = parse_created_id(&text)?;
            info!(product_group, document_id = %id, "Document created");
            return Ok(id);
        }

        let message = parse_error_message(&text);
        warn!(
            product_group,
            status = status.as_u16(),
            message = %message,
            "Document creation failed"
        );
        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }

    fn require_token(&self) -> Result<String> {
        match self.tokens.token() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ClientError::MissingToken),
        }
    }
}

fn parse_created_id(body: &str) -> Result<Uuid> {
    let response: CreateResponse = serde_json::from_str(body)?;
    let value = match response.value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(ClientError::InvalidResponse(
                "Server returned 2xx but 'value' is empty".to_string(),
            ))
        }
    };
    Uuid::parse_str(value)
        .map_err(|_| ClientError::InvalidResponse(format!("Unexpected 'value' format: {value}")))
}

/// Extract a human-readable message from an error body.
fn parse_error_message(body: &str) -> String {
    if body.trim().is_empty() {
        return "Empty response".to_string();
    }

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(body) {
        let message = [err.error_message_camel, err.error_message]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty());
        if let Some(message) = message {
            return message;
        }
    }

    // Not JSON (XML, HTML error pages): return the start of the raw body.
    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        let head: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{head}…")
    } else {
        body.to_string()
    }
}

/// Builder for [`CrptClient`].
pub struct CrptClientBuilder {
    base_url: String,
    default_product_group: Option<String>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    rate_limiter: Option<Arc<RateLimiter>>,
    http_client: Option<reqwest::Client>,
    connect_timeout: Duration,
    user_agent: String,
}

impl Default for CrptClientBuilder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            base_url: config.base_url,
            default_product_group: None,
            token_provider: None,
            rate_limiter: None,
            http_client: None,
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            user_agent: config.user_agent,
        }
    }
}

impl CrptClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn default_product_group(mut self, group: impl Into<String>) -> Self {
        self.default_product_group = Some(group.into());
        self
    }

    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Use a fixed token.
    pub fn token(self, token: impl Into<String>) -> Self {
        self.token_provider(Arc::new(FixedTokenProvider::with_token(token)))
    }

    /// Share an existing limiter, e.g. between several clients.
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Use a preconfigured HTTP client; `connect_timeout` is then ignored.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<CrptClient> {
        let base = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        let endpoint = base
            .join(CREATE_PATH)
            .map_err(|source| ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                source,
            })?;

        let limiter = match self.rate_limiter {
            Some(limiter) => limiter,
            None => Arc::new(RateLimiter::from_config(&Default::default())?),
        };

        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(self.connect_timeout)
                .build()?,
        };

        let tokens = self
            .token_provider
            .unwrap_or_else(|| Arc::new(FixedTokenProvider::new()));

        let default_product_group = self
            .default_product_group
            .filter(|group| !group.trim().is_empty());

        info!(
            endpoint = %endpoint,
            limit = limiter.limit(),
            window_ms = limiter.window().as_millis() as u64,
            "CRPT client ready"
        );

        Ok(CrptClient {
            http,
            endpoint,
            limiter,
            tokens,
            validator: DocumentValidator::new(),
            default_product_group,
            user_agent: self.user_agent,
        })
    }
}
