// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! CRPT Client
//!
//! A client for the GIS MT ("Chestny ZNAK") unified document creation
//! method, throttled to the quota the API imposes:
//!
//! - Strict sliding-window admission control (100 requests/minute default)
//! - Callers wait for a slot instead of being rejected, without polling
//! - Cancellable waits that leave the quota untouched
//! - Client-side validation of LP_INTRODUCE_GOODS documents
//! - Rotatable bearer token supply

pub mod client;
pub mod config;
pub mod document;
pub mod error;
mod ledger;
pub mod limiter;
pub mod token;
pub mod validator;

pub use client::{CrptClient, CrptClientBuilder};
pub use config::{Config, RateLimitConfig};
pub use document::{Description, Document, Product, ProductGroup};
pub use error::{ClientError, ConfigError, LimiterError, Result};
pub use limiter::{CancelSignal, RateLimiter};
pub use token::{FixedTokenProvider, TokenProvider};
pub use validator::{DocumentValidator, ValidationError, ValidationResult};
