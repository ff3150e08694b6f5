// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client-side validation of document submissions.
//!
//! Mirrors the server's mandatory-field rules so a malformed submission is
//! rejected before it costs a rate limit slot:
//! - `pg` query parameter and detached Base64 signature are required
//! - owner/participant/producer TINs, production date and type are required
//! - every product needs a TN VED code and either `uit_code` or `uitu_code`
//! - dates are `YYYY-MM-DD`

use crate::document::{Document, Product};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

/// Standard alphabet, padding optional.
const SIGNATURE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("productGroup (query param 'pg') is required")]
    MissingProductGroup,

    #[error("signature (detached Base64) is required")]
    MissingSignature,

    #[error("signature must be valid Base64")]
    InvalidSignature,

    #[error("document.{0} is required")]
    MissingField(&'static str),

    #[error("document.{0} must be YYYY-MM-DD")]
    InvalidDate(&'static str),

    #[error("document.products must not be empty")]
    NoProducts,

    #[error("products[{0}].tnved_code is required")]
    MissingTnvedCode(usize),

    #[error("products[{0}]: either uit_code or uitu_code is required")]
    MissingProductCode(usize),

    #[error("products[{index}].{field} must be YYYY-MM-DD when present")]
    InvalidProductDate { index: usize, field: &'static str },
}

/// Result of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Submission is valid
    Valid,
    /// Submission is invalid, with every rule it broke
    Invalid(Vec<ValidationError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    fn from_errors(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

/// Validator for LP_INTRODUCE_GOODS submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentValidator;

impl DocumentValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate the detached signature.
    pub fn validate_signature(&self, signature: &str) -> ValidationResult {
        let mut errors = Vec::new();
        check_signature(signature, &mut errors);
        ValidationResult::from_errors(errors)
    }

    /// Validate the document body alone.
    pub fn validate_document(&self, document: &Document) -> ValidationResult {
        let mut errors = Vec::new();
        check_document(document, &mut errors);
        ValidationResult::from_errors(errors)
    }

    /// Validate a complete submission.
    pub fn validate(
        &self,
        document: &Document,
        signature: &str,
        product_group: &str,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        if is_blank(Some(product_group)) {
            errors.push(ValidationError::MissingProductGroup);
        }
        check_signature(signature, &mut errors);
        check_document(document, &mut errors);

        if !errors.is_empty() {
            debug!(issues = errors.len(), "Submission failed validation");
        }
        ValidationResult::from_errors(errors)
    }
}

fn check_signature(signature: &str, errors: &mut Vec<ValidationError>) {
    if is_blank(Some(signature)) {
        errors.push(ValidationError::MissingSignature);
    } else if SIGNATURE_ENGINE.decode(signature.trim()).is_err() {
        errors.push(ValidationError::InvalidSignature);
    }
}

fn check_document(doc: &Document, errors: &mut Vec<ValidationError>) {
    let required = [
        ("owner_inn", &doc.owner_inn),
        ("participant_inn", &doc.participant_inn),
        ("producer_inn", &doc.producer_inn),
    ];
    for (field, value) in required {
        if is_blank(value.as_deref()) {
            errors.push(ValidationError::MissingField(field));
        }
    }

    match doc.production_date.as_deref() {
        date if is_blank(date) => errors.push(ValidationError::MissingField("production_date")),
        Some(date) if !is_valid_date(date) => {
            errors.push(ValidationError::InvalidDate("production_date"))
        }
        _ => {}
    }

    if is_blank(doc.production_type.as_deref()) {
        errors.push(ValidationError::MissingField("production_type"));
    }

    if doc.products.is_empty() {
        errors.push(ValidationError::NoProducts);
    }
    for (index, product) in doc.products.iter().enumerate() {
        check_product(index, product, errors);
    }
}

fn check_product(index: usize, product: &Product, errors: &mut Vec<ValidationError>) {
    if is_blank(product.tnved_code.as_deref()) {
        errors.push(ValidationError::MissingTnvedCode(index));
    }
    if is_blank(product.uit_code.as_deref()) && is_blank(product.uitu_code.as_deref()) {
        errors.push(ValidationError::MissingProductCode(index));
    }

    let dates = [
        ("production_date", &product.production_date),
        ("certificate_document_date", &product.certificate_document_date),
    ];
    for (field, value) in dates {
        match value.as_deref() {
            Some(date) if !is_blank(Some(date)) && !is_valid_date(date) => {
                errors.push(ValidationError::InvalidProductDate { index, field });
            }
            _ => {}
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

/// Strict `YYYY-MM-DD` calendar date.
fn is_valid_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
