// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! LP_INTRODUCE_GOODS document model.
//!
//! "Introduction into circulation, produced in the RF". Field names follow
//! the GIS MT JSON schema; absent optional fields are left out of the
//! serialized document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Document describing goods introduced into circulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    #[serde(rename = "importRequest", skip_serializing_if = "Option::is_none")]
    pub import_request: Option<bool>,

    /// Owner TIN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,

    /// Participant TIN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_inn: Option<String>,

    /// Producer TIN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,

    /// YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_type: Option<String>,

    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn", skip_serializing_if = "Option::is_none")]
    pub participant_inn: Option<String>,
}

/// One entry of the `products` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,

    /// YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,

    /// YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tnved_code: Option<String>,

    /// Identification code (KI)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,

    /// Transport package identification code (KITU)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}

/// Product groups accepted by the `pg` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductGroup {
    Clothes,
    Shoes,
    Tobacco,
    Perfumery,
    Tires,
    Electronics,
    Pharma,
    Milk,
    Bicycle,
    Wheelchairs,
}

impl ProductGroup {
    pub const ALL: [ProductGroup; 10] = [
        Self::Clothes,
        Self::Shoes,
        Self::Tobacco,
        Self::Perfumery,
        Self::Tires,
        Self::Electronics,
        Self::Pharma,
        Self::Milk,
        Self::Bicycle,
        Self::Wheelchairs,
    ];

    /// Wire value for the `pg` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clothes => "clothes",
            Self::Shoes => "shoes",
            Self::Tobacco => "tobacco",
            Self::Perfumery => "perfumery",
            Self::Tires => "tires",
            Self::Electronics => "electronics",
            Self::Pharma => "pharma",
            Self::Milk => "milk",
            Self::Bicycle => "bicycle",
            Self::Wheelchairs => "wheelchairs",
        }
    }
}

impl fmt::Display for ProductGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown product group: {0}")]
pub struct UnknownProductGroup(pub String);

impl FromStr for ProductGroup {
    type Err = UnknownProductGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == wanted)
            .ok_or_else(|| UnknownProductGroup(s.to_string()))
    }
}
