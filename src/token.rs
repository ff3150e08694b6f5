// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bearer token supply.
//!
//! Token issuance lives outside this crate; the client only asks a
//! [`TokenProvider`] for the current value before each submission.

use std::fmt;
use std::sync::RwLock;

/// Source of the `Authorization: Bearer` token.
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` if none is available.
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Token holder that can be rotated while the client is in use.
#[derive(Default)]
pub struct FixedTokenProvider {
    token: RwLock<Option<String>>,
}

impl FixedTokenProvider {
    /// Provider with no token set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Replace the current token.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(token.into());
    }
}

impl From<Option<String>> for FixedTokenProvider {
    fn from(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }
}

impl TokenProvider for FixedTokenProvider {
    fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl fmt::Debug for FixedTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = self.token().is_some();
        f.debug_struct("FixedTokenProvider")
            .field("token", if set { &"<redacted>" } else { &"<unset>" })
            .finish()
    }
}
