// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window admission controller for outgoing CRPT calls.
//!
//! The remote API allows at most `limit` requests per rolling `window`.
//! Every submission calls [`RateLimiter::acquire`] first:
//!
//! 1. Expired timestamps are evicted from the head of the ledger; any
//!    eviction wakes parked callers.
//! 2. With a free slot the caller records its own timestamp while still
//!    holding the lock and proceeds.
//! 3. Otherwise the caller parks until the oldest entry expires or another
//!    caller signals freed capacity, then re-checks.
//!
//! No background task is involved and parked callers never poll.

use crate::config::RateLimitConfig;
use crate::error::LimiterError;
use crate::ledger::{Admission, TimestampLedger};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;
use tracing::debug;

/// Shared blocking rate limiter.
///
/// One instance is meant to be shared (usually behind an [`Arc`]) by every
/// task that talks to the rate-limited endpoint.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    ledger: Mutex<TimestampLedger>,
    capacity_freed: Notify,
}

impl RateLimiter {
    /// Create a limiter admitting at most `limit` calls per `window`.
    pub fn new(limit: u32, window: Duration) -> Result<Self, LimiterError> {
        if limit == 0 {
            return Err(LimiterError::Configuration(
                "limit must be greater than 0".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(LimiterError::Configuration(
                "window must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            limit,
            window,
            ledger: Mutex::new(TimestampLedger::new(limit as usize, window)),
            capacity_freed: Notify::new(),
        })
    }

    /// Create a limiter from configuration.
    pub fn from_config(config: &RateLimitConfig) -> Result<Self, LimiterError> {
        Self::new(config.limit, config.window())
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait for a slot and claim it.
    ///
    /// Dropping the returned future before it completes abandons the wait
    /// without recording anything.
    pub async fn acquire(&self) {
        loop {
            let notified = self.capacity_freed.notified();
            tokio::pin!(notified);
            // Register before the ledger check so a signal sent between
            // releasing the lock and parking is not lost.
            notified.as_mut().enable();

            let wait = {
                let mut ledger = self.ledger.lock().await;
                let now = Instant::now();

                let evicted = ledger.trim(now);
                if evicted > 0 {
                    debug!(evicted, "rate limit entries expired, waking waiters");
                    self.capacity_freed.notify_waiters();
                }

                match ledger.try_admit(now) {
                    Admission::Granted => return,
                    Admission::Wait(wait) => {
                        debug!(
                            limit = self.limit,
                            in_window = ledger.len(),
                            wait_ms = wait.as_millis() as u64,
                            "rate limit reached, parking caller"
                        );
                        wait
                    }
                }
            };

            if wait.is_zero() {
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = &mut notified => {}
            }
        }
    }

    /// Wait for a slot unless `cancel` fires first.
    ///
    /// Returns [`LimiterError::Cancelled`] if the signal is (or becomes)
    /// cancelled before a slot is granted; the ledger is left untouched.
    pub async fn acquire_with_cancel(&self, cancel: &CancelSignal) -> Result<(), LimiterError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("rate limit wait cancelled");
                Err(LimiterError::Cancelled)
            }
            _ = self.acquire() => Ok(()),
        }
    }

    #[cfg(test)]
    async fn admitted_in_window(&self) -> usize {
        let mut ledger = self.ledger.lock().await;
        ledger.trim(Instant::now());
        ledger.len()
    }
}

/// Cloneable cancellation flag for [`RateLimiter::acquire_with_cancel`].
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every wait observing this signal. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
