// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Timestamp ledger backing the sliding-window limiter.
//!
//! Holds one monotonic instant per admission, oldest at the head. Entries
//! whose age has reached the window are evicted from the head before every
//! capacity check, so the ledger never holds more than `limit` live entries.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a capacity check against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// A slot was free and the admission has been recorded
    Granted,
    /// The window is full; the oldest entry expires after this long
    Wait(Duration),
}

/// Ordered record of recent admissions.
#[derive(Debug)]
pub(crate) struct TimestampLedger {
    limit: usize,
    window: Duration,
    entries: VecDeque<Instant>,
}

impl TimestampLedger {
    pub(crate) fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            entries: VecDeque::with_capacity(limit.min(1024)),
        }
    }

    /// Evict every head entry whose age is at least the window.
    ///
    /// Returns the number of evicted entries. An entry exactly `window` old
    /// counts as expired.
    pub(crate) fn trim(&mut self, now: Instant) -> usize {
        let mut evicted = 0;
        while let Some(&oldest) = self.entries.front() {
            if now.saturating_duration_since(oldest) < self.window {
                break;
            }
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Record an admission at `now` if a slot is free.
    ///
    /// Callers trim first; a full ledger reports how long until its oldest
    /// entry leaves the window.
    pub(crate) fn try_admit(&mut self, now: Instant) -> Admission {
        if self.entries.len() < self.limit {
            // Keep the tail non-decreasing even if the clock misbehaves.
            let at = match self.entries.back() {
                Some(&last) if last > now => last,
                _ => now,
            };
            self.entries.push_back(at);
            return Admission::Granted;
        }

        match self.entries.front() {
            Some(&oldest) => {
                let age = now.saturating_duration_since(oldest);
                Admission::Wait(self.window.saturating_sub(age))
            }
            None => Admission::Wait(Duration::ZERO),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Instant> {
        self.entries.iter()
    }
}
