// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Caller arrival patterns for limiter simulation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Arrival pattern configuration.
#[derive(Debug, Clone)]
pub struct ArrivalPattern {
    /// Number of concurrent callers
    pub callers: usize,
    /// Limiter quota per window
    pub limit: u32,
    /// Limiter window
    pub window: Duration,
    /// Arrivals are spread over `[0, spread]`
    pub spread: Duration,
    /// RNG seed, so failures are reproducible
    pub seed: u64,
}

impl Default for ArrivalPattern {
    fn default() -> Self {
        Self {
            callers: 20,
            limit: 3,
            window: Duration::from_millis(1000),
            spread: Duration::from_millis(2000),
            seed: 7,
        }
    }
}

/// Predefined arrival patterns.
impl ArrivalPattern {
    /// Everyone arrives at the same instant.
    pub fn simultaneous_burst() -> Self {
        Self {
            callers: 12,
            limit: 4,
            spread: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Arrivals spread thinly over several windows.
    pub fn steady_trickle() -> Self {
        Self {
            callers: 30,
            limit: 5,
            spread: Duration::from_millis(10_000),
            ..Default::default()
        }
    }

    /// Several times the quota arriving within one window.
    pub fn overload() -> Self {
        Self {
            callers: 40,
            limit: 2,
            window: Duration::from_millis(250),
            spread: Duration::from_millis(250),
            ..Default::default()
        }
    }

    /// Random pattern derived from `seed`.
    pub fn random(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let window = Duration::from_millis(rng.gen_range(1..=500));
        Self {
            callers: rng.gen_range(1..=40),
            limit: rng.gen_range(1..=6),
            window,
            spread: window * rng.gen_range(0..=4),
            seed,
        }
    }

    /// Arrival offsets, one per caller, in caller order.
    pub fn offsets(&self) -> Vec<Duration> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let spread_ms = self.spread.as_millis() as u64;
        (0..self.callers)
            .map(|_| Duration::from_millis(rng.gen_range(0..=spread_ms)))
            .collect()
    }

    /// Lower bound on the time needed to admit everyone when all callers
    /// arrive at once.
    pub fn burst_duration(&self) -> Duration {
        let rounds = (self.callers as u32).div_ceil(self.limit);
        self.window * rounds.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_reproducible() {
        let pattern = ArrivalPattern::random(42);
        assert_eq!(pattern.offsets(), pattern.offsets());
        assert_eq!(pattern.offsets().len(), pattern.callers);
        assert!(pattern.offsets().iter().all(|o| *o <= pattern.spread));
    }

    #[test]
    fn test_burst_duration() {
        let pattern = ArrivalPattern::simultaneous_burst();
        // 12 callers at 4 per window: admitted at 0, 1w, 2w.
        assert_eq!(pattern.burst_duration(), pattern.window * 2);
    }
}
