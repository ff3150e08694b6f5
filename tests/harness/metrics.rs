// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admission log collected during limiter simulation.

use std::time::Duration;

/// One caller's journey through the limiter.
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    /// When the caller arrived, relative to the simulation start
    pub arrived: Duration,
    /// When the caller was admitted, relative to the simulation start
    pub admitted: Duration,
}

impl Admission {
    pub fn waited(&self) -> Duration {
        self.admitted.saturating_sub(self.arrived)
    }
}

/// Collects admissions during a simulation.
#[derive(Debug, Default)]
pub struct AdmissionLog {
    admissions: Vec<Admission>,
    cancelled: usize,
}

impl AdmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, arrived: Duration, admitted: Duration) {
        self.admissions.push(Admission { arrived, admitted });
    }

    pub fn record_cancelled(&mut self) {
        self.cancelled += 1;
    }

    pub fn admitted(&self) -> usize {
        self.admissions.len()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Admission instants in chronological order.
    pub fn admission_times(&self) -> Vec<Duration> {
        let mut times: Vec<Duration> = self.admissions.iter().map(|a| a.admitted).collect();
        times.sort_unstable();
        times
    }

    /// Largest number of admissions inside any half-open interval
    /// `[t, t + window)`.
    ///
    /// The busiest interval always starts at an admission, so only those
    /// starting points are checked.
    pub fn max_in_any_window(&self, window: Duration) -> usize {
        let times = self.admission_times();
        let mut best = 0;
        let mut end = 0;
        for start in 0..times.len() {
            while end < times.len() && times[end] < times[start] + window {
                end += 1;
            }
            best = best.max(end - start);
        }
        best
    }

    /// Callers admitted the moment they arrived.
    pub fn immediate(&self) -> usize {
        self.admissions
            .iter()
            .filter(|a| a.waited().is_zero())
            .count()
    }

    /// Time of the last admission.
    pub fn makespan(&self) -> Duration {
        self.admissions
            .iter()
            .map(|a| a.admitted)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn max_wait(&self) -> Duration {
        self.admissions
            .iter()
            .map(Admission::waited)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Generate a summary report.
    pub fn report(&self, window: Duration) -> LogReport {
        LogReport {
            admitted: self.admitted(),
            cancelled: self.cancelled,
            immediate: self.immediate(),
            busiest_window: self.max_in_any_window(window),
            max_wait_ms: self.max_wait().as_millis() as u64,
            makespan_ms: self.makespan().as_millis() as u64,
        }
    }
}

/// Summary of a simulation run.
#[derive(Debug, Clone)]
pub struct LogReport {
    pub admitted: usize,
    pub cancelled: usize,
    pub immediate: usize,
    pub busiest_window: usize,
    pub max_wait_ms: u64,
    pub makespan_ms: u64,
}

impl std::fmt::Display for LogReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Admission Report ===")?;
        writeln!(f, "Admitted:          {}", self.admitted)?;
        writeln!(f, "Cancelled:         {}", self.cancelled)?;
        writeln!(f, "Immediate:         {}", self.immediate)?;
        writeln!(f, "Busiest window:    {}", self.busiest_window)?;
        writeln!(f, "Max wait:          {} ms", self.max_wait_ms)?;
        writeln!(f, "Makespan:          {} ms", self.makespan_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_window_count_is_half_open() {
        let mut log = AdmissionLog::new();
        for t in [0, 500, 999, 1000, 1000] {
            log.record(ms(0), ms(t));
        }

        // [0, 1000) excludes both admissions at 1000 and holds only 3;
        // [500, 1500) holds 500, 999, 1000, 1000.
        assert_eq!(log.max_in_any_window(ms(1000)), 4);
        // [1000, 1001) holds the two admissions at 1000.
        assert_eq!(log.max_in_any_window(ms(1)), 2);

        // Entries exactly one window apart never share a window.
        let mut spaced = AdmissionLog::new();
        for t in [0, 1000, 2000] {
            spaced.record(ms(0), ms(t));
        }
        assert_eq!(spaced.max_in_any_window(ms(1000)), 1);
        assert_eq!(spaced.max_in_any_window(ms(1001)), 2);
    }

    #[test]
    fn test_waits() {
        let mut log = AdmissionLog::new();
        log.record(ms(0), ms(0));
        log.record(ms(100), ms(1000));
        log.record_cancelled();

        assert_eq!(log.immediate(), 1);
        assert_eq!(log.max_wait(), ms(900));
        assert_eq!(log.makespan(), ms(1000));
        assert_eq!(log.cancelled(), 1);
    }
}
