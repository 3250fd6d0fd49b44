use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Attempt/accept counters for a stretch of trial moves. Diagnostic only.
/// Swap moves count towards the totals and are also tallied on their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    num_attempts: usize,
    num_accepts: usize,
    num_swap_attempts: usize,
    num_swap_accepts: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&mut self) {
        self.num_attempts += 1;
    }

    pub fn record_accept(&mut self) {
        self.num_accepts += 1;
    }

    pub fn record_swap_attempt(&mut self) {
        self.num_swap_attempts += 1;
    }

    pub fn record_swap_accept(&mut self) {
        self.num_swap_accepts += 1;
    }

    pub fn num_attempts(&self) -> usize {
        self.num_attempts
    }

    pub fn num_accepts(&self) -> usize {
        self.num_accepts
    }

    pub fn num_swap_attempts(&self) -> usize {
        self.num_swap_attempts
    }

    pub fn num_swap_accepts(&self) -> usize {
        self.num_swap_accepts
    }

    /// Zero when nothing has been attempted yet.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.num_attempts == 0 {
            return 0.0;
        }
        self.num_accepts as f64 / self.num_attempts as f64
    }
}

impl Add for RunStats {
    type Output = RunStats;

    fn add(self, rhs: RunStats) -> RunStats {
        RunStats {
            num_attempts: self.num_attempts + rhs.num_attempts,
            num_accepts: self.num_accepts + rhs.num_accepts,
            num_swap_attempts: self.num_swap_attempts + rhs.num_swap_attempts,
            num_swap_accepts: self.num_swap_accepts + rhs.num_swap_accepts,
        }
    }
}
