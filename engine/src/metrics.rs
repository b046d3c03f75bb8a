//! A point-in-time snapshot of a search's progress, read by stop criteria
//! and exposed to external callers.

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchMetrics {
    pub steps: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub runtime: Duration,
    pub time_since_last_improvement: Duration,
    pub steps_since_last_improvement: u64,
    /// Signed improvement of the most recently accepted move, in the
    /// direction the problem is optimising (always >= 0 for an accepted
    /// move). `None` before the first accepted move.
    pub last_delta: Option<f64>,
    pub best_value: Option<f64>,
    pub minimizing: bool,
}
