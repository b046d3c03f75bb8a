//! Error types shared by the problem model and the search engine.

use std::fmt;
use thiserror::Error;

/// Raised when a delta evaluator or validator is handed a move it cannot
/// process incrementally. Callers may retry with full evaluation.
#[derive(Debug, Error)]
#[error("no delta implementation available for this move; fall back to full evaluation")]
pub struct IncompatibleDeltaError;

/// Raised when an illegal operation is attempted on a solution (e.g.
/// deselecting an ID that is not currently selected). Carries a copy of
/// the solution as it stood when the violation was detected.
#[derive(Debug)]
pub struct SolutionModificationError<S> {
    pub reason: String,
    pub solution: S,
}

impl<S> SolutionModificationError<S> {
    pub fn new(reason: impl Into<String>, solution: S) -> Self {
        Self {
            reason: reason.into(),
            solution,
        }
    }
}

impl<S: fmt::Debug> fmt::Display for SolutionModificationError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal solution modification: {}", self.reason)
    }
}

impl<S: fmt::Debug> std::error::Error for SolutionModificationError<S> {}

/// Contract violations detected at construction time (null/empty
/// collections, out-of-range parameters, check periods below the
/// enforced minimum, fixed IDs outside the universe, ...).
///
/// These never correct themselves silently: a fallible builder returns
/// this error instead of producing a half-valid object.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("stop criterion check period must be at least 1ms, got {0:?}")]
    CheckPeriodTooShort(std::time::Duration),
    #[error("neighbourhood list must not be empty")]
    EmptyNeighbourhoodList,
    #[error("fixed id {0} is not part of the universe")]
    FixedIdNotInUniverse(i64),
}

/// Umbrella runtime error for search execution: internal invariant
/// failures and failures raised by user callbacks (objectives,
/// constraints, listeners). Aborts the run that raised it; the engine
/// fires `searchStopped` and restores the idle state before propagating.
#[derive(Debug)]
pub enum SearchError<S> {
    IncompatibleDelta(IncompatibleDeltaError),
    SolutionModification(SolutionModificationError<S>),
    /// One or more listeners raised during dispatch; dispatch to the
    /// remaining listeners still completed. Carries the per-listener
    /// error messages in registration order.
    Listener(Vec<String>),
    Aborted(String),
}

impl<S: fmt::Debug> fmt::Display for SearchError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::IncompatibleDelta(e) => write!(f, "{}", e),
            SearchError::SolutionModification(e) => write!(f, "{}", e),
            SearchError::Listener(msgs) => {
                write!(f, "{} listener(s) raised an error during dispatch: {msgs:?}", msgs.len())
            }
            SearchError::Aborted(reason) => write!(f, "search aborted: {reason}"),
        }
    }
}

impl<S: fmt::Debug> std::error::Error for SearchError<S> {}

impl<S> From<IncompatibleDeltaError> for SearchError<S> {
    fn from(e: IncompatibleDeltaError) -> Self {
        SearchError::IncompatibleDelta(e)
    }
}

impl<S> From<SolutionModificationError<S>> for SearchError<S> {
    fn from(e: SolutionModificationError<S>) -> Self {
        SearchError::SolutionModification(e)
    }
}
