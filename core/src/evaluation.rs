//! Real-valued scoring outcomes, with lazily-cached penalty composition.

use std::cell::Cell;
use std::fmt;

use crate::validation::{PenalizingValidation, Validation};

/// A real-valued scoring of a solution.
///
/// `Send` because evaluations are held in search state shared between a
/// search's worker thread and callers reading a snapshot concurrently.
pub trait Evaluation: fmt::Debug + Send {
    fn value(&self) -> f64;

    /// Enables downcasting a boxed evaluation back to its concrete type,
    /// used by [`crate::problem::Problem`] to recover a prior
    /// [`PenalizedEvaluation`] when composing delta evaluations.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Deep-copies this evaluation, used when a search engine snapshots
    /// the current evaluation into its best-so-far slot.
    fn clone_box(&self) -> Box<dyn Evaluation>;
}

/// A direct numeric score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleEvaluation(pub f64);

impl Evaluation for SimpleEvaluation {
    fn value(&self) -> f64 {
        self.0
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Evaluation> {
        Box::new(*self)
    }
}

/// Wraps an inner evaluation with a keyed set of penalizing validations.
///
/// `value = inner ± Σ penalties`, `+` when minimizing and `−` when
/// maximizing (a penalty always makes a solution look worse). The combined
/// value is computed once and cached; any mutation of the penalty mapping
/// invalidates the cache.
#[derive(Debug)]
pub struct PenalizedEvaluation {
    inner: Box<dyn Evaluation>,
    // Insertion order is the deterministic composition order the problem
    // model requires; a `Vec` preserves it without pulling in a map crate.
    penalties: Vec<(String, PenalizingValidation)>,
    minimizing: bool,
    cache: Cell<Option<f64>>,
}

impl PenalizedEvaluation {
    pub fn new(inner: Box<dyn Evaluation>, minimizing: bool) -> Self {
        Self {
            inner,
            penalties: Vec::new(),
            minimizing,
            cache: Cell::new(None),
        }
    }

    pub fn with_penalties(
        inner: Box<dyn Evaluation>,
        minimizing: bool,
        penalties: Vec<(String, PenalizingValidation)>,
    ) -> Self {
        Self {
            inner,
            penalties,
            minimizing,
            cache: Cell::new(None),
        }
    }

    pub fn inner(&self) -> &dyn Evaluation {
        self.inner.as_ref()
    }

    pub fn penalties(&self) -> &[(String, PenalizingValidation)] {
        &self.penalties
    }

    /// Insert or replace the penalty keyed by `key`; invalidates the cache.
    pub fn set_penalty(&mut self, key: impl Into<String>, validation: PenalizingValidation) {
        let key = key.into();
        if let Some(slot) = self.penalties.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = validation;
        } else {
            self.penalties.push((key, validation));
        }
        self.cache.set(None);
    }

    pub fn all_unpenalized(&self) -> bool {
        self.penalties.iter().all(|(_, v)| v.passed())
    }

    fn total_penalty(&self) -> f64 {
        self.penalties.iter().map(|(_, v)| v.penalty()).sum()
    }
}

impl Evaluation for PenalizedEvaluation {
    fn value(&self) -> f64 {
        if let Some(v) = self.cache.get() {
            return v;
        }
        let sign = if self.minimizing { 1.0 } else { -1.0 };
        let v = self.inner.value() + sign * self.total_penalty();
        self.cache.set(Some(v));
        v
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Evaluation> {
        Box::new(PenalizedEvaluation {
            inner: self.inner.clone_box(),
            penalties: self.penalties.clone(),
            minimizing: self.minimizing,
            cache: Cell::new(self.cache.get()),
        })
    }
}

impl fmt::Display for PenalizedEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_unpenalized() {
            write!(f, "{:.6}", self.value())
        } else {
            write!(
                f,
                "{:.6} (penalized by {:.6})",
                self.value(),
                self.total_penalty()
            )
        }
    }
}
