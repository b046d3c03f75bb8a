//! Mandatory and penalizing constraint predicates.

use crate::error::IncompatibleDeltaError;
use crate::solution::{Move, Solution};
use crate::validation::{PenalizingValidation, SimpleValidation};

/// A mandatory constraint: a solution failing any of these is invalid.
pub trait Constraint<S: Solution, D>: Send + Sync {
    fn validate(&self, sol: &S, data: &D) -> SimpleValidation;

    fn validate_delta(
        &self,
        mv: &dyn Move<S>,
        sol: &S,
        cur: &SimpleValidation,
        data: &D,
    ) -> Result<SimpleValidation, IncompatibleDeltaError> {
        let _ = (mv, sol, cur, data);
        Err(IncompatibleDeltaError)
    }
}

/// A penalizing constraint: failing it never invalidates a solution, it
/// only adds a non-negative cost term to the problem's penalized
/// evaluation.
pub trait PenalizingConstraint<S: Solution, D>: Send + Sync {
    fn validate(&self, sol: &S, data: &D) -> PenalizingValidation;

    fn validate_delta(
        &self,
        mv: &dyn Move<S>,
        sol: &S,
        cur: &PenalizingValidation,
        data: &D,
    ) -> Result<PenalizingValidation, IncompatibleDeltaError> {
        let _ = (mv, sol, cur, data);
        Err(IncompatibleDeltaError)
    }
}
