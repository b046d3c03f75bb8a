//! `Problem`: binds an objective, constraint set, data and solution factory.

use rand::RngCore;

use crate::constraint::{Constraint, PenalizingConstraint};
use crate::error::IncompatibleDeltaError;
use crate::evaluation::{Evaluation, PenalizedEvaluation};
use crate::objective::Objective;
use crate::solution::{Move, Solution};
use crate::validation::Validation;

/// Composite validation over every mandatory constraint: passes iff all of
/// them pass. Carries the names of the constraints that failed so callers
/// can inspect `getViolatedConstraints`-style detail.
#[derive(Debug, Clone)]
pub struct ProblemValidation {
    passed: bool,
    violated: Vec<String>,
}

impl ProblemValidation {
    pub fn violated(&self) -> &[String] {
        &self.violated
    }
}

impl Validation for ProblemValidation {
    fn passed(&self) -> bool {
        self.passed
    }
}

/// Binds an [`Objective`], mandatory and penalizing constraint sets,
/// problem data and a solution factory. `isMinimizing` selects the
/// optimisation direction consulted by the search engine.
pub struct Problem<S: Solution, D> {
    objective: Box<dyn Objective<S, D>>,
    data: D,
    mandatory: Vec<(String, Box<dyn Constraint<S, D>>)>,
    penalizing: Vec<(String, Box<dyn PenalizingConstraint<S, D>>)>,
    factory: Box<dyn Fn(&mut dyn RngCore) -> S + Send + Sync>,
    minimizing: bool,
}

impl<S: Solution, D> Problem<S, D> {
    pub fn new(
        objective: Box<dyn Objective<S, D>>,
        data: D,
        factory: Box<dyn Fn(&mut dyn RngCore) -> S + Send + Sync>,
        minimizing: bool,
    ) -> Self {
        Self {
            objective,
            data,
            mandatory: Vec::new(),
            penalizing: Vec::new(),
            factory,
            minimizing,
        }
    }

    pub fn with_mandatory_constraint(
        mut self,
        name: impl Into<String>,
        constraint: Box<dyn Constraint<S, D>>,
    ) -> Self {
        self.mandatory.push((name.into(), constraint));
        self
    }

    pub fn with_penalizing_constraint(
        mut self,
        name: impl Into<String>,
        constraint: Box<dyn PenalizingConstraint<S, D>>,
    ) -> Self {
        self.penalizing.push((name.into(), constraint));
        self
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn is_minimizing(&self) -> bool {
        self.minimizing
    }

    pub fn create_random_solution(&self, rng: &mut dyn RngCore) -> S {
        (self.factory)(rng)
    }

    /// If there are no penalizing constraints, the objective's evaluation
    /// is returned directly; otherwise it is wrapped in a
    /// [`PenalizedEvaluation`] keyed by each penalizing constraint, in
    /// insertion order.
    pub fn evaluate(&self, sol: &S) -> Box<dyn Evaluation> {
        let inner = self.objective.evaluate(sol, &self.data);
        if self.penalizing.is_empty() {
            return inner;
        }
        let mut penalized = PenalizedEvaluation::new(inner, self.minimizing);
        for (name, constraint) in &self.penalizing {
            let v = constraint.validate(sol, &self.data);
            penalized.set_penalty(name.clone(), v);
        }
        Box::new(penalized)
    }

    /// Passes iff every mandatory constraint validates `passed()`.
    /// Penalizing constraints never cause failure here, only penalty.
    pub fn validate(&self, sol: &S) -> ProblemValidation {
        let mut violated = Vec::new();
        for (name, constraint) in &self.mandatory {
            if !constraint.validate(sol, &self.data).passed() {
                violated.push(name.clone());
            }
        }
        ProblemValidation {
            passed: violated.is_empty(),
            violated,
        }
    }

    pub fn violated_constraints(&self, sol: &S) -> Vec<String> {
        self.validate(sol).violated
    }

    /// Delta form of [`Problem::evaluate`]. Defers to the objective's and
    /// every penalizing constraint's own delta implementation; raises
    /// [`IncompatibleDeltaError`] the moment any of them lacks one, letting
    /// the caller fall back to full re-evaluation.
    pub fn evaluate_delta(
        &self,
        mv: &dyn Move<S>,
        sol: &S,
        cur: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>, IncompatibleDeltaError> {
        if self.penalizing.is_empty() {
            return self.objective.evaluate_delta(mv, sol, cur, &self.data);
        }
        let cur_penalized = cur
            .as_any()
            .downcast_ref::<PenalizedEvaluation>()
            .ok_or(IncompatibleDeltaError)?;
        let inner_delta =
            self.objective
                .evaluate_delta(mv, sol, cur_penalized.inner(), &self.data)?;
        let mut penalized = PenalizedEvaluation::new(inner_delta, self.minimizing);
        for (name, constraint) in &self.penalizing {
            let cur_pv = cur_penalized
                .penalties()
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| *v)
                .unwrap_or_else(crate::validation::PenalizingValidation::passing);
            let delta_pv = constraint.validate_delta(mv, sol, &cur_pv, &self.data)?;
            penalized.set_penalty(name.clone(), delta_pv);
        }
        Ok(Box::new(penalized))
    }

    /// Delta form of [`Problem::validate`]. Raises [`IncompatibleDeltaError`]
    /// the moment any mandatory constraint lacks a delta implementation.
    pub fn validate_delta(
        &self,
        mv: &dyn Move<S>,
        sol: &S,
        cur: &ProblemValidation,
    ) -> Result<ProblemValidation, IncompatibleDeltaError> {
        let mut violated = Vec::new();
        for (name, constraint) in &self.mandatory {
            let was_violated = cur.violated.contains(name);
            let cur_sv = crate::validation::SimpleValidation(!was_violated);
            let delta = constraint.validate_delta(mv, sol, &cur_sv, &self.data)?;
            if !delta.passed() {
                violated.push(name.clone());
            }
        }
        Ok(ProblemValidation {
            passed: violated.is_empty(),
            violated,
        })
    }
}
