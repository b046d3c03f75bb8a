//! Current/best tracking, accept/reject semantics and best-move selection
//! shared by every algorithm in the workspace.

use rand::RngCore;

use heurist_core::{Evaluation, Move, Problem, ProblemValidation, Solution, Validation};

/// Per-run mutable state a step function reads and mutates: the current
/// solution/evaluation/validation, the best seen so far, and counters.
pub(crate) struct Inner<S: Solution> {
    pub current: S,
    pub current_eval: Box<dyn Evaluation>,
    pub current_validation: ProblemValidation,
    pub best: Option<S>,
    pub best_eval: Option<Box<dyn Evaluation>>,
    pub best_validation: Option<ProblemValidation>,
    pub accepted: u64,
    pub rejected: u64,
}

fn is_better(candidate: f64, reference: f64, minimizing: bool) -> bool {
    if minimizing {
        candidate < reference
    } else {
        candidate > reference
    }
}

/// Evaluates and validates the result of applying `mv` to `cur`, preferring
/// each component's delta implementation and falling back to full
/// re-evaluation on a deep-copied probe the moment either delta is
/// unavailable. The probe solution is discarded; `cur` is never mutated.
pub(crate) fn probe_move<S: Solution, D>(
    problem: &Problem<S, D>,
    cur: &S,
    cur_eval: &dyn Evaluation,
    cur_validation: &ProblemValidation,
    mv: &dyn Move<S>,
) -> (Box<dyn Evaluation>, ProblemValidation) {
    let delta_eval = problem.evaluate_delta(mv, cur, cur_eval);
    let delta_val = problem.validate_delta(mv, cur, cur_validation);
    match (delta_eval, delta_val) {
        (Ok(eval), Ok(val)) => (eval, val),
        _ => {
            let mut probe = cur.clone();
            mv.apply(&mut probe);
            (problem.evaluate(&probe), problem.validate(&probe))
        }
    }
}

/// The view a [`crate::SearchStep`] implementation operates against during
/// one `searchStep()` call.
pub struct StepContext<'a, S: Solution, D> {
    pub(crate) problem: &'a Problem<S, D>,
    pub(crate) inner: &'a mut Inner<S>,
    pub(crate) rng: &'a mut dyn RngCore,
    pub(crate) stop_requested: &'a mut bool,
    pub(crate) new_best: &'a mut bool,
    pub(crate) last_delta: &'a mut Option<f64>,
}

impl<'a, S: Solution, D> StepContext<'a, S, D> {
    pub fn problem(&self) -> &Problem<S, D> {
        self.problem
    }

    pub fn current(&self) -> &S {
        &self.inner.current
    }

    pub fn current_evaluation(&self) -> &dyn Evaluation {
        self.inner.current_eval.as_ref()
    }

    pub fn current_validation(&self) -> &ProblemValidation {
        &self.inner.current_validation
    }

    pub fn best(&self) -> Option<&S> {
        self.inner.best.as_ref()
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        self.rng
    }

    /// Request that the search stop once the in-flight step returns.
    /// Used by algorithms that detect a local optimum (steepest descent,
    /// VND exhausting its neighbourhood list).
    pub fn request_stop(&mut self) {
        *self.stop_requested = true;
    }

    /// Evaluate and validate the result of applying `mv`, without
    /// mutating the current solution.
    pub fn evaluate_move(&self, mv: &dyn Move<S>) -> (Box<dyn Evaluation>, ProblemValidation) {
        probe_move(
            self.problem,
            &self.inner.current,
            self.inner.current_eval.as_ref(),
            &self.inner.current_validation,
            mv,
        )
    }

    /// `true` iff `eval`/`validation` (as produced by [`Self::evaluate_move`])
    /// describe a valid, strictly-improving neighbour of the current
    /// solution.
    pub fn is_improvement(&self, eval: &dyn Evaluation, validation: &ProblemValidation) -> bool {
        validation.passed() && is_better(eval.value(), self.inner.current_eval.value(), self.problem.is_minimizing())
    }

    /// Scans `candidates`, returning the index of the valid candidate with
    /// the strictly best delta under the problem's optimisation direction.
    /// When `require_positive_delta`, candidates that do not improve on the
    /// current solution are excluded entirely. Ties are broken by
    /// first-encountered. `None` if no candidate qualifies.
    pub fn get_best_move(
        &self,
        candidates: &[Box<dyn Move<S>>],
        require_positive_delta: bool,
    ) -> Option<(usize, Box<dyn Evaluation>, ProblemValidation)> {
        let minimizing = self.problem.is_minimizing();
        let cur_value = self.inner.current_eval.value();
        let mut best: Option<(usize, f64, Box<dyn Evaluation>, ProblemValidation)> = None;
        for (i, mv) in candidates.iter().enumerate() {
            let (eval, validation) = self.evaluate_move(mv.as_ref());
            if !validation.passed() {
                continue;
            }
            let delta = if minimizing {
                cur_value - eval.value()
            } else {
                eval.value() - cur_value
            };
            if require_positive_delta && delta <= 0.0 {
                continue;
            }
            let replace = match &best {
                None => true,
                Some((_, best_delta, _, _)) => delta > *best_delta,
            };
            if replace {
                best = Some((i, delta, eval, validation));
            }
        }
        best.map(|(i, _, eval, validation)| (i, eval, validation))
    }

    /// Applies `mv` to the current solution, adopting `eval`/`validation`
    /// (typically produced by a prior [`Self::evaluate_move`] call on the
    /// same move) as the new current evaluation/validation. Updates best
    /// and the improvement-tracking metrics if this is a new best.
    pub fn accept_move(&mut self, mv: &dyn Move<S>, eval: Box<dyn Evaluation>, validation: ProblemValidation) {
        self.inner.accepted += 1;
        mv.apply(&mut self.inner.current);
        let minimizing = self.problem.is_minimizing();
        let is_best = validation.passed()
            && self
                .inner
                .best_eval
                .as_ref()
                .is_none_or(|best_eval| is_better(eval.value(), best_eval.value(), minimizing));
        if is_best {
            let delta = self
                .inner
                .best_eval
                .as_ref()
                .map(|best_eval| (eval.value() - best_eval.value()).abs())
                .unwrap_or(f64::INFINITY);
            *self.last_delta = Some(delta);
            self.inner.best = Some(self.inner.current.clone());
            self.inner.best_eval = Some(eval.clone_box());
            self.inner.best_validation = Some(validation.clone());
            *self.new_best = true;
        }
        self.inner.current_eval = eval;
        self.inner.current_validation = validation;
    }

    /// Declines to apply a probed move. The current solution is left
    /// untouched.
    pub fn reject_move(&mut self) {
        self.inner.rejected += 1;
    }

    /// Sets the current solution directly (used by VNS to seed an
    /// embedded local search with a shaken copy), re-evaluating it in
    /// full and updating best if it improves.
    pub fn set_current_solution(&mut self, sol: S) {
        let eval = self.problem.evaluate(&sol);
        let validation = self.problem.validate(&sol);
        let minimizing = self.problem.is_minimizing();
        let is_best = validation.passed()
            && self
                .inner
                .best_eval
                .as_ref()
                .is_none_or(|best_eval| is_better(eval.value(), best_eval.value(), minimizing));
        self.inner.current = sol;
        if is_best {
            self.inner.best = Some(self.inner.current.clone());
            self.inner.best_eval = Some(eval.clone_box());
            self.inner.best_validation = Some(validation.clone());
            *self.new_best = true;
        }
        self.inner.current_eval = eval;
        self.inner.current_validation = validation;
    }
}
