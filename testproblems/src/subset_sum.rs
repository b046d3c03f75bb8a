//! Sum-of-scores subset selection: choose exactly `target` IDs out of a
//! contiguous `0..n` universe maximizing the sum of their scores. Used by
//! the workspace's steepest-descent and VNS integration scenarios, where
//! `scores[id] = id` gives a known optimum.

use heurist_core::{Constraint, Evaluation, IncompatibleDeltaError, Move, Objective, Problem, SimpleEvaluation, SimpleValidation};
use heurist_subset::{SubsetMove, SubsetSolution};
use rand::seq::IteratorRandom;
use rand::RngCore;

/// Maximizes `Σ data[id]` over the selected IDs.
pub struct SumOfScoresObjective;

impl Objective<SubsetSolution, Vec<f64>> for SumOfScoresObjective {
    fn evaluate(&self, sol: &SubsetSolution, data: &Vec<f64>) -> Box<dyn Evaluation> {
        let sum: f64 = sol.selected().iter().map(|&id| data[id as usize]).sum();
        Box::new(SimpleEvaluation(sum))
    }

    fn evaluate_delta(
        &self,
        mv: &dyn Move<SubsetSolution>,
        _sol: &SubsetSolution,
        cur: &dyn Evaluation,
        data: &Vec<f64>,
    ) -> Result<Box<dyn Evaluation>, IncompatibleDeltaError> {
        let mv = mv.as_any().downcast_ref::<SubsetMove>().ok_or(IncompatibleDeltaError)?;
        let added: f64 = mv.added().iter().map(|&id| data[id as usize]).sum();
        let deleted: f64 = mv.deleted().iter().map(|&id| data[id as usize]).sum();
        Ok(Box::new(SimpleEvaluation(cur.value() + added - deleted)))
    }
}

/// Mandatory: exactly `target` IDs must be selected.
pub struct SubsetSizeConstraint {
    target: usize,
}

impl SubsetSizeConstraint {
    pub fn new(target: usize) -> Self {
        Self { target }
    }
}

impl Constraint<SubsetSolution, Vec<f64>> for SubsetSizeConstraint {
    fn validate(&self, sol: &SubsetSolution, _data: &Vec<f64>) -> SimpleValidation {
        SimpleValidation(sol.size() == self.target)
    }

    fn validate_delta(
        &self,
        mv: &dyn Move<SubsetSolution>,
        sol: &SubsetSolution,
        _cur: &SimpleValidation,
        _data: &Vec<f64>,
    ) -> Result<SimpleValidation, IncompatibleDeltaError> {
        let mv = mv.as_any().downcast_ref::<SubsetMove>().ok_or(IncompatibleDeltaError)?;
        let new_size = sol.size() as i64 + mv.added().len() as i64 - mv.deleted().len() as i64;
        Ok(SimpleValidation(new_size == self.target as i64))
    }
}

/// Builds the canonical sum-of-scores problem over universe `0..universe_size`
/// with `scores[id] = id`, requiring exactly `subset_size` selected IDs.
pub fn subset_sum_problem(universe_size: i64, subset_size: usize) -> Problem<SubsetSolution, Vec<f64>> {
    let scores: Vec<f64> = (0..universe_size).map(|id| id as f64).collect();
    Problem::new(
        Box::new(SumOfScoresObjective),
        scores,
        Box::new(move |rng: &mut dyn RngCore| {
            let selected: Vec<i64> = (0..universe_size).choose_multiple(rng, subset_size);
            SubsetSolution::new(0..universe_size, selected)
        }),
        false,
    )
    .with_mandatory_constraint("subset-size", Box::new(SubsetSizeConstraint::new(subset_size)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heurist_core::Validation;

    #[test]
    fn optimum_is_the_top_scoring_ids() {
        let problem = subset_sum_problem(10, 3);
        let optimum = SubsetSolution::new(0..10, [7, 8, 9]);
        assert!(problem.validate(&optimum).passed());
        assert_eq!(problem.evaluate(&optimum).value(), 24.0);
    }

    #[test]
    fn wrong_size_fails_validation() {
        let problem = subset_sum_problem(10, 3);
        let too_small = SubsetSolution::new(0..10, [9]);
        assert!(!problem.validate(&too_small).passed());
    }

    #[test]
    fn delta_matches_full_reevaluation() {
        let problem = subset_sum_problem(10, 3);
        let sol = SubsetSolution::new(0..10, [0, 1, 2]);
        let cur_eval = problem.evaluate(&sol);
        let mv = SubsetMove::Swap { added: 9, deleted: 0 };
        let delta = problem.evaluate_delta(&mv, &sol, cur_eval.as_ref()).unwrap();

        let mut applied = sol.clone();
        mv.apply(&mut applied);
        let full = problem.evaluate(&applied);
        assert!((delta.value() - full.value()).abs() < 1e-10);
    }
}
