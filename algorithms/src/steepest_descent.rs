//! Steepest descent: per step, enumerate every move in the neighbourhood
//! and take the strictly best improving one. Stops itself at a local
//! optimum.

use heurist_core::{Neighbourhood, Solution};
use heurist_engine::{SearchStep, StepContext};

pub struct SteepestDescent<S: Solution> {
    neighbourhood: Box<dyn Neighbourhood<S>>,
}

impl<S: Solution> SteepestDescent<S> {
    pub fn new(neighbourhood: Box<dyn Neighbourhood<S>>) -> Self {
        Self { neighbourhood }
    }
}

impl<S: Solution, D> SearchStep<S, D> for SteepestDescent<S> {
    fn step(&mut self, ctx: &mut StepContext<'_, S, D>) {
        let candidates = self.neighbourhood.get_all_moves(ctx.current());
        match ctx.get_best_move(&candidates, true) {
            Some((i, eval, validation)) => ctx.accept_move(candidates[i].as_ref(), eval, validation),
            None => ctx.request_stop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heurist_subset::SingleSwapNeighbourhood;
    use heurist_testproblems::subset_sum_problem;
    use std::time::Duration;

    #[test]
    fn converges_to_top_scoring_ids() {
        let problem = subset_sum_problem(10, 3);
        let universe = (0..10).collect();
        let step = SteepestDescent::new(Box::new(SingleSwapNeighbourhood::new(&universe, []).unwrap()));
        let mut search = heurist_engine::Search::new("sd", problem, Box::new(step), Duration::from_millis(1)).unwrap();
        search.set_seed(7);
        search.add_stop_criterion(Box::new(heurist_engine::MaxSteps(1000)));
        search.start().unwrap();
        search.join().unwrap();

        let best = search.best_solution().unwrap();
        assert_eq!(best.selected().iter().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
        assert_eq!(search.best_evaluation_value().unwrap(), 24.0);
    }
}
