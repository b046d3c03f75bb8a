//! Random descent: accept the first improving random move found, reject
//! otherwise. Runs until a registered stop criterion fires.

use heurist_core::{Neighbourhood, Solution};
use heurist_engine::{SearchStep, StepContext};

/// Samples one random move per step from a single neighbourhood.
pub struct RandomDescent<S: Solution> {
    neighbourhood: Box<dyn Neighbourhood<S>>,
}

impl<S: Solution> RandomDescent<S> {
    pub fn new(neighbourhood: Box<dyn Neighbourhood<S>>) -> Self {
        Self { neighbourhood }
    }
}

impl<S: Solution, D> SearchStep<S, D> for RandomDescent<S> {
    fn step(&mut self, ctx: &mut StepContext<'_, S, D>) {
        let current = ctx.current().clone();
        let Some(mv) = self.neighbourhood.get_random_move(&current, ctx.rng()) else {
            ctx.request_stop();
            return;
        };
        let (eval, validation) = ctx.evaluate_move(mv.as_ref());
        if ctx.is_improvement(eval.as_ref(), &validation) {
            ctx.accept_move(mv.as_ref(), eval, validation);
        } else {
            ctx.reject_move();
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
    fn accepts_only_improving_moves() {
        let problem = subset_sum_problem(10, 3);
        let universe = (0..10).collect();
        let step = RandomDescent::new(Box::new(SingleSwapNeighbourhood::new(&universe, []).unwrap()));
        let mut search = heurist_engine::Search::new("rd", problem, Box::new(step), Duration::from_millis(1)).unwrap();
        search.set_seed(42);
        search.add_stop_criterion(Box::new(heurist_engine::MaxSteps(30)));
        search.start().unwrap();
        search.join().unwrap();
        let metrics = search.metrics();
        assert!(metrics.steps >= 30);
        assert_eq!(metrics.accepted + metrics.rejected, metrics.steps);
        assert!(metrics.accepted > 0);
    }
}
