//! Variable Neighbourhood Descent: an ordered list of neighbourhoods,
//! advancing through them on failure to improve and resetting to the first
//! on success. Stops itself once the last neighbourhood is exhausted.

use heurist_core::{Neighbourhood, Solution};
use heurist_engine::{SearchStep, StepContext};

pub struct VariableNeighbourhoodDescent<S: Solution> {
    neighbourhoods: Vec<Box<dyn Neighbourhood<S>>>,
    k: usize,
}

impl<S: Solution> VariableNeighbourhoodDescent<S> {
    pub fn new(neighbourhoods: Vec<Box<dyn Neighbourhood<S>>>) -> Self {
        assert!(!neighbourhoods.is_empty(), "VND requires at least one neighbourhood");
        Self { neighbourhoods, k: 0 }
    }
}

impl<S: Solution, D> SearchStep<S, D> for VariableNeighbourhoodDescent<S> {
    fn step(&mut self, ctx: &mut StepContext<'_, S, D>) {
        if self.k >= self.neighbourhoods.len() {
            ctx.request_stop();
            return;
        }
        let candidates = self.neighbourhoods[self.k].get_all_moves(ctx.current());
        match ctx.get_best_move(&candidates, true) {
            Some((i, eval, validation)) => {
                ctx.accept_move(candidates[i].as_ref(), eval, validation);
                self.k = 0;
            }
            None => self.k += 1,
        }
    }

    fn reset(&mut self) {
        self.k = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heurist_subset::{SingleAdditionNeighbourhood, SingleDeletionNeighbourhood, SingleSwapNeighbourhood};
    use heurist_testproblems::subset_sum_problem;
    use std::time::Duration;

    #[test]
    fn exhausts_neighbourhoods_at_local_optimum() {
        let problem = subset_sum_problem(10, 3);
        let universe = (0..10).collect();
        let step = VariableNeighbourhoodDescent::new(vec![
            Box::new(SingleAdditionNeighbourhood::new(&universe, []).unwrap()),
            Box::new(SingleDeletionNeighbourhood::new(&universe, []).unwrap()),
            Box::new(SingleSwapNeighbourhood::new(&universe, []).unwrap()),
        ]);
        let mut search = heurist_engine::Search::new("vnd", problem, Box::new(step), Duration::from_millis(1)).unwrap();
        search.set_seed(3);
        search.add_stop_criterion(Box::new(heurist_engine::MaxSteps(1000)));
        search.start().unwrap();
        search.join().unwrap();

        assert_eq!(search.best_evaluation_value().unwrap(), 24.0);
    }
}
