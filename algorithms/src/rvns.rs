//! Reduced Variable Neighbourhood Search: an ordered neighbourhood list
//! sampled randomly rather than exhaustively. Optionally cycles back to
//! the first neighbourhood once the last is exhausted, instead of
//! stopping.

use heurist_core::{Neighbourhood, Solution};
use heurist_engine::{SearchStep, StepContext};

pub struct ReducedVariableNeighbourhoodSearch<S: Solution> {
    neighbourhoods: Vec<Box<dyn Neighbourhood<S>>>,
    cyclic: bool,
    k: usize,
}

impl<S: Solution> ReducedVariableNeighbourhoodSearch<S> {
    pub fn new(neighbourhoods: Vec<Box<dyn Neighbourhood<S>>>) -> Self {
        Self::with_cyclic(neighbourhoods, true)
    }

    pub fn with_cyclic(neighbourhoods: Vec<Box<dyn Neighbourhood<S>>>, cyclic: bool) -> Self {
        assert!(!neighbourhoods.is_empty(), "RVNS requires at least one neighbourhood");
        Self {
            neighbourhoods,
            cyclic,
            k: 0,
        }
    }

    fn advance<D>(&mut self, ctx: &mut StepContext<'_, S, D>) {
        self.k += 1;
        if self.k >= self.neighbourhoods.len() {
            if self.cyclic {
                self.k = 0;
            } else {
                ctx.request_stop();
            }
        }
    }
}

impl<S: Solution, D> SearchStep<S, D> for ReducedVariableNeighbourhoodSearch<S> {
    fn step(&mut self, ctx: &mut StepContext<'_, S, D>) {
        let current = ctx.current().clone();
        let Some(mv) = self.neighbourhoods[self.k].get_random_move(&current, ctx.rng()) else {
            self.advance(ctx);
            return;
        };
        let (eval, validation) = ctx.evaluate_move(mv.as_ref());
        if ctx.is_improvement(eval.as_ref(), &validation) {
            ctx.accept_move(mv.as_ref(), eval, validation);
            self.k = 0;
        } else {
            ctx.reject_move();
            self.advance(ctx);
        }
    }

    fn reset(&mut self) {
        self.k = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heurist_subset::SingleSwapNeighbourhood;
    use heurist_testproblems::subset_sum_problem;
    use std::time::Duration;

    #[test]
    fn cyclic_run_keeps_improving_towards_optimum() {
        let problem = subset_sum_problem(10, 3);
        let universe = (0..10).collect();
        let step = ReducedVariableNeighbourhoodSearch::new(vec![Box::new(
            SingleSwapNeighbourhood::new(&universe, []).unwrap(),
        )]);
        let mut search = heurist_engine::Search::new("rvns", problem, Box::new(step), Duration::from_millis(1)).unwrap();
        search.set_seed(11);
        search.add_stop_criterion(Box::new(heurist_engine::MaxSteps(2000)));
        search.start().unwrap();
        search.join().unwrap();

        assert_eq!(search.best_evaluation_value().unwrap(), 24.0);
    }
}
