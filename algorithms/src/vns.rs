//! Variable Neighbourhood Search: shakes the current solution with a
//! random move from an ordered list of shaking neighbourhoods, then hands
//! the shaken copy to a freshly-constructed embedded local search run to
//! completion. Cyclic: the shaking index wraps rather than terminating the
//! outer search, since the embedded searches' own stop criteria are the
//! run's actual termination signal.

use std::sync::Arc;

use heurist_core::{Neighbourhood, Problem, Solution};
use heurist_engine::{Search, SearchStep, StepContext};

/// Builds a fresh embedded [`Search`] bound to `problem`, ready to be
/// seeded and started. The embedded search owns its own stop criteria and
/// runs to completion independently of the outer search.
///
/// Takes an `Arc` rather than a bare reference because the embedded
/// search's worker/poller threads outlive the `step()` call that spawns
/// them.
pub type LocalSearchFactory<S, D> = Box<dyn Fn(Arc<Problem<S, D>>) -> Search<S, D> + Send + Sync>;

pub struct VariableNeighbourhoodSearch<S: Solution + 'static, D: Send + Sync + 'static> {
    shaking: Vec<Box<dyn Neighbourhood<S>>>,
    problem: Arc<Problem<S, D>>,
    factory: LocalSearchFactory<S, D>,
    s: usize,
}

impl<S: Solution + 'static, D: Send + Sync + 'static> VariableNeighbourhoodSearch<S, D> {
    /// `problem` must be the same `Arc` the outer [`Search`] was built
    /// with via [`Search::with_shared_problem`].
    pub fn new(shaking: Vec<Box<dyn Neighbourhood<S>>>, problem: Arc<Problem<S, D>>, factory: LocalSearchFactory<S, D>) -> Self {
        assert!(!shaking.is_empty(), "VNS requires at least one shaking neighbourhood");
        Self {
            shaking,
            problem,
            factory,
            s: 0,
        }
    }
}

impl<S: Solution + 'static, D: Send + Sync + 'static> SearchStep<S, D> for VariableNeighbourhoodSearch<S, D> {
    fn step(&mut self, ctx: &mut StepContext<'_, S, D>) {
        let mut shaken = ctx.current().clone();
        match self.shaking[self.s].get_random_move(&shaken, ctx.rng()) {
            Some(mv) => mv.apply(&mut shaken),
            None => {
                self.s = (self.s + 1) % self.shaking.len();
                return;
            }
        }

        let mut embedded = (self.factory)(Arc::clone(&self.problem));
        embedded.seed_initial_solution(shaken);
        embedded.start().expect("embedded search must start from Idle");
        embedded.join().expect("embedded search run must complete");
        let candidate = embedded.best_solution();
        embedded.dispose().expect("embedded search is Idle after join");

        let minimizing = self.problem.is_minimizing();
        let improves = candidate.as_ref().is_some_and(|x| {
            let candidate_value = self.problem.evaluate(x).value();
            let current_value = ctx.current_evaluation().value();
            if minimizing {
                candidate_value < current_value
            } else {
                candidate_value > current_value
            }
        });

        if improves {
            ctx.set_current_solution(candidate.unwrap());
            self.s = 0;
        } else {
            self.s = (self.s + 1) % self.shaking.len();
        }
    }

    fn reset(&mut self) {
        self.s = 0;
    }
}
