//! End-to-end: repeated `start()`/`join()` calls on the same search resume
//! from the prior best rather than resetting it; best is non-decreasing
//! across runs under maximization.

use std::time::Duration;

use heurist_engine::{MaxRuntime, Search};
use heurist_subset::SingleSwapNeighbourhood;
use heurist_testproblems::subset_sum_problem;

#[test]
fn best_is_non_decreasing_across_subsequent_runs() {
    let problem = subset_sum_problem(30, 5);
    let universe = (0..30).collect();
    let step = heurist_algorithms::RandomDescent::new(Box::new(SingleSwapNeighbourhood::new(&universe, []).unwrap()));
    let mut search = Search::new("subsequent-runs", problem, Box::new(step), Duration::from_millis(5)).unwrap();
    search.set_seed(99);
    search.add_stop_criterion(Box::new(MaxRuntime::new(Duration::from_millis(500)).unwrap()));

    let mut prior_best = f64::NEG_INFINITY;
    for i in 0..5 {
        search.start().unwrap();
        search.join().unwrap();
        let best = search.best_evaluation_value().expect("a valid solution must have been visited");
        assert!(best >= prior_best, "run {i}: best {best} regressed below prior best {prior_best}");
        prior_best = best;
    }
}
