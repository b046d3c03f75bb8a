//! End-to-end: a search bounded only by `MaxRuntime` stays within the
//! guaranteed overshoot window (poll period plus one in-flight step).

use std::time::{Duration, Instant};

use heurist_engine::{MaxRuntime, Search};
use heurist_subset::SingleSwapNeighbourhood;
use heurist_testproblems::subset_sum_problem;

#[test]
fn max_runtime_bounds_the_run() {
    let problem = subset_sum_problem(10, 3);
    let universe = (0..10).collect();
    let step = heurist_algorithms::RandomDescent::new(Box::new(SingleSwapNeighbourhood::new(&universe, []).unwrap()));
    let check_period = Duration::from_millis(5);
    let bound = Duration::from_millis(2345);

    let mut search = Search::new("max-runtime", problem, Box::new(step), check_period).unwrap();
    search.add_stop_criterion(Box::new(MaxRuntime::new(bound).unwrap()));

    let started = Instant::now();
    search.start().unwrap();
    search.join().unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= bound, "run stopped early: {elapsed:?} < {bound:?}");
    assert!(
        elapsed <= bound + check_period * 2,
        "run overshot its guaranteed bound: {elapsed:?} > {bound:?} + 2*{check_period:?}"
    );
}
