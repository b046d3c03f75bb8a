//! Invariants over a search run: the number of `newCurrentSolution`
//! notifications equals 1 (initial) plus accepted moves, and best is
//! monotone in the problem's optimisation direction.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use heurist_core::{Evaluation, ProblemValidation, Validation};
use heurist_engine::{MaxSteps, Search, SearchListener};
use heurist_subset::{SingleSwapNeighbourhood, SubsetSolution};
use heurist_testproblems::subset_sum_problem;

struct Tracker {
    current_notifications: Arc<Mutex<u64>>,
    best_values: Arc<Mutex<Vec<f64>>>,
}

impl SearchListener<SubsetSolution> for Tracker {
    fn new_current_solution(&mut self, _sol: &SubsetSolution, _eval: &dyn Evaluation, _validation: &ProblemValidation) -> Result<(), String> {
        *self.current_notifications.lock().unwrap() += 1;
        Ok(())
    }

    fn new_best_solution(&mut self, _sol: &SubsetSolution, eval: &dyn Evaluation, _validation: &ProblemValidation) -> Result<(), String> {
        self.best_values.lock().unwrap().push(eval.value());
        Ok(())
    }
}

#[test]
fn current_notification_count_matches_one_plus_accepted() {
    let problem = subset_sum_problem(12, 4);
    let universe = (0..12).collect();
    let step = heurist_algorithms::RandomDescent::new(Box::new(SingleSwapNeighbourhood::new(&universe, []).unwrap()));
    let mut search = Search::new("listener-count", problem, Box::new(step), Duration::from_millis(1)).unwrap();
    search.set_seed(17);

    let current_notifications = Arc::new(Mutex::new(0u64));
    let best_values = Arc::new(Mutex::new(Vec::new()));
    search.add_listener(Box::new(Tracker {
        current_notifications: Arc::clone(&current_notifications),
        best_values: Arc::clone(&best_values),
    }));
    search.add_stop_criterion(Box::new(MaxSteps(50)));
    search.start().unwrap();
    search.join().unwrap();

    let metrics = search.metrics();
    assert_eq!(*current_notifications.lock().unwrap(), 1 + metrics.accepted);
}

#[test]
fn best_value_sequence_is_non_decreasing_when_maximizing() {
    let problem = subset_sum_problem(12, 4);
    let universe = (0..12).collect();
    let step = heurist_algorithms::RandomDescent::new(Box::new(SingleSwapNeighbourhood::new(&universe, []).unwrap()));
    let mut search = Search::new("best-monotone", problem, Box::new(step), Duration::from_millis(1)).unwrap();
    search.set_seed(23);

    let current_notifications = Arc::new(Mutex::new(0u64));
    let best_values = Arc::new(Mutex::new(Vec::new()));
    search.add_listener(Box::new(Tracker {
        current_notifications: Arc::clone(&current_notifications),
        best_values: Arc::clone(&best_values),
    }));
    search.add_stop_criterion(Box::new(MaxSteps(200)));
    search.start().unwrap();
    search.join().unwrap();

    let history = best_values.lock().unwrap();
    for window in history.windows(2) {
        assert!(window[1] >= window[0], "best regressed: {window:?}");
    }

    let best = search.best_solution().unwrap();
    assert!(problem_valid(&best));
}

fn problem_valid(sol: &SubsetSolution) -> bool {
    subset_sum_problem(12, 4).validate(sol).passed() && sol.size() == 4
}
