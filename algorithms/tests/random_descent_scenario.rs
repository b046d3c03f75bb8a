//! End-to-end: random descent against a deterministic improve/improve/worsen
//! cycle, independent of acceptance history, checking the exact 20/10
//! accepted/rejected split over 30 moves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use heurist_core::{Evaluation, Move, Neighbourhood, Problem, Solution, SimpleEvaluation};
use heurist_engine::{Search, SearchStep, StepContext};
use rand::RngCore;

#[derive(Debug, Clone, PartialEq)]
struct Ticker {
    idx: u64,
}

#[derive(Debug)]
struct AdvanceTo {
    from: u64,
    to: u64,
}

impl Move<Ticker> for AdvanceTo {
    fn apply(&self, sol: &mut Ticker) {
        sol.idx = self.to;
    }

    fn undo(&self, sol: &mut Ticker) {
        sol.idx = self.from;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Hands out one move per call, advancing a counter that is independent of
/// whether the previous move was accepted: calls 3k and 3k+1 always
/// improve on the last *accepted* value, call 3k+2 always worsens.
struct CyclicNeighbourhood {
    next: AtomicU64,
}

/// `idx == 0` is the untouched initial solution, scored 0. Indices
/// `1..=30` are the 30 proposed moves: `(idx-1) % 3 == 2` always worsens
/// relative to the last *accepted* index, the other two positions in each
/// triplet always improve on it.
fn score(idx: u64) -> f64 {
    if idx == 0 {
        return 0.0;
    }
    let m = idx - 1;
    if m % 3 == 2 {
        -1_000_000.0
    } else {
        let k = m / 3;
        let p = m % 3;
        (2 * k + p + 1) as f64
    }
}

impl Neighbourhood<Ticker> for CyclicNeighbourhood {
    fn get_random_move(&self, sol: &Ticker, _rng: &mut dyn RngCore) -> Option<Box<dyn Move<Ticker>>> {
        let to = self.next.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(AdvanceTo { from: sol.idx, to }))
    }

    fn get_all_moves(&self, sol: &Ticker) -> Vec<Box<dyn Move<Ticker>>> {
        self.get_random_move(sol, &mut rand::rng()).into_iter().collect()
    }
}

struct TickerObjective;

impl heurist_core::Objective<Ticker, ()> for TickerObjective {
    fn evaluate(&self, sol: &Ticker, _data: &()) -> Box<dyn Evaluation> {
        Box::new(SimpleEvaluation(score(sol.idx)))
    }
}

/// Random descent's exact step logic, capped at a fixed number of calls so
/// the engine's background poller (which samples stop criteria only
/// periodically, not after every step) can't let the run overshoot.
struct BoundedRandomDescent<S: Solution> {
    neighbourhood: Box<dyn Neighbourhood<S>>,
    remaining: u64,
}

impl<S: Solution, D> SearchStep<S, D> for BoundedRandomDescent<S> {
    fn step(&mut self, ctx: &mut StepContext<'_, S, D>) {
        if self.remaining == 0 {
            ctx.request_stop();
            return;
        }
        self.remaining -= 1;
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
        if self.remaining == 0 {
            ctx.request_stop();
        }
    }
}

#[test]
fn thirty_moves_split_twenty_accepted_ten_rejected() {
    let problem = Problem::new(Box::new(TickerObjective), (), Box::new(|_rng: &mut dyn RngCore| Ticker { idx: 0 }), false);
    let step = BoundedRandomDescent {
        neighbourhood: Box::new(CyclicNeighbourhood { next: AtomicU64::new(1) }),
        remaining: 30,
    };
    let mut search = Search::new("cyclic", problem, Box::new(step), Duration::from_millis(1)).unwrap();
    search.start().unwrap();
    search.join().unwrap();

    let metrics = search.metrics();
    assert_eq!(metrics.steps, 30);
    assert_eq!(metrics.accepted, 20);
    assert_eq!(metrics.rejected, 10);
}
