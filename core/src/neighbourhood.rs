//! Generic neighbourhood abstraction: a thread-safe factory of moves over a
//! solution type, shared by every concrete domain and consumed generically
//! by the algorithm family (VND/VNS/RVNS iterate an ordered list of these).

use rand::RngCore;

use crate::solution::{Move, Solution};

/// A source of moves applicable to a given solution.
///
/// Implementations MUST be safe to call concurrently from independent
/// searches: they only read the solution handed to them, never mutate
/// shared state.
pub trait Neighbourhood<S: Solution>: Send + Sync {
    /// One uniformly-sampled legal move, or `None` if no move applies.
    fn get_random_move(&self, sol: &S, rng: &mut dyn RngCore) -> Option<Box<dyn Move<S>>>;

    /// Every legal move applicable to `sol`, in deterministic order.
    /// Empty if none apply.
    fn get_all_moves(&self, sol: &S) -> Vec<Box<dyn Move<S>>>;
}
