//! The abstract `Solution` value every problem, move and search works over.

/// A candidate point in the search space.
///
/// A blanket bound rather than a bespoke trait: any type that can be
/// cheaply deep-copied (`Clone`), compared (`PartialEq`) and sent across
/// the search's worker/poller threads already satisfies the data model's
/// invariant that a copy is observationally independent from the original
/// on any subsequent move.
pub trait Solution: Clone + PartialEq + std::fmt::Debug + Send {}

impl<T> Solution for T where T: Clone + PartialEq + std::fmt::Debug + Send {}

/// An invertible mutation of a solution.
///
/// `apply` then `undo`, with no other mutation of `sol` in between, must be
/// the identity on `sol`.
pub trait Move<S: Solution>: Send + Sync {
    /// Mutate `sol` in place to reflect this move.
    fn apply(&self, sol: &mut S);

    /// Restore `sol` to its state immediately prior to `apply`, provided no
    /// other mutation occurred in between.
    fn undo(&self, sol: &mut S);

    /// Enables downcasting a boxed move back to its concrete type, used by
    /// domain-specific code and tests that need move-shape detail a
    /// generic `dyn Move` cannot expose.
    fn as_any(&self) -> &dyn std::any::Any;
}
