//! Local-search algorithm family: each type implements
//! [`heurist_engine::SearchStep`] and holds whatever per-run cursor state
//! it needs, driven by a [`heurist_engine::Search`].

pub mod random_descent;
pub mod rvns;
pub mod steepest_descent;
pub mod vnd;
pub mod vns;

pub use random_descent::RandomDescent;
pub use rvns::ReducedVariableNeighbourhoodSearch;
pub use steepest_descent::SteepestDescent;
pub use vnd::VariableNeighbourhoodDescent;
pub use vns::{LocalSearchFactory, VariableNeighbourhoodSearch};
