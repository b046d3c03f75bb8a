//! Canonical reference problems used by the workspace's integration
//! tests: a small catalogue of subset-selection problems with known
//! optima, playing the role a test-function catalogue plays for a
//! numerical optimiser.

pub mod subset_sum;

pub use subset_sum::{subset_sum_problem, SubsetSizeConstraint, SumOfScoresObjective};
