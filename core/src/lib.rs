//! Problem model for the metaheuristic search engine: solutions, moves,
//! evaluation/validation outcomes, objectives, constraints and the
//! [`Problem`] that composes them.

pub mod constraint;
pub mod error;
pub mod evaluation;
pub mod neighbourhood;
pub mod objective;
pub mod problem;
pub mod solution;
pub mod validation;

pub use constraint::{Constraint, PenalizingConstraint};
pub use error::{ConfigError, IncompatibleDeltaError, SearchError, SolutionModificationError};
pub use evaluation::{Evaluation, PenalizedEvaluation, SimpleEvaluation};
pub use neighbourhood::Neighbourhood;
pub use objective::{MinMax, Objective};
pub use problem::{Problem, ProblemValidation};
pub use solution::{Move, Solution};
pub use validation::{PenalizingValidation, SimpleValidation, Validation};
