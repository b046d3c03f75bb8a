//! The subset-partition solution domain: a bipartition of a fixed ID
//! universe into selected/unselected, its moves and its neighbourhoods.

pub mod moves;
pub mod neighbourhood;
pub mod solution;
pub mod validation;

pub use moves::SubsetMove;
pub use neighbourhood::{
    DisjointMultiSwapNeighbourhood, SingleAdditionNeighbourhood, SingleDeletionNeighbourhood,
    SingleSwapNeighbourhood, SubsetNeighbourhood,
};
pub use solution::SubsetSolution;
pub use validation::SubsetValidation;
