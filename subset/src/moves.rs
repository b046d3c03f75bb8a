//! `SubsetMove`: add/remove disjoint ID sets, with a single apply/undo
//! dispatch across the four shapes used by the subset neighbourhoods.

use std::collections::BTreeSet;

use heurist_core::Move;

use crate::solution::SubsetSolution;

/// A move over a [`SubsetSolution`]: a pair of disjoint ID sets to add and
/// remove. The variant only documents the shape candidate generators
/// produce; `apply`/`undo` dispatch identically regardless of variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetMove {
    Addition { added: i64 },
    Deletion { deleted: i64 },
    Swap { added: i64, deleted: i64 },
    DisjointMultiSwap { added: BTreeSet<i64>, deleted: BTreeSet<i64> },
}

impl SubsetMove {
    pub fn added(&self) -> BTreeSet<i64> {
        match self {
            SubsetMove::Addition { added } => BTreeSet::from([*added]),
            SubsetMove::Deletion { .. } => BTreeSet::new(),
            SubsetMove::Swap { added, .. } => BTreeSet::from([*added]),
            SubsetMove::DisjointMultiSwap { added, .. } => added.clone(),
        }
    }

    pub fn deleted(&self) -> BTreeSet<i64> {
        match self {
            SubsetMove::Addition { .. } => BTreeSet::new(),
            SubsetMove::Deletion { deleted } => BTreeSet::from([*deleted]),
            SubsetMove::Swap { deleted, .. } => BTreeSet::from([*deleted]),
            SubsetMove::DisjointMultiSwap { deleted, .. } => deleted.clone(),
        }
    }
}

impl Move<SubsetSolution> for SubsetMove {
    fn apply(&self, sol: &mut SubsetSolution) {
        match self {
            SubsetMove::Addition { added } => {
                sol.select(*added).expect("candidate generators only emit legal moves");
            }
            SubsetMove::Deletion { deleted } => {
                sol.deselect(*deleted).expect("candidate generators only emit legal moves");
            }
            SubsetMove::Swap { added, deleted } => {
                sol.deselect(*deleted).expect("candidate generators only emit legal moves");
                sol.select(*added).expect("candidate generators only emit legal moves");
            }
            SubsetMove::DisjointMultiSwap { added, deleted } => {
                sol.deselect_all(deleted.iter().copied())
                    .expect("candidate generators only emit legal moves");
                sol.select_all(added.iter().copied())
                    .expect("candidate generators only emit legal moves");
            }
        }
    }

    fn undo(&self, sol: &mut SubsetSolution) {
        match self {
            SubsetMove::Addition { added } => {
                sol.deselect(*added).expect("undo must mirror a prior apply");
            }
            SubsetMove::Deletion { deleted } => {
                sol.select(*deleted).expect("undo must mirror a prior apply");
            }
            SubsetMove::Swap { added, deleted } => {
                sol.deselect(*added).expect("undo must mirror a prior apply");
                sol.select(*deleted).expect("undo must mirror a prior apply");
            }
            SubsetMove::DisjointMultiSwap { added, deleted } => {
                sol.deselect_all(added.iter().copied())
                    .expect("undo must mirror a prior apply");
                sol.select_all(deleted.iter().copied())
                    .expect("undo must mirror a prior apply");
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_round_trips() {
        let mut sol = SubsetSolution::new(0..5, []);
        let original = sol.clone();
        let mv = SubsetMove::Addition { added: 2 };
        mv.apply(&mut sol);
        assert!(sol.is_selected(2));
        mv.undo(&mut sol);
        assert_eq!(sol, original);
    }

    #[test]
    fn swap_round_trips() {
        let mut sol = SubsetSolution::new(0..5, [1]);
        let original = sol.clone();
        let mv = SubsetMove::Swap { added: 2, deleted: 1 };
        mv.apply(&mut sol);
        assert!(sol.is_selected(2) && !sol.is_selected(1));
        mv.undo(&mut sol);
        assert_eq!(sol, original);
    }

    #[test]
    fn disjoint_multi_swap_round_trips() {
        let mut sol = SubsetSolution::new(0..10, [1, 2, 3]);
        let original = sol.clone();
        let mv = SubsetMove::DisjointMultiSwap {
            added: BTreeSet::from([4, 5]),
            deleted: BTreeSet::from([1, 2]),
        };
        mv.apply(&mut sol);
        assert_eq!(sol.selected(), &BTreeSet::from([3, 4, 5]));
        mv.undo(&mut sol);
        assert_eq!(sol, original);
    }
}
