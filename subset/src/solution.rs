//! `SubsetSolution`: a bipartition of a fixed ID universe.

use std::collections::BTreeSet;
use std::sync::Arc;

use heurist_core::SolutionModificationError;

/// A solution that partitions a fixed universe of integer IDs into
/// `selected` and `unselected` sets.
///
/// The universe is shared (`Arc`) rather than cloned on every
/// `checkedCopy`, since it never changes across the lifetime of a search;
/// only the partition itself needs deep-copy independence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSolution {
    universe: Arc<BTreeSet<i64>>,
    selected: BTreeSet<i64>,
}

impl SubsetSolution {
    /// Build an empty solution (nothing selected) over `universe`.
    pub fn empty(universe: impl IntoIterator<Item = i64>) -> Self {
        let universe: BTreeSet<i64> = universe.into_iter().collect();
        Self {
            universe: Arc::new(universe),
            selected: BTreeSet::new(),
        }
    }

    /// Build a solution over `universe` with `initial_selection` selected.
    ///
    /// # Panics
    /// Panics if any initially-selected ID is not part of the universe —
    /// this is a contract violation, not a recoverable runtime condition.
    pub fn new(universe: impl IntoIterator<Item = i64>, initial_selection: impl IntoIterator<Item = i64>) -> Self {
        let universe: BTreeSet<i64> = universe.into_iter().collect();
        let selected: BTreeSet<i64> = initial_selection.into_iter().collect();
        assert!(
            selected.is_subset(&universe),
            "initial selection must be a subset of the universe"
        );
        Self {
            universe: Arc::new(universe),
            selected,
        }
    }

    pub fn universe(&self) -> &BTreeSet<i64> {
        &self.universe
    }

    pub fn selected(&self) -> &BTreeSet<i64> {
        &self.selected
    }

    pub fn unselected(&self) -> BTreeSet<i64> {
        self.universe.difference(&self.selected).copied().collect()
    }

    pub fn size(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    /// Select `id`. `id` must be part of the universe and currently
    /// unselected.
    pub fn select(&mut self, id: i64) -> Result<(), SolutionModificationError<SubsetSolution>> {
        if !self.universe.contains(&id) {
            return Err(SolutionModificationError::new(
                format!("id {id} is not part of the universe"),
                self.clone(),
            ));
        }
        if !self.selected.insert(id) {
            return Err(SolutionModificationError::new(
                format!("id {id} is already selected"),
                self.clone(),
            ));
        }
        Ok(())
    }

    /// Deselect `id`. `id` must be currently selected.
    pub fn deselect(&mut self, id: i64) -> Result<(), SolutionModificationError<SubsetSolution>> {
        if !self.selected.remove(&id) {
            return Err(SolutionModificationError::new(
                format!("id {id} is not currently selected"),
                self.clone(),
            ));
        }
        Ok(())
    }

    /// Select every ID in `ids`, stopping at the first that is already
    /// selected or outside the universe.
    pub fn select_all(
        &mut self,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<(), SolutionModificationError<SubsetSolution>> {
        for id in ids {
            self.select(id)?;
        }
        Ok(())
    }

    /// Deselect every ID in `ids`, stopping at the first that is not
    /// currently selected.
    pub fn deselect_all(
        &mut self,
        ids: impl IntoIterator<Item = i64>,
    ) -> Result<(), SolutionModificationError<SubsetSolution>> {
        for id in ids {
            self.deselect(id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_invariant_holds() {
        let sol = SubsetSolution::new(0..10, [1, 2, 3]);
        let unselected = sol.unselected();
        assert!(sol.selected().is_disjoint(&unselected));
        let union: BTreeSet<i64> = sol.selected().union(&unselected).copied().collect();
        assert_eq!(&union, sol.universe());
    }

    #[test]
    fn select_then_deselect_round_trips() {
        let mut sol = SubsetSolution::new(0..5, []);
        sol.select(2).unwrap();
        assert!(sol.is_selected(2));
        sol.deselect(2).unwrap();
        assert!(!sol.is_selected(2));
        assert_eq!(sol.size(), 0);
    }

    #[test]
    fn deselecting_unselected_id_errors() {
        let mut sol = SubsetSolution::new(0..5, []);
        let err = sol.deselect(3).unwrap_err();
        assert!(err.reason.contains("not currently selected"));
    }

    #[test]
    fn deep_copy_is_independent() {
        let sol = SubsetSolution::new(0..5, [1]);
        let mut copy = sol.clone();
        copy.select(2).unwrap();
        assert!(!sol.is_selected(2));
        assert!(copy.is_selected(2));
    }
}
