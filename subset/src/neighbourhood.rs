//! Subset neighbourhoods: candidate generation for addition, deletion,
//! swap and k-disjoint-swap moves, all respecting a configurable set of
//! fixed IDs that are never moved.

use std::collections::BTreeSet;

use heurist_core::{ConfigError, Move, Neighbourhood};
use rand::seq::IteratorRandom;
use rand::RngCore;

use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;

/// Shared configuration and candidate-filtering logic for every subset
/// neighbourhood: IDs in `fixed` are never added, removed or swapped.
pub trait SubsetNeighbourhood: Neighbourhood<SubsetSolution> {
    fn fixed_ids(&self) -> &BTreeSet<i64>;

    fn get_add_candidates(&self, sol: &SubsetSolution) -> BTreeSet<i64> {
        sol.unselected().difference(self.fixed_ids()).copied().collect()
    }

    fn get_remove_candidates(&self, sol: &SubsetSolution) -> BTreeSet<i64> {
        sol.selected().difference(self.fixed_ids()).copied().collect()
    }
}

fn validate_fixed_ids(universe: &BTreeSet<i64>, fixed: &BTreeSet<i64>) -> Result<(), ConfigError> {
    for id in fixed {
        if !universe.contains(id) {
            return Err(ConfigError::FixedIdNotInUniverse(*id));
        }
    }
    Ok(())
}

/// Generates [`SubsetMove::Addition`] moves: one unselected, non-fixed ID.
#[derive(Debug)]
pub struct SingleAdditionNeighbourhood {
    fixed: BTreeSet<i64>,
}

impl SingleAdditionNeighbourhood {
    pub fn new(universe: &BTreeSet<i64>, fixed: impl IntoIterator<Item = i64>) -> Result<Self, ConfigError> {
        let fixed: BTreeSet<i64> = fixed.into_iter().collect();
        validate_fixed_ids(universe, &fixed)?;
        Ok(Self { fixed })
    }
}

impl SubsetNeighbourhood for SingleAdditionNeighbourhood {
    fn fixed_ids(&self) -> &BTreeSet<i64> {
        &self.fixed
    }
}

impl Neighbourhood<SubsetSolution> for SingleAdditionNeighbourhood {
    fn get_random_move(&self, sol: &SubsetSolution, rng: &mut dyn RngCore) -> Option<Box<dyn Move<SubsetSolution>>> {
        let added = self.get_add_candidates(sol).into_iter().choose(rng)?;
        Some(Box::new(SubsetMove::Addition { added }))
    }

    fn get_all_moves(&self, sol: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        self.get_add_candidates(sol)
            .into_iter()
            .map(|added| Box::new(SubsetMove::Addition { added }) as Box<dyn Move<SubsetSolution>>)
            .collect()
    }
}

/// Generates [`SubsetMove::Deletion`] moves: one selected, non-fixed ID.
#[derive(Debug)]
pub struct SingleDeletionNeighbourhood {
    fixed: BTreeSet<i64>,
}

impl SingleDeletionNeighbourhood {
    pub fn new(universe: &BTreeSet<i64>, fixed: impl IntoIterator<Item = i64>) -> Result<Self, ConfigError> {
        let fixed: BTreeSet<i64> = fixed.into_iter().collect();
        validate_fixed_ids(universe, &fixed)?;
        Ok(Self { fixed })
    }
}

impl SubsetNeighbourhood for SingleDeletionNeighbourhood {
    fn fixed_ids(&self) -> &BTreeSet<i64> {
        &self.fixed
    }
}

impl Neighbourhood<SubsetSolution> for SingleDeletionNeighbourhood {
    fn get_random_move(&self, sol: &SubsetSolution, rng: &mut dyn RngCore) -> Option<Box<dyn Move<SubsetSolution>>> {
        let deleted = self.get_remove_candidates(sol).into_iter().choose(rng)?;
        Some(Box::new(SubsetMove::Deletion { deleted }))
    }

    fn get_all_moves(&self, sol: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        self.get_remove_candidates(sol)
            .into_iter()
            .map(|deleted| Box::new(SubsetMove::Deletion { deleted }) as Box<dyn Move<SubsetSolution>>)
            .collect()
    }
}

/// Generates [`SubsetMove::Swap`] moves: one addition paired with one
/// deletion, independently chosen.
#[derive(Debug)]
pub struct SingleSwapNeighbourhood {
    fixed: BTreeSet<i64>,
}

impl SingleSwapNeighbourhood {
    pub fn new(universe: &BTreeSet<i64>, fixed: impl IntoIterator<Item = i64>) -> Result<Self, ConfigError> {
        let fixed: BTreeSet<i64> = fixed.into_iter().collect();
        validate_fixed_ids(universe, &fixed)?;
        Ok(Self { fixed })
    }
}

impl SubsetNeighbourhood for SingleSwapNeighbourhood {
    fn fixed_ids(&self) -> &BTreeSet<i64> {
        &self.fixed
    }
}

impl Neighbourhood<SubsetSolution> for SingleSwapNeighbourhood {
    fn get_random_move(&self, sol: &SubsetSolution, rng: &mut dyn RngCore) -> Option<Box<dyn Move<SubsetSolution>>> {
        let added = self.get_add_candidates(sol).into_iter().choose(rng)?;
        let deleted = self.get_remove_candidates(sol).into_iter().choose(rng)?;
        Some(Box::new(SubsetMove::Swap { added, deleted }))
    }

    fn get_all_moves(&self, sol: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        let adds = self.get_add_candidates(sol);
        let dels = self.get_remove_candidates(sol);
        let mut moves = Vec::with_capacity(adds.len() * dels.len());
        for &added in &adds {
            for &deleted in &dels {
                moves.push(Box::new(SubsetMove::Swap { added, deleted }) as Box<dyn Move<SubsetSolution>>);
            }
        }
        moves
    }
}

/// Generates [`SubsetMove::DisjointMultiSwap`] moves: `k` added IDs
/// disjoint from `k` deleted IDs.
#[derive(Debug)]
pub struct DisjointMultiSwapNeighbourhood {
    fixed: BTreeSet<i64>,
    k: usize,
}

impl DisjointMultiSwapNeighbourhood {
    pub fn new(universe: &BTreeSet<i64>, fixed: impl IntoIterator<Item = i64>, k: usize) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::InvalidArgument(
                "DisjointMultiSwapNeighbourhood requires k >= 1".to_string(),
            ));
        }
        let fixed: BTreeSet<i64> = fixed.into_iter().collect();
        validate_fixed_ids(universe, &fixed)?;
        Ok(Self { fixed, k })
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl SubsetNeighbourhood for DisjointMultiSwapNeighbourhood {
    fn fixed_ids(&self) -> &BTreeSet<i64> {
        &self.fixed
    }
}

/// All `k`-element subsets of `items`, in lexicographic order of the
/// (already sorted) input.
fn combinations(items: &[i64], k: usize) -> Vec<BTreeSet<i64>> {
    if k == 0 || k > items.len() {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i]).collect());
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if indices[i] != i + items.len() - k {
                break;
            }
            if i == 0 {
                return result;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

impl Neighbourhood<SubsetSolution> for DisjointMultiSwapNeighbourhood {
    fn get_random_move(&self, sol: &SubsetSolution, rng: &mut dyn RngCore) -> Option<Box<dyn Move<SubsetSolution>>> {
        let adds = self.get_add_candidates(sol);
        let dels = self.get_remove_candidates(sol);
        if adds.len() < self.k || dels.len() < self.k {
            return None;
        }
        let added: BTreeSet<i64> = adds.into_iter().choose_multiple(rng, self.k).into_iter().collect();
        let deleted: BTreeSet<i64> = dels.into_iter().choose_multiple(rng, self.k).into_iter().collect();
        Some(Box::new(SubsetMove::DisjointMultiSwap { added, deleted }))
    }

    fn get_all_moves(&self, sol: &SubsetSolution) -> Vec<Box<dyn Move<SubsetSolution>>> {
        let adds: Vec<i64> = self.get_add_candidates(sol).into_iter().collect();
        let dels: Vec<i64> = self.get_remove_candidates(sol).into_iter().collect();
        let add_combos = combinations(&adds, self.k);
        let del_combos = combinations(&dels, self.k);
        let mut moves = Vec::with_capacity(add_combos.len() * del_combos.len());
        for added in &add_combos {
            for deleted in &del_combos {
                moves.push(Box::new(SubsetMove::DisjointMultiSwap {
                    added: added.clone(),
                    deleted: deleted.clone(),
                }) as Box<dyn Move<SubsetSolution>>);
            }
        }
        moves
    }
}
