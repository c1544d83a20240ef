//! Searching a room for items.
//!
//! The reducer stays deterministic; the dice roll lives here, behind a
//! caller-supplied RNG, and only suggests an item. The caller decides whether
//! to dispatch `collect_item` with it.

use rand::seq::SliceRandom;
use rand::Rng;

use super::state::GameState;
use crate::puzzle::{Catalog, Item};

pub struct ItemFinder<R: Rng> {
    rng: R,
    chance: f64,
}

impl<R: Rng> ItemFinder<R> {
    /// `chance` is clamped to `[0, 1]`.
    pub fn new(rng: R, chance: f64) -> Self {
        let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
        Self { rng, chance }
    }

    /// Items that could still turn up: not held, and not meant for a puzzle
    /// that is already solved.
    pub fn candidates<'a>(catalog: &'a Catalog, state: &GameState) -> Vec<&'a Item> {
        catalog
            .items
            .iter()
            .filter(|item| !state.holds(&item.id))
            .filter(|item| {
                item.used_on
                    .as_deref()
                    .map_or(true, |puzzle_id| !state.is_puzzle_solved(puzzle_id))
            })
            .collect()
    }

    /// Roll once. `None` means the search turned up nothing.
    pub fn search(&mut self, catalog: &Catalog, state: &GameState) -> Option<Item> {
        let candidates = Self::candidates(catalog, state);
        if candidates.is_empty() || !self.rng.gen_bool(self.chance) {
            return None;
        }
        candidates.choose(&mut self.rng).map(|item| (*item).clone())
    }
}
