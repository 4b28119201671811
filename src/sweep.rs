//! Sweep (§4.K): a bonus pass that turns already-decided numbers into more
//! `SAFE` actions for free, without touching storage. Gated by
//! `SolverConfig::enable_sweep`.
//!
//! Grounded on the teacher's end-game "chord"/auto-reveal shortcut in
//! `solver.rs`, which re-clicks a satisfied number to open its remaining
//! neighbors in one move instead of waiting for the next reduce pass.

use std::collections::HashSet;

use crate::cell::Coord;
use crate::frontier::FrontierView;
use crate::storage::StorageSnapshot;

/// For every `ACTIVE` 8-neighbor of a `TO_VISUALIZE` cell whose
/// `effective_value > 0`, emit that neighbor's own coordinate as a bonus
/// `SAFE` action — re-clicking an already-satisfied number so the game
/// engine's chord behavior reveals its remaining neighbors for free.
/// Read-only: never writes to storage (§4.K).
pub fn sweep(snapshot: &StorageSnapshot, view: &FrontierView) -> HashSet<Coord> {
    let mut bonus = HashSet::new();

    for &to_visualize in snapshot.to_visualize_set() {
        for active in crate::neighbors::neighbors(to_visualize) {
            if !snapshot.active_set().contains(&active) {
                continue;
            }
            if view.effective_value(active) <= 0 {
                continue;
            }
            bonus.insert(active);
        }
    }

    bonus
}
