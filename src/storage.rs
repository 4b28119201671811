//! The storage component (§4.B): a sparse cell map, five derived index
//! sets, and unconditional invariant enforcement on every write.
//!
//! Grounded on the teacher's flat `Grid`/`Mines`/`Flags` types in spirit
//! (small owned containers with plain `get`/`set` accessors) but backed by
//! `HashMap`/`HashSet` instead of a flat `Vec`, since the grid here has no
//! fixed extent — cells exist only where the board has been observed.

use std::collections::{HashMap, HashSet};

use crate::cell::{ActiveFocus, Cell, Coord, FrontierFocus, LogicalState, SolverStatus, Upsert};
use crate::error::InvariantViolation;
use crate::neighbors::neighbors;

/// The value-typed, immutable state a snapshot exposes: the cell map plus
/// the five sets of §3.3. Safe to clone and hold between iterations — no
/// external component may write through it (mutation is crate-private,
/// exercised only by [`Storage`] and the pipeline orchestrator's runtime
/// copy).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageSnapshot {
    cells: HashMap<Coord, Cell>,
    known_set: HashSet<Coord>,
    revealed_set: HashSet<Coord>,
    active_set: HashSet<Coord>,
    frontier_set: HashSet<Coord>,
    to_visualize_set: HashSet<Coord>,
}

impl StorageSnapshot {
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn known_set(&self) -> &HashSet<Coord> {
        &self.known_set
    }

    pub fn revealed_set(&self) -> &HashSet<Coord> {
        &self.revealed_set
    }

    pub fn active_set(&self) -> &HashSet<Coord> {
        &self.active_set
    }

    pub fn frontier_set(&self) -> &HashSet<Coord> {
        &self.frontier_set
    }

    pub fn to_visualize_set(&self) -> &HashSet<Coord> {
        &self.to_visualize_set
    }

    /// Bounded-region cell enumerator: every known coordinate within
    /// `[min, max]` inclusive on both axes.
    pub fn cells_in_region(&self, min: Coord, max: Coord) -> Vec<Coord> {
        self.known_set
            .iter()
            .copied()
            .filter(|&(x, y)| x >= min.0 && x <= max.0 && y >= min.1 && y <= max.1)
            .collect()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn known_cells(&self) -> impl Iterator<Item = (&Coord, &Cell)> {
        self.cells.iter()
    }

    /// Validate + write + recompute, scoped to the touched region only
    /// (§4.B "Recompute policy"). Used both by [`Storage::apply_upsert`]
    /// (the single committed writer) and by the pipeline orchestrator's
    /// private runtime copy, which calls this directly once per phase.
    pub(crate) fn apply(&mut self, upsert: &Upsert) {
        for (&coord, cell) in &upsert.cells {
            if let Err(violation) = validate_cell(coord, cell) {
                panic!("storage invariant violation: {violation}");
            }
        }

        for (&coord, &cell) in &upsert.cells {
            self.cells.insert(coord, cell);
        }

        for &coord in &upsert.to_visualize.add {
            self.to_visualize_set.insert(coord);
        }
        for &coord in &upsert.to_visualize.remove {
            // Unknown coordinate in remove is silently ignored (§4.B).
            self.to_visualize_set.remove(&coord);
        }

        let mut touched: HashSet<Coord> = HashSet::new();
        for &coord in upsert.cells.keys() {
            touched.insert(coord);
            for n in neighbors(coord) {
                touched.insert(n);
            }
        }
        for &coord in upsert.to_visualize.add.iter().chain(&upsert.to_visualize.remove) {
            touched.insert(coord);
        }

        for coord in touched {
            self.recompute_derived_sets(coord);
        }
    }

    fn recompute_derived_sets(&mut self, coord: Coord) {
        match self.cells.get(&coord) {
            None => {
                self.known_set.remove(&coord);
                self.revealed_set.remove(&coord);
                self.active_set.remove(&coord);
                self.frontier_set.remove(&coord);
            }
            Some(cell) => {
                let is_known = !matches!(cell.solver_status, SolverStatus::None | SolverStatus::OutOfScope);
                set_membership(&mut self.known_set, coord, is_known);

                let is_revealed = matches!(
                    cell.logical_state,
                    LogicalState::OpenNumber | LogicalState::Empty | LogicalState::ConfirmedMine
                );
                set_membership(&mut self.revealed_set, coord, is_revealed);

                let is_frontier = cell.solver_status == SolverStatus::Frontier;
                set_membership(&mut self.frontier_set, coord, is_frontier);

                let is_active =
                    cell.solver_status == SolverStatus::Active && !self.to_visualize_set.contains(&coord);
                set_membership(&mut self.active_set, coord, is_active);
            }
        }
    }
}

fn set_membership(set: &mut HashSet<Coord>, coord: Coord, present: bool) {
    if present {
        set.insert(coord);
    } else {
        set.remove(&coord);
    }
}

fn validate_cell(coord: Coord, cell: &Cell) -> Result<(), InvariantViolation> {
    if cell.logical_state != LogicalState::OpenNumber && cell.number_value.is_some() {
        return Err(InvariantViolation::NumberValueOnNonNumber { coord });
    }

    match cell.solver_status {
        SolverStatus::Active => {
            if !matches!(cell.active_focus, Some(ActiveFocus::ToReduce) | Some(ActiveFocus::Reduced))
                || cell.frontier_focus.is_some()
            {
                return Err(InvariantViolation::ActiveFocusMismatch { coord });
            }
        }
        SolverStatus::Frontier => {
            if !matches!(
                cell.frontier_focus,
                Some(FrontierFocus::ToProcess) | Some(FrontierFocus::Processed)
            ) || cell.active_focus.is_some()
            {
                return Err(InvariantViolation::FrontierFocusMismatch { coord });
            }
        }
        _ => {
            if cell.active_focus.is_some() || cell.frontier_focus.is_some() {
                return Err(InvariantViolation::StrayFocus { coord });
            }
        }
    }

    Ok(())
}

/// The storage component: exclusive owner of the cell map and the five
/// sets. Single-writer — only [`Storage::apply_upsert`] mutates it.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    state: StorageSnapshot,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically write cells, validate invariants, apply `to_visualize_set`
    /// ops, and recompute the touched region's derived sets (§4.B).
    ///
    /// # Panics
    /// Panics if any written cell violates an invariant from §3.4 — this
    /// is a programming error, not a data condition (§7).
    pub fn apply_upsert(&mut self, upsert: Upsert) {
        self.state.apply(&upsert);
    }

    /// A read-only, value-typed view of the current state.
    pub fn snapshot(&self) -> StorageSnapshot {
        self.state.clone()
    }

    /// The 8 coordinates surrounding `(x, y)` (§4.B `neighbors(x, y)`).
    /// Callers filter by `known_set` membership as needed.
    pub fn neighbors(&self, coord: Coord) -> [Coord; 8] {
        neighbors(coord)
    }

    /// Replace the committed state wholesale with a runtime snapshot the
    /// pipeline orchestrator built up across one iteration's phases. Used
    /// instead of one `apply_upsert` per phase so storage's invariant
    /// checks and derived-set recompute already ran while the orchestrator
    /// was working; this just publishes the final result.
    pub(crate) fn replace_snapshot(&mut self, snapshot: StorageSnapshot) {
        self.state = snapshot;
    }
}
