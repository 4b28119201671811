//! The frontier view (§4.F): projects a storage snapshot into a CSP-ready
//! read-only structure — frontier cells and the numeric constraints their
//! active neighbors induce on them.

use crate::cell::{Coord, FrontierFocus, SolverStatus};
use crate::neighbors::neighbors;
use crate::storage::StorageSnapshot;

/// Which frontier cells a view should expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierFilter {
    /// Every cell in `frontier_set`.
    All,
    /// Only cells with `frontier_focus = TO_PROCESS`.
    ToProcessOnly,
}

pub struct FrontierView<'a> {
    snapshot: &'a StorageSnapshot,
    frontier_cells: Vec<Coord>,
}

impl<'a> FrontierView<'a> {
    pub fn build(snapshot: &'a StorageSnapshot, filter: FrontierFilter) -> Self {
        let frontier_cells = snapshot
            .frontier_set()
            .iter()
            .copied()
            .filter(|&coord| match filter {
                FrontierFilter::All => true,
                FrontierFilter::ToProcessOnly => snapshot
                    .cell(coord)
                    .is_some_and(|c| c.frontier_focus == Some(FrontierFocus::ToProcess)),
            })
            .collect();

        Self { snapshot, frontier_cells }
    }

    pub fn frontier_cells(&self) -> &[Coord] {
        &self.frontier_cells
    }

    /// The 8-neighbors of `frontier_cell` with `solver_status = ACTIVE`.
    pub fn constraints_for(&self, frontier_cell: Coord) -> Vec<Coord> {
        neighbors(frontier_cell)
            .into_iter()
            .filter(|&n| self.snapshot.cell(n).is_some_and(|c| c.solver_status == SolverStatus::Active))
            .collect()
    }

    /// `number_value(a) - count(8-neighbors of a whose solver_status = MINE)`.
    pub fn effective_value(&self, active_cell: Coord) -> i32 {
        let Some(cell) = self.snapshot.cell(active_cell) else { return 0 };
        let mine_neighbors = neighbors(active_cell)
            .into_iter()
            .filter(|&n| self.snapshot.cell(n).is_some_and(|c| c.solver_status == SolverStatus::Mine))
            .count();
        cell.raw_number() as i32 - mine_neighbors as i32
    }

    /// 8-neighbors of `active_cell` that are `UNREVEALED` and not in
    /// `to_visualize_set`.
    pub fn unknown_neighbors(&self, active_cell: Coord) -> Vec<Coord> {
        neighbors(active_cell)
            .into_iter()
            .filter(|&n| {
                self.snapshot
                    .cell(n)
                    .is_some_and(|c| c.logical_state == crate::cell::LogicalState::Unrevealed)
                    && !self.snapshot.to_visualize_set().contains(&n)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{ActiveFocus, Cell, LogicalState, RawState, SolverStatus, Upsert};
    use crate::storage::Storage;

    fn active(value: u8) -> Cell {
        Cell {
            raw_state: RawState::Number1,
            logical_state: LogicalState::OpenNumber,
            number_value: Some(value),
            solver_status: SolverStatus::Active,
            active_focus: Some(ActiveFocus::ToReduce),
            frontier_focus: None,
        }
    }

    fn unrevealed() -> Cell {
        Cell::fresh()
    }

    #[test]
    fn effective_value_subtracts_confirmed_mines() {
        let mut storage = Storage::new();
        let mut seed = Upsert::new();
        seed.write((0, 0), active(2));
        seed.write(
            (1, 0),
            Cell {
                raw_state: RawState::Flag,
                logical_state: LogicalState::ConfirmedMine,
                number_value: None,
                solver_status: SolverStatus::Mine,
                active_focus: None,
                frontier_focus: None,
            },
        );
        storage.apply_upsert(seed);

        let snap = storage.snapshot();
        let view = FrontierView::build(&snap, FrontierFilter::All);
        assert_eq!(view.effective_value((0, 0)), 1);
    }

    #[test]
    fn unknown_neighbors_excludes_to_visualize_members() {
        let mut storage = Storage::new();
        let mut seed = Upsert::new();
        seed.write((0, 0), active(1));
        seed.write((1, 0), unrevealed());
        seed.write((1, 1), unrevealed());
        seed.add_to_visualize((1, 1));
        storage.apply_upsert(seed);

        let snap = storage.snapshot();
        let view = FrontierView::build(&snap, FrontierFilter::All);
        let unknowns = view.unknown_neighbors((0, 0));
        assert!(unknowns.contains(&(1, 0)));
        assert!(!unknowns.contains(&(1, 1)));
    }

    #[test]
    fn constraints_for_returns_only_active_neighbors() {
        let mut storage = Storage::new();
        let mut seed = Upsert::new();
        seed.write((0, 0), active(1));
        seed.write(
            (1, 0),
            Cell {
                solver_status: SolverStatus::Frontier,
                frontier_focus: Some(FrontierFocus::ToProcess),
                ..unrevealed()
            },
        );
        storage.apply_upsert(seed);

        let snap = storage.snapshot();
        let view = FrontierView::build(&snap, FrontierFilter::All);
        assert_eq!(view.constraints_for((1, 0)), vec![(0, 0)]);
    }
}
