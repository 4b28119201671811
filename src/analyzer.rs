//! The state analyzer (§4.D): the sole authority for topological state.
//! Reclassifies `JUST_VISUALIZED` cells into `{ACTIVE, FRONTIER, SOLVED,
//! MINE}` (or leaves genuinely-unremarkable `UNREVEALED` cells at `NONE`)
//! and initializes their focus level. Vision never writes any other
//! `SolverStatus`; existing `ACTIVE`/`FRONTIER` cells keep their prior
//! focus — only newly classified cells get an initial one.

use crate::cell::{ActiveFocus, Cell, FrontierFocus, LogicalState, SolverStatus, Upsert};
use crate::neighbors::neighbors;
use crate::storage::StorageSnapshot;

/// Classify every `JUST_VISUALIZED` cell in `snapshot`, returning an
/// upsert that reclassifies exactly those cells. Cells in any other state
/// are left untouched (§4.D "other cells are not touched").
pub fn classify(snapshot: &StorageSnapshot) -> Upsert {
    let mut upsert = Upsert::new();

    let just_visualized: Vec<_> = snapshot
        .known_cells()
        .filter(|(_, cell)| cell.solver_status == SolverStatus::JustVisualized)
        .map(|(&coord, &cell)| (coord, cell))
        .collect();

    for (coord, cell) in just_visualized {
        let new_cell = classify_one(coord, cell, snapshot);
        upsert.write(coord, new_cell);
    }

    upsert
}

fn classify_one(coord: (i64, i64), cell: Cell, snapshot: &StorageSnapshot) -> Cell {
    match cell.logical_state {
        LogicalState::ConfirmedMine => Cell {
            solver_status: SolverStatus::Mine,
            active_focus: None,
            frontier_focus: None,
            ..cell
        },
        LogicalState::OpenNumber => {
            let has_unrevealed_neighbor = neighbors(coord).into_iter().any(|n| {
                snapshot
                    .cell(n)
                    .is_some_and(|c| c.logical_state == LogicalState::Unrevealed)
            });
            if has_unrevealed_neighbor {
                Cell {
                    solver_status: SolverStatus::Active,
                    active_focus: Some(ActiveFocus::ToReduce),
                    frontier_focus: None,
                    ..cell
                }
            } else {
                Cell {
                    solver_status: SolverStatus::Solved,
                    active_focus: None,
                    frontier_focus: None,
                    ..cell
                }
            }
        }
        LogicalState::Empty => Cell {
            solver_status: SolverStatus::Solved,
            active_focus: None,
            frontier_focus: None,
            ..cell
        },
        LogicalState::Unrevealed => {
            let has_active_neighbor = neighbors(coord).into_iter().any(|n| {
                snapshot
                    .cell(n)
                    .is_some_and(|c| c.solver_status == SolverStatus::Active)
            });
            if has_active_neighbor {
                Cell {
                    solver_status: SolverStatus::Frontier,
                    active_focus: None,
                    frontier_focus: Some(FrontierFocus::ToProcess),
                    ..cell
                }
            } else {
                Cell {
                    solver_status: SolverStatus::None,
                    active_focus: None,
                    frontier_focus: None,
                    ..cell
                }
            }
        }
    }
}
