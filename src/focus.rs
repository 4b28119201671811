//! The focus actualizer (§4.E): a stateless "wake up" of neighbor cells
//! after a topology change. Whenever a cell's topology changes, its
//! neighborhood's prior inference may have gone stale; repromoting their
//! focus forces the reducer/CSP to revisit them on the next pass.

use crate::cell::{ActiveFocus, Coord, FrontierFocus, SolverStatus, Upsert};
use crate::neighbors::neighbors;
use crate::storage::StorageSnapshot;

/// For every 8-neighbor of any coordinate in `changed`, repromote a
/// `REDUCED` active cell to `TO_REDUCE` or a `PROCESSED` frontier cell to
/// `TO_PROCESS`. Same inputs always produce the same output (stateless).
pub fn actualize(changed: &[Coord], snapshot: &StorageSnapshot) -> Upsert {
    let mut upsert = Upsert::new();
    let mut visited = std::collections::HashSet::new();

    for &coord in changed {
        for n in neighbors(coord) {
            if !visited.insert(n) {
                continue;
            }
            let Some(cell) = snapshot.cell(n) else { continue };

            if cell.solver_status == SolverStatus::Active && cell.active_focus == Some(ActiveFocus::Reduced) {
                upsert.write(
                    n,
                    crate::cell::Cell {
                        active_focus: Some(ActiveFocus::ToReduce),
                        ..*cell
                    },
                );
            } else if cell.solver_status == SolverStatus::Frontier
                && cell.frontier_focus == Some(FrontierFocus::Processed)
            {
                upsert.write(
                    n,
                    crate::cell::Cell {
                        frontier_focus: Some(FrontierFocus::ToProcess),
                        ..*cell
                    },
                );
            }
        }
    }

    upsert
}
