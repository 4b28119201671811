//! The action mapper (§4.J): turns decided coordinates into an ordered
//! decision batch, plus the upsert that commits those decisions into
//! storage (flags become confirmed mines; safe/guess cells move to
//! `TO_VISUALIZE` so the next observation batch can reveal them).

use std::collections::HashSet;

use crate::cell::{ActionKind, Cell, Coord, LogicalState, SolverStatus, Upsert};
use crate::storage::StorageSnapshot;

/// Build the ordered action batch and its storage upsert: every `FLAG`
/// first, then every `SAFE`, then at most one `GUESS` — each group sorted
/// lexicographically by coordinate for deterministic output.
pub fn map_actions(
    safe: &HashSet<Coord>,
    flag: &HashSet<Coord>,
    guess: Option<Coord>,
    snapshot: &StorageSnapshot,
) -> (Vec<crate::cell::Action>, Upsert) {
    let mut actions = Vec::new();
    let mut upsert = Upsert::new();

    let mut flags: Vec<Coord> = flag.iter().copied().collect();
    flags.sort();
    for coord in flags {
        actions.push(crate::cell::Action { kind: ActionKind::Flag, coord });
        if let Some(cell) = snapshot.cell(coord) {
            upsert.write(
                coord,
                Cell {
                    logical_state: LogicalState::ConfirmedMine,
                    solver_status: SolverStatus::Mine,
                    active_focus: None,
                    frontier_focus: None,
                    ..*cell
                },
            );
        }
    }

    let mut safes: Vec<Coord> = safe.iter().copied().collect();
    safes.sort();
    for coord in safes {
        actions.push(crate::cell::Action { kind: ActionKind::Safe, coord });
        write_to_visualize(&mut upsert, snapshot, coord);
    }

    if let Some(coord) = guess {
        actions.push(crate::cell::Action { kind: ActionKind::Guess, coord });
        write_to_visualize(&mut upsert, snapshot, coord);
    }

    (actions, upsert)
}

fn write_to_visualize(upsert: &mut Upsert, snapshot: &StorageSnapshot, coord: Coord) {
    if let Some(cell) = snapshot.cell(coord) {
        upsert.write(
            coord,
            Cell {
                solver_status: SolverStatus::ToVisualize,
                active_focus: None,
                frontier_focus: None,
                ..*cell
            },
        );
    }
    upsert.add_to_visualize(coord);
}

/// Pick the lowest non-zero mine-probability cell across every component,
/// lexicographic coordinate tie-break. `None` if no candidate exists.
pub fn pick_guess(probabilities: &std::collections::HashMap<Coord, f64>) -> Option<Coord> {
    probabilities
        .iter()
        .min_by(|(coord_a, prob_a), (coord_b, prob_b)| {
            prob_a
                .partial_cmp(prob_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(coord_a.cmp(coord_b))
        })
        .map(|(&coord, _)| coord)
}
