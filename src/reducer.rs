//! The reducer (§4.G): deterministic unit-propagation + subset inference
//! over active cells flagged `TO_REDUCE`.
//!
//! Grounded on the teacher's `apply_basic_rules` (R1/R2: "all hidden are
//! mines" / "all hidden are safe") and `apply_subset_logic` (R3: pairwise
//! subset elimination via `HashSet::is_subset`) in `solver.rs`, generalized
//! from a fixed `width * height` grid to the sparse coordinate space and
//! re-expressed against [`crate::frontier::FrontierView`] instead of raw
//! `VisibleGrid`/`Flags`.

use std::collections::{HashMap, HashSet};

use crate::cell::{ActiveFocus, Coord, Upsert};
use crate::frontier::{FrontierFilter, FrontierView};
use crate::storage::StorageSnapshot;

#[derive(Debug, Clone)]
struct Constraint {
    unknowns: HashSet<Coord>,
    effective_value: i32,
}

pub struct ReducerOutput {
    pub safe: HashSet<Coord>,
    pub flag: HashSet<Coord>,
    /// Active coordinates the reducer processed this pass (input pool).
    pub reduced_actives: HashSet<Coord>,
    /// Demotes every processed active to `active_focus = REDUCED`.
    pub upsert: Upsert,
}

/// Run R1 (trivial-zero), R2 (trivial-full), and R3 (subset inference) to
/// a fixed point over every `ACTIVE` cell with `active_focus = TO_REDUCE`.
pub fn reduce(snapshot: &StorageSnapshot) -> ReducerOutput {
    let view = FrontierView::build(snapshot, FrontierFilter::All);

    let mut pool: HashMap<Coord, Constraint> = HashMap::new();
    for &coord in snapshot.active_set() {
        let Some(cell) = snapshot.cell(coord) else { continue };
        if cell.active_focus != Some(ActiveFocus::ToReduce) {
            continue;
        }
        let unknowns: HashSet<Coord> = view.unknown_neighbors(coord).into_iter().collect();
        let effective_value = view.effective_value(coord);
        pool.insert(coord, Constraint { unknowns, effective_value });
    }

    let reduced_actives: HashSet<Coord> = pool.keys().copied().collect();
    let mut safe: HashSet<Coord> = HashSet::new();
    let mut flag: HashSet<Coord> = HashSet::new();

    loop {
        let mut pass_changed = apply_trivial_rules(&pool, &mut safe, &mut flag);
        if pass_changed {
            apply_decisions(&mut pool, &safe, &flag);
        }

        if apply_subset_rule(&pool, &mut safe, &mut flag) {
            apply_decisions(&mut pool, &safe, &flag);
            pass_changed = true;
        }

        if !pass_changed {
            break;
        }
    }

    let mut upsert = Upsert::new();
    for &coord in &reduced_actives {
        if let Some(cell) = snapshot.cell(coord) {
            upsert.write(
                coord,
                crate::cell::Cell {
                    active_focus: Some(ActiveFocus::Reduced),
                    ..*cell
                },
            );
        }
    }

    ReducerOutput { safe, flag, reduced_actives, upsert }
}

/// R1/R2 to a fixed point: returns whether anything new was decided.
fn apply_trivial_rules(
    pool: &HashMap<Coord, Constraint>,
    safe: &mut HashSet<Coord>,
    flag: &mut HashSet<Coord>,
) -> bool {
    let mut changed = false;
    for constraint in pool.values() {
        if constraint.unknowns.is_empty() {
            continue;
        }
        if constraint.effective_value == 0 {
            for &u in &constraint.unknowns {
                if safe.insert(u) {
                    changed = true;
                }
            }
        } else if constraint.effective_value as usize == constraint.unknowns.len() {
            for &u in &constraint.unknowns {
                if flag.insert(u) {
                    changed = true;
                }
            }
        }
    }
    changed
}

/// R3: for active pairs sharing an unknown, check strict-or-equal subset
/// inclusion and deduce the difference set. Pairs are enumerated only
/// among actives sharing ≥1 unknown neighbor via a reverse index
/// (`unknown_coord -> actives_touching_it`), per §4.G "Pairing efficiency".
fn apply_subset_rule(
    pool: &HashMap<Coord, Constraint>,
    safe: &mut HashSet<Coord>,
    flag: &mut HashSet<Coord>,
) -> bool {
    let mut reverse_index: HashMap<Coord, Vec<Coord>> = HashMap::new();
    for (&coord, constraint) in pool {
        for &u in &constraint.unknowns {
            reverse_index.entry(u).or_default().push(coord);
        }
    }

    let mut candidate_pairs: HashSet<(Coord, Coord)> = HashSet::new();
    for actives in reverse_index.values() {
        for i in 0..actives.len() {
            for j in 0..actives.len() {
                if i != j {
                    candidate_pairs.insert((actives[i], actives[j]));
                }
            }
        }
    }

    let mut changed = false;
    for (a, b) in candidate_pairs {
        let (Some(ca), Some(cb)) = (pool.get(&a), pool.get(&b)) else { continue };
        if ca.unknowns.is_empty() || cb.unknowns.is_empty() {
            continue;
        }
        if !ca.unknowns.is_subset(&cb.unknowns) {
            continue;
        }
        let diff: HashSet<Coord> = cb.unknowns.difference(&ca.unknowns).copied().collect();
        if diff.is_empty() {
            continue;
        }
        let k = cb.effective_value - ca.effective_value;
        if k == 0 {
            for &d in &diff {
                if safe.insert(d) {
                    changed = true;
                }
            }
        } else if k == diff.len() as i32 {
            for &d in &diff {
                if flag.insert(d) {
                    changed = true;
                }
            }
        }
    }
    changed
}

/// Remove decided coordinates from every constraint's unknown set;
/// decrement `effective_value` by one per flagged removal.
fn apply_decisions(pool: &mut HashMap<Coord, Constraint>, safe: &HashSet<Coord>, flag: &HashSet<Coord>) {
    for constraint in pool.values_mut() {
        constraint.unknowns.retain(|u| {
            if flag.contains(u) {
                constraint_effective_value_decrement(&mut constraint.effective_value);
                false
            } else {
                !safe.contains(u)
            }
        });
    }
}

fn constraint_effective_value_decrement(value: &mut i32) {
    *value -= 1;
}
