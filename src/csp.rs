//! The CSP enumerator (§4.I): exact backtracking on one bounded component.
//!
//! Grounded on the teacher's tank solver (`solver.rs`
//! `enumerate_configurations`/`analyze_configurations`), generalized from a
//! bitmask over `region.len() <= 20` variables to a `Vec<i8>` assignment
//! supporting the spec's larger default bound (`max_component_size = 50`)
//! and from implicit "all constraints checked at the end" to incremental
//! pruning during the search, per §4.I step 3.

use std::collections::{HashMap, HashSet};

use crate::cell::{ActiveFocus, Coord, FrontierFocus, Upsert};
use crate::frontier::FrontierView;
use crate::segmentation::Component;
use crate::storage::StorageSnapshot;

pub struct CspOutput {
    pub component_safe: HashSet<Coord>,
    pub component_flag: HashSet<Coord>,
    pub component_probabilities: HashMap<Coord, f64>,
    /// `true` if the component exceeded `max_component_size` and was
    /// skipped entirely (no exploration attempted).
    pub skipped: bool,
    /// `true` if enumeration found zero valid assignments — a data
    /// condition, not a crate bug (§7): upstream vision likely
    /// misclassified something feeding this component's constraints.
    pub contradictory: bool,
    /// Demotes this component's frontier to `PROCESSED` and its actually-
    /// constrained actives to `REDUCED` (an active with an unknown neighbor
    /// outside this component is left untouched — see `solve_component`).
    /// Empty when `skipped` or `contradictory` (§9 open question 1: an
    /// unresolved component is retried next iteration rather than marked
    /// processed).
    pub upsert: Upsert,
}

struct Constraint {
    vars: Vec<usize>,
    target: i32,
}

/// Exactly solve one component, bounded by `max_component_size`.
pub fn solve_component(
    component: &Component,
    view: &FrontierView,
    snapshot: &StorageSnapshot,
    max_component_size: usize,
) -> CspOutput {
    if component.frontier_cells.len() > max_component_size {
        return CspOutput {
            component_safe: HashSet::new(),
            component_flag: HashSet::new(),
            component_probabilities: HashMap::new(),
            skipped: true,
            contradictory: false,
            upsert: Upsert::new(),
        };
    }

    let variables = order_variables_by_degree(component, view);
    let index_of: HashMap<Coord, usize> =
        variables.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    // An active's constraint is `sum(unknown_neighbors(a)) = effective_value(a)`
    // over *all* of its unknown neighbors (§4.G/§4.I). If any of those
    // neighbors fell outside this component's variable set — e.g. a
    // PROCESSED frontier cell, or an UNREVEALED cell vision hasn't
    // re-reported since its ACTIVE neighbor committed — the equation would
    // be under-constrained if only the in-component subset were kept. Drop
    // such actives from this pass entirely rather than solve a wrong
    // equation; they stay `TO_REDUCE` (excluded from `constrained_actives`
    // below) and get revisited once the missing neighbor rejoins the frontier.
    let mut constrained_actives: HashSet<Coord> = HashSet::new();
    let constraints: Vec<Constraint> = component
        .active_cells
        .iter()
        .filter_map(|&active| {
            let unknowns = view.unknown_neighbors(active);
            if unknowns.iter().any(|c| !index_of.contains_key(c)) {
                return None;
            }
            let vars: Vec<usize> = unknowns.iter().map(|c| index_of[c]).collect();
            constrained_actives.insert(active);
            Some(Constraint { vars, target: view.effective_value(active) })
        })
        .collect();

    let n = variables.len();
    let mut assignment: Vec<i8> = vec![-1; n];
    let mut ones = vec![0u32; n];
    let mut total: u64 = 0;

    backtrack(0, n, &constraints, &mut assignment, &mut ones, &mut total);

    if total == 0 {
        return CspOutput {
            component_safe: HashSet::new(),
            component_flag: HashSet::new(),
            component_probabilities: HashMap::new(),
            skipped: false,
            contradictory: true,
            upsert: Upsert::new(),
        };
    }

    let mut component_safe = HashSet::new();
    let mut component_flag = HashSet::new();
    let mut component_probabilities = HashMap::new();

    for (i, &coord) in variables.iter().enumerate() {
        let probability = ones[i] as f64 / total as f64;
        component_probabilities.insert(coord, probability);
        if ones[i] == 0 {
            component_safe.insert(coord);
        } else if ones[i] as u64 == total {
            component_flag.insert(coord);
        }
    }

    let mut upsert = Upsert::new();
    for &coord in &component.frontier_cells {
        if let Some(cell) = snapshot.cell(coord) {
            upsert.write(
                coord,
                crate::cell::Cell { frontier_focus: Some(FrontierFocus::Processed), ..*cell },
            );
        }
    }
    for &coord in &constrained_actives {
        if let Some(cell) = snapshot.cell(coord) {
            upsert.write(coord, crate::cell::Cell { active_focus: Some(ActiveFocus::Reduced), ..*cell });
        }
    }

    CspOutput { component_safe, component_flag, component_probabilities, skipped: false, contradictory: false, upsert }
}

/// Order variables by degree (number of constraints referencing them)
/// descending, tie-broken by lexicographic coordinate order, so
/// probabilities and the chosen guess are deterministic (§5).
fn order_variables_by_degree(component: &Component, view: &FrontierView) -> Vec<Coord> {
    let mut degree: HashMap<Coord, usize> = component.frontier_cells.iter().map(|&c| (c, 0)).collect();
    for &active in &component.active_cells {
        for unknown in view.unknown_neighbors(active) {
            if let Some(d) = degree.get_mut(&unknown) {
                *d += 1;
            }
        }
    }

    let mut variables = component.frontier_cells.clone();
    variables.sort_by(|&a, &b| degree[&b].cmp(&degree[&a]).then(a.cmp(&b)));
    variables
}

fn backtrack(
    i: usize,
    n: usize,
    constraints: &[Constraint],
    assignment: &mut Vec<i8>,
    ones: &mut Vec<u32>,
    total: &mut u64,
) {
    if i == n {
        for c in constraints {
            let sum: i32 = c.vars.iter().map(|&v| assignment[v] as i32).sum();
            if sum != c.target {
                return;
            }
        }
        *total += 1;
        for (v, slot) in ones.iter_mut().enumerate() {
            if assignment[v] == 1 {
                *slot += 1;
            }
        }
        return;
    }

    for val in [0i8, 1] {
        assignment[i] = val;
        if prune_ok(i, constraints, assignment) {
            backtrack(i + 1, n, constraints, assignment, ones, total);
        }
    }
    assignment[i] = -1;
}

fn prune_ok(i: usize, constraints: &[Constraint], assignment: &[i8]) -> bool {
    for c in constraints {
        let mut assigned_count = 0;
        let mut assigned_ones = 0;
        for &v in &c.vars {
            if v <= i {
                assigned_count += 1;
                if assignment[v] == 1 {
                    assigned_ones += 1;
                }
            }
        }
        let remaining = c.target - assigned_ones;
        let unassigned = c.vars.len() as i32 - assigned_count;
        if remaining < 0 || remaining > unassigned {
            return false;
        }
    }
    true
}
