//! The pipeline orchestrator (§4.L): the crate's single public entry point.
//! Takes a vision observation batch, threads it through the analyzer, the
//! focus actualizer, the reducer, segmentation, the CSP enumerator, the
//! action mapper and sweep, and commits one consolidated upsert back to
//! storage at the end.
//!
//! Grounded on the teacher's `Solver::solve_step` drive loop in `solver.rs`,
//! which runs the same phase sequence (basic rules, subset logic, tank
//! solver, then a single board mutation) over one `Grid`; generalized here
//! to the sparse coordinate space and instrumented with `tracing` spans the
//! teacher's own module had no equivalent for.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::action::{map_actions, pick_guess};
use crate::analyzer::classify;
use crate::cell::{Action, Coord, SolverStatus, Upsert};
use crate::config::SolverConfig;
use crate::csp::solve_component;
use crate::focus::actualize;
use crate::frontier::{FrontierFilter, FrontierView};
use crate::reducer::reduce;
use crate::segmentation::segment;
use crate::stats::IterationStats;
use crate::storage::Storage;
use crate::sweep::sweep;

/// Run one full inference iteration: apply `observation_batch` to
/// `storage`, reclassify, reduce, solve, decide, sweep, and commit the
/// result back into `storage` in a single write. Returns the ordered
/// decision batch plus this iteration's stats.
pub fn run_iteration(
    storage: &mut Storage,
    observation_batch: Upsert,
    config: &SolverConfig,
) -> (Vec<Action>, IterationStats) {
    let mut runtime = storage.snapshot();
    let mut stats = IterationStats::default();

    trace!("applying observation batch");
    runtime.apply(&observation_batch);

    debug!("running state analyzer");
    let classify_upsert = classify(&runtime);
    stats.cells_classified = classify_upsert.cells.len();
    // §4.E's trigger set is exactly {ACTIVE, SOLVED, MINE, TO_VISUALIZE} —
    // a cell landing on FRONTIER or NONE must not repromote its neighbors.
    let newly_actualizing: Vec<Coord> = classify_upsert
        .cells
        .iter()
        .filter(|(_, cell)| {
            matches!(
                cell.solver_status,
                SolverStatus::Active | SolverStatus::Solved | SolverStatus::Mine | SolverStatus::ToVisualize
            )
        })
        .map(|(&coord, _)| coord)
        .collect();
    runtime.apply(&classify_upsert);

    debug!("running focus actualizer (post-classification)");
    let focus_upsert = actualize(&newly_actualizing, &runtime);
    runtime.apply(&focus_upsert);

    debug!("running reducer");
    let reducer_output = reduce(&runtime);
    stats.cells_reduced = reducer_output.reduced_actives.len();
    let mut safe: HashSet<Coord> = reducer_output.safe.clone();
    let mut flag: HashSet<Coord> = reducer_output.flag.clone();
    runtime.apply(&reducer_output.upsert);

    let mut last_probabilities = crate::stats::ProbabilityMap::new();
    let mut changed_by_reducer: Vec<Coord> =
        reducer_output.safe.iter().chain(reducer_output.flag.iter()).copied().collect();

    let to_process_view = FrontierView::build(&runtime, FrontierFilter::ToProcessOnly);
    if !to_process_view.frontier_cells().is_empty() {
        debug!("running segmentation + csp");
        let components = segment(&to_process_view);

        for component in &components {
            // Rebuilt per component (not hoisted above the loop): each
            // component's commit can shift effective_value/unknown_neighbors
            // for cells a later component reads, and a view borrowed across
            // the loop would also block the `runtime.apply` below.
            let full_view = FrontierView::build(&runtime, FrontierFilter::All);
            let csp_output =
                solve_component(component, &full_view, &runtime, config.max_component_size);

            if csp_output.skipped {
                warn!(size = component.frontier_cells.len(), "component exceeded max_component_size, skipping");
                stats.components_skipped += 1;
                continue;
            }
            if csp_output.contradictory {
                stats.components_contradictory += 1;
                continue;
            }

            stats.components_enumerated += 1;
            safe.extend(&csp_output.component_safe);
            flag.extend(&csp_output.component_flag);
            last_probabilities.extend(csp_output.component_probabilities);
            changed_by_reducer.extend(csp_output.component_safe.iter().chain(&csp_output.component_flag));
            runtime.apply(&csp_output.upsert);
        }
    }

    debug!("running focus actualizer (post-solve)");
    if !changed_by_reducer.is_empty() {
        let post_solve_focus = actualize(&changed_by_reducer, &runtime);
        runtime.apply(&post_solve_focus);
    }

    let guess = if safe.is_empty() && flag.is_empty() && config.allow_guess {
        pick_guess(&last_probabilities)
    } else {
        None
    };

    stats.last_probabilities = last_probabilities.clone();

    debug!("mapping actions");
    let (mut actions, action_upsert) = map_actions(&safe, &flag, guess, &runtime);
    runtime.apply(&action_upsert);

    if config.enable_sweep {
        debug!("running sweep");
        let sweep_view = FrontierView::build(&runtime, FrontierFilter::All);
        let bonus = sweep(&runtime, &sweep_view);
        let already_decided: HashSet<Coord> = actions.iter().map(|a| a.coord).collect();
        let mut fresh_bonus: Vec<Coord> = bonus.difference(&already_decided).copied().collect();
        fresh_bonus.sort();
        // Sweep never mutates storage (§4.K): these are appended to the
        // decision batch only, with no accompanying upsert.
        stats.sweep_actions = fresh_bonus.len();
        actions.extend(
            fresh_bonus
                .into_iter()
                .map(|coord| Action { kind: crate::cell::ActionKind::Safe, coord }),
        );
    }

    storage.replace_snapshot(runtime);

    (actions, stats)
}
