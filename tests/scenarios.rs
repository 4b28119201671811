//! End-to-end scenario tests driving [`sweepbot_core::run_iteration`]
//! through the public API only, no internal module access.

use sweepbot_core::{Action, ActionKind, Cell, LogicalState, RawState, SolverConfig, Storage, Upsert};

fn observed_open_number(value: u8) -> Cell {
    let raw = match value {
        1 => RawState::Number1,
        2 => RawState::Number2,
        3 => RawState::Number3,
        4 => RawState::Number4,
        _ => RawState::Number1,
    };
    Cell::from_observation(raw)
}

fn has_action(actions: &[Action], kind: ActionKind, coord: (i64, i64)) -> bool {
    actions.iter().any(|a| a.kind == kind && a.coord == coord)
}

#[test]
fn propagation_trivial_zero_clears_whole_neighborhood() {
    let mut storage = Storage::new();
    let config = SolverConfig::default();

    // A zero-valued open number (a "flood fill" seed) with 8 fresh
    // unrevealed neighbors: R1 should mark every one of them SAFE.
    let mut batch = Upsert::new();
    batch.write(
        (0, 0),
        Cell {
            raw_state: RawState::Number1,
            logical_state: LogicalState::OpenNumber,
            number_value: Some(0),
            solver_status: sweepbot_core::SolverStatus::JustVisualized,
            active_focus: None,
            frontier_focus: None,
        },
    );
    for n in sweepbot_core::neighbors::neighbors((0, 0)) {
        batch.write(n, Cell::from_observation(RawState::Unrevealed));
    }

    let (actions, stats) = sweepbot_core::run_iteration(&mut storage, batch, &config);
    for n in sweepbot_core::neighbors::neighbors((0, 0)) {
        assert!(has_action(&actions, ActionKind::Safe, n), "expected {:?} to be SAFE", n);
    }
    assert_eq!(stats.components_enumerated, 0);
}

#[test]
fn subset_inference_resolves_the_shared_unknown() {
    let mut storage = Storage::new();
    let config = SolverConfig::default();

    // a=(0,0) value 1, unknowns={(0,-1),(0,1)}; b=(1,0) value 2,
    // unknowns={(0,-1),(0,1),(2,0)}. R3 must flag (2,0).
    let mut batch = Upsert::new();
    batch.write((0, 0), observed_open_number(1));
    batch.write((1, 0), observed_open_number(2));
    batch.write((0, -1), Cell::from_observation(RawState::Unrevealed));
    batch.write((0, 1), Cell::from_observation(RawState::Unrevealed));
    batch.write((2, 0), Cell::from_observation(RawState::Unrevealed));
    for coord in [(-1, -1), (-1, 0), (-1, 1), (1, -1), (1, 1), (2, -1), (2, 1)] {
        batch.write(coord, Cell::from_observation(RawState::Empty));
    }

    let (actions, _stats) = sweepbot_core::run_iteration(&mut storage, batch, &config);
    assert!(has_action(&actions, ActionKind::Flag, (2, 0)));
    assert!(!has_action(&actions, ActionKind::Safe, (0, -1)));
    assert!(!has_action(&actions, ActionKind::Safe, (0, 1)));
}

#[test]
fn csp_resolves_a_small_exact_component() {
    let mut storage = Storage::new();
    let config = SolverConfig::default();

    // (0,0) value 1 with exactly one unknown neighbor (1,0): the reducer's
    // own R1/R2 already resolve this, so route a genuinely ambiguous case
    // through the CSP by giving two actives that share two unknowns with
    // no unit-propagation shortcut: a=1 over {(1,0),(1,1)},
    // b=1 over {(1,1),(1,2)} sharing only (1,1) -- not individually
    // resolvable by R1/R2/R3, but CSP enumerates both and assigns
    // probabilities.
    batch_shared_pair(&mut storage, &config);
}

fn batch_shared_pair(storage: &mut Storage, config: &SolverConfig) {
    let mut batch = Upsert::new();
    batch.write((0, 0), observed_open_number(1));
    batch.write((0, 2), observed_open_number(1));
    batch.write((1, 0), Cell::from_observation(RawState::Unrevealed));
    batch.write((1, 1), Cell::from_observation(RawState::Unrevealed));
    batch.write((1, 2), Cell::from_observation(RawState::Unrevealed));
    for coord in [(-1, -1), (-1, 0), (-1, 1), (-1, 2), (-1, 3), (0, -1), (0, 1), (0, 3)] {
        batch.write(coord, Cell::from_observation(RawState::Empty));
    }

    // Iteration 1 only classifies (0,0)/(0,2) ACTIVE: the analyzer reads a
    // single pre-iteration snapshot, so their unrevealed neighbors can't
    // see the new ACTIVE status yet and are reclassified NONE. Vision
    // keeps re-reporting every visible tile each pass (not just newly
    // changed ones), so iteration 2 re-observes the same three UNREVEALED
    // cells: that puts them back at JUST_VISUALIZED, and this time the
    // analyzer sees the now-committed actives and promotes them to
    // FRONTIER, which is what segmentation and the CSP stage run over.
    sweepbot_core::run_iteration(storage, batch, config);

    let mut rescan = Upsert::new();
    rescan.write((1, 0), Cell::from_observation(RawState::Unrevealed));
    rescan.write((1, 1), Cell::from_observation(RawState::Unrevealed));
    rescan.write((1, 2), Cell::from_observation(RawState::Unrevealed));
    let (_actions, stats) = sweepbot_core::run_iteration(storage, rescan, config);
    assert_eq!(stats.components_enumerated, 1);
    assert_eq!(stats.components_contradictory, 0);
}

#[test]
fn oversized_component_is_skipped_and_retried_next_iteration() {
    let mut storage = Storage::new();
    let config = SolverConfig { max_component_size: 1, ..SolverConfig::default() };

    let mut batch = Upsert::new();
    batch.write((0, 0), observed_open_number(1));
    batch.write((1, 0), Cell::from_observation(RawState::Unrevealed));
    batch.write((1, 1), Cell::from_observation(RawState::Unrevealed));

    // Iteration 1 only classifies (0,0) ACTIVE; its neighbors can't be
    // classified FRONTIER until a later pass re-observes them and sees that
    // commit (see the two-iteration note in
    // `csp_resolves_a_small_exact_component`), so iteration 2 re-reports the
    // same two UNREVEALED tiles to trigger that reclassification.
    sweepbot_core::run_iteration(&mut storage, batch, &config);

    let mut rescan = Upsert::new();
    rescan.write((1, 0), Cell::from_observation(RawState::Unrevealed));
    rescan.write((1, 1), Cell::from_observation(RawState::Unrevealed));
    let (actions, stats) = sweepbot_core::run_iteration(&mut storage, rescan, &config);
    assert_eq!(stats.components_skipped, 1);
    assert!(!has_action(&actions, ActionKind::Safe, (1, 0)));
    assert!(!has_action(&actions, ActionKind::Flag, (1, 0)));
}

#[test]
fn to_visualize_cells_are_excluded_from_active_set() {
    let mut storage = Storage::new();
    let config = SolverConfig::default();

    let mut batch = Upsert::new();
    batch.write((0, 0), observed_open_number(0));
    for n in sweepbot_core::neighbors::neighbors((0, 0)) {
        batch.write(n, Cell::from_observation(RawState::Unrevealed));
    }
    let (actions, _stats) = sweepbot_core::run_iteration(&mut storage, batch, &config);
    assert!(!actions.is_empty());

    // Every cell marked SAFE this iteration moved to TO_VISUALIZE and so
    // must not reappear in active_set even though it was once a "known"
    // neighbor under consideration.
    let snap = storage.snapshot();
    for action in &actions {
        if action.kind == ActionKind::Safe {
            assert!(snap.to_visualize_set().contains(&action.coord));
            assert!(!snap.active_set().contains(&action.coord));
        }
    }
}
