//! Core data types: coordinates, enumerations, the cell record, and upserts.
//!
//! Mirrors the teacher's flat-grid types (`Grid`/`Mines`/`Flags`) in spirit —
//! small, `Copy`-friendly value types — but keyed by an unbounded integer
//! coordinate instead of a fixed `width * height` index, since the board
//! here is incrementally revealed rather than generated up front.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An integer `(x, y)` coordinate; the unique key of a cell. The grid is
/// unbounded — cells exist only where observed.
pub type Coord = (i64, i64);

/// What vision reports for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawState {
    Unrevealed,
    Number1,
    Number2,
    Number3,
    Number4,
    Number5,
    Number6,
    Number7,
    Number8,
    Flag,
    Question,
    Empty,
    Decor,
    Exploded,
}

impl RawState {
    /// The `NUMBER_1..NUMBER_8` value this state carries, or `None`.
    pub fn number_value(self) -> Option<u8> {
        match self {
            RawState::Number1 => Some(1),
            RawState::Number2 => Some(2),
            RawState::Number3 => Some(3),
            RawState::Number4 => Some(4),
            RawState::Number5 => Some(5),
            RawState::Number6 => Some(6),
            RawState::Number7 => Some(7),
            RawState::Number8 => Some(8),
            _ => None,
        }
    }

    /// Normalize raw vision output into a [`LogicalState`] per the §3.1 mapping.
    pub fn to_logical(self) -> LogicalState {
        match self {
            RawState::Number1
            | RawState::Number2
            | RawState::Number3
            | RawState::Number4
            | RawState::Number5
            | RawState::Number6
            | RawState::Number7
            | RawState::Number8 => LogicalState::OpenNumber,
            RawState::Flag | RawState::Exploded => LogicalState::ConfirmedMine,
            RawState::Empty | RawState::Decor => LogicalState::Empty,
            RawState::Unrevealed | RawState::Question => LogicalState::Unrevealed,
        }
    }
}

/// Normalized cell state, independent of the raw vision vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalState {
    Unrevealed,
    OpenNumber,
    Empty,
    ConfirmedMine,
}

/// Topological classification assigned by the state analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverStatus {
    None,
    JustVisualized,
    Active,
    Frontier,
    Solved,
    Mine,
    ToVisualize,
    OutOfScope,
}

/// Relevance tag on an `Active` cell: must the reducer revisit it?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveFocus {
    ToReduce,
    Reduced,
}

/// Relevance tag on a `Frontier` cell: must the CSP stage revisit it?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrontierFocus {
    ToProcess,
    Processed,
}

/// The kind of decision emitted for a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Safe,
    Flag,
    Guess,
}

/// A decision for a single coordinate, in the order described by §4.J.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub coord: Coord,
}

/// The full record storage holds for one coordinate (§3.2).
///
/// `active_focus` and `frontier_focus` are defined only under the matching
/// `solver_status` — see the invariants in [`crate::storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub raw_state: RawState,
    pub logical_state: LogicalState,
    pub number_value: Option<u8>,
    pub solver_status: SolverStatus,
    pub active_focus: Option<ActiveFocus>,
    pub frontier_focus: Option<FrontierFocus>,
}

impl Cell {
    /// A brand new, never-observed cell: `UNREVEALED` / `NONE`, no focus.
    pub fn fresh() -> Self {
        Self {
            raw_state: RawState::Unrevealed,
            logical_state: LogicalState::Unrevealed,
            number_value: None,
            solver_status: SolverStatus::None,
            active_focus: None,
            frontier_focus: None,
        }
    }

    /// Build the cell a vision observation produces: `solver_status` is
    /// implicitly `JUST_VISUALIZED` (§6.1) regardless of what the caller
    /// passes, since vision never writes any other status.
    pub fn from_observation(raw_state: RawState) -> Self {
        let logical_state = raw_state.to_logical();
        let number_value = raw_state.number_value();
        Self {
            raw_state,
            logical_state,
            number_value,
            solver_status: SolverStatus::JustVisualized,
            active_focus: None,
            frontier_focus: None,
        }
    }

    /// The `effective_value` of an active cell: `number_value` minus the
    /// count of confirmed-mine 8-neighbors. Callers compute the neighbor
    /// mine count via [`crate::frontier::FrontierView::effective_value`];
    /// this helper only exposes the raw clue.
    pub fn raw_number(&self) -> u8 {
        self.number_value.unwrap_or(0)
    }
}

/// Add/remove operations on `to_visualize_set`, the only set an upsert may
/// touch explicitly — the other four sets are always recomputed from cell
/// writes (§3.5).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToVisualizeOps {
    pub add: Vec<Coord>,
    pub remove: Vec<Coord>,
}

/// An immutable message describing a batch of cell writes plus
/// `to_visualize_set` operations — the only way to mutate storage (§3.5).
#[derive(Debug, Clone, Default)]
pub struct Upsert {
    pub cells: HashMap<Coord, Cell>,
    pub to_visualize: ToVisualizeOps,
}

impl Upsert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.to_visualize.add.is_empty() && self.to_visualize.remove.is_empty()
    }

    pub fn write(&mut self, coord: Coord, cell: Cell) {
        self.cells.insert(coord, cell);
    }

    pub fn add_to_visualize(&mut self, coord: Coord) {
        self.to_visualize.add.push(coord);
    }

    pub fn remove_to_visualize(&mut self, coord: Coord) {
        self.to_visualize.remove.push(coord);
    }

    /// Merge `other` into `self`, with `other`'s cell writes taking
    /// precedence on coordinate collisions.
    pub fn merge(&mut self, other: Upsert) {
        self.cells.extend(other.cells);
        self.to_visualize.add.extend(other.to_visualize.add);
        self.to_visualize.remove.extend(other.to_visualize.remove);
    }
}
