//! Error types for the crate's ambient concerns.
//!
//! Storage invariant violations (§3.4, §7) are **not** represented here as
//! a `Result` variant the caller can recover from — the spec is explicit
//! that those are fatal precondition failures ("panic/throw immediately...
//! do not use exceptions to signal 'no decision'"). [`InvariantViolation`]
//! exists only to give the `panic!` payload a typed, matchable reason.

use thiserror::Error;

/// Describes which invariant a rejected upsert violated. Carried as the
/// payload of the `panic!` storage raises on a bad write — not a `Result`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("cell {coord:?}: logical_state is not OPEN_NUMBER but number_value is set")]
    NumberValueOnNonNumber { coord: (i64, i64) },

    #[error("cell {coord:?}: solver_status is ACTIVE but active_focus is absent or frontier_focus is set")]
    ActiveFocusMismatch { coord: (i64, i64) },

    #[error("cell {coord:?}: solver_status is FRONTIER but frontier_focus is absent or active_focus is set")]
    FrontierFocusMismatch { coord: (i64, i64) },

    #[error("cell {coord:?}: solver_status is neither ACTIVE nor FRONTIER but a focus field is set")]
    StrayFocus { coord: (i64, i64) },
}

/// Errors from the optional JSON checkpoint layer (§6.3).
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to read checkpoint file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize checkpoint: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors validating a parsed [`crate::config::SolverConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_component_size must be at least 1, got {0}")]
    ZeroComponentSize(usize),
}
