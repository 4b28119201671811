//! Optional JSON checkpoint persistence (§6.3). Serializes only the cell
//! map — the five derived index sets are never themselves persisted, they
//! are always recomputed on import by replaying every cell through one
//! upsert, the same recompute path a live observation batch goes through.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Coord, Upsert};
use crate::error::CheckpointError;
use crate::storage::Storage;

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointFile {
    // A `(Coord, Cell)` list rather than a `HashMap<Coord, _>`: JSON object
    // keys must be strings, and a tuple coordinate doesn't serialize as one.
    cells: Vec<(Coord, Cell)>,
}

/// Serialize `storage`'s known cells to `path` as JSON.
pub fn export(storage: &Storage, path: &Path) -> Result<(), CheckpointError> {
    let snapshot = storage.snapshot();
    let cells: Vec<(Coord, Cell)> = snapshot.known_cells().map(|(&c, &cell)| (c, cell)).collect();
    let file = CheckpointFile { cells };

    let json = serde_json::to_vec_pretty(&file)?;
    let mut handle = std::fs::File::create(path)?;
    handle.write_all(&json)?;
    Ok(())
}

/// Load a checkpoint from `path`, rebuilding a fresh [`Storage`] by
/// replaying every stored cell through a single upsert so the derived sets
/// recompute from scratch rather than being trusted from the file.
pub fn import(path: &Path) -> Result<Storage, CheckpointError> {
    let mut contents = String::new();
    std::fs::File::open(path)?.read_to_string(&mut contents)?;
    let file: CheckpointFile = serde_json::from_str(&contents)?;

    let mut storage = Storage::new();
    let mut upsert = Upsert::new();
    for (coord, cell) in file.cells {
        upsert.write(coord, cell);
    }
    storage.apply_upsert(upsert);
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{ActiveFocus, LogicalState, RawState, SolverStatus};

    #[test]
    fn export_then_import_round_trips_known_cells() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("sweepbot-core-checkpoint-test-{:?}.json", std::thread::current().id()));

        let mut storage = Storage::new();
        let mut upsert = Upsert::new();
        upsert.write(
            (3, 4),
            Cell {
                raw_state: RawState::Number2,
                logical_state: LogicalState::OpenNumber,
                number_value: Some(2),
                solver_status: SolverStatus::Active,
                active_focus: Some(ActiveFocus::ToReduce),
                frontier_focus: None,
            },
        );
        storage.apply_upsert(upsert);

        export(&storage, &path).expect("export should succeed");
        let restored = import(&path).expect("import should succeed");

        let snap = restored.snapshot();
        assert_eq!(snap.cell((3, 4)).copied().map(|c| c.number_value), Some(Some(2)));
        assert!(snap.active_set().contains(&(3, 4)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn import_missing_file_returns_io_error() {
        let path = Path::new("/nonexistent/sweepbot-core-checkpoint.json");
        assert!(matches!(import(path), Err(CheckpointError::Io(_))));
    }
}
