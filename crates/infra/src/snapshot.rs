use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use thiserror::Error;

use stockroom_ledger::StockLedger;

/// Default snapshot file path.
pub const DEFAULT_SNAPSHOT_PATH: &str = "inventory.json";

/// Error while writing a snapshot. Read-side problems never surface as
/// errors; they are reported through [`LoadOutcome`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write snapshot: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of reading a snapshot file.
///
/// An absent file is a benign fresh-start condition, distinct from a file
/// that exists but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read and validated; here is the mapping it held.
    Loaded(IndexMap<String, u64>),
    /// The file does not exist.
    Absent,
    /// The file exists but is unusable (malformed JSON, wrong shape, or a
    /// value that is not a non-negative integer).
    Corrupt(String),
}

/// JSON-file persistence for a [`StockLedger`].
///
/// The snapshot is a pretty-printed UTF-8 JSON object mapping item name to
/// quantity, written wholesale on every save.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl Default for JsonSnapshotStore {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_PATH)
    }
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the full ledger to the snapshot path, overwriting any
    /// existing file. Failures are logged, then propagated.
    pub fn save(&self, ledger: &StockLedger) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(ledger).map_err(|err| {
            tracing::error!(path = %self.path.display(), %err, "failed to serialize snapshot");
            SnapshotError::Serialize(err)
        })?;

        fs::write(&self.path, json).map_err(|err| {
            tracing::error!(path = %self.path.display(), %err, "failed to write snapshot");
            SnapshotError::Io(err)
        })?;

        tracing::info!(path = %self.path.display(), items = ledger.len(), "snapshot saved");
        Ok(())
    }

    /// Read and validate the snapshot file without touching any ledger.
    ///
    /// Never fails; every read-side problem maps to a [`LoadOutcome`] variant
    /// so the caller can branch without catching errors.
    pub fn load(&self) -> LoadOutcome {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return LoadOutcome::Absent,
            Err(err) => return LoadOutcome::Corrupt(format!("read failed: {err}")),
        };

        let value: JsonValue = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => return LoadOutcome::Corrupt(format!("invalid JSON: {err}")),
        };

        let JsonValue::Object(entries) = value else {
            return LoadOutcome::Corrupt("top-level value is not an object".to_string());
        };

        let mut snapshot = IndexMap::with_capacity(entries.len());
        for (name, value) in entries {
            let Some(qty) = value.as_u64() else {
                return LoadOutcome::Corrupt(format!(
                    "quantity of '{name}' is not a non-negative integer"
                ));
            };
            snapshot.insert(name, qty);
        }
        LoadOutcome::Loaded(snapshot)
    }

    /// Load the snapshot into `ledger`, applying best-effort startup
    /// semantics: a loaded file replaces the mapping wholesale, an absent
    /// file means a fresh (empty) ledger, and a corrupt file leaves the
    /// prior in-memory state untouched.
    pub fn load_into(&self, ledger: &mut StockLedger) {
        match self.load() {
            LoadOutcome::Loaded(snapshot) => {
                ledger.restore(snapshot);
                tracing::info!(
                    path = %self.path.display(),
                    items = ledger.len(),
                    "snapshot loaded"
                );
            }
            LoadOutcome::Absent => {
                ledger.clear();
                tracing::info!(path = %self.path.display(), "no snapshot found; starting fresh");
            }
            LoadOutcome::Corrupt(reason) => {
                tracing::error!(
                    path = %self.path.display(),
                    reason,
                    "snapshot unusable; keeping in-memory state"
                );
            }
        }
    }
}
