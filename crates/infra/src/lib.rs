//! `stockroom-infra` — infrastructure adapters for the stock ledger.
//!
//! Currently one adapter: JSON snapshot persistence to a file path.

pub mod snapshot;

pub use snapshot::{DEFAULT_SNAPSHOT_PATH, JsonSnapshotStore, LoadOutcome, SnapshotError};
