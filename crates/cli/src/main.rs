//! Demo entry point: a fixed add/remove/query/save/load/report sequence.

use anyhow::Context;

use stockroom_infra::{DEFAULT_SNAPSHOT_PATH, JsonSnapshotStore};
use stockroom_ledger::{DEFAULT_LOW_THRESHOLD, StockLedger};

fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("STOCKROOM_SNAPSHOT_PATH").ok())
        .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string());

    let store = JsonSnapshotStore::new(&path);
    let mut ledger = StockLedger::new();

    ledger.add("apple", 10)?;
    ledger.remove("apple", 3)?;
    ledger.add("banana", 2)?;

    tracing::info!(qty = ledger.quantity("apple"), "apple stock");
    tracing::info!(low = ?ledger.low_stock(DEFAULT_LOW_THRESHOLD), "low stock items");

    store
        .save(&ledger)
        .with_context(|| format!("failed to save snapshot to {path}"))?;
    store.load_into(&mut ledger);
    ledger.report();

    Ok(())
}
