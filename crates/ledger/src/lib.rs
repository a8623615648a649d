//! Stock ledger domain module.
//!
//! This crate contains the business rules for stock tracking, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod stock;

pub use stock::{DEFAULT_LOW_THRESHOLD, StockLedger};
