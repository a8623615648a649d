use indexmap::IndexMap;
use serde::Serialize;

use stockroom_core::{StockError, StockResult};

/// Default threshold for [`StockLedger::low_stock`].
pub const DEFAULT_LOW_THRESHOLD: u64 = 5;

/// In-memory quantity tracker keyed by item name.
///
/// Invariant: no entry has quantity 0. Draining an item removes its entry
/// entirely, so "item present" is equivalent to "quantity > 0". Keys are
/// case-sensitive and iterate in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StockLedger {
    stock: IndexMap<String, u64>,
}

impl StockLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from an initial mapping.
    ///
    /// Zero-quantity entries are dropped to uphold the no-zero-entry invariant.
    pub fn with_initial<I>(initial: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let mut ledger = Self::new();
        ledger.restore(initial.into_iter().collect());
        ledger
    }

    fn validate_item(item: &str) -> StockResult<()> {
        if item.trim().is_empty() {
            return Err(StockError::validation("item name cannot be empty"));
        }
        Ok(())
    }

    /// Add `qty` units of `item`.
    ///
    /// Adding 0 to an absent item leaves the mapping untouched; a total that
    /// would overflow `u64` is rejected.
    pub fn add(&mut self, item: &str, qty: u64) -> StockResult<()> {
        Self::validate_item(item)?;

        let current = self.stock.get(item).copied().unwrap_or(0);
        let total = current.checked_add(qty).ok_or_else(|| {
            StockError::validation(format!("quantity of '{item}' would overflow"))
        })?;

        if total == 0 {
            tracing::info!(item, qty, "added 0 of absent item; ledger unchanged");
            return Ok(());
        }

        self.stock.insert(item.to_string(), total);
        tracing::info!(item, qty, total, "stock added");
        Ok(())
    }

    /// Remove `qty` units of `item`.
    ///
    /// If the current quantity is less than or equal to `qty` the entry is
    /// deleted entirely; stock never goes negative. Removing an absent item
    /// fails with [`StockError::NotFound`] and leaves state untouched.
    pub fn remove(&mut self, item: &str, qty: u64) -> StockResult<()> {
        Self::validate_item(item)?;

        let Some(current) = self.stock.get(item).copied() else {
            tracing::warn!(item, "attempt to remove non-existent item");
            return Err(StockError::not_found(item));
        };

        if current <= qty {
            // shift_remove keeps the insertion order of the remaining entries.
            self.stock.shift_remove(item);
            tracing::info!(item, qty, "stock removed (item deleted)");
        } else {
            let remaining = current - qty;
            self.stock.insert(item.to_string(), remaining);
            tracing::info!(item, qty, remaining, "stock removed");
        }
        Ok(())
    }

    /// Current quantity of `item`, or 0 if not present.
    pub fn quantity(&self, item: &str) -> u64 {
        self.stock.get(item).copied().unwrap_or(0)
    }

    /// Names of items with quantity strictly below `threshold`, in insertion
    /// order.
    pub fn low_stock(&self, threshold: u64) -> Vec<String> {
        self.stock
            .iter()
            .filter(|&(_, &qty)| qty < threshold)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Log one line per item showing name and quantity, in insertion order.
    pub fn report(&self) {
        tracing::info!(items = self.stock.len(), "stock report");
        for (name, qty) in &self.stock {
            tracing::info!(item = name.as_str(), qty, "stock level");
        }
    }

    /// Independent copy of the current mapping.
    pub fn stock(&self) -> IndexMap<String, u64> {
        self.stock.clone()
    }

    /// Replace the mapping wholesale, dropping zero-quantity entries.
    pub fn restore(&mut self, snapshot: IndexMap<String, u64>) {
        self.stock = snapshot.into_iter().filter(|(_, qty)| *qty > 0).collect();
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.stock.clear();
    }

    pub fn contains(&self, item: &str) -> bool {
        self.stock.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_then_partial_remove_then_drain() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 10).unwrap();
        ledger.remove("apple", 3).unwrap();
        assert_eq!(ledger.quantity("apple"), 7);

        ledger.remove("apple", 7).unwrap();
        assert_eq!(ledger.quantity("apple"), 0);
        assert!(!ledger.contains("apple"));
    }

    #[test]
    fn remove_more_than_present_deletes_entry() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 2).unwrap();
        ledger.remove("apple", 100).unwrap();
        assert!(!ledger.contains("apple"));
        assert_eq!(ledger.quantity("apple"), 0);
    }

    #[test]
    fn remove_absent_item_fails_without_mutation() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 1).unwrap();
        let before = ledger.stock();

        let err = ledger.remove("banana", 1).unwrap_err();
        assert_eq!(err, StockError::not_found("banana"));
        assert_eq!(ledger.stock(), before);
    }

    #[test]
    fn quantity_of_unknown_item_is_zero() {
        let ledger = StockLedger::new();
        assert_eq!(ledger.quantity("ghost"), 0);
    }

    #[test]
    fn empty_item_name_is_rejected() {
        let mut ledger = StockLedger::new();
        assert!(matches!(
            ledger.add("", 1),
            Err(StockError::Validation(_))
        ));
        assert!(matches!(
            ledger.remove("  ", 1),
            Err(StockError::Validation(_))
        ));
    }

    #[test]
    fn overflowing_add_is_rejected() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", u64::MAX).unwrap();
        assert!(matches!(
            ledger.add("apple", 1),
            Err(StockError::Validation(_))
        ));
        assert_eq!(ledger.quantity("apple"), u64::MAX);
    }

    #[test]
    fn adding_zero_creates_no_entry() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 0).unwrap();
        assert!(!ledger.contains("apple"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn low_stock_uses_strict_threshold_in_insertion_order() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 3).unwrap();
        ledger.add("banana", 10).unwrap();
        ledger.add("pear", 5).unwrap();

        // pear at exactly 5 is not below the threshold
        assert_eq!(ledger.low_stock(5), vec!["apple".to_string()]);
        assert_eq!(
            ledger.low_stock(11),
            vec!["apple".to_string(), "banana".to_string(), "pear".to_string()]
        );
        assert!(ledger.low_stock(0).is_empty());
    }

    #[test]
    fn insertion_order_survives_partial_removal() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 4).unwrap();
        ledger.add("banana", 4).unwrap();
        ledger.add("pear", 4).unwrap();
        ledger.remove("banana", 4).unwrap();

        assert_eq!(
            ledger.low_stock(DEFAULT_LOW_THRESHOLD),
            vec!["apple".to_string(), "pear".to_string()]
        );
    }

    #[test]
    fn stock_accessor_returns_independent_copy() {
        let mut ledger = StockLedger::new();
        ledger.add("apple", 7).unwrap();

        let mut copy = ledger.stock();
        copy.insert("banana".to_string(), 99);
        *copy.get_mut("apple").unwrap() = 0;

        assert_eq!(ledger.quantity("apple"), 7);
        assert!(!ledger.contains("banana"));
    }

    #[test]
    fn with_initial_drops_zero_quantities() {
        let ledger = StockLedger::with_initial(vec![
            ("apple".to_string(), 3),
            ("banana".to_string(), 0),
        ]);
        assert!(ledger.contains("apple"));
        assert!(!ledger.contains("banana"));
        assert_eq!(ledger.len(), 1);
    }

    proptest! {
        #[test]
        fn quantity_tracks_adds_and_removes(
            ops in proptest::collection::vec((any::<bool>(), 0u64..1_000), 0..50)
        ) {
            let mut ledger = StockLedger::new();
            let mut expected: u64 = 0;

            for (is_add, qty) in ops {
                if is_add {
                    ledger.add("widget", qty).unwrap();
                    expected += qty;
                } else {
                    match ledger.remove("widget", qty) {
                        Ok(()) => {
                            expected = if expected <= qty { 0 } else { expected - qty };
                        }
                        Err(StockError::NotFound(_)) => prop_assert_eq!(expected, 0),
                        Err(e) => prop_assert!(false, "unexpected error: {e}"),
                    }
                }
                prop_assert_eq!(ledger.quantity("widget"), expected);
                prop_assert_eq!(ledger.contains("widget"), expected > 0);
            }
        }
    }
}
