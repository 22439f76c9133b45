//! History ledger: the newest-first list of past batches, capped at
//! [`HISTORY_CAPACITY`] entries and stored whole under [`HISTORY_KEY`].

use std::sync::Arc;

use tracing::{debug, info};

use lote_kv::KVStore;

use crate::error::LoteError;
use crate::ids;
use crate::model::{BatchRecord, HistoryEntry};
use crate::stats::{self, StockSummary};
use crate::stored;

pub const HISTORY_KEY: &str = "history";

/// Entries kept; older ones are dropped, not archived.
pub const HISTORY_CAPACITY: usize = 10;

/// HistoryLedger supports append-then-evict only; entries are never edited
/// or removed one by one.
pub struct HistoryLedger {
    kv: Arc<dyn KVStore>,
}

impl HistoryLedger {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Entries, newest first. Absent or undecodable history reads as empty.
    pub fn load(&self) -> Result<Vec<HistoryEntry>, LoteError> {
        stored::load(self.kv.as_ref(), HISTORY_KEY)
    }

    /// Put `entry` in front, keep the first [`HISTORY_CAPACITY`], persist the
    /// result in one write. Returns the ledger as stored.
    pub fn record(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, LoteError> {
        let mut entries = self.load()?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAPACITY);
        stored::save(self.kv.as_ref(), HISTORY_KEY, &entries)?;
        debug!("history now holds {} entries", entries.len());
        Ok(entries)
    }

    /// Give `record` an id derived from `now_millis` and record it.
    pub fn append(&self, record: BatchRecord, now_millis: i64) -> Result<HistoryEntry, LoteError> {
        let newest = self.load()?.into_iter().next();
        let id = ids::next_id(now_millis, newest.as_ref().map(|e| e.id.as_str()));
        let entry = HistoryEntry { id, record };
        self.record(entry.clone())?;
        info!("recorded batch {} ({})", entry.id, entry.record.product_type);
        Ok(entry)
    }

    pub fn find(&self, id: &str) -> Result<Option<HistoryEntry>, LoteError> {
        Ok(self.load()?.into_iter().find(|e| e.id == id))
    }

    pub fn summary(&self) -> Result<StockSummary, LoteError> {
        Ok(stats::summarize(&self.load()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lote_kv::MemoryStore;

    fn record(product: &str) -> BatchRecord {
        BatchRecord {
            operator_name: "Juan".into(),
            operator_code: "OP-001".into(),
            product_type: product.into(),
            quantity: "100".into(),
            supplier: "Agro Sur S.A.".into(),
            date: "17/10/2026, 14:05:09".into(),
        }
    }

    fn ledger() -> (MemoryStore, HistoryLedger) {
        let kv = MemoryStore::new();
        let ledger = HistoryLedger::new(Arc::new(kv.clone()));
        (kv, ledger)
    }

    #[test]
    fn empty_store_loads_empty() {
        let (_, ledger) = ledger();
        assert!(ledger.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_history_loads_empty_and_is_reset_on_record() {
        let (kv, ledger) = ledger();
        kv.set(HISTORY_KEY, br#"{"not":"a list"}"#).unwrap();
        assert!(ledger.load().unwrap().is_empty());

        ledger.append(record("Cúrcuma"), 1).unwrap();
        assert_eq!(ledger.load().unwrap().len(), 1);
    }

    #[test]
    fn round_trip_preserves_order() {
        let (_, ledger) = ledger();
        for (i, product) in ["A", "B", "C", "D"].iter().enumerate() {
            ledger.append(record(product), 1_000 + i as i64).unwrap();
        }

        let products: Vec<String> = ledger
            .load()
            .unwrap()
            .into_iter()
            .map(|e| e.record.product_type)
            .collect();
        assert_eq!(products, vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn eleventh_entry_evicts_the_oldest() {
        let (_, ledger) = ledger();
        for i in 0..11 {
            ledger.append(record(&format!("P{i}")), 1_000 + i).unwrap();
        }

        let entries = ledger.load().unwrap();
        assert_eq!(entries.len(), HISTORY_CAPACITY);
        assert_eq!(entries[0].record.product_type, "P10");
        assert_eq!(entries[9].record.product_type, "P1");
        assert!(entries.iter().all(|e| e.record.product_type != "P0"));
    }

    #[test]
    fn same_millisecond_entries_get_distinct_ids() {
        let (_, ledger) = ledger();
        let a = ledger.append(record("A"), 5_000).unwrap();
        let b = ledger.append(record("B"), 5_000).unwrap();
        assert_eq!(a.id, "5000");
        assert_eq!(b.id, "5001");
    }

    #[test]
    fn find_by_id() {
        let (_, ledger) = ledger();
        ledger.append(record("A"), 10).unwrap();
        let b = ledger.append(record("B"), 20).unwrap();

        assert_eq!(ledger.find("20").unwrap(), Some(b));
        assert_eq!(ledger.find("99").unwrap(), None);
    }

    #[test]
    fn summary_covers_ledger() {
        let (_, ledger) = ledger();
        ledger.append(record("Cúrcuma"), 1).unwrap();
        ledger.append(record("Cúrcuma"), 2).unwrap();
        let summary = ledger.summary().unwrap();
        assert_eq!(summary.total_entries, 2);
        assert_eq!(summary.by_product[0].quantity, 200.0);
    }
}
