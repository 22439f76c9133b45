//! LoteSession: one operator's working session over a store.
//!
//! Mirrors the form screen: submit a batch, look at the generated code,
//! download it, start a new one. Everything happens synchronously in the
//! calling thread.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info};

use lote_blob::BlobStore;
use lote_kv::KVStore;

use crate::builder::BatchRecordBuilder;
use crate::error::LoteError;
use crate::history::HistoryLedger;
use crate::ids;
use crate::model::{HistoryEntry, QrPayload, RawSubmission};
use crate::qr::{QrEncoder, RenderedQr};
use crate::stats::StockSummary;
use crate::suggestion::{SuggestionField, SuggestionRegistry};

/// The code currently on display.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    pub entry: HistoryEntry,
    pub payload: QrPayload,
    pub qr: RenderedQr,
    /// Creation time (epoch ms); names the downloaded file. Read back from
    /// the entry id, so when two submissions land in the same millisecond
    /// the later one carries its bumped id here, not the wall clock.
    pub created_at_ms: i64,
}

impl GeneratedCode {
    pub fn file_name(&self) -> String {
        download_file_name(&self.entry.record.product_type, self.created_at_ms)
    }
}

/// `QR-<productType>-<createdMillis>.png`. Path separators in the product
/// name become `_` so the name stays a single file.
pub fn download_file_name(product_type: &str, created_at_ms: i64) -> String {
    let product: String = product_type
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("QR-{}-{}.png", product, created_at_ms)
}

pub struct LoteSession {
    registry: SuggestionRegistry,
    ledger: HistoryLedger,
    encoder: QrEncoder,
    current: Option<GeneratedCode>,
}

impl LoteSession {
    pub fn new(kv: Arc<dyn KVStore>, encoder: QrEncoder) -> Self {
        Self {
            registry: SuggestionRegistry::new(Arc::clone(&kv)),
            ledger: HistoryLedger::new(kv),
            encoder,
            current: None,
        }
    }

    /// Submit the form now. See [`LoteSession::submit_at`].
    pub fn submit(&mut self, raw: RawSubmission) -> Result<&GeneratedCode, LoteError> {
        self.submit_at(raw, Local::now())
    }

    /// Validate, register suggestions, record history, render the code.
    ///
    /// On a validation error nothing is written and the code on display
    /// (if any) stays.
    pub fn submit_at(
        &mut self,
        raw: RawSubmission,
        now: DateTime<Local>,
    ) -> Result<&GeneratedCode, LoteError> {
        let record = BatchRecordBuilder::new(&self.registry).build(raw, now.naive_local())?;
        let created_at_ms = now.timestamp_millis();
        let entry = self.ledger.append(record, created_at_ms)?;

        let code = self.display(entry)?;
        info!(
            "generated code {} for {} ({})",
            code.entry.id, code.entry.record.product_type, code.entry.record.quantity
        );
        Ok(code)
    }

    /// Show the code for a ledger entry again.
    pub fn reopen(&mut self, id: &str) -> Result<&GeneratedCode, LoteError> {
        let entry = self
            .ledger
            .find(id)?
            .ok_or_else(|| LoteError::NotFound(format!("history entry '{id}' not found")))?;
        self.display(entry)
    }

    /// Show the newest ledger entry's code, if there is one.
    pub fn reopen_latest(&mut self) -> Result<Option<&GeneratedCode>, LoteError> {
        match self.ledger.load()?.into_iter().next() {
            Some(entry) => self.display(entry).map(Some),
            None => Ok(None),
        }
    }

    fn display(&mut self, entry: HistoryEntry) -> Result<&GeneratedCode, LoteError> {
        let payload = QrPayload::from(&entry.record);
        let qr = self.encoder.render(&payload)?;
        // Entries written by older tools may lack a numeric id; fall back to now.
        let created_at_ms =
            ids::created_millis(&entry.id).unwrap_or_else(|| Local::now().timestamp_millis());
        Ok(&*self.current.insert(GeneratedCode {
            entry,
            payload,
            qr,
            created_at_ms,
        }))
    }

    /// "New code": clear the display. Stored data is untouched.
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&GeneratedCode> {
        self.current.as_ref()
    }

    /// Save the displayed code as a PNG into `sink`. Returns the file name,
    /// or None without doing anything when no code is displayed.
    pub fn download(&self, sink: &dyn BlobStore) -> Result<Option<String>, LoteError> {
        let Some(code) = &self.current else {
            debug!("download requested with no code on display, ignoring");
            return Ok(None);
        };
        let name = code.file_name();
        let path = sink.put(&name, code.qr.png())?;
        info!("saved {}", path.display());
        Ok(Some(name))
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>, LoteError> {
        self.ledger.load()
    }

    pub fn suggestions(&self, field: SuggestionField, query: &str) -> Result<Vec<String>, LoteError> {
        self.registry.filter(field, query)
    }

    pub fn summary(&self) -> Result<StockSummary, LoteError> {
        self.ledger.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lote_blob::FileStore;
    use lote_kv::MemoryStore;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 4, h, m, s).earliest().unwrap()
    }

    fn raw(product: &str) -> RawSubmission {
        RawSubmission {
            operator_name: "Juan".into(),
            operator_code: "OP-001".into(),
            product_type: product.into(),
            quantity: "100".into(),
            supplier: "Agro Sur S.A.".into(),
            date: String::new(),
        }
    }

    fn session() -> (MemoryStore, LoteSession) {
        let kv = MemoryStore::new();
        let session = LoteSession::new(Arc::new(kv.clone()), QrEncoder::default());
        (kv, session)
    }

    #[test]
    fn file_name_is_product_and_millis() {
        assert_eq!(download_file_name("Cúrcuma", 1_760_700_000_000), "QR-Cúrcuma-1760700000000.png");
        assert_eq!(download_file_name("Té/Hierbas", 5), "QR-Té_Hierbas-5.png");
    }

    #[test]
    fn file_name_keeps_dots_and_flattens_separators() {
        assert_eq!(download_file_name("Mezcla..Especias", 7), "QR-Mezcla..Especias-7.png");
        assert_eq!(download_file_name("Pimienta S.A..", 7), "QR-Pimienta S.A..-7.png");
        assert_eq!(download_file_name(".oculto", 7), "QR-.oculto-7.png");
        assert_eq!(download_file_name("..", 7), "QR-..-7.png");
        assert_eq!(download_file_name("/\\/", 7), "QR-___-7.png");
    }

    #[test]
    fn download_accepts_unusual_product_names() {
        let tmp = TempDir::new().unwrap();
        let sink = FileStore::open(tmp.path()).unwrap();
        let (_, mut session) = session();

        for (i, product) in ["Mezcla..Especias", "Pimienta S.A..", ".oculto", "..", "/\\/"]
            .into_iter()
            .enumerate()
        {
            session.submit_at(raw(product), at(9, 0, i as u32)).unwrap();
            let name = session.download(&sink).unwrap().unwrap();
            assert!(tmp.path().join(&name).is_file(), "{product:?} not saved as {name:?}");
        }
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 5);
    }

    #[test]
    fn submit_displays_code_and_records_history() {
        let (_, mut session) = session();
        let now = at(14, 5, 9);

        let code = session.submit_at(raw("Cúrcuma"), now).unwrap();
        assert_eq!(code.entry.record.date, "4/3/2026, 14:05:09");
        assert_eq!(code.payload.date, code.entry.record.date);
        assert_eq!(code.entry.id, now.timestamp_millis().to_string());
        assert_eq!(code.created_at_ms, now.timestamp_millis());

        assert_eq!(session.history().unwrap().len(), 1);
        assert!(session.current().is_some());
    }

    #[test]
    fn failed_submit_keeps_previous_code() {
        let (_, mut session) = session();
        session.submit_at(raw("Cúrcuma"), at(9, 0, 0)).unwrap();

        let err = session.submit_at(raw(""), at(9, 1, 0)).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(
            session.current().unwrap().entry.record.product_type,
            "Cúrcuma"
        );
        assert_eq!(session.history().unwrap().len(), 1);
    }

    #[test]
    fn download_without_code_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let sink = FileStore::open(tmp.path()).unwrap();
        let (_, session) = session();

        assert_eq!(session.download(&sink).unwrap(), None);
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[test]
    fn download_writes_named_png() {
        let tmp = TempDir::new().unwrap();
        let sink = FileStore::open(tmp.path()).unwrap();
        let (_, mut session) = session();
        let now = at(10, 0, 0);
        session.submit_at(raw("Jengibre"), now).unwrap();

        let name = session.download(&sink).unwrap().unwrap();
        assert_eq!(name, format!("QR-Jengibre-{}.png", now.timestamp_millis()));
        let bytes = std::fs::read(tmp.path().join(&name)).unwrap();
        assert_eq!(bytes, session.current().unwrap().qr.png());
    }

    #[test]
    fn reset_clears_display_only() {
        let tmp = TempDir::new().unwrap();
        let sink = FileStore::open(tmp.path()).unwrap();
        let (_, mut session) = session();
        session.submit_at(raw("Jengibre"), at(10, 0, 0)).unwrap();

        session.reset();
        assert!(session.current().is_none());
        assert_eq!(session.download(&sink).unwrap(), None);
        assert_eq!(session.history().unwrap().len(), 1);
    }

    #[test]
    fn reopen_redisplays_stored_entries() {
        let (_, mut session) = session();
        let first = session.submit_at(raw("A"), at(8, 0, 0)).unwrap().entry.id.clone();
        session.submit_at(raw("B"), at(8, 0, 1)).unwrap();
        session.reset();

        let code = session.reopen(&first).unwrap();
        assert_eq!(code.entry.record.product_type, "A");

        let latest = session.reopen_latest().unwrap().unwrap();
        assert_eq!(latest.entry.record.product_type, "B");

        let err = session.reopen("nope").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn reopen_latest_on_empty_ledger() {
        let (_, mut session) = session();
        assert!(session.reopen_latest().unwrap().is_none());
        assert!(session.current().is_none());
    }
}
