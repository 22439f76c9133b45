//! LoteTracker core: batch records, autocomplete suggestions, the capped
//! history ledger and the QR code handed to operators.
//!
//! Everything persists through [`lote_kv::KVStore`] under three keys
//! (`history`, `products`, `suppliers`), each a JSON value overwritten whole.

pub mod builder;
pub mod error;
pub mod history;
pub mod ids;
pub mod model;
pub mod qr;
pub mod session;
pub mod stats;
pub mod stored;
pub mod suggestion;

pub use builder::{finalize, BatchRecordBuilder, DATE_FORMAT};
pub use error::LoteError;
pub use history::{HistoryLedger, HISTORY_CAPACITY, HISTORY_KEY};
pub use model::{BatchRecord, HistoryEntry, QrPayload, RawSubmission, RequiredField};
pub use qr::{QrEncoder, RenderedQr, DEFAULT_QR_SIZE};
pub use session::{download_file_name, GeneratedCode, LoteSession};
pub use stats::{summarize, ProductStock, StockSummary};
pub use stored::Stored;
pub use suggestion::{SuggestionField, SuggestionRegistry, SuggestionSet};
