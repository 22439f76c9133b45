//! Turning raw form input into a [`BatchRecord`].

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::LoteError;
use crate::model::{BatchRecord, RawSubmission};
use crate::suggestion::{SuggestionField, SuggestionRegistry};

/// Default `date` rendering, day/month/year then time (`17/10/2026, 14:05:09`).
pub const DATE_FORMAT: &str = "%-d/%-m/%Y, %H:%M:%S";

/// Validate `raw` and fill in the date. Pure; nothing is written.
///
/// Fails with every blank required field listed. A blank `date` becomes
/// `now` rendered with [`DATE_FORMAT`]; any other `date` is kept verbatim.
pub fn finalize(raw: RawSubmission, now: NaiveDateTime) -> Result<BatchRecord, LoteError> {
    let missing = raw.missing_fields();
    if !missing.is_empty() {
        return Err(LoteError::Validation(missing));
    }

    let date = if raw.date.trim().is_empty() {
        now.format(DATE_FORMAT).to_string()
    } else {
        raw.date
    };

    Ok(BatchRecord {
        operator_name: raw.operator_name,
        operator_code: raw.operator_code,
        product_type: raw.product_type,
        quantity: raw.quantity,
        supplier: raw.supplier,
        date,
    })
}

/// BatchRecordBuilder validates a submission and, once it is accepted,
/// teaches the suggestion registry its product and supplier.
pub struct BatchRecordBuilder<'a> {
    registry: &'a SuggestionRegistry,
}

impl<'a> BatchRecordBuilder<'a> {
    pub fn new(registry: &'a SuggestionRegistry) -> Self {
        Self { registry }
    }

    /// Validation runs before any write, so a rejected submission leaves the
    /// registry untouched.
    pub fn build(&self, raw: RawSubmission, now: NaiveDateTime) -> Result<BatchRecord, LoteError> {
        let record = finalize(raw, now)?;

        self.registry
            .register(SuggestionField::Products, &record.product_type)?;
        self.registry
            .register(SuggestionField::Suppliers, &record.supplier)?;

        debug!("built record for {} from {}", record.product_type, record.supplier);
        Ok(record)
    }
}
