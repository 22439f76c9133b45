use serde::{Deserialize, Serialize};

use crate::error::LoteError;
use crate::model::BatchRecord;

/// QrPayload: what actually goes into the QR symbol.
///
/// Operator name and code are left out on purpose: the printed code travels
/// with the goods, the operator's identity stays in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    #[serde(rename = "producto")]
    pub product: String,

    #[serde(rename = "cantidad")]
    pub quantity: String,

    #[serde(rename = "proveedor")]
    pub supplier: String,

    #[serde(rename = "fecha")]
    pub date: String,
}

impl From<&BatchRecord> for QrPayload {
    fn from(record: &BatchRecord) -> Self {
        Self {
            product: record.product_type.clone(),
            quantity: record.quantity.clone(),
            supplier: record.supplier.clone(),
            date: record.date.clone(),
        }
    }
}

impl QrPayload {
    /// Compact JSON text encoded into the symbol. Non-ASCII is kept as UTF-8.
    pub fn to_json(&self) -> Result<String, LoteError> {
        serde_json::to_string(self).map_err(|e| LoteError::Internal(e.to_string()))
    }
}
