use std::fmt;

use serde::{Deserialize, Serialize};

/// A form field that must be non-blank before a record is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    OperatorName,
    OperatorCode,
    ProductType,
    Quantity,
    Supplier,
}

impl RequiredField {
    /// Form order; validation reports missing fields in this order.
    pub const ALL: [RequiredField; 5] = [
        RequiredField::OperatorName,
        RequiredField::OperatorCode,
        RequiredField::ProductType,
        RequiredField::Quantity,
        RequiredField::Supplier,
    ];

    /// Wire name of the field (matches the persisted JSON).
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::OperatorName => "operatorName",
            RequiredField::OperatorCode => "operatorCode",
            RequiredField::ProductType => "productType",
            RequiredField::Quantity => "quantity",
            RequiredField::Supplier => "supplier",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form input, exactly as typed. `date` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSubmission {
    pub operator_name: String,
    pub operator_code: String,
    pub product_type: String,
    pub quantity: String,
    pub supplier: String,
    pub date: String,
}

impl RawSubmission {
    pub fn value(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::OperatorName => &self.operator_name,
            RequiredField::OperatorCode => &self.operator_code,
            RequiredField::ProductType => &self.product_type,
            RequiredField::Quantity => &self.quantity,
            RequiredField::Supplier => &self.supplier,
        }
    }

    /// Required fields that are empty or whitespace-only, in form order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|f| self.value(*f).trim().is_empty())
            .collect()
    }
}

/// BatchRecord: one traceable production batch.
///
/// Built by [`crate::builder::finalize`]; after that every required field is
/// non-blank and `date` is non-empty. `quantity` stays text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub operator_name: String,
    pub operator_code: String,
    pub product_type: String,
    pub quantity: String,
    pub supplier: String,
    pub date: String,
}

/// A BatchRecord as kept in the history ledger. Serialized flat:
/// `{"id": "...", "operatorName": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,

    #[serde(flatten)]
    pub record: BatchRecord,
}
