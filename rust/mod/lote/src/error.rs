use thiserror::Error;

use lote_blob::BlobError;
use lote_kv::KVError;

use crate::model::RequiredField;

/// Stable, machine-readable error codes. Messages may change; codes don't.
pub mod error_code {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const EXPORT_ERROR: &str = "EXPORT_ERROR";
    pub const RENDER_ERROR: &str = "RENDER_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

#[derive(Error, Debug)]
pub enum LoteError {
    /// One or more required form fields are empty. Nothing was written.
    #[error("missing required fields: {}", field_list(.0))]
    Validation(Vec<RequiredField>),

    #[error("{0}")]
    NotFound(String),

    /// The persistence backend itself failed. Undecodable values never
    /// end up here; they read as empty.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("QR render error: {0}")]
    Render(String),

    #[error("{0}")]
    Internal(String),
}

fn field_list(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl LoteError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LoteError::Validation(_) => error_code::VALIDATION_FAILED,
            LoteError::NotFound(_) => error_code::NOT_FOUND,
            LoteError::Storage(_) => error_code::STORAGE_ERROR,
            LoteError::Export(_) => error_code::EXPORT_ERROR,
            LoteError::Render(_) => error_code::RENDER_ERROR,
            LoteError::Internal(_) => error_code::INTERNAL,
        }
    }
}

impl From<KVError> for LoteError {
    fn from(err: KVError) -> Self {
        LoteError::Storage(err.to_string())
    }
}

impl From<BlobError> for LoteError {
    fn from(err: BlobError) -> Self {
        LoteError::Export(err.to_string())
    }
}
