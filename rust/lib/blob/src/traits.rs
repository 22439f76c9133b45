use std::path::PathBuf;

use crate::error::BlobError;

/// BlobStore is where downloaded artifacts land (exported QR images).
///
/// Names are flat file names such as `QR-Cúrcuma-1760700000000.png`; there
/// is no directory nesting.
pub trait BlobStore: Send + Sync {
    /// Store a file, overwriting any previous file of the same name.
    /// Returns the location it was written to.
    fn put(&self, name: &str, data: &[u8]) -> Result<PathBuf, BlobError>;
}
