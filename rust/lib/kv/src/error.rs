use thiserror::Error;

/// Failures of the backend itself. A value that exists but can't be
/// decoded by the caller is not a KVError; the store hands back bytes.
#[derive(Error, Debug)]
pub enum KVError {
    /// The backing file or database could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// The store's own container format (not a stored value) is unreadable.
    #[error("serialization error: {0}")]
    Serialization(String),
}
