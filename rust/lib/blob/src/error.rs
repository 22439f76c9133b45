use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(String),

    /// Names must be a single file component inside the store directory.
    #[error("invalid file name: {0:?}")]
    InvalidName(String),
}
