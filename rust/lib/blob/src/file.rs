use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::BlobError;
use crate::traits::BlobStore;

fn io_err(e: std::io::Error) -> BlobError {
    BlobError::Io(e.to_string())
}

/// FileStore writes artifacts into a single export directory:
///   name "QR-Jengibre-1760700000000.png" → `{dir}/QR-Jengibre-1760700000000.png`
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a FileStore rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(dir).map_err(io_err)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Map a name to its path. Only a single plain file name inside `dir` is
    /// accepted; dots within the name (`QR-Mezcla..Especias-1.png`) are fine.
    fn resolve(&self, name: &str) -> Result<PathBuf, BlobError> {
        let mut components = Path::new(name).components();
        let single_file = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_file || name.contains('/') || name.contains('\\') {
            return Err(BlobError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

impl BlobStore for FileStore {
    fn put(&self, name: &str, data: &[u8]) -> Result<PathBuf, BlobError> {
        let path = self.resolve(name)?;
        fs::write(&path, data).map_err(io_err)?;
        debug!("FileStore: wrote {:?} ({} bytes)", path, data.len());
        Ok(path)
    }
}
