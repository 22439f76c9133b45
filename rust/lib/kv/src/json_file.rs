use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::error::KVError;
use crate::traits::KVStore;

/// JsonFileStore keeps every key in one JSON document on disk:
///
/// ```text
/// {
///   "history": "[{\"id\":\"1760700000000\", ...}]",
///   "products": "[\"Cúrcuma\",\"Jengibre\"]",
///   "suppliers": "[\"Agro Sur S.A.\"]"
/// }
/// ```
///
/// Values are string blobs, the same shape browser local storage hands out.
/// The document is read once at open and rewritten in full on every `set`
/// (temp file + rename).
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the document at `path`. A missing file starts empty. So does a
    /// corrupt one; it is replaced by the next write.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let entries = if path.is_file() {
            let raw = fs::read(path).map_err(|e| KVError::Storage(e.to_string()))?;
            match serde_json::from_slice::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => {
                    debug!("JsonFileStore: loaded {} keys from {:?}", entries.len(), path);
                    entries
                }
                Err(e) => {
                    warn!("JsonFileStore: {:?} is not a valid document ({}), starting empty", path, e);
                    BTreeMap::new()
                }
            }
        } else {
            debug!("JsonFileStore: {:?} does not exist, starting empty", path);
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), KVError> {
        let doc = serde_json::to_vec_pretty(entries)
            .map_err(|e| KVError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| KVError::Storage(e.to_string()))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, &doc).map_err(|e| KVError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl KVStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| KVError::Storage("lock poisoned".into()))?;
        Ok(entries.get(key).map(|v| v.as_bytes().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let text = std::str::from_utf8(value)
            .map_err(|e| KVError::Serialization(format!("value for {key} is not UTF-8: {e}")))?;

        let mut entries = self
            .entries
            .write()
            .map_err(|_| KVError::Storage("lock poisoned".into()))?;
        let previous = entries.insert(key.to_string(), text.to_string());

        if let Err(e) = self.flush(&entries) {
            // Keep memory in step with disk.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }

        debug!("JsonFileStore: wrote {} ({} bytes)", key, value.len());
        Ok(())
    }
}
