//! Reading and writing JSON values through the KV port.
//!
//! Decoding follows an explicit empty-default fallback: a key that is absent
//! or holds something unparseable reads as `T::default()`. Storage backend
//! failures are still errors.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use lote_kv::KVStore;

use crate::error::LoteError;

/// Outcome of decoding one stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Stored<T> {
    /// Nothing under the key yet.
    Absent,
    /// Something is there but it does not decode as `T`.
    Malformed(String),
    Present(T),
}

impl<T: DeserializeOwned> Stored<T> {
    pub fn decode(bytes: Option<&[u8]>) -> Self {
        match bytes {
            None => Stored::Absent,
            Some(raw) => match serde_json::from_slice(raw) {
                Ok(value) => Stored::Present(value),
                Err(e) => Stored::Malformed(e.to_string()),
            },
        }
    }
}

impl<T: Default> Stored<T> {
    /// Apply the fallback: absent and malformed both become the empty value.
    pub fn or_empty(self, key: &str) -> T {
        match self {
            Stored::Present(value) => value,
            Stored::Absent => T::default(),
            Stored::Malformed(reason) => {
                warn!("stored value for {} is malformed ({}), treating as empty", key, reason);
                T::default()
            }
        }
    }
}

/// Read `key` and decode it, falling back to empty.
pub(crate) fn load<T>(kv: &dyn KVStore, key: &str) -> Result<T, LoteError>
where
    T: DeserializeOwned + Default,
{
    let raw = kv.get(key)?;
    debug!("load {} ({} bytes)", key, raw.as_ref().map_or(0, Vec::len));
    Ok(Stored::decode(raw.as_deref()).or_empty(key))
}

/// Serialize `value` and overwrite `key` with it in one write.
pub(crate) fn save<T: Serialize>(kv: &dyn KVStore, key: &str, value: &T) -> Result<(), LoteError> {
    let bytes = serde_json::to_vec(value).map_err(|e| LoteError::Internal(e.to_string()))?;
    kv.set(key, &bytes)?;
    debug!("save {} ({} bytes)", key, bytes.len());
    Ok(())
}
