use crate::error::KVError;

/// KVStore is the persistence port behind the tracker: a durable map from key
/// to an opaque blob, the same contract browser local storage offers.
///
/// Keys are flat names (`history`, `products`, `suppliers`). A `set` replaces
/// the whole value for its key atomically; nothing spans more than one key.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;
}
