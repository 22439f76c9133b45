pub mod error;
pub mod json_file;
pub mod memory;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use redb::RedbStore;
pub use traits::KVStore;
