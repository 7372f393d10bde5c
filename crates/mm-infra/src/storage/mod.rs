pub mod file_kv;
pub mod memory;

pub use file_kv::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
