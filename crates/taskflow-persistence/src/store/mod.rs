pub mod atomic_writer;
pub mod json_dir_store;
pub mod memory_store;

pub use atomic_writer::AtomicWriter;
pub use json_dir_store::{JsonDirStore, JsonEnvelope};
pub use memory_store::MemoryStore;
