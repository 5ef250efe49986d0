//! Key-value persistence adapters

mod file_store;
mod memory;

pub use file_store::{default_data_dir, FileStore};
pub use memory::MemoryStore;
