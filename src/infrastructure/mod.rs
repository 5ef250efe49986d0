//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! vendor HTTP adapters, key-value stores and the TOML config store.

pub mod config;
pub mod persistence;
pub mod providers;

// Re-export adapters
pub use config::XdgConfigStore;
pub use persistence::{FileStore, MemoryStore};
pub use providers::{build_adapters, BuiltinAdapter, GoogleAdapter, OpenAiAdapter};
