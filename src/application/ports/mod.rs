//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod persistence;
pub mod provider;

// Re-export common types
pub use config::ConfigStore;
pub use persistence::{PersistenceBackend, PersistenceError};
pub use provider::{ProviderAdapter, ProviderError};
