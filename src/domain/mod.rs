//! Domain layer - Core business logic
//!
//! Contains value objects (vendors, settings, form fields, templates),
//! the fallback policy, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod generation;
pub mod templates;
pub mod vendor;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use generation::{fallback_text, FieldValue, FormFields, GenerationRequest, InstructionPair};
pub use templates::PromptTemplate;
pub use vendor::{
    ConnectionSnapshot, ConnectionStatus, Preferences, SettingsPatch, VendorId, VendorInfo,
    VendorSettings,
};
