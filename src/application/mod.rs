//! Application layer - Use cases, services and port interfaces
//!
//! Contains the generation pipeline (settings store, orchestrator,
//! prober, history) and trait definitions for external systems.

pub mod generate;
pub mod history;
pub mod orchestrator;
pub mod ports;
pub mod prober;
pub mod settings_store;

// Re-export services and use cases
pub use generate::{GeneratePromptUseCase, GeneratedPrompt};
pub use history::{HistoryEntry, HistoryRecorder, HISTORY_KEY, MAX_HISTORY_ENTRIES};
pub use orchestrator::{GenerationOrchestrator, GenerationOutcome, DEFAULT_TIMEOUT};
pub use prober::ConnectivityProber;
pub use settings_store::{VendorSettingsStore, SETTINGS_KEY};
