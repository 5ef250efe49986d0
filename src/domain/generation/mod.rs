//! Generation domain module

pub mod fallback;
mod form_fields;
mod request;

pub use fallback::{fallback_text, FallbackKind};
pub use form_fields::{FieldValue, FormFields};
pub use request::{GenerationRequest, InstructionPair};
