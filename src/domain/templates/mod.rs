//! Prompt template builders
//!
//! Each generator surface has a form type that turns its fields into an
//! [`InstructionPair`]. Builders are pure: no I/O and no hidden state.
//! Blank optional fields render as an explicit marker such as
//! "Not specified" so the instruction never carries an empty slot.

mod batch;
mod enhance;
mod image;
mod optimize;
mod topic;
mod veo3;

pub use batch::{BatchForm, BatchVariation, MAX_BATCH_VARIATIONS};
pub use enhance::EnhanceForm;
pub use image::ImageForm;
pub use optimize::{
    OptimizationResult, OptimizationVariant, OptimizeForm, VariantOptimizeForm, VariantTemplate,
    ALL_VARIANTS,
};
pub use topic::TopicForm;
pub use veo3::{AudioSettings, Scene, Veo3Form};

use crate::domain::error::FormError;
use crate::domain::generation::{FormFields, GenerationRequest, InstructionPair};

/// Marker for optional fields the user left blank
pub const NOT_SPECIFIED: &str = "Not specified";

/// A generator surface that can be turned into a generation request
pub trait PromptTemplate {
    /// Build the system and user instructions
    fn instructions(&self) -> InstructionPair;

    /// Form values handed to the orchestrator for fallback rendering
    fn context(&self) -> FormFields;

    /// Title recorded in history
    fn title(&self) -> String;

    /// History category
    fn category(&self) -> &str;

    /// Check required fields before generating
    fn validate(&self) -> Result<(), FormError> {
        Ok(())
    }

    /// Assemble the full request
    fn request(&self) -> GenerationRequest {
        GenerationRequest::from_pair(self.instructions(), self.context())
    }
}

/// Return `value` unless it is blank, in which case return `marker`
pub(crate) fn or_marker<'a>(value: &'a str, marker: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        marker
    } else {
        trimmed
    }
}

/// Fail with [`FormError::MissingField`] when a required value is blank
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builders fed entirely blank forms must not leak placeholder tokens
    fn assert_clean(template: &dyn PromptTemplate) {
        let pair = template.instructions();
        for text in [&pair.system, &pair.user] {
            assert!(!text.contains("undefined"), "leaked undefined: {text}");
            assert!(!text.contains("null"), "leaked null: {text}");
            assert!(!text.contains(": \n"), "empty slot: {text}");
            assert!(!text.trim().is_empty());
        }
        assert!(!template.title().trim().is_empty());
    }

    #[test]
    fn blank_forms_render_markers_not_placeholders() {
        let blank_topic = TopicForm {
            topic: String::new(),
            style: String::new(),
            duration: String::new(),
            mood: String::new(),
            quality: String::new(),
        };
        assert_clean(&blank_topic);
        assert_clean(&TopicForm::default());
        assert_clean(&Veo3Form::default());
        assert_clean(&ImageForm::default());
        assert_clean(&EnhanceForm::default());
        assert_clean(&OptimizeForm::default());
        for variant in ALL_VARIANTS {
            let form = VariantOptimizeForm::default();
            assert_clean(&form.for_variant(*variant));
        }
        for variation in BatchForm::default().expand() {
            assert_clean(&variation);
        }
    }

    #[test]
    fn or_marker_trims_and_substitutes() {
        assert_eq!(or_marker("  ", NOT_SPECIFIED), NOT_SPECIFIED);
        assert_eq!(or_marker(" noir ", NOT_SPECIFIED), "noir");
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require("", "topic").is_err());
        assert!(require("sunset", "topic").is_ok());
    }
}
