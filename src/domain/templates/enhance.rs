//! Prompt enhancement builder

use serde::{Deserialize, Serialize};

use super::{or_marker, require, PromptTemplate, NOT_SPECIFIED};
use crate::domain::error::FormError;
use crate::domain::generation::{FormFields, InstructionPair};

/// Enhancer form: an existing prompt plus the desired enhancement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnhanceForm {
    pub prompt: String,
    pub enhancement_type: String,
    pub intensity: String,
}

impl Default for EnhanceForm {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            enhancement_type: "cinematic".to_string(),
            intensity: "medium".to_string(),
        }
    }
}

impl PromptTemplate for EnhanceForm {
    fn instructions(&self) -> InstructionPair {
        let kind = or_marker(&self.enhancement_type, "cinematic");
        let intensity = or_marker(&self.intensity, "medium");

        let system = format!(
            "You are a professional video prompt enhancer. Your task is to enhance video prompts with {kind} style at {intensity} intensity level.

Enhancement Guidelines:
- Add specific visual details and technical specifications
- Include camera movements, lighting, and composition
- Enhance mood and atmosphere
- Add professional terminology
- Maintain the original concept while improving quality
- Make the prompt more detailed and specific"
        );

        let user = format!(
            "Enhance this video prompt with {kind} style at {intensity} intensity:

Original Prompt: {}

Please provide an enhanced version that includes:
1. Detailed visual descriptions
2. Professional camera work specifications
3. Lighting and color details
4. Enhanced mood and atmosphere
5. Technical parameters
6. Style-specific elements for {kind}",
            or_marker(&self.prompt, NOT_SPECIFIED),
        );

        InstructionPair::new(system, user)
    }

    fn context(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.insert_text("prompt", Some(&self.prompt));
        fields.insert_text("style", Some(&self.enhancement_type));
        fields.insert_text("intensity", Some(&self.intensity));
        fields
    }

    fn title(&self) -> String {
        format!(
            "Enhanced ({}) prompt",
            or_marker(&self.enhancement_type, "cinematic")
        )
    }

    fn category(&self) -> &str {
        "enhancement"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.prompt, "prompt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_carry_type_and_intensity() {
        let form = EnhanceForm {
            prompt: "A fox in snow".to_string(),
            enhancement_type: "dramatic".to_string(),
            intensity: "strong".to_string(),
        };
        let pair = form.instructions();
        assert!(pair.system.contains("with dramatic style at strong intensity level"));
        assert!(pair.user.contains("Original Prompt: A fox in snow"));
        assert!(pair.user.contains("Style-specific elements for dramatic"));
    }

    #[test]
    fn blank_prompt_renders_marker() {
        let pair = EnhanceForm::default().instructions();
        assert!(pair.user.contains("Original Prompt: Not specified"));
        assert!(EnhanceForm::default().validate().is_err());
    }
}
