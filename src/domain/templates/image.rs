//! Image generation prompt builder

use serde::{Deserialize, Serialize};

use super::{or_marker, require, PromptTemplate, NOT_SPECIFIED};
use crate::domain::error::FormError;
use crate::domain::generation::{FormFields, InstructionPair};

const SYSTEM_INSTRUCTION: &str = r#"You are an expert image prompt engineer specializing in creating detailed prompts for AI image generation tools like DALL-E, Midjourney, and Stable Diffusion. Create highly detailed and specific prompts that will generate stunning images.

Guidelines:
- Include specific technical details
- Add artistic and stylistic elements
- Consider composition and lighting
- Include negative prompts when beneficial
- Optimize for the specified parameters
- Make prompts detailed but concise"#;

/// Image generator form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageForm {
    pub subject: String,
    pub style: String,
    pub composition: String,
    pub lighting: String,
    pub mood: String,
    pub colors: String,
    pub background: String,
    pub quality: String,
    pub aspect_ratio: String,
    pub camera_settings: String,
    pub post_processing: String,
    pub artistic_style: String,
    pub negative_prompt: String,
}

impl Default for ImageForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            style: "photorealistic".to_string(),
            composition: "portrait".to_string(),
            lighting: "natural".to_string(),
            mood: "neutral".to_string(),
            colors: "vibrant".to_string(),
            background: "blurred".to_string(),
            quality: "4K".to_string(),
            aspect_ratio: "16:9".to_string(),
            camera_settings: String::new(),
            post_processing: "minimal".to_string(),
            artistic_style: String::new(),
            negative_prompt: String::new(),
        }
    }
}

impl PromptTemplate for ImageForm {
    fn instructions(&self) -> InstructionPair {
        let user = format!(
            "Create a detailed image generation prompt for:
- Subject: {}
- Style: {}
- Composition: {}
- Lighting: {}
- Mood: {}
- Colors: {}
- Background: {}
- Quality: {}
- Aspect Ratio: {}
- Camera Settings: {}
- Post Processing: {}
- Artistic Style: {}
- Negative Prompt Elements: {}

Generate a comprehensive image prompt with technical specifications and artistic direction.",
            or_marker(&self.subject, NOT_SPECIFIED),
            or_marker(&self.style, NOT_SPECIFIED),
            or_marker(&self.composition, NOT_SPECIFIED),
            or_marker(&self.lighting, NOT_SPECIFIED),
            or_marker(&self.mood, NOT_SPECIFIED),
            or_marker(&self.colors, NOT_SPECIFIED),
            or_marker(&self.background, NOT_SPECIFIED),
            or_marker(&self.quality, NOT_SPECIFIED),
            or_marker(&self.aspect_ratio, NOT_SPECIFIED),
            or_marker(&self.camera_settings, NOT_SPECIFIED),
            or_marker(&self.post_processing, NOT_SPECIFIED),
            or_marker(&self.artistic_style, "Default"),
            or_marker(&self.negative_prompt, "None specified"),
        );

        InstructionPair::new(SYSTEM_INSTRUCTION, user)
    }

    fn context(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.insert_text("subject", Some(&self.subject));
        fields.insert_text("style", Some(&self.style));
        fields.insert_text("composition", Some(&self.composition));
        fields.insert_text("lighting", Some(&self.lighting));
        fields.insert_text("mood", Some(&self.mood));
        fields.insert_text("quality", Some(&self.quality));
        fields.insert_text("aspect_ratio", Some(&self.aspect_ratio));
        fields
    }

    fn title(&self) -> String {
        format!("{} - Image", or_marker(&self.subject, "Untitled"))
    }

    fn category(&self) -> &str {
        "image"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.subject, "subject")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_instruction_lists_fields_and_markers() {
        let form = ImageForm {
            subject: "an old lighthouse".to_string(),
            camera_settings: "f/1.8, 85mm".to_string(),
            ..Default::default()
        };
        let pair = form.instructions();
        assert!(pair.system.contains("DALL-E, Midjourney, and Stable Diffusion"));
        assert!(pair.user.contains("- Subject: an old lighthouse"));
        assert!(pair.user.contains("- Camera Settings: f/1.8, 85mm"));
        assert!(pair.user.contains("- Artistic Style: Default"));
        assert!(pair.user.contains("- Negative Prompt Elements: None specified"));
        assert!(pair.user.contains("- Aspect Ratio: 16:9"));
    }

    #[test]
    fn validate_requires_subject() {
        assert!(ImageForm::default().validate().is_err());
    }

    #[test]
    fn context_selects_image_fallback() {
        let form = ImageForm {
            subject: "a fox".to_string(),
            ..Default::default()
        };
        assert_eq!(form.context().text("subject"), Some("a fox"));
        assert_eq!(form.category(), "image");
    }
}
