//! Topic-based video prompt builder

use serde::{Deserialize, Serialize};

use super::{or_marker, require, PromptTemplate, NOT_SPECIFIED};
use crate::domain::error::FormError;
use crate::domain::generation::fallback::{
    DEFAULT_DURATION, DEFAULT_MOOD, DEFAULT_QUALITY, DEFAULT_STYLE,
};
use crate::domain::generation::{FormFields, InstructionPair};

const SYSTEM_INSTRUCTION: &str = r#"You are an expert video prompt engineer specializing in creating professional video prompts for 2025 standards. Your task is to generate a detailed, creative video prompt based on the user's requirements.

Guidelines:
- Create prompts that are specific, detailed, and actionable
- Include camera movements, lighting, composition, and visual elements
- Consider modern video trends and techniques for 2025
- Make the prompt suitable for AI video generation tools
- Include technical specifications when relevant
- Ensure the prompt matches the specified style, mood, and quality

Format the output as a comprehensive video prompt that could be used directly with video generation AI tools."#;

/// Topic generator form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicForm {
    pub topic: String,
    pub style: String,
    pub duration: String,
    pub mood: String,
    pub quality: String,
}

impl Default for TopicForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            style: DEFAULT_STYLE.to_string(),
            duration: DEFAULT_DURATION.to_string(),
            mood: DEFAULT_MOOD.to_string(),
            quality: DEFAULT_QUALITY.to_string(),
        }
    }
}

impl PromptTemplate for TopicForm {
    fn instructions(&self) -> InstructionPair {
        let topic = or_marker(&self.topic, NOT_SPECIFIED);
        let style = or_marker(&self.style, NOT_SPECIFIED);
        let duration = or_marker(&self.duration, NOT_SPECIFIED);
        let mood = or_marker(&self.mood, NOT_SPECIFIED);
        let quality = or_marker(&self.quality, NOT_SPECIFIED);

        let user = format!(
            "Create a professional video prompt for:
- Topic: {topic}
- Style: {style}
- Duration: {duration}
- Mood: {mood}
- Quality: {quality}

Generate a detailed video prompt that includes visual descriptions, camera work, lighting, and any specific elements that would create an engaging {} {} video with a {} mood in {} quality.",
            or_marker(&self.duration, DEFAULT_DURATION),
            or_marker(&self.style, DEFAULT_STYLE),
            or_marker(&self.mood, DEFAULT_MOOD),
            or_marker(&self.quality, DEFAULT_QUALITY),
        );

        InstructionPair::new(SYSTEM_INSTRUCTION, user)
    }

    fn context(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.insert_text("topic", Some(&self.topic));
        fields.insert_text("style", Some(&self.style));
        fields.insert_text("duration", Some(&self.duration));
        fields.insert_text("mood", Some(&self.mood));
        fields.insert_text("quality", Some(&self.quality));
        fields
    }

    fn title(&self) -> String {
        format!(
            "{} - {}",
            or_marker(&self.topic, "Untitled"),
            or_marker(&self.style, DEFAULT_STYLE)
        )
    }

    fn category(&self) -> &str {
        or_marker(&self.style, DEFAULT_STYLE)
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.topic, "topic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sunset() -> TopicForm {
        TopicForm {
            topic: "sunset over the sea".to_string(),
            style: "documentary".to_string(),
            duration: "60s".to_string(),
            mood: "calm".to_string(),
            quality: "8K".to_string(),
        }
    }

    #[test]
    fn user_instruction_lists_every_field() {
        let pair = sunset().instructions();
        assert!(pair.user.contains("- Topic: sunset over the sea"));
        assert!(pair.user.contains("- Style: documentary"));
        assert!(pair.user.contains("- Duration: 60s"));
        assert!(pair.user.contains("- Mood: calm"));
        assert!(pair.user.contains("- Quality: 8K"));
        assert!(pair.user.contains("engaging 60s documentary video with a calm mood in 8K quality"));
    }

    #[test]
    fn system_instruction_is_fixed() {
        let pair = sunset().instructions();
        assert!(pair.system.starts_with("You are an expert video prompt engineer"));
    }

    #[test]
    fn blank_topic_renders_marker() {
        let pair = TopicForm::default().instructions();
        assert!(pair.user.contains("- Topic: Not specified"));
    }

    #[test]
    fn context_carries_fallback_fields() {
        let context = sunset().context();
        assert_eq!(context.text("topic"), Some("sunset over the sea"));
        assert_eq!(context.text("quality"), Some("8K"));
    }

    #[test]
    fn title_and_category() {
        let form = sunset();
        assert_eq!(form.title(), "sunset over the sea - documentary");
        assert_eq!(form.category(), "documentary");
    }

    #[test]
    fn validate_requires_topic() {
        assert!(TopicForm::default().validate().is_err());
        assert!(sunset().validate().is_ok());
    }

    #[test]
    fn deserializes_partial_form() {
        let form: TopicForm = serde_json::from_str(r#"{"topic":"rain"}"#).unwrap();
        assert_eq!(form.topic, "rain");
        assert_eq!(form.style, "cinematic");
    }
}
