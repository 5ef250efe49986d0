//! Batch variation builder

use serde::{Deserialize, Serialize};

use super::{or_marker, require, PromptTemplate, NOT_SPECIFIED};
use crate::domain::error::FormError;
use crate::domain::generation::fallback::{
    DEFAULT_DURATION, DEFAULT_MOOD, DEFAULT_QUALITY, DEFAULT_STYLE,
};
use crate::domain::generation::{FormFields, InstructionPair};

/// Upper bound on variations per batch
pub const MAX_BATCH_VARIATIONS: usize = 20;

const SYSTEM_INSTRUCTION: &str = r#"You are an expert video prompt generator creating variations of video prompts.
Generate unique and creative prompts while maintaining the core concept.

Guidelines:
- Keep the main topic but vary the execution
- Adapt style, mood, and technical aspects
- Make each variation distinct and professional
- Include specific details for video production"#;

/// Batch form: one topic and option lists to cycle through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchForm {
    pub topic: String,
    pub variations: usize,
    pub styles: Vec<String>,
    pub durations: Vec<String>,
    pub moods: Vec<String>,
    pub qualities: Vec<String>,
}

impl Default for BatchForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            variations: 3,
            styles: vec![
                "cinematic".to_string(),
                "commercial".to_string(),
                "artistic".to_string(),
            ],
            durations: vec!["30s".to_string(), "60s".to_string()],
            moods: vec!["energetic".to_string(), "calm".to_string()],
            qualities: vec!["4K".to_string()],
        }
    }
}

/// Pick the entry for variation `index`, cycling through the list
fn cycle<'a>(options: &'a [String], index: usize, default: &'a str) -> &'a str {
    let non_blank: Vec<&String> = options.iter().filter(|o| !o.trim().is_empty()).collect();
    if non_blank.is_empty() {
        default
    } else {
        non_blank[index % non_blank.len()].trim()
    }
}

impl BatchForm {
    /// Expand into individual variations. Variation `i` takes the
    /// `i mod len`-th entry of each option list.
    pub fn expand(&self) -> Vec<BatchVariation> {
        let count = self.variations.clamp(1, MAX_BATCH_VARIATIONS);
        (0..count)
            .map(|i| BatchVariation {
                id: i + 1,
                topic: self.topic.trim().to_string(),
                style: cycle(&self.styles, i, DEFAULT_STYLE).to_string(),
                duration: cycle(&self.durations, i, DEFAULT_DURATION).to_string(),
                mood: cycle(&self.moods, i, DEFAULT_MOOD).to_string(),
                quality: cycle(&self.qualities, i, DEFAULT_QUALITY).to_string(),
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.topic, "topic")
    }
}

/// A single variation produced by [`BatchForm::expand`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchVariation {
    pub id: usize,
    pub topic: String,
    pub style: String,
    pub duration: String,
    pub mood: String,
    pub quality: String,
}

impl PromptTemplate for BatchVariation {
    fn instructions(&self) -> InstructionPair {
        let user = format!(
            "Create a {style} video prompt for:
- Topic: {}
- Style: {style}
- Duration: {}
- Mood: {}
- Quality: {}

Generate a unique variation that maintains the core concept but offers a different creative approach.",
            or_marker(&self.topic, NOT_SPECIFIED),
            or_marker(&self.duration, NOT_SPECIFIED),
            or_marker(&self.mood, NOT_SPECIFIED),
            or_marker(&self.quality, NOT_SPECIFIED),
            style = or_marker(&self.style, DEFAULT_STYLE),
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
        fields.insert("variation", self.id as i64);
        fields
    }

    fn title(&self) -> String {
        format!(
            "{} - {} #{}",
            or_marker(&self.topic, "Untitled"),
            or_marker(&self.style, DEFAULT_STYLE),
            self.id
        )
    }

    fn category(&self) -> &str {
        "batch"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.topic, "topic")
    }
}
