//! Deterministic fallback text
//!
//! Used when no backend produced usable text. Output depends only on the
//! instruction and the form context: no network, no randomness.

use super::form_fields::FormFields;

pub const DEFAULT_STYLE: &str = "cinematic";
pub const DEFAULT_DURATION: &str = "30s";
pub const DEFAULT_MOOD: &str = "energetic";
pub const DEFAULT_QUALITY: &str = "4K";
pub const DEFAULT_SUBJECT: &str = "the specified subject";

const GENERIC_FALLBACK: &str = "High-quality video production with professional cinematography, \
dynamic camera work, and engaging visual storytelling. Modern techniques with attention to \
detail and creative composition.";

/// Which fallback template a context selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    Veo3,
    Image,
    Refinement,
    Topic,
    Generic,
}

impl FallbackKind {
    /// Pick the template from the fields present in the context
    pub fn select(user_instruction: &str, context: &FormFields) -> Self {
        if context.text("concept").is_some() {
            Self::Veo3
        } else if context.text("subject").is_some() {
            Self::Image
        } else if context.text("topic").is_some() {
            Self::Topic
        } else if context.text("prompt").is_some() {
            Self::Refinement
        } else if user_instruction.to_lowercase().contains("video") {
            Self::Topic
        } else {
            Self::Generic
        }
    }
}

/// Build the fallback text for a failed generation
pub fn fallback_text(user_instruction: &str, context: &FormFields) -> String {
    match FallbackKind::select(user_instruction, context) {
        FallbackKind::Veo3 => veo3_fallback(context),
        FallbackKind::Image => image_fallback(context),
        FallbackKind::Refinement => refinement_fallback(context),
        FallbackKind::Topic => topic_fallback(context),
        FallbackKind::Generic => GENERIC_FALLBACK.to_string(),
    }
}

/// Uppercase the first character
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn topic_fallback(context: &FormFields) -> String {
    let topic = context.text_or("topic", DEFAULT_SUBJECT);
    let style = context.text_or("style", DEFAULT_STYLE);
    let duration = context.text_or("duration", DEFAULT_DURATION);
    let mood = context.text_or("mood", DEFAULT_MOOD);
    let quality = context.text_or("quality", DEFAULT_QUALITY);

    format!(
        "Professional {style} video featuring {topic}. \
Duration: {duration} with {quality} quality resolution. \
Overall mood: {mood}, with professional camera work, dynamic lighting, and engaging composition. \
Modern video production techniques with attention to detail and visual storytelling. \
Smooth camera movements and professional grade cinematography."
    )
}

fn veo3_fallback(context: &FormFields) -> String {
    let mut lines = vec![
        format!(
            "Google Veo 3 optimized prompt: {}.",
            context.text_or("concept", DEFAULT_SUBJECT)
        ),
        format!(
            "{} resolution, {} framerate, {} duration.",
            context.text_or("resolution", "8K"),
            context.text_or("framerate", "60fps"),
            context.text_or("duration", "5s"),
        ),
        format!(
            "{} camera movement with {} lighting.",
            capitalize(context.text_or("camera_movement", "smooth-pan")),
            context.text_or("lighting", "natural"),
        ),
        format!(
            "{} mood in {} environment.",
            capitalize(context.text_or("mood", "neutral")),
            context.text_or("environment", "outdoor"),
        ),
    ];

    if let Some(characters) = context.text("characters") {
        lines.push(format!("Characters: {}.", characters));
    }
    if let Some(dialogue) = context.text("dialogue") {
        lines.push(format!(
            "Voice over in {}: {}.",
            context.text_or("voice_language", "indonesian"),
            dialogue
        ));
    }
    if let Some(custom_style) = context.text("custom_style") {
        lines.push(format!("Custom style: {}.", custom_style));
    }
    lines.push(
        "Professional video production with attention to detail and cinematic quality."
            .to_string(),
    );

    lines.join("\n")
}

fn image_fallback(context: &FormFields) -> String {
    format!(
        "Detailed {} image of {}. {} composition with {} lighting and a {} mood. \
{} quality, {} aspect ratio, sharp focus and carefully balanced colors.",
        context.text_or("style", "photorealistic"),
        context.text_or("subject", DEFAULT_SUBJECT),
        capitalize(context.text_or("composition", "portrait")),
        context.text_or("lighting", "natural"),
        context.text_or("mood", "neutral"),
        context.text_or("quality", DEFAULT_QUALITY),
        context.text_or("aspect_ratio", "16:9"),
    )
}

fn refinement_fallback(context: &FormFields) -> String {
    let prompt = context.text_or("prompt", DEFAULT_SUBJECT);
    let prompt = prompt.trim_end_matches('.');
    format!(
        "{}. Refined with {} camera work, deliberate lighting, and {} quality output. \
Professional composition with attention to detail and visual storytelling.",
        prompt,
        context.text_or("style", DEFAULT_STYLE),
        context.text_or("quality", DEFAULT_QUALITY),
    )
}
