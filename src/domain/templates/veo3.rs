//! Google Veo 3 prompt builder

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{or_marker, require, PromptTemplate, NOT_SPECIFIED};
use crate::domain::error::{FormError, InvalidDurationError};
use crate::domain::generation::fallback::capitalize;
use crate::domain::generation::{FormFields, InstructionPair};

/// Duration option that defers to `custom_duration`
pub const CUSTOM_DURATION: &str = "custom";

const SYSTEM_INSTRUCTION: &str = r#"You are a Google Veo 3 specialist prompt engineer. Create ultra-high quality video prompts optimized specifically for Google Veo 3's advanced capabilities including:
- Photorealistic rendering
- Complex camera movements
- Advanced lighting systems
- High-resolution output
- Temporal consistency
- Physics-accurate motion

Format the output as a detailed Veo 3-optimized prompt."#;

static SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)s$").expect("valid regex"));
static MINUTES_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d+)$").expect("valid regex"));
static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d*)?)\s*(?:min|minute|minutes)$").expect("valid regex")
});
static HOURS_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)h\s*(?:(\d+)m?)?$").expect("valid regex"));

/// Parse a free-form duration into seconds.
///
/// Accepted shapes: `30s`, `1:30`, `2 min`, `1.5 minutes`, `1h30m`, `2h`.
pub fn parse_duration_secs(input: &str) -> Result<f64, InvalidDurationError> {
    let s = input.trim();
    let err = || InvalidDurationError {
        input: input.to_string(),
    };

    if let Some(caps) = SECONDS.captures(s) {
        return caps[1].parse::<f64>().map_err(|_| err());
    }
    if let Some(caps) = MINUTES_SECONDS.captures(s) {
        let minutes: f64 = caps[1].parse().map_err(|_| err())?;
        let seconds: f64 = caps[2].parse().map_err(|_| err())?;
        return Ok(minutes * 60.0 + seconds);
    }
    if let Some(caps) = MINUTES.captures(s) {
        let minutes: f64 = caps[1].parse().map_err(|_| err())?;
        return Ok(minutes * 60.0);
    }
    if let Some(caps) = HOURS_MINUTES.captures(s) {
        let hours: f64 = caps[1].parse().map_err(|_| err())?;
        let minutes: f64 = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| err())?,
            None => 0.0,
        };
        return Ok(hours * 3600.0 + minutes * 60.0);
    }
    Err(err())
}

/// One scene in the scene-by-scene breakdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub title: String,
    pub duration: String,
    pub description: String,
    pub camera_angle: String,
    pub action: String,
    pub dialogue: String,
}

/// Advanced audio settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioSettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub volume: u8,
    pub quality: String,
    pub spatial: String,
}

/// Veo 3 generator form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Veo3Form {
    pub concept: String,
    pub camera_movement: String,
    pub lighting: String,
    pub resolution: String,
    pub framerate: String,
    pub duration: String,
    pub custom_duration: String,
    pub characters: String,
    pub dialogue: String,
    pub audio_style: String,
    pub environment: String,
    pub mood: String,
    pub color_grading: String,
    pub effects: String,
    pub transitions: String,
    pub custom_style: String,
    pub character_consistency: bool,
    pub voice_language: String,
    pub voice_gender: String,
    pub voice_age: String,
    pub character_references: String,
    pub style_intensity: String,
    pub voice_consistency: bool,
    pub voice_speed: String,
    pub voice_tone: String,
    pub scenes: Vec<Scene>,
    pub audio: Option<AudioSettings>,
}

impl Default for Veo3Form {
    fn default() -> Self {
        Self {
            concept: String::new(),
            camera_movement: "smooth-pan".to_string(),
            lighting: "natural".to_string(),
            resolution: "8K".to_string(),
            framerate: "60fps".to_string(),
            duration: "5s".to_string(),
            custom_duration: String::new(),
            characters: String::new(),
            dialogue: String::new(),
            audio_style: "cinematic".to_string(),
            environment: "outdoor".to_string(),
            mood: "neutral".to_string(),
            color_grading: "natural".to_string(),
            effects: "none".to_string(),
            transitions: "cut".to_string(),
            custom_style: String::new(),
            character_consistency: true,
            voice_language: "indonesian".to_string(),
            voice_gender: "female".to_string(),
            voice_age: "adult".to_string(),
            character_references: String::new(),
            style_intensity: "medium".to_string(),
            voice_consistency: true,
            voice_speed: "normal".to_string(),
            voice_tone: "natural".to_string(),
            scenes: Vec::new(),
            audio: None,
        }
    }
}

impl Veo3Form {
    /// Duration actually requested, resolving the `custom` option.
    /// Returns `None` when no usable duration is set.
    pub fn resolved_duration(&self) -> Option<&str> {
        let duration = if self.duration.trim().eq_ignore_ascii_case(CUSTOM_DURATION) {
            self.custom_duration.trim()
        } else {
            self.duration.trim()
        };
        if duration.is_empty() {
            None
        } else {
            Some(duration)
        }
    }

    /// Rough output size estimate: 50 MB per second at 4K/24fps, scaled by
    /// resolution and frame rate.
    pub fn estimated_file_size(&self) -> Option<String> {
        let seconds = parse_duration_secs(self.resolved_duration()?).ok()?;
        let resolution_factor = match self.resolution.as_str() {
            "8K" => 4.0,
            "12K" => 9.0,
            "16K" => 16.0,
            _ => 1.0,
        };
        let framerate_factor = match self.framerate.as_str() {
            "30fps" => 1.25,
            "60fps" => 2.5,
            "120fps" => 5.0,
            "240fps" => 10.0,
            _ => 1.0,
        };
        let megabytes = 50.0 * seconds * resolution_factor * framerate_factor;

        Some(if megabytes > 1000.0 {
            format!("{:.1} GB", megabytes / 1000.0)
        } else {
            format!("{:.0} MB", megabytes)
        })
    }

    fn scenes_text(&self) -> String {
        if self.scenes.is_empty() {
            return "No scenes specified".to_string();
        }
        self.scenes
            .iter()
            .enumerate()
            .map(|(i, scene)| {
                format!(
                    "Scene {}: {} ({}) - {} | Camera: {} | Action: {} | Dialogue: {}",
                    i + 1,
                    or_marker(&scene.title, "Untitled"),
                    or_marker(&scene.duration, NOT_SPECIFIED),
                    or_marker(&scene.description, NOT_SPECIFIED),
                    or_marker(&scene.camera_angle, NOT_SPECIFIED),
                    or_marker(&scene.action, NOT_SPECIFIED),
                    or_marker(&scene.dialogue, "None"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn audio_text(&self) -> String {
        match &self.audio {
            Some(audio) if !audio.kind.trim().is_empty() => format!(
                "Audio Type: {}, Volume: {}%, Quality: {}, Effects: {}",
                audio.kind.trim(),
                audio.volume,
                or_marker(&audio.quality, NOT_SPECIFIED),
                or_marker(&audio.spatial, "none"),
            ),
            _ => "No audio settings specified".to_string(),
        }
    }
}

impl PromptTemplate for Veo3Form {
    fn instructions(&self) -> InstructionPair {
        let character_consistency = if self.character_consistency {
            "Enabled - maintain same character appearance throughout"
        } else {
            "Disabled"
        };
        let voice_consistency = if self.voice_consistency {
            "Enabled - maintain same voice characteristics throughout"
        } else {
            "Disabled"
        };

        let user = format!(
            "Create a Google Veo 3 optimized prompt for:
- Concept: {concept}
- Camera Movement: {camera}
- Lighting: {lighting}
- Resolution: {resolution}
- Frame Rate: {framerate}
- Duration: {duration}
- Characters: {characters}
- Character References: {references}
- Character Consistency: {character_consistency}
- Dialogue/Voice Over: {dialogue} (Language: {language}, Gender: {gender}, Age: {age}, Speed: {speed}, Tone: {tone})
- Voice Consistency: {voice_consistency}
- Custom Style: {custom_style}
- Style Intensity: {intensity}
- Audio Style: {audio_style}
- Environment: {environment}
- Mood: {mood}
- Color Grading: {grading}
- Effects: {effects}
- Transitions: {transitions}

Scene-by-Scene Breakdown:
{scenes}

Advanced Audio Settings:
{audio}

Generate a comprehensive Veo 3 prompt with all technical specifications, scene-by-scene direction, advanced audio integration, character consistency instructions, {language_title} voice over integration, custom style application, and creative direction. If dialogue is provided in {language_title}, include proper pronunciation guides and cultural context.",
            concept = or_marker(&self.concept, NOT_SPECIFIED),
            camera = or_marker(&self.camera_movement, NOT_SPECIFIED),
            lighting = or_marker(&self.lighting, NOT_SPECIFIED),
            resolution = or_marker(&self.resolution, NOT_SPECIFIED),
            framerate = or_marker(&self.framerate, NOT_SPECIFIED),
            duration = self.resolved_duration().unwrap_or(NOT_SPECIFIED),
            characters = or_marker(&self.characters, NOT_SPECIFIED),
            references = or_marker(&self.character_references, "None provided"),
            dialogue = or_marker(&self.dialogue, "No dialogue"),
            language = or_marker(&self.voice_language, NOT_SPECIFIED),
            gender = or_marker(&self.voice_gender, NOT_SPECIFIED),
            age = or_marker(&self.voice_age, NOT_SPECIFIED),
            speed = or_marker(&self.voice_speed, NOT_SPECIFIED),
            tone = or_marker(&self.voice_tone, NOT_SPECIFIED),
            custom_style = or_marker(&self.custom_style, "Use default style"),
            intensity = or_marker(&self.style_intensity, NOT_SPECIFIED),
            audio_style = or_marker(&self.audio_style, NOT_SPECIFIED),
            environment = or_marker(&self.environment, NOT_SPECIFIED),
            mood = or_marker(&self.mood, NOT_SPECIFIED),
            grading = or_marker(&self.color_grading, NOT_SPECIFIED),
            effects = or_marker(&self.effects, "none"),
            transitions = or_marker(&self.transitions, NOT_SPECIFIED),
            scenes = self.scenes_text(),
            audio = self.audio_text(),
            language_title = capitalize(or_marker(&self.voice_language, "the selected language")),
        );

        InstructionPair::new(SYSTEM_INSTRUCTION, user)
    }

    fn context(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.insert_text("concept", Some(&self.concept));
        fields.insert_text("camera_movement", Some(&self.camera_movement));
        fields.insert_text("lighting", Some(&self.lighting));
        fields.insert_text("resolution", Some(&self.resolution));
        fields.insert_text("framerate", Some(&self.framerate));
        fields.insert_text("duration", self.resolved_duration());
        fields.insert_text("environment", Some(&self.environment));
        fields.insert_text("mood", Some(&self.mood));
        fields.insert_text("characters", Some(&self.characters));
        fields.insert_text("dialogue", Some(&self.dialogue));
        fields.insert_text("voice_language", Some(&self.voice_language));
        fields.insert_text("custom_style", Some(&self.custom_style));
        fields.insert_text("audio_style", Some(&self.audio_style));
        fields.insert("character_consistency", self.character_consistency);
        fields.insert("voice_consistency", self.voice_consistency);
        fields
    }

    fn title(&self) -> String {
        format!("{} - Veo 3", or_marker(&self.concept, "Untitled"))
    }

    fn category(&self) -> &str {
        "veo3"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.concept, "concept")?;
        if self.duration.trim().eq_ignore_ascii_case(CUSTOM_DURATION) {
            parse_duration_secs(&self.custom_duration)?;
        }
        Ok(())
    }
}

/// Capitalize the first letter, e.g. "indonesian" -> "Indonesian"
#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Veo3Form {
        Veo3Form {
            concept: "a courier racing through a neon city".to_string(),
            characters: "young courier with a red jacket".to_string(),
            dialogue: "Cepat, waktunya hampir habis".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn voice_language_is_capitalized_in_instruction() {
        let mut form = form();
        form.voice_language = "indonesian".to_string();
        let pair = form.instructions();
        assert!(pair.user.contains("Indonesian voice over integration"));
    }

    #[test]
    fn parse_duration_accepts_documented_shapes() {
        assert_eq!(parse_duration_secs("30s").unwrap(), 30.0);
        assert_eq!(parse_duration_secs("1:30").unwrap(), 90.0);
        assert_eq!(parse_duration_secs("2 min").unwrap(), 120.0);
        assert_eq!(parse_duration_secs("1.5 minutes").unwrap(), 90.0);
        assert_eq!(parse_duration_secs("1h30m").unwrap(), 5400.0);
        assert_eq!(parse_duration_secs("2h").unwrap(), 7200.0);
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(parse_duration_secs("").is_err());
        assert!(parse_duration_secs("soon").is_err());
        assert!(parse_duration_secs("10 parsecs").is_err());
    }

    #[test]
    fn resolved_duration_uses_custom_value() {
        let mut form = form();
        form.duration = "custom".to_string();
        form.custom_duration = "1:30".to_string();
        assert_eq!(form.resolved_duration(), Some("1:30"));

        form.custom_duration = "  ".to_string();
        assert_eq!(form.resolved_duration(), None);
    }

    #[test]
    fn validate_checks_concept_and_custom_duration() {
        assert!(Veo3Form::default().validate().is_err());
        assert!(form().validate().is_ok());

        let mut bad = form();
        bad.duration = "custom".to_string();
        bad.custom_duration = "forever".to_string();
        assert!(matches!(bad.validate(), Err(FormError::InvalidDuration(_))));
    }

    #[test]
    fn estimated_file_size_scales_with_settings() {
        let mut form = form();
        form.resolution = "4K".to_string();
        form.framerate = "24fps".to_string();
        form.duration = "5s".to_string();
        assert_eq!(form.estimated_file_size().as_deref(), Some("250 MB"));

        // 50 * 5 * 4 * 2.5
        form.resolution = "8K".to_string();
        form.framerate = "60fps".to_string();
        assert_eq!(form.estimated_file_size().as_deref(), Some("2.5 GB"));
    }

    #[test]
    fn user_instruction_includes_voice_and_consistency() {
        let pair = form().instructions();
        assert!(pair.user.contains("- Concept: a courier racing through a neon city"));
        assert!(pair.user.contains("(Language: indonesian, Gender: female, Age: adult"));
        assert!(pair.user.contains("Enabled - maintain same character appearance"));
        assert!(pair.user.contains("Indonesian voice over integration"));
        assert!(pair.user.contains("No scenes specified"));
        assert!(pair.user.contains("No audio settings specified"));
    }

    #[test]
    fn scenes_and_audio_render() {
        let mut form = form();
        form.scenes.push(Scene {
            title: "Opening".to_string(),
            duration: "3s".to_string(),
            description: "rain on glass".to_string(),
            camera_angle: "close-up".to_string(),
            action: "courier looks up".to_string(),
            dialogue: String::new(),
        });
        form.audio = Some(AudioSettings {
            kind: "ambient".to_string(),
            volume: 80,
            quality: "high".to_string(),
            spatial: String::new(),
        });

        let pair = form.instructions();
        assert!(pair.user.contains(
            "Scene 1: Opening (3s) - rain on glass | Camera: close-up | Action: courier looks up | Dialogue: None"
        ));
        assert!(pair
            .user
            .contains("Audio Type: ambient, Volume: 80%, Quality: high, Effects: none"));
    }

    #[test]
    fn blank_optional_fields_render_markers() {
        let pair = Veo3Form::default().instructions();
        assert!(pair.user.contains("- Characters: Not specified"));
        assert!(pair.user.contains("- Character References: None provided"));
        assert!(pair.user.contains("- Dialogue/Voice Over: No dialogue"));
        assert!(pair.user.contains("- Custom Style: Use default style"));
    }

    #[test]
    fn context_feeds_veo3_fallback() {
        let context = form().context();
        assert_eq!(context.text("concept"), Some("a courier racing through a neon city"));
        assert_eq!(context.text("duration"), Some("5s"));
        assert_eq!(context.flag("character_consistency"), Some(true));
        assert!(context.text("custom_style").is_none());
    }

    #[test]
    fn deserializes_camel_case_form() {
        let form: Veo3Form = serde_json::from_str(
            r#"{"concept":"x","cameraMovement":"crane-shot","audio":{"type":"dramatic","volume":60}}"#,
        )
        .unwrap();
        assert_eq!(form.camera_movement, "crane-shot");
        assert_eq!(form.audio.unwrap().kind, "dramatic");
        assert_eq!(form.lighting, "natural");
    }
}
