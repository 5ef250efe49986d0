//! Prompt optimization builders
//!
//! Two surfaces: the platform optimizer (one pass for a target platform)
//! and the Veo 3 variant optimizer, which asks for technical, creative
//! and commercial rewrites of the same prompt.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{or_marker, require, PromptTemplate, NOT_SPECIFIED};
use crate::domain::error::FormError;
use crate::domain::generation::{FormFields, InstructionPair};

/// Platform optimizer form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizeForm {
    pub prompt: String,
    pub target_platform: String,
    pub optimization_level: String,
    pub focus: String,
}

impl Default for OptimizeForm {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            target_platform: "veo3".to_string(),
            optimization_level: "balanced".to_string(),
            focus: "quality".to_string(),
        }
    }
}

impl PromptTemplate for OptimizeForm {
    fn instructions(&self) -> InstructionPair {
        let platform = or_marker(&self.target_platform, "veo3");
        let platform_upper = platform.to_uppercase();
        let level = or_marker(&self.optimization_level, "balanced");
        let focus = or_marker(&self.focus, "quality");

        let system = format!(
            "You are an expert AI video prompt optimizer specializing in {platform_upper} optimization. Your task is to optimize prompts for maximum quality and performance.

Optimization Level: {level}
Target Platform: {platform}
Focus Area: {focus}

Guidelines:
- Enhance technical specifications for {platform}
- Optimize for {focus} performance
- Maintain original creative intent
- Add platform-specific optimizations
- Include advanced parameters when beneficial
- Ensure prompt length is optimal for the platform"
        );

        let user = format!(
            "Optimize this video prompt for {platform_upper} with {level} optimization level, focusing on {focus}:

Original Prompt: {}

Please provide an optimized version that:
1. Enhances technical specifications
2. Improves platform compatibility
3. Optimizes for the focus area
4. Maintains creative vision
5. Adds relevant advanced parameters",
            or_marker(&self.prompt, NOT_SPECIFIED),
        );

        InstructionPair::new(system, user)
    }

    fn context(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.insert_text("prompt", Some(&self.prompt));
        fields.insert_text("target_platform", Some(&self.target_platform));
        fields.insert_text("optimization_level", Some(&self.optimization_level));
        fields.insert_text("focus", Some(&self.focus));
        fields
    }

    fn title(&self) -> String {
        format!(
            "Optimized for {}",
            or_marker(&self.target_platform, "veo3").to_uppercase()
        )
    }

    fn category(&self) -> &str {
        "optimization"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.prompt, "prompt")
    }
}

/// Direction of a Veo 3 optimization variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationVariant {
    Technical,
    Creative,
    Commercial,
}

/// All variants, in the order they are generated
pub const ALL_VARIANTS: &[OptimizationVariant] = &[
    OptimizationVariant::Technical,
    OptimizationVariant::Creative,
    OptimizationVariant::Commercial,
];

impl OptimizationVariant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Creative => "creative",
            Self::Commercial => "commercial",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Technical => "Technical Excellence",
            Self::Creative => "Creative Vision",
            Self::Commercial => "Commercial Appeal",
        }
    }

    const fn guidelines(&self) -> &'static str {
        match self {
            Self::Technical => "- Focus on technical specifications, camera settings, lighting details\n- Add precise technical parameters\n- Include professional video terminology",
            Self::Creative => "- Enhance artistic vision and creative elements\n- Add unique visual concepts\n- Increase emotional impact and storytelling",
            Self::Commercial => "- Optimize for commercial appeal and market viability\n- Focus on brand-safe content\n- Enhance professional presentation",
        }
    }
}

impl FromStr for OptimizationVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(Self::Technical),
            "creative" => Ok(Self::Creative),
            "commercial" => Ok(Self::Commercial),
            other => Err(format!(
                "Invalid variant: \"{}\". Valid variants are: technical, creative, commercial",
                other
            )),
        }
    }
}

impl fmt::Display for OptimizationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Variant optimizer form: the prompt, optimization parameters, and the
/// Veo 3 settings it was generated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantOptimizeForm {
    pub prompt: String,
    pub optimization_level: String,
    pub target_audience: String,
    pub creativity_level: String,
    pub duration: String,
    pub resolution: String,
    pub style: String,
    pub voice_language: String,
    pub audio_style: String,
    pub characters: String,
    pub environment: String,
}

impl Default for VariantOptimizeForm {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            optimization_level: "professional".to_string(),
            target_audience: "general".to_string(),
            creativity_level: "balanced".to_string(),
            duration: String::new(),
            resolution: String::new(),
            style: String::new(),
            voice_language: String::new(),
            audio_style: String::new(),
            characters: String::new(),
            environment: String::new(),
        }
    }
}

impl VariantOptimizeForm {
    /// Bind the form to one variant
    pub fn for_variant(&self, variant: OptimizationVariant) -> VariantTemplate<'_> {
        VariantTemplate {
            form: self,
            variant,
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.prompt, "prompt")
    }
}

/// A [`VariantOptimizeForm`] bound to a single variant
#[derive(Debug, Clone, Copy)]
pub struct VariantTemplate<'a> {
    form: &'a VariantOptimizeForm,
    variant: OptimizationVariant,
}

impl VariantTemplate<'_> {
    pub fn variant(&self) -> OptimizationVariant {
        self.variant
    }
}

impl PromptTemplate for VariantTemplate<'_> {
    fn instructions(&self) -> InstructionPair {
        let form = self.form;
        let variant = self.variant.as_str();
        let level = or_marker(&form.optimization_level, "professional");
        let audience = or_marker(&form.target_audience, "general");
        let creativity = or_marker(&form.creativity_level, "balanced");

        let system = format!(
            "You are an expert Google Veo 3 prompt optimizer specializing in {variant} optimization. Create highly optimized prompts for maximum video generation quality.

Optimization Parameters:
- Level: {level}
- Target Audience: {audience}
- Creativity: {creativity}
- Variant: {variant}
- Platform: Google Veo 3

Guidelines for {variant} optimization:
{}",
            self.variant.guidelines()
        );

        let user = format!(
            "Optimize this Google Veo 3 prompt with {variant} focus:

Original Concept: {prompt}
Video Settings: {duration} duration, {resolution} quality
Style: {style}
Audio: {language} voice, {audio_style} style
Characters: {characters}
Environment: {environment}

Create an enhanced prompt that:
1. Maximizes Veo 3 capabilities
2. Applies {variant} optimization principles
3. Targets {audience} audience
4. Uses {creativity} creativity level
5. Maintains {level} quality standards

Return only the optimized prompt text.",
            prompt = or_marker(&form.prompt, NOT_SPECIFIED),
            duration = or_marker(&form.duration, "30s"),
            resolution = or_marker(&form.resolution, "4K"),
            style = or_marker(&form.style, "cinematic"),
            language = or_marker(&form.voice_language, "indonesian"),
            audio_style = or_marker(&form.audio_style, "cinematic"),
            characters = or_marker(&form.characters, NOT_SPECIFIED),
            environment = or_marker(&form.environment, "outdoor"),
        );

        InstructionPair::new(system, user)
    }

    fn context(&self) -> FormFields {
        let form = self.form;
        let mut fields = FormFields::new();
        fields.insert_text("prompt", Some(&form.prompt));
        fields.insert_text("style", Some(&form.style));
        fields.insert_text("quality", Some(&form.resolution));
        fields.insert_text("duration", Some(&form.duration));
        fields.insert("variant", self.variant.as_str());
        fields
    }

    fn title(&self) -> String {
        self.variant.title().to_string()
    }

    fn category(&self) -> &str {
        "optimization"
    }

    fn validate(&self) -> Result<(), FormError> {
        self.form.validate()
    }
}

/// Output of one optimization variant.
///
/// `score` is a placeholder in the 80-99 range; it is not derived from the
/// text and carries no meaning beyond ordering in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationResult {
    pub variant: OptimizationVariant,
    pub title: &'static str,
    pub prompt: String,
    pub score: u8,
}

impl OptimizationResult {
    pub fn new(variant: OptimizationVariant, prompt: String) -> Self {
        Self {
            variant,
            title: variant.title(),
            prompt,
            score: rand::thread_rng().gen_range(80..100),
        }
    }
}
