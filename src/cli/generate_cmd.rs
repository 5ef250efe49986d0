//! Generate command handler
//!
//! Builds a form from an optional JSON file plus command-line flags, runs it
//! through the use case and prints the prompt on stdout.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::GeneratedPrompt;
use crate::domain::error::FormError;
use crate::domain::templates::{
    BatchForm, EnhanceForm, ImageForm, OptimizationVariant, OptimizeForm, PromptTemplate,
    TopicForm, VariantOptimizeForm, Veo3Form, ALL_VARIANTS,
};

use super::app::Services;
use super::args::{
    BatchArgs, EnhanceArgs, FormFile, GenerateKind, ImageArgs, OptimizeArgs, TopicArgs,
    VariantsArgs, Veo3Args,
};
use super::presenter::Presenter;

/// Handle generate subcommand
pub async fn handle_generate_command(
    kind: GenerateKind,
    services: &Services,
    presenter: &mut Presenter,
) -> Result<(), FormError> {
    match kind {
        GenerateKind::Topic(args) => {
            let form = topic_form(args).await?;
            generate_one(&form, services, presenter).await
        }
        GenerateKind::Veo3(args) => {
            let form = veo3_form(args).await?;
            generate_one(&form, services, presenter).await?;
            if let Some(size) = form.estimated_file_size() {
                presenter.info(&format!("Estimated file size: {size}"));
            }
            Ok(())
        }
        GenerateKind::Image(args) => {
            let form = image_form(args).await?;
            generate_one(&form, services, presenter).await
        }
        GenerateKind::Enhance(args) => {
            let form = enhance_form(args).await?;
            generate_one(&form, services, presenter).await
        }
        GenerateKind::Optimize(args) => {
            let form = optimize_form(args).await?;
            generate_one(&form, services, presenter).await
        }
        GenerateKind::Variants(args) => {
            let variants = selected_variants(&args);
            let form = variants_form(args).await?;
            generate_variants(&form, &variants, services, presenter).await
        }
        GenerateKind::Batch(args) => {
            let form = batch_form(args).await?;
            generate_batch(&form, services, presenter).await
        }
    }
}

async fn generate_one<T: PromptTemplate>(
    form: &T,
    services: &Services,
    presenter: &mut Presenter,
) -> Result<(), FormError> {
    form.validate()?;
    let vendor_name = services.orchestrator.connection_status().await.vendor_name;

    presenter.start_spinner(&format!("Generating with {vendor_name}..."));
    let result = services.generate().execute(form).await;
    presenter.stop_spinner();

    let prompt = result?;
    report(&prompt, &vendor_name, presenter);
    presenter.output(&prompt.text);
    Ok(())
}

async fn generate_variants(
    form: &VariantOptimizeForm,
    variants: &[OptimizationVariant],
    services: &Services,
    presenter: &mut Presenter,
) -> Result<(), FormError> {
    form.validate()?;
    let vendor_name = services.orchestrator.connection_status().await.vendor_name;

    presenter.start_spinner(&format!(
        "Generating {} variants with {vendor_name}...",
        variants.len()
    ));
    let result = services.generate().optimize_variants(form, variants).await;
    presenter.stop_spinner();

    let results = result?;
    let mut first = true;
    for result in results {
        if !first {
            presenter.output("");
        }
        first = false;
        presenter.heading(&format!("{} (score {})", result.title, result.score));
        presenter.output(&result.prompt);
    }
    Ok(())
}

async fn generate_batch(
    form: &BatchForm,
    services: &Services,
    presenter: &mut Presenter,
) -> Result<(), FormError> {
    form.validate()?;
    let vendor_name = services.orchestrator.connection_status().await.vendor_name;

    presenter.start_spinner(&format!("Generating variations with {vendor_name}..."));
    let result = {
        let presenter = &*presenter;
        services
            .generate()
            .batch(form, |done, total| {
                presenter.update_spinner(&format!(
                    "Generating variations {}",
                    presenter.format_progress(done, total)
                ))
            })
            .await
    };
    presenter.stop_spinner();

    let prompts = result?;
    if prompts.iter().any(|p| p.fallback) {
        presenter.fallback_notice(&vendor_name);
    }
    for (i, prompt) in prompts.iter().enumerate() {
        if i > 0 {
            presenter.output("");
        }
        presenter.heading(&prompt.title);
        presenter.output(&prompt.text);
    }
    Ok(())
}

fn report(prompt: &GeneratedPrompt, vendor_name: &str, presenter: &Presenter) {
    if prompt.fallback {
        presenter.fallback_notice(vendor_name);
    } else {
        presenter.success(&format!("{} via {vendor_name}", prompt.title));
    }
}

/// Load the form file if one was given, otherwise the form defaults
async fn load_form<T: DeserializeOwned + Default>(file: &FormFile) -> Result<T, FormError> {
    let Some(path) = &file.path else {
        return Ok(T::default());
    };
    debug!(path = %path.display(), "Reading form file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FormError::ReadError(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content).map_err(|e| FormError::ParseError(e.to_string()))
}

fn set(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn set_list(field: &mut Vec<String>, values: Vec<String>) {
    if !values.is_empty() {
        *field = values;
    }
}

async fn topic_form(args: TopicArgs) -> Result<TopicForm, FormError> {
    let mut form: TopicForm = load_form(&args.form).await?;
    set(&mut form.topic, args.topic);
    set(&mut form.style, args.style);
    set(&mut form.duration, args.duration);
    set(&mut form.mood, args.mood);
    set(&mut form.quality, args.quality);
    Ok(form)
}

async fn veo3_form(args: Veo3Args) -> Result<Veo3Form, FormError> {
    let mut form: Veo3Form = load_form(&args.form).await?;
    set(&mut form.concept, args.concept);
    set(&mut form.camera_movement, args.camera_movement);
    set(&mut form.lighting, args.lighting);
    set(&mut form.resolution, args.resolution);
    set(&mut form.framerate, args.framerate);
    // A bare custom duration implies the custom preset
    if args.custom_duration.is_some() && args.duration.is_none() {
        form.duration = "custom".to_string();
    }
    set(&mut form.duration, args.duration);
    set(&mut form.custom_duration, args.custom_duration);
    set(&mut form.characters, args.characters);
    set(&mut form.dialogue, args.dialogue);
    set(&mut form.audio_style, args.audio_style);
    set(&mut form.environment, args.environment);
    set(&mut form.mood, args.mood);
    set(&mut form.color_grading, args.color_grading);
    set(&mut form.effects, args.effects);
    set(&mut form.transitions, args.transitions);
    set(&mut form.custom_style, args.custom_style);
    set(&mut form.style_intensity, args.style_intensity);
    set(&mut form.character_references, args.character_references);
    set(&mut form.voice_language, args.voice_language);
    set(&mut form.voice_gender, args.voice_gender);
    set(&mut form.voice_age, args.voice_age);
    set(&mut form.voice_speed, args.voice_speed);
    set(&mut form.voice_tone, args.voice_tone);
    if args.no_character_consistency {
        form.character_consistency = false;
    }
    if args.no_voice_consistency {
        form.voice_consistency = false;
    }
    Ok(form)
}

async fn image_form(args: ImageArgs) -> Result<ImageForm, FormError> {
    let mut form: ImageForm = load_form(&args.form).await?;
    set(&mut form.subject, args.subject);
    set(&mut form.style, args.style);
    set(&mut form.composition, args.composition);
    set(&mut form.lighting, args.lighting);
    set(&mut form.mood, args.mood);
    set(&mut form.colors, args.colors);
    set(&mut form.background, args.background);
    set(&mut form.quality, args.quality);
    set(&mut form.aspect_ratio, args.aspect_ratio);
    set(&mut form.camera_settings, args.camera_settings);
    set(&mut form.post_processing, args.post_processing);
    set(&mut form.artistic_style, args.artistic_style);
    set(&mut form.negative_prompt, args.negative_prompt);
    Ok(form)
}

async fn enhance_form(args: EnhanceArgs) -> Result<EnhanceForm, FormError> {
    let mut form: EnhanceForm = load_form(&args.form).await?;
    set(&mut form.prompt, args.prompt);
    set(&mut form.enhancement_type, args.enhancement_type);
    set(&mut form.intensity, args.intensity);
    Ok(form)
}

async fn optimize_form(args: OptimizeArgs) -> Result<OptimizeForm, FormError> {
    let mut form: OptimizeForm = load_form(&args.form).await?;
    set(&mut form.prompt, args.prompt);
    set(&mut form.target_platform, args.target_platform);
    set(&mut form.optimization_level, args.optimization_level);
    set(&mut form.focus, args.focus);
    Ok(form)
}

fn selected_variants(args: &VariantsArgs) -> Vec<OptimizationVariant> {
    if args.only.is_empty() {
        return ALL_VARIANTS.to_vec();
    }
    // Keep generation order stable regardless of how the flags were given
    ALL_VARIANTS
        .iter()
        .copied()
        .filter(|v| args.only.iter().any(|&arg| OptimizationVariant::from(arg) == *v))
        .collect()
}

async fn variants_form(args: VariantsArgs) -> Result<VariantOptimizeForm, FormError> {
    let mut form: VariantOptimizeForm = load_form(&args.form).await?;
    set(&mut form.prompt, args.prompt);
    set(&mut form.optimization_level, args.optimization_level);
    set(&mut form.target_audience, args.target_audience);
    set(&mut form.creativity_level, args.creativity_level);
    set(&mut form.duration, args.duration);
    set(&mut form.resolution, args.resolution);
    set(&mut form.style, args.style);
    set(&mut form.voice_language, args.voice_language);
    set(&mut form.audio_style, args.audio_style);
    set(&mut form.characters, args.characters);
    set(&mut form.environment, args.environment);
    Ok(form)
}

async fn batch_form(args: BatchArgs) -> Result<BatchForm, FormError> {
    let mut form: BatchForm = load_form(&args.form).await?;
    set(&mut form.topic, args.topic);
    if let Some(variations) = args.variations {
        form.variations = variations;
    }
    set_list(&mut form.styles, args.styles);
    set_list(&mut form.durations, args.durations);
    set_list(&mut form.moods, args.moods);
    set_list(&mut form.qualities, args.qualities);
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::VariantArg;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn form_file(json: &str) -> (NamedTempFile, FormFile) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let form = FormFile {
            path: Some(file.path().to_path_buf()),
        };
        (file, form)
    }

    #[tokio::test]
    async fn flags_fill_form_defaults() {
        let form = topic_form(TopicArgs {
            topic: Some("sunset".to_string()),
            mood: Some("calm".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(form.topic, "sunset");
        assert_eq!(form.mood, "calm");
        assert_eq!(form.style, TopicForm::default().style);
    }

    #[tokio::test]
    async fn flags_override_form_file() {
        let (_file, path) = form_file(r#"{"topic":"forest","style":"documentary"}"#);
        let form = topic_form(TopicArgs {
            style: Some("anime".to_string()),
            form: path,
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(form.topic, "forest");
        assert_eq!(form.style, "anime");
    }

    #[tokio::test]
    async fn veo3_form_file_carries_scenes() {
        let (_file, path) = form_file(
            r#"{"concept":"heist","scenes":[{"title":"Vault","duration":"10s"}],
                "audio":{"type":"orchestral","volume":80}}"#,
        );
        let form = veo3_form(Veo3Args {
            form: path,
            no_voice_consistency: true,
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(form.scenes.len(), 1);
        assert_eq!(form.audio.as_ref().map(|a| a.volume), Some(80));
        assert!(!form.voice_consistency);
        assert!(form.character_consistency);
    }

    #[tokio::test]
    async fn custom_duration_flag_selects_custom_preset() {
        let form = veo3_form(Veo3Args {
            concept: Some("tide".to_string()),
            custom_duration: Some("1:30".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(form.resolved_duration(), Some("1:30"));
    }

    #[tokio::test]
    async fn missing_form_file_is_read_error() {
        let err = enhance_form(EnhanceArgs {
            form: FormFile {
                path: Some(PathBuf::from("/nonexistent/form.json")),
            },
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, FormError::ReadError(_)));
    }

    #[tokio::test]
    async fn malformed_form_file_is_parse_error() {
        let (_file, path) = form_file("{ not json");
        let err = image_form(ImageArgs {
            form: path,
            ..Default::default()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, FormError::ParseError(_)));
    }

    #[tokio::test]
    async fn batch_lists_replace_defaults_only_when_given() {
        let form = batch_form(BatchArgs {
            topic: Some("rain".to_string()),
            variations: Some(5),
            moods: vec!["tense".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(form.variations, 5);
        assert_eq!(form.moods, ["tense"]);
        assert_eq!(form.styles, BatchForm::default().styles);
    }

    #[test]
    fn variant_selection_keeps_canonical_order() {
        let args = VariantsArgs {
            only: vec![VariantArg::Commercial, VariantArg::Technical],
            ..Default::default()
        };
        assert_eq!(
            selected_variants(&args),
            [OptimizationVariant::Technical, OptimizationVariant::Commercial]
        );
        assert_eq!(selected_variants(&VariantsArgs::default()), ALL_VARIANTS);
    }

    #[tokio::test]
    async fn topic_without_vendor_prints_fallback() {
        let services = Services::build(&crate::domain::config::AppConfig::defaults(), true).await;
        let mut presenter = Presenter::quiet();
        let form = topic_form(TopicArgs {
            topic: Some("sunset".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        generate_one(&form, &services, &mut presenter).await.unwrap();
        let history = services.history.list().await;
        assert_eq!(history.len(), 1);
        assert!(history[0].fallback);
    }

    #[tokio::test]
    async fn blank_topic_is_rejected_before_generation() {
        let services = Services::build(&crate::domain::config::AppConfig::defaults(), true).await;
        let mut presenter = Presenter::quiet();
        let err = generate_one(&TopicForm::default(), &services, &mut presenter)
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::MissingField("topic")));
        assert!(services.history.list().await.is_empty());
    }
}
