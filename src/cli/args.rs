//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::error::InvalidVendorError;
use crate::domain::templates::OptimizationVariant;
use crate::domain::vendor::VendorId;

/// Promptcraft - form-driven video prompt generator
#[derive(Parser, Debug)]
#[command(name = "promptcraft")]
#[command(version)]
#[command(about = "Generate video and image prompts with pluggable AI vendors")]
#[command(long_about = None)]
pub struct Cli {
    /// Show debug logs on stderr
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print results
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Keep settings and history in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Per-call vendor timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Endpoint of the built-in agent
    #[arg(long, global = true, value_name = "URL")]
    pub builtin_endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a prompt from a form
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },
    /// Inspect, test and switch AI vendors
    Vendor {
        #[command(subcommand)]
        action: VendorAction,
    },
    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Browse generated prompts
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Generator surfaces
#[derive(Subcommand, Debug)]
pub enum GenerateKind {
    /// Video prompt from a topic
    Topic(TopicArgs),
    /// Detailed Veo 3 prompt
    Veo3(Veo3Args),
    /// Image prompt
    Image(ImageArgs),
    /// Enhance an existing prompt
    Enhance(EnhanceArgs),
    /// Optimize a prompt for a target platform
    Optimize(OptimizeArgs),
    /// Technical, creative and commercial rewrites of a Veo 3 prompt
    Variants(VariantsArgs),
    /// Several variations of one topic
    Batch(BatchArgs),
}

/// Read the form from a JSON file; flags given on the command line win
#[derive(Args, Debug, Clone, Default)]
pub struct FormFile {
    /// JSON form file (camelCase field names)
    #[arg(long = "form", value_name = "FILE")]
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TopicArgs {
    /// What the video is about
    pub topic: Option<String>,
    #[arg(long)]
    pub style: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub mood: Option<String>,
    #[arg(long)]
    pub quality: Option<String>,
    #[command(flatten)]
    pub form: FormFile,
}

#[derive(Args, Debug, Clone, Default)]
pub struct Veo3Args {
    /// Core concept of the video
    pub concept: Option<String>,
    #[arg(long)]
    pub camera_movement: Option<String>,
    #[arg(long)]
    pub lighting: Option<String>,
    #[arg(long)]
    pub resolution: Option<String>,
    #[arg(long)]
    pub framerate: Option<String>,
    /// Duration preset, or `custom` together with --custom-duration
    #[arg(long)]
    pub duration: Option<String>,
    /// e.g. 30s, 1:30, 2 min, 1.5 minutes, 1h30m
    #[arg(long)]
    pub custom_duration: Option<String>,
    #[arg(long)]
    pub characters: Option<String>,
    #[arg(long)]
    pub dialogue: Option<String>,
    #[arg(long)]
    pub audio_style: Option<String>,
    #[arg(long)]
    pub environment: Option<String>,
    #[arg(long)]
    pub mood: Option<String>,
    #[arg(long)]
    pub color_grading: Option<String>,
    #[arg(long)]
    pub effects: Option<String>,
    #[arg(long)]
    pub transitions: Option<String>,
    #[arg(long)]
    pub custom_style: Option<String>,
    #[arg(long)]
    pub style_intensity: Option<String>,
    #[arg(long)]
    pub character_references: Option<String>,
    #[arg(long)]
    pub voice_language: Option<String>,
    #[arg(long)]
    pub voice_gender: Option<String>,
    #[arg(long)]
    pub voice_age: Option<String>,
    #[arg(long)]
    pub voice_speed: Option<String>,
    #[arg(long)]
    pub voice_tone: Option<String>,
    /// Allow character appearance to drift between scenes
    #[arg(long)]
    pub no_character_consistency: bool,
    /// Allow voices to drift between scenes
    #[arg(long)]
    pub no_voice_consistency: bool,
    #[command(flatten)]
    pub form: FormFile,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ImageArgs {
    /// Main subject of the image
    pub subject: Option<String>,
    #[arg(long)]
    pub style: Option<String>,
    #[arg(long)]
    pub composition: Option<String>,
    #[arg(long)]
    pub lighting: Option<String>,
    #[arg(long)]
    pub mood: Option<String>,
    #[arg(long)]
    pub colors: Option<String>,
    #[arg(long)]
    pub background: Option<String>,
    #[arg(long)]
    pub quality: Option<String>,
    #[arg(long)]
    pub aspect_ratio: Option<String>,
    #[arg(long)]
    pub camera_settings: Option<String>,
    #[arg(long)]
    pub post_processing: Option<String>,
    #[arg(long)]
    pub artistic_style: Option<String>,
    #[arg(long)]
    pub negative_prompt: Option<String>,
    #[command(flatten)]
    pub form: FormFile,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EnhanceArgs {
    /// Prompt to enhance
    pub prompt: Option<String>,
    /// Enhancement type, e.g. cinematic, artistic, technical
    #[arg(long = "type", value_name = "TYPE")]
    pub enhancement_type: Option<String>,
    #[arg(long)]
    pub intensity: Option<String>,
    #[command(flatten)]
    pub form: FormFile,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OptimizeArgs {
    /// Prompt to optimize
    pub prompt: Option<String>,
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub target_platform: Option<String>,
    #[arg(long = "level", value_name = "LEVEL")]
    pub optimization_level: Option<String>,
    #[arg(long)]
    pub focus: Option<String>,
    #[command(flatten)]
    pub form: FormFile,
}

#[derive(Args, Debug, Clone, Default)]
pub struct VariantsArgs {
    /// Veo 3 prompt to rewrite
    pub prompt: Option<String>,
    #[arg(long = "level", value_name = "LEVEL")]
    pub optimization_level: Option<String>,
    #[arg(long = "audience", value_name = "AUDIENCE")]
    pub target_audience: Option<String>,
    #[arg(long = "creativity", value_name = "LEVEL")]
    pub creativity_level: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub resolution: Option<String>,
    #[arg(long)]
    pub style: Option<String>,
    #[arg(long)]
    pub voice_language: Option<String>,
    #[arg(long)]
    pub audio_style: Option<String>,
    #[arg(long)]
    pub characters: Option<String>,
    #[arg(long)]
    pub environment: Option<String>,
    /// Restrict to these variants (default: all three)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub only: Vec<VariantArg>,
    #[command(flatten)]
    pub form: FormFile,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Topic shared by every variation
    pub topic: Option<String>,
    /// Number of variations
    #[arg(short = 'n', long = "count", value_name = "N")]
    pub variations: Option<usize>,
    /// Comma-separated styles to cycle through
    #[arg(long, value_delimiter = ',')]
    pub styles: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub durations: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub moods: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub qualities: Vec<String>,
    #[command(flatten)]
    pub form: FormFile,
}

/// Variant argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Technical,
    Creative,
    Commercial,
}

impl From<VariantArg> for OptimizationVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Technical => OptimizationVariant::Technical,
            VariantArg::Creative => OptimizationVariant::Creative,
            VariantArg::Commercial => OptimizationVariant::Commercial,
        }
    }
}

/// Vendor actions
#[derive(Subcommand, Debug)]
pub enum VendorAction {
    /// List vendors and their availability
    List,
    /// Show the selected vendor and connection state
    Status,
    /// Probe a vendor (defaults to the selected one)
    Test {
        #[arg(value_parser = parse_vendor)]
        vendor: Option<VendorId>,
    },
    /// Select a vendor and probe it
    Switch {
        #[arg(value_parser = parse_vendor)]
        vendor: VendorId,
    },
    /// Store a vendor API key
    SetKey {
        #[arg(value_parser = parse_vendor)]
        vendor: VendorId,
        key: String,
    },
}

/// Settings actions
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the stored settings (keys masked)
    Show,
    /// Set a boolean preference
    SetPref {
        name: PreferenceArg,
        /// true/false, yes/no, 1/0
        value: String,
    },
    /// Restore default settings
    Reset,
}

/// Preference names
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PreferenceArg {
    AutoSave,
    DarkMode,
    Notifications,
}

/// History actions
#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List recorded prompts, newest first
    List {
        /// Print full prompt text
        #[arg(long)]
        full: bool,
    },
    /// Delete one entry by id
    Delete { id: String },
    /// Delete every entry
    Clear,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

fn parse_vendor(value: &str) -> Result<VendorId, InvalidVendorError> {
    value.parse()
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "timeout_secs",
    "google_model",
    "openai_model",
    "google_base_url",
    "openai_base_url",
    "builtin_endpoint",
    "data_dir",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_topic_flags() {
        let cli = Cli::parse_from([
            "promptcraft",
            "generate",
            "topic",
            "sunset",
            "--style",
            "cinematic",
            "--duration",
            "30s",
        ]);
        let Commands::Generate {
            kind: GenerateKind::Topic(args),
        } = cli.command
        else {
            panic!("expected generate topic");
        };
        assert_eq!(args.topic.as_deref(), Some("sunset"));
        assert_eq!(args.style.as_deref(), Some("cinematic"));
        assert_eq!(args.duration.as_deref(), Some("30s"));
        assert!(args.mood.is_none());
        assert!(args.form.path.is_none());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "promptcraft",
            "generate",
            "image",
            "--form",
            "form.json",
            "--ephemeral",
            "-v",
            "--timeout",
            "5",
        ]);
        assert!(cli.ephemeral);
        assert!(cli.verbose);
        assert_eq!(cli.timeout, Some(5));
        let Commands::Generate {
            kind: GenerateKind::Image(args),
        } = cli.command
        else {
            panic!("expected generate image");
        };
        assert_eq!(args.form.path, Some(PathBuf::from("form.json")));
    }

    #[test]
    fn cli_rejects_verbose_with_quiet() {
        assert!(Cli::try_parse_from(["promptcraft", "-v", "-q", "vendor", "list"]).is_err());
    }

    #[test]
    fn cli_parses_batch_lists() {
        let cli = Cli::parse_from([
            "promptcraft",
            "generate",
            "batch",
            "rain",
            "-n",
            "4",
            "--styles",
            "noir,anime",
        ]);
        let Commands::Generate {
            kind: GenerateKind::Batch(args),
        } = cli.command
        else {
            panic!("expected generate batch");
        };
        assert_eq!(args.variations, Some(4));
        assert_eq!(args.styles, ["noir", "anime"]);
        assert!(args.moods.is_empty());
    }

    #[test]
    fn cli_parses_variant_filter() {
        let cli = Cli::parse_from([
            "promptcraft",
            "generate",
            "variants",
            "city at dawn",
            "--only",
            "creative,commercial",
        ]);
        let Commands::Generate {
            kind: GenerateKind::Variants(args),
        } = cli.command
        else {
            panic!("expected generate variants");
        };
        assert_eq!(args.only, [VariantArg::Creative, VariantArg::Commercial]);
    }

    #[test]
    fn cli_parses_vendor_switch() {
        let cli = Cli::parse_from(["promptcraft", "vendor", "switch", "openai"]);
        assert!(matches!(
            cli.command,
            Commands::Vendor {
                action: VendorAction::Switch {
                    vendor: VendorId::OpenAi
                }
            }
        ));
    }

    #[test]
    fn cli_accepts_legacy_vendor_alias() {
        let cli = Cli::parse_from(["promptcraft", "vendor", "test", "trickle"]);
        assert!(matches!(
            cli.command,
            Commands::Vendor {
                action: VendorAction::Test {
                    vendor: Some(VendorId::Builtin)
                }
            }
        ));
    }

    #[test]
    fn cli_rejects_unknown_vendor() {
        let result = Cli::try_parse_from(["promptcraft", "vendor", "switch", "acme"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_set_pref() {
        let cli = Cli::parse_from(["promptcraft", "settings", "set-pref", "auto-save", "false"]);
        if let Commands::Settings {
            action: SettingsAction::SetPref { name, value },
        } = cli.command
        {
            assert_eq!(name, PreferenceArg::AutoSave);
            assert_eq!(value, "false");
        } else {
            panic!("Expected SetPref action");
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["promptcraft", "config", "set", "timeout_secs", "10"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "timeout_secs");
            assert_eq!(value, "10");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("timeout_secs"));
        assert!(is_valid_config_key("builtin_endpoint"));
        assert!(!is_valid_config_key("api_key"));
        assert!(!is_valid_config_key("invalid"));
    }
}
