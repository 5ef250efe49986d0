//! App wiring: config merge, logging and service construction

use std::collections::BTreeMap;
use std::env;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::application::ports::{ConfigStore, PersistenceBackend, PersistenceError};
use crate::application::{
    ConnectivityProber, GeneratePromptUseCase, GenerationOrchestrator, HistoryRecorder,
    VendorSettingsStore,
};
use crate::domain::config::AppConfig;
use crate::domain::error::{ConfigError, FormError};
use crate::domain::vendor::VendorId;
use crate::infrastructure::{build_adapters, FileStore, MemoryStore, XdgConfigStore};

use super::args::Cli;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Failure of a subcommand, mapped to an exit code by the binary
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Form(_) | Self::Usage(_) | Self::Config(ConfigError::ValidationError { .. }) => {
                EXIT_USAGE_ERROR
            }
            _ => EXIT_ERROR,
        }
    }
}

/// Environment variables
pub const ENV_BUILTIN_ENDPOINT: &str = "PROMPTCRAFT_BUILTIN_ENDPOINT";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let default_directive = if quiet {
        "off"
    } else if verbose {
        "promptcraft=debug"
    } else {
        "promptcraft=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Config values given as global flags
pub fn cli_config(cli: &Cli) -> AppConfig {
    AppConfig {
        timeout_secs: cli.timeout,
        builtin_endpoint: cli.builtin_endpoint.clone(),
        ..Default::default()
    }
}

fn env_config() -> AppConfig {
    AppConfig {
        builtin_endpoint: env_value(ENV_BUILTIN_ENDPOINT),
        ..Default::default()
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Vendor credentials supplied through the environment
pub fn env_credentials() -> BTreeMap<String, String> {
    [
        (VendorId::Google, ENV_GEMINI_API_KEY),
        (VendorId::OpenAi, ENV_OPENAI_API_KEY),
    ]
    .into_iter()
    .filter_map(|(vendor, name)| env_value(name).map(|key| (vendor.as_str().to_string(), key)))
    .collect()
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        warn!(error = %e, path = %store.path().display(), "Ignoring unreadable config file");
        AppConfig::empty()
    });

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

/// Services shared by the command handlers
pub struct Services {
    pub settings: Arc<VendorSettingsStore>,
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub history: Arc<HistoryRecorder>,
}

impl Services {
    /// Wire stores, adapters and the orchestrator, then load settings
    pub async fn build(config: &AppConfig, ephemeral: bool) -> Self {
        let backend: Arc<dyn PersistenceBackend> = if ephemeral {
            debug!("Ephemeral run, nothing is persisted");
            Arc::new(MemoryStore::new())
        } else {
            let store = match &config.data_dir {
                Some(dir) => FileStore::new(dir),
                None => FileStore::at_default_location(),
            };
            debug!(dir = %store.dir().display(), "Using file store");
            Arc::new(store)
        };

        let settings = Arc::new(
            VendorSettingsStore::new(Some(backend.clone()))
                .with_credential_overrides(env_credentials()),
        );
        settings.load().await;

        let orchestrator = Arc::new(
            GenerationOrchestrator::new(settings.clone(), build_adapters(config))
                .with_timeout(config.timeout_or_default()),
        );
        let history = Arc::new(HistoryRecorder::new(Some(backend)));

        Self {
            settings,
            orchestrator,
            history,
        }
    }

    pub fn generate(&self) -> GeneratePromptUseCase {
        GeneratePromptUseCase::new(self.orchestrator.clone(), self.history.clone())
    }

    pub fn prober(&self) -> ConnectivityProber {
        ConnectivityProber::new(self.orchestrator.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(
            CommandError::from(FormError::MissingField("topic")).exit_code(),
            EXIT_USAGE_ERROR
        );
        assert_eq!(CommandError::Failed("probe".into()).exit_code(), EXIT_ERROR);
        assert_eq!(
            CommandError::from(ConfigError::ReadError("io".into())).exit_code(),
            EXIT_ERROR
        );
    }

    #[test]
    fn cli_config_carries_global_flags() {
        let cli = Cli::parse_from([
            "promptcraft",
            "--timeout",
            "7",
            "--builtin-endpoint",
            "http://127.0.0.1:9/agent",
            "vendor",
            "list",
        ]);
        let config = cli_config(&cli);
        assert_eq!(config.timeout_or_default(), Duration::from_secs(7));
        assert_eq!(config.builtin_endpoint(), Some("http://127.0.0.1:9/agent"));
        assert!(config.google_model.is_none());
    }

    #[tokio::test]
    async fn ephemeral_services_start_from_defaults() {
        let services = Services::build(&AppConfig::defaults(), true).await;
        let settings = services.settings.snapshot().await;
        assert_eq!(settings.default_vendor, "builtin");
        assert!(services.history.list().await.is_empty());
        assert!(services.orchestrator.has_adapter(VendorId::Google));
        assert!(!services.orchestrator.has_adapter(VendorId::Anthropic));
    }

    #[tokio::test]
    async fn services_persist_under_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::defaults()
        };

        let services = Services::build(&config, false).await;
        services
            .orchestrator
            .switch_vendor(VendorId::Anthropic)
            .await
            .unwrap();
        assert!(dir.path().join("videoPromptSettings.json").exists());

        let reloaded = Services::build(&config, false).await;
        assert_eq!(reloaded.settings.snapshot().await.default_vendor, "anthropic");
    }
}
