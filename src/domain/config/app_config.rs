//! Application configuration value object

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GOOGLE_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub timeout_secs: Option<u64>,
    pub google_model: Option<String>,
    pub openai_model: Option<String>,
    pub google_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub builtin_endpoint: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            google_model: Some(DEFAULT_GOOGLE_MODEL.to_string()),
            openai_model: Some(DEFAULT_OPENAI_MODEL.to_string()),
            google_base_url: Some(DEFAULT_GOOGLE_BASE_URL.to_string()),
            openai_base_url: Some(DEFAULT_OPENAI_BASE_URL.to_string()),
            builtin_endpoint: None,
            data_dir: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            google_model: other.google_model.or(self.google_model),
            openai_model: other.openai_model.or(self.openai_model),
            google_base_url: other.google_base_url.or(self.google_base_url),
            openai_base_url: other.openai_base_url.or(self.openai_base_url),
            builtin_endpoint: other.builtin_endpoint.or(self.builtin_endpoint),
            data_dir: other.data_dir.or(self.data_dir),
        }
    }

    /// Adapter call timeout; zero or unset falls back to 30s
    pub fn timeout_or_default(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn google_model_or_default(&self) -> &str {
        non_blank(self.google_model.as_deref()).unwrap_or(DEFAULT_GOOGLE_MODEL)
    }

    pub fn openai_model_or_default(&self) -> &str {
        non_blank(self.openai_model.as_deref()).unwrap_or(DEFAULT_OPENAI_MODEL)
    }

    pub fn google_base_url_or_default(&self) -> &str {
        non_blank(self.google_base_url.as_deref())
            .unwrap_or(DEFAULT_GOOGLE_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn openai_base_url_or_default(&self) -> &str {
        non_blank(self.openai_base_url.as_deref())
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/')
    }

    /// Built-in agent endpoint, if one is configured
    pub fn builtin_endpoint(&self) -> Option<&str> {
        non_blank(self.builtin_endpoint.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
