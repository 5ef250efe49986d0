//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, DEFAULT_GOOGLE_BASE_URL, DEFAULT_GOOGLE_MODEL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_OPENAI_MODEL, DEFAULT_TIMEOUT_SECS,
};
