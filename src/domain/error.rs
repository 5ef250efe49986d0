//! Domain error types

use thiserror::Error;

/// Error when an unknown vendor ID is provided
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid vendor: \"{input}\". Valid vendors are: builtin, google, openai, anthropic, custom")]
pub struct InvalidVendorError {
    pub input: String,
}

/// Error when a custom Veo3 duration cannot be understood
#[derive(Debug, Clone, Error)]
#[error("Invalid custom duration: \"{input}\". Examples: 30s, 2 min, 1:30, 1.5 minutes, 1h30m")]
pub struct InvalidDurationError {
    pub input: String,
}

/// Error when a form file cannot be used to build a prompt
#[derive(Debug, Clone, Error)]
pub enum FormError {
    #[error("Failed to read form file: {0}")]
    ReadError(String),

    #[error("Failed to parse form file: {0}")]
    ParseError(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidDuration(#[from] InvalidDurationError),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
