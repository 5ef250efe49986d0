//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, service wiring
//! and the subcommand handlers.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod generate_cmd;
pub mod history_cmd;
pub mod presenter;
pub mod settings_cmd;
pub mod vendor_cmd;

// Re-export commonly used types
pub use app::{CommandError, Services, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, GenerateKind, HistoryAction, SettingsAction, VendorAction};
pub use presenter::Presenter;
