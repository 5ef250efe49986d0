//! Promptcraft CLI entry point

use std::process::ExitCode;

use clap::Parser;

use promptcraft::cli::{
    app::{cli_config, init_tracing, load_merged_config},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    generate_cmd::handle_generate_command,
    history_cmd::handle_history_command,
    settings_cmd::handle_settings_command,
    vendor_cmd::handle_vendor_command,
    CommandError, Presenter, Services, EXIT_SUCCESS,
};
use promptcraft::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let mut presenter = if cli.quiet {
        Presenter::quiet()
    } else {
        Presenter::new()
    };

    match run(cli, &mut presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli, presenter: &mut Presenter) -> Result<(), CommandError> {
    // Config commands work on the file itself, no services needed
    if let Commands::Config { action } = cli.command {
        let store = XdgConfigStore::new();
        return Ok(handle_config_command(action, &store, presenter).await?);
    }

    let config = load_merged_config(cli_config(&cli)).await;
    let services = Services::build(&config, cli.ephemeral).await;

    match cli.command {
        Commands::Generate { kind } => Ok(handle_generate_command(kind, &services, presenter).await?),
        Commands::Vendor { action } => handle_vendor_command(action, &services, presenter).await,
        Commands::Settings { action } => handle_settings_command(action, &services, presenter).await,
        Commands::History { action } => handle_history_command(action, &services, presenter).await,
        Commands::Config { .. } => Ok(()),
    }
}
