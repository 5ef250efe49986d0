//! Vendor command handler

use crate::domain::vendor::{VendorAvailability, VendorId, VendorInfo};

use super::app::{CommandError, Services};
use super::args::VendorAction;
use super::config_cmd::mask_api_key;
use super::presenter::Presenter;

/// Handle vendor subcommand
pub async fn handle_vendor_command(
    action: VendorAction,
    services: &Services,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    match action {
        VendorAction::List => handle_list(services, presenter).await,
        VendorAction::Status => handle_status(services, presenter).await,
        VendorAction::Test { vendor } => handle_test(services, presenter, vendor).await,
        VendorAction::Switch { vendor } => handle_switch(services, presenter, vendor).await,
        VendorAction::SetKey { vendor, key } => {
            handle_set_key(services, presenter, vendor, &key).await
        }
    }
}

async fn handle_list(services: &Services, presenter: &Presenter) -> Result<(), CommandError> {
    let settings = services.settings.snapshot().await;
    for info in services.orchestrator.vendor_info() {
        let current = settings.default_vendor == info.id.as_str();
        let has_adapter = services.orchestrator.has_adapter(info.id);
        presenter.output(&format_vendor_line(
            &info,
            current,
            has_adapter,
            settings.has_credential(info.id),
        ));
    }
    Ok(())
}

fn format_vendor_line(info: &VendorInfo, current: bool, has_adapter: bool, has_key: bool) -> String {
    let marker = if current { "*" } else { " " };
    let mut notes = Vec::new();
    if info.recommended {
        notes.push("recommended");
    }
    if !has_adapter {
        notes.push("not implemented");
    } else if info.id.requires_credential() && !has_key {
        notes.push("no API key");
    }
    let status = match info.status {
        VendorAvailability::Connected if !current => VendorAvailability::Available.as_str(),
        status => status.as_str(),
    };

    let mut line = format!("{marker} {:<10} {:<16} {status}", info.id.as_str(), info.name);
    if !notes.is_empty() {
        line.push_str(&format!(" ({})", notes.join(", ")));
    }
    line
}

async fn handle_status(services: &Services, presenter: &Presenter) -> Result<(), CommandError> {
    let status = services.orchestrator.connection_status().await;
    presenter.key_value("vendor", &status.current_vendor);
    presenter.key_value("name", &status.vendor_name);
    presenter.key_value("connected", &status.is_connected.to_string());
    Ok(())
}

async fn handle_test(
    services: &Services,
    presenter: &mut Presenter,
    vendor: Option<VendorId>,
) -> Result<(), CommandError> {
    let label = match vendor {
        Some(vendor) => vendor.display_name().to_string(),
        None => services.orchestrator.connection_status().await.vendor_name,
    };

    presenter.start_spinner(&format!("Testing {label}..."));
    let result = services.prober().test_connection(vendor).await;
    let status = match result {
        Ok(status) => status,
        Err(e) => {
            presenter.spinner_fail("Connection test failed");
            return Err(e.into());
        }
    };

    if status.success {
        presenter.spinner_success(&status.message);
        presenter.info(&format!("{label} is now the active vendor"));
        Ok(())
    } else {
        presenter.stop_spinner();
        Err(CommandError::Failed(status.message))
    }
}

async fn handle_switch(
    services: &Services,
    presenter: &mut Presenter,
    vendor: VendorId,
) -> Result<(), CommandError> {
    presenter.start_spinner(&format!("Switching to {}...", vendor.display_name()));
    let result = services.orchestrator.switch_vendor(vendor).await;
    presenter.stop_spinner();

    let status = result?;
    presenter.success(&format!("Switched to {}", vendor.display_name()));
    if status.success {
        presenter.success(&status.message);
    } else {
        presenter.warn(&format!(
            "{} (prompts will use the offline template until this is fixed)",
            status.message
        ));
    }
    Ok(())
}

async fn handle_set_key(
    services: &Services,
    presenter: &Presenter,
    vendor: VendorId,
    key: &str,
) -> Result<(), CommandError> {
    if !vendor.requires_credential() {
        return Err(CommandError::Usage(format!(
            "{} does not use an API key",
            vendor.display_name()
        )));
    }
    if key.trim().is_empty() {
        return Err(CommandError::Usage("API key cannot be empty".to_string()));
    }

    services.settings.set_credential(vendor, key).await?;
    presenter.success(&format!(
        "Saved {} API key ({})",
        vendor.label(),
        mask_api_key(key.trim())
    ));

    if services.settings.snapshot().await.credential(vendor) != key.trim() {
        presenter.warn("An API key from the environment takes precedence over the stored one");
    }
    Ok(())
}
