//! Settings command handler

use crate::domain::vendor::{SettingsPatch, VendorSettings, BUILTIN_SENTINEL};

use super::app::{CommandError, Services};
use super::args::{PreferenceArg, SettingsAction};
use super::config_cmd::{mask_api_key, parse_bool};
use super::presenter::Presenter;

/// Handle settings subcommand
pub async fn handle_settings_command(
    action: SettingsAction,
    services: &Services,
    presenter: &Presenter,
) -> Result<(), CommandError> {
    match action {
        SettingsAction::Show => {
            let settings = services.settings.snapshot().await;
            for (key, value) in settings_lines(&settings) {
                presenter.key_value(&key, &value);
            }
            if !services.settings.is_persistent() {
                presenter.info("Settings are not persisted");
            }
            Ok(())
        }
        SettingsAction::SetPref { name, value } => {
            let enabled = parse_bool(&value).map_err(|_| {
                CommandError::Usage(format!("Invalid value '{value}'. Use true or false"))
            })?;
            let mut preferences = services.settings.snapshot().await.preferences;
            match name {
                PreferenceArg::AutoSave => preferences.auto_save = enabled,
                PreferenceArg::DarkMode => preferences.dark_mode = enabled,
                PreferenceArg::Notifications => preferences.notifications = enabled,
            }
            services
                .settings
                .save(SettingsPatch {
                    preferences: Some(preferences),
                    ..Default::default()
                })
                .await?;
            presenter.success(&format!("{} = {enabled}", preference_key(name)));
            Ok(())
        }
        SettingsAction::Reset => {
            services.settings.reset().await?;
            presenter.success("Settings restored to defaults");
            Ok(())
        }
    }
}

fn preference_key(name: PreferenceArg) -> &'static str {
    match name {
        PreferenceArg::AutoSave => "preferences.autoSave",
        PreferenceArg::DarkMode => "preferences.darkMode",
        PreferenceArg::Notifications => "preferences.notifications",
    }
}

/// Flattened key/value view with credentials masked
fn settings_lines(settings: &VendorSettings) -> Vec<(String, String)> {
    let mut lines = vec![
        ("version".to_string(), settings.version.to_string()),
        ("defaultVendor".to_string(), settings.default_vendor.clone()),
    ];
    for (vendor, key) in &settings.credentials {
        let shown = if key.is_empty() {
            "(not set)".to_string()
        } else if key == BUILTIN_SENTINEL {
            key.clone()
        } else {
            mask_api_key(key)
        };
        lines.push((format!("credentials.{vendor}"), shown));
    }
    let preferences = &settings.preferences;
    lines.push((
        preference_key(PreferenceArg::AutoSave).to_string(),
        preferences.auto_save.to_string(),
    ));
    lines.push((
        preference_key(PreferenceArg::DarkMode).to_string(),
        preferences.dark_mode.to_string(),
    ));
    lines.push((
        preference_key(PreferenceArg::Notifications).to_string(),
        preferences.notifications.to_string(),
    ));
    lines
}
