//! Vendor settings store
//!
//! Holds the single in-memory [`VendorSettings`] instance and mirrors it to
//! the key-value backend as one JSON blob. Reads hand out clones taken under
//! the lock, so callers never observe a half-applied update.
//!
//! Credential overrides (from the environment) are layered onto every
//! snapshot but never written back.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::ports::{PersistenceBackend, PersistenceError};
use crate::domain::vendor::{SettingsPatch, VendorId, VendorSettings, SETTINGS_SCHEMA_VERSION};

/// Key holding the settings blob
pub const SETTINGS_KEY: &str = "videoPromptSettings";

pub struct VendorSettingsStore {
    backend: Option<Arc<dyn PersistenceBackend>>,
    settings: RwLock<VendorSettings>,
    overrides: BTreeMap<String, String>,
}

impl VendorSettingsStore {
    /// Create a store with default settings. Call [`load`](Self::load) to
    /// pull persisted values.
    pub fn new(backend: Option<Arc<dyn PersistenceBackend>>) -> Self {
        Self {
            backend,
            settings: RwLock::new(VendorSettings::defaults()),
            overrides: BTreeMap::new(),
        }
    }

    /// Layer credentials over whatever is stored. Blank values are ignored.
    pub fn with_credential_overrides(mut self, overrides: BTreeMap<String, String>) -> Self {
        self.overrides = overrides
            .into_iter()
            .filter(|(_, key)| !key.trim().is_empty())
            .collect();
        self
    }

    /// Whether settings survive the process
    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    /// Reload from the backend. Missing or unreadable data yields defaults;
    /// this never fails.
    pub async fn load(&self) -> VendorSettings {
        let loaded = self.read_blob().await;
        let mut guard = self.settings.write().await;
        *guard = loaded;
        self.overlay(guard.clone())
    }

    async fn read_blob(&self) -> VendorSettings {
        let Some(backend) = &self.backend else {
            debug!("No persistence backend, using default settings");
            return VendorSettings::defaults();
        };

        let blob = match backend.get(SETTINGS_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = SETTINGS_KEY, "Settings not found, using defaults");
                return VendorSettings::defaults();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read settings, using defaults");
                return VendorSettings::defaults();
            }
        };

        match VendorSettings::from_json(&blob) {
            Ok(settings) => {
                if settings.version > SETTINGS_SCHEMA_VERSION {
                    warn!(
                        found = settings.version,
                        supported = SETTINGS_SCHEMA_VERSION,
                        "Settings written by a newer version, loading known fields only"
                    );
                }
                settings
            }
            Err(e) => {
                warn!(error = %e, "Corrupt settings blob, using defaults");
                VendorSettings::defaults()
            }
        }
    }

    /// Copy of the current settings, overrides applied
    pub async fn snapshot(&self) -> VendorSettings {
        self.overlay(self.settings.read().await.clone())
    }

    fn overlay(&self, mut settings: VendorSettings) -> VendorSettings {
        for (vendor, key) in &self.overrides {
            settings.credentials.insert(vendor.clone(), key.clone());
        }
        settings
    }

    /// Shallow-merge `patch` into the current settings and persist the
    /// whole structure.
    ///
    /// The in-memory value is updated even when persisting fails; the
    /// error is returned so the caller can report it.
    pub async fn save(&self, patch: SettingsPatch) -> Result<VendorSettings, PersistenceError> {
        let mut guard = self.settings.write().await;
        let merged = guard.clone().merge(patch);
        *guard = merged.clone();
        self.persist(&merged).await?;
        Ok(merged)
    }

    /// Store one vendor's credential, keeping the others as persisted
    pub async fn set_credential(
        &self,
        vendor: VendorId,
        credential: &str,
    ) -> Result<VendorSettings, PersistenceError> {
        let mut guard = self.settings.write().await;
        let mut credentials = guard.credentials.clone();
        credentials.insert(vendor.as_str().to_string(), credential.trim().to_string());
        let merged = guard.clone().merge(SettingsPatch {
            credentials: Some(credentials),
            ..Default::default()
        });
        *guard = merged.clone();
        self.persist(&merged).await?;
        info!(vendor = %vendor, "Credential updated");
        Ok(merged)
    }

    /// Restore defaults and persist them
    pub async fn reset(&self) -> Result<VendorSettings, PersistenceError> {
        let mut guard = self.settings.write().await;
        *guard = VendorSettings::defaults();
        let settings = guard.clone();
        self.persist(&settings).await?;
        info!("Settings reset to defaults");
        Ok(settings)
    }

    async fn persist(&self, settings: &VendorSettings) -> Result<(), PersistenceError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        let blob = settings
            .to_json()
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
        backend.set(SETTINGS_KEY, &blob).await?;
        debug!(key = SETTINGS_KEY, vendor = %settings.default_vendor, "Settings saved");
        Ok(())
    }
}
