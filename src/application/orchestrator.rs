//! Generation orchestrator
//!
//! Single entry point for text generation. Resolves the active vendor from a
//! settings snapshot, calls its adapter under a timeout, and on any failure
//! renders the deterministic fallback from the request context. `generate`
//! never fails.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ports::{PersistenceError, ProviderAdapter, ProviderError};
use super::settings_store::VendorSettingsStore;
use crate::domain::generation::{fallback_text, GenerationRequest};
use crate::domain::vendor::{
    vendor_catalogue, ConnectionSnapshot, ConnectionStatus, SettingsPatch, VendorId, VendorInfo,
    VendorSettings,
};

/// Default bound on a single adapter call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a generation, with how it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub text: String,
    /// Vendor id as stored in settings (may be unknown)
    pub vendor: String,
    /// True when the text is the synthetic fallback
    pub fallback: bool,
}

pub struct GenerationOrchestrator {
    settings: Arc<VendorSettingsStore>,
    adapters: HashMap<VendorId, Arc<dyn ProviderAdapter>>,
    switch_lock: Mutex<()>,
    connected: AtomicBool,
    timeout: Duration,
}

impl GenerationOrchestrator {
    pub fn new(
        settings: Arc<VendorSettingsStore>,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
    ) -> Self {
        Self {
            settings,
            adapters: adapters
                .into_iter()
                .map(|adapter| (adapter.vendor(), adapter))
                .collect(),
            switch_lock: Mutex::new(()),
            connected: AtomicBool::new(false),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settings(&self) -> &Arc<VendorSettingsStore> {
        &self.settings
    }

    pub fn has_adapter(&self, vendor: VendorId) -> bool {
        self.adapters.contains_key(&vendor)
    }

    fn adapter(&self, vendor: VendorId) -> Result<&Arc<dyn ProviderAdapter>, ProviderError> {
        self.adapters
            .get(&vendor)
            .ok_or_else(|| ProviderError::NotImplemented(vendor.as_str().to_string()))
    }

    /// Take a settings snapshot, serialized against vendor switches
    async fn snapshot(&self) -> VendorSettings {
        let _guard = self.switch_lock.lock().await;
        self.settings.snapshot().await
    }

    /// Generate text for the request. Always returns non-empty text.
    pub async fn generate(&self, request: &GenerationRequest) -> String {
        self.generate_with_outcome(request).await.text
    }

    /// Like [`generate`](Self::generate), also reporting the vendor and
    /// whether the fallback was used.
    pub async fn generate_with_outcome(&self, request: &GenerationRequest) -> GenerationOutcome {
        let settings = self.snapshot().await;
        let vendor = settings.default_vendor.clone();

        match self.call_adapter(&settings, request).await {
            Ok(text) => {
                self.connected.store(true, Ordering::SeqCst);
                info!(vendor = %vendor, chars = text.len(), "Generation succeeded");
                GenerationOutcome {
                    text,
                    vendor,
                    fallback: false,
                }
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                warn!(vendor = %vendor, error = %e, "Generation failed, using fallback");
                GenerationOutcome {
                    text: fallback_text(request.user_instruction(), request.context()),
                    vendor,
                    fallback: true,
                }
            }
        }
    }

    async fn call_adapter(
        &self,
        settings: &VendorSettings,
        request: &GenerationRequest,
    ) -> Result<String, ProviderError> {
        let vendor = settings
            .vendor()
            .map_err(|e| ProviderError::NotImplemented(e.input))?;
        let adapter = self.adapter(vendor)?;

        debug!(vendor = %vendor, "Calling provider");
        let text = tokio::time::timeout(
            self.timeout,
            adapter.generate(
                request.system_instruction(),
                request.user_instruction(),
                settings.credential(vendor),
            ),
        )
        .await
        .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }

    /// Probe a vendor with its stored credential. Does not change the
    /// active vendor or the connection flag.
    pub async fn probe(&self, vendor: VendorId) -> ConnectionStatus {
        let Ok(adapter) = self.adapter(vendor) else {
            return ConnectionStatus::not_implemented(vendor.as_str());
        };
        let settings = self.settings.snapshot().await;

        debug!(vendor = %vendor, "Probing provider");
        match tokio::time::timeout(self.timeout, adapter.probe(settings.credential(vendor))).await
        {
            Ok(status) => status,
            Err(_) => ConnectionStatus::failed(format!(
                "{} connection failed: {}",
                vendor.label(),
                ProviderError::Timeout(self.timeout.as_secs())
            )),
        }
    }

    /// Persist `vendor` as the default, probe it and return the status.
    /// The connection flag follows the probe result.
    pub async fn switch_vendor(&self, vendor: VendorId) -> Result<ConnectionStatus, PersistenceError> {
        let _guard = self.switch_lock.lock().await;
        self.settings.save(SettingsPatch::vendor(vendor)).await?;
        info!(vendor = %vendor, "Switched vendor");

        let status = self.probe(vendor).await;
        self.connected.store(status.success, Ordering::SeqCst);
        Ok(status)
    }

    /// Make `vendor` active after an external successful probe
    pub async fn activate(&self, vendor: VendorId) -> Result<(), PersistenceError> {
        let _guard = self.switch_lock.lock().await;
        if self.settings.snapshot().await.default_vendor != vendor.as_str() {
            self.settings.save(SettingsPatch::vendor(vendor)).await?;
            info!(vendor = %vendor, "Activated vendor");
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub(crate) fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Catalogue of all vendors with their availability
    pub fn vendor_info(&self) -> Vec<VendorInfo> {
        vendor_catalogue(self.is_connected())
    }

    pub async fn connection_status(&self) -> ConnectionSnapshot {
        let settings = self.settings.snapshot().await;
        let vendor_name = match settings.vendor() {
            Ok(vendor) => vendor.display_name().to_string(),
            Err(_) => settings.default_vendor.clone(),
        };
        ConnectionSnapshot {
            is_connected: self.is_connected(),
            current_vendor: settings.default_vendor,
            vendor_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::PersistenceBackend;
    use crate::domain::generation::FormFields;
    use crate::infrastructure::persistence::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Adapter returning a canned reply and counting calls
    struct StubAdapter {
        vendor: VendorId,
        reply: Result<String, ProviderError>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubAdapter {
        fn new(vendor: VendorId, reply: Result<&str, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                vendor,
                reply: reply.map(str::to_string),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(vendor: VendorId, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                vendor,
                reply: Ok("late".to_string()),
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ProviderAdapter for StubAdapter {
        fn vendor(&self) -> VendorId {
            self.vendor
        }

        async fn probe(&self, _credential: &str) -> ConnectionStatus {
            match &self.reply {
                Ok(_) => ConnectionStatus::connected(self.vendor),
                Err(e) => ConnectionStatus::failed(e.to_string()),
            }
        }

        async fn generate(
            &self,
            _system: &str,
            _user: &str,
            _credential: &str,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone()
        }
    }

    fn dyn_adapter(adapter: &Arc<StubAdapter>) -> Arc<dyn ProviderAdapter> {
        adapter.clone()
    }

    fn settings_store() -> Arc<VendorSettingsStore> {
        let backend: Arc<dyn PersistenceBackend> = Arc::new(MemoryStore::new());
        Arc::new(VendorSettingsStore::new(Some(backend)))
    }

    fn topic_request() -> GenerationRequest {
        GenerationRequest::new(
            "system",
            "Create a cinematic video prompt for sunset",
            FormFields::new()
                .with("topic", "sunset")
                .with("style", "cinematic")
                .with("duration", "30s")
                .with("mood", "energetic")
                .with("quality", "4K"),
        )
    }

    #[tokio::test]
    async fn success_returns_adapter_text_verbatim() {
        let adapter = StubAdapter::new(VendorId::Builtin, Ok("  A sunset prompt\n"));
        let orchestrator = GenerationOrchestrator::new(settings_store(), vec![dyn_adapter(&adapter)]);

        let outcome = orchestrator.generate_with_outcome(&topic_request()).await;
        assert_eq!(outcome.text, "  A sunset prompt\n");
        assert!(!outcome.fallback);
        assert_eq!(outcome.vendor, "builtin");
        assert!(orchestrator.is_connected());
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_adapter_falls_back_with_all_context_values() {
        let adapter = StubAdapter::new(
            VendorId::Builtin,
            Err(ProviderError::Transport("connection refused".to_string())),
        );
        let orchestrator = GenerationOrchestrator::new(settings_store(), vec![dyn_adapter(&adapter)]);

        let outcome = orchestrator.generate_with_outcome(&topic_request()).await;
        assert!(outcome.fallback);
        for value in ["sunset", "cinematic", "30s", "energetic", "4K"] {
            assert!(outcome.text.contains(value), "missing {value}: {}", outcome.text);
        }
        assert!(!orchestrator.is_connected());
    }

    #[tokio::test]
    async fn blank_reply_is_not_success() {
        let adapter = StubAdapter::new(VendorId::Builtin, Ok("   \n"));
        let orchestrator = GenerationOrchestrator::new(settings_store(), vec![dyn_adapter(&adapter)]);

        let outcome = orchestrator.generate_with_outcome(&topic_request()).await;
        assert!(outcome.fallback);
        assert!(!outcome.text.trim().is_empty());
    }

    #[tokio::test]
    async fn unimplemented_vendor_falls_back() {
        let store = settings_store();
        store
            .save(SettingsPatch::vendor(VendorId::Anthropic))
            .await
            .unwrap();
        let orchestrator = GenerationOrchestrator::new(store, Vec::new());

        let text = orchestrator.generate(&topic_request()).await;
        assert!(text.contains("sunset"));
    }

    #[tokio::test]
    async fn unknown_stored_vendor_falls_back() {
        let store = settings_store();
        store
            .save(SettingsPatch {
                default_vendor: Some("mystery".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let adapter = StubAdapter::new(VendorId::Builtin, Ok("never"));
        let orchestrator = GenerationOrchestrator::new(store, vec![dyn_adapter(&adapter)]);

        let outcome = orchestrator.generate_with_outcome(&topic_request()).await;
        assert!(outcome.fallback);
        assert_eq!(outcome.vendor, "mystery");
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_context_still_produces_text() {
        let adapter = StubAdapter::new(VendorId::Builtin, Err(ProviderError::EmptyResponse));
        let orchestrator = GenerationOrchestrator::new(settings_store(), vec![dyn_adapter(&adapter)]);

        let text = orchestrator
            .generate(&GenerationRequest::new("", "", FormFields::new()))
            .await;
        assert!(!text.trim().is_empty());
    }

    #[tokio::test]
    async fn timeout_routes_to_fallback() {
        let adapter = StubAdapter::slow(VendorId::Builtin, Duration::from_secs(5));
        let orchestrator = GenerationOrchestrator::new(settings_store(), vec![dyn_adapter(&adapter)])
            .with_timeout(Duration::from_millis(50));

        let outcome = orchestrator.generate_with_outcome(&topic_request()).await;
        assert!(outcome.fallback);
    }

    #[tokio::test]
    async fn switch_vendor_persists_and_probes() {
        let store = settings_store();
        let adapter = StubAdapter::new(VendorId::Google, Ok("ok"));
        let orchestrator = GenerationOrchestrator::new(store.clone(), vec![dyn_adapter(&adapter)]);

        let status = orchestrator.switch_vendor(VendorId::Google).await.unwrap();
        assert!(status.success);
        assert_eq!(store.snapshot().await.default_vendor, "google");

        let snapshot = orchestrator.connection_status().await;
        assert!(snapshot.is_connected);
        assert_eq!(snapshot.current_vendor, "google");
        assert_eq!(snapshot.vendor_name, "Google Gemini");
    }

    #[tokio::test]
    async fn switch_to_unimplemented_vendor_reports_status() {
        let orchestrator = GenerationOrchestrator::new(settings_store(), Vec::new());
        let status = orchestrator.switch_vendor(VendorId::Custom).await.unwrap();
        assert!(!status.success);
        assert_eq!(status.message, "custom API not implemented yet");
        assert!(!orchestrator.is_connected());
    }

    #[tokio::test]
    async fn concurrent_switch_and_generate_never_see_torn_settings() {
        let store = settings_store();
        let builtin = StubAdapter::new(VendorId::Builtin, Ok("builtin text"));
        let openai = StubAdapter::new(VendorId::OpenAi, Ok("openai text"));
        let orchestrator = Arc::new(GenerationOrchestrator::new(
            store.clone(),
            vec![dyn_adapter(&builtin), dyn_adapter(&openai)],
        ));

        let mut handles = Vec::new();
        for i in 0..20 {
            let orchestrator = orchestrator.clone();
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    orchestrator.switch_vendor(VendorId::OpenAi).await.unwrap();
                } else {
                    let outcome = orchestrator.generate_with_outcome(&topic_request()).await;
                    assert!(!outcome.text.is_empty());
                }
                let snapshot = store.snapshot().await;
                assert!(!snapshot.credentials.is_empty());
                assert_eq!(snapshot.credentials.get("builtin").map(String::as_str), Some("built-in"));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.snapshot().await.default_vendor, "openai");
    }

    #[tokio::test]
    async fn legacy_builtin_name_reports_canonical_vendor() {
        let backend: Arc<dyn PersistenceBackend> = Arc::new(MemoryStore::with_entry(
            crate::application::settings_store::SETTINGS_KEY,
            r#"{"defaultVendor":"trickle"}"#,
        ));
        let store = Arc::new(VendorSettingsStore::new(Some(backend)));
        store.load().await;
        let orchestrator = GenerationOrchestrator::new(store, Vec::new());

        let snapshot = orchestrator.connection_status().await;
        assert_eq!(snapshot.current_vendor, "builtin");
    }

    #[tokio::test]
    async fn vendor_info_marks_builtin_connected() {
        let adapter = StubAdapter::new(VendorId::Builtin, Ok("text"));
        let orchestrator = GenerationOrchestrator::new(settings_store(), vec![dyn_adapter(&adapter)]);
        orchestrator.generate(&topic_request()).await;

        let info = orchestrator.vendor_info();
        let builtin = info.iter().find(|v| v.id == VendorId::Builtin).unwrap();
        assert_eq!(builtin.status.as_str(), "connected");
        assert!(builtin.recommended);
    }
}
