//! Connectivity prober

use std::sync::Arc;

use tracing::info;

use super::orchestrator::GenerationOrchestrator;
use super::ports::PersistenceError;
use crate::domain::vendor::{ConnectionStatus, VendorId};

/// Tests vendor connectivity and, on success, makes the tested vendor the
/// active one.
pub struct ConnectivityProber {
    orchestrator: Arc<GenerationOrchestrator>,
}

impl ConnectivityProber {
    pub fn new(orchestrator: Arc<GenerationOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Probe `vendor`, or the current default vendor when `None`.
    ///
    /// A successful probe switches the orchestrator to the vendor. A
    /// failed probe of the current vendor clears the connection flag.
    pub async fn test_connection(
        &self,
        vendor: Option<VendorId>,
    ) -> Result<ConnectionStatus, PersistenceError> {
        let settings = self.orchestrator.settings().snapshot().await;
        let target = match vendor {
            Some(vendor) => vendor,
            None => match settings.vendor() {
                Ok(vendor) => vendor,
                Err(e) => return Ok(ConnectionStatus::not_implemented(&e.input)),
            },
        };

        let status = self.orchestrator.probe(target).await;
        info!(vendor = %target, success = status.success, "Connection test finished");

        if status.success {
            self.orchestrator.activate(target).await?;
        } else if settings.default_vendor == target.as_str() {
            self.orchestrator.mark_disconnected();
        }
        Ok(status)
    }
}
