//! Provider adapter port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::vendor::{ConnectionStatus, VendorId};

/// Provider errors. None of these escape `generate` on the orchestrator;
/// they select the fallback path and are logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0} API key required")]
    MissingCredential(&'static str),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{vendor} API error {status}: {body}")]
    Status {
        vendor: &'static str,
        status: u16,
        body: String,
    },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("{0} API not implemented yet")]
    NotImplemented(String),
}

/// Port for a language-model backend
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Vendor this adapter talks to
    fn vendor(&self) -> VendorId;

    /// Issue a fixed minimal request and report whether the vendor answered.
    /// Never returns an error: failures are folded into the status.
    async fn probe(&self, credential: &str) -> ConnectionStatus;

    /// Send the instruction pair and return the generated text.
    ///
    /// # Returns
    /// Non-empty text, or a typed error. Partial text is never returned.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        credential: &str,
    ) -> Result<String, ProviderError>;
}
