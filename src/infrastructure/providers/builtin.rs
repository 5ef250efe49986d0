//! Built-in agent adapter
//!
//! Talks to a local or hosted agent endpoint that accepts the instruction
//! pair as JSON. No credential is needed. Without a configured endpoint
//! every call fails, so generation lands on the fallback text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{ProviderAdapter, ProviderError};
use crate::domain::vendor::{ConnectionStatus, VendorId};

const PROBE_SYSTEM: &str = r#"You are a test AI. Respond with "Connection successful""#;
const PROBE_USER: &str = "Test connection";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentRequest<'a> {
    system_prompt: &'a str,
    user_prompt: &'a str,
}

/// Accepted JSON reply shapes; anything else is read as plain text
#[derive(Debug, Deserialize)]
struct AgentReply {
    #[serde(alias = "text", alias = "content")]
    response: String,
}

pub struct BuiltinAdapter {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl BuiltinAdapter {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    async fn invoke(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            ProviderError::Transport("no built-in agent endpoint configured".to_string())
        })?;

        let response = self
            .client
            .post(endpoint)
            .json(&AgentRequest {
                system_prompt: system,
                user_prompt: user,
            })
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                vendor: VendorId::Builtin.label(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(Self::parse_reply(body))
    }

    fn parse_reply(body: String) -> String {
        match serde_json::from_str::<AgentReply>(&body) {
            Ok(reply) => reply.response,
            Err(_) => body,
        }
    }
}

#[async_trait]
impl ProviderAdapter for BuiltinAdapter {
    fn vendor(&self) -> VendorId {
        VendorId::Builtin
    }

    async fn probe(&self, _credential: &str) -> ConnectionStatus {
        match self.invoke(PROBE_SYSTEM, PROBE_USER).await {
            Ok(_) => ConnectionStatus::connected(VendorId::Builtin),
            Err(e) => {
                debug!(error = %e, "Built-in agent probe failed");
                ConnectionStatus::failed(format!("Built-in Agent connection failed: {e}"))
            }
        }
    }

    async fn generate(
        &self,
        system: &str,
        user: &str,
        _credential: &str,
    ) -> Result<String, ProviderError> {
        let text = self.invoke(system, user).await?;
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}
