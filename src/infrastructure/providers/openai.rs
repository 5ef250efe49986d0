//! OpenAI Chat Completions provider adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{ProviderAdapter, ProviderError};
use crate::domain::config::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::domain::vendor::{ConnectionStatus, VendorId};

const PROBE_TEXT: &str = r#"Test connection. Respond with "OpenAI connected successfully""#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat Completions adapter using bearer-token auth
pub struct OpenAiAdapter {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL)
    }

    pub fn with_endpoint(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    async fn post(&self, api_key: &str, body: &ChatRequest<'_>) -> Result<ChatResponse, ProviderError> {
        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                vendor: VendorId::OpenAi.label(),
                status: status.as_u16(),
                body: error_text,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ResponseShape(e.to_string()))
    }

    fn extract_text(response: ChatResponse) -> Option<String> {
        response
            .choices?
            .into_iter()
            .next()?
            .message?
            .content
    }
}

impl Default for OpenAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn vendor(&self) -> VendorId {
        VendorId::OpenAi
    }

    async fn probe(&self, credential: &str) -> ConnectionStatus {
        if credential.trim().is_empty() {
            return ConnectionStatus::credential_required(VendorId::OpenAi);
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: PROBE_TEXT,
            }],
            max_tokens: 50,
        };

        let acknowledged = self.post(credential.trim(), &body).await.and_then(|response| {
            Self::extract_text(response).ok_or_else(|| {
                ProviderError::ResponseShape("missing choices[0].message.content".to_string())
            })
        });

        match acknowledged {
            Ok(_) => ConnectionStatus::connected(VendorId::OpenAi),
            Err(e) => {
                debug!(error = %e, "OpenAI probe failed");
                ConnectionStatus::failed(format!("OpenAI connection failed: {e}"))
            }
        }
    }

    async fn generate(
        &self,
        system: &str,
        user: &str,
        credential: &str,
    ) -> Result<String, ProviderError> {
        if credential.trim().is_empty() {
            return Err(ProviderError::MissingCredential(VendorId::OpenAi.label()));
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: 1000,
        };

        let response = self.post(credential.trim(), &body).await?;
        let text = Self::extract_text(response).ok_or_else(|| {
            ProviderError::ResponseShape("missing choices[0].message.content".to_string())
        })?;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}
