//! Google Gemini provider adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{ProviderAdapter, ProviderError};
use crate::domain::config::{DEFAULT_GOOGLE_BASE_URL, DEFAULT_GOOGLE_MODEL};
use crate::domain::vendor::{ConnectionStatus, VendorId};

const PROBE_TEXT: &str = r#"Test connection. Respond with "Google Gemini connected successfully""#;

// Request types for Gemini API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

// Response types for Gemini API

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini `generateContent` adapter. The API key travels as a query parameter.
pub struct GoogleAdapter {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GoogleAdapter {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_GOOGLE_BASE_URL, DEFAULT_GOOGLE_MODEL)
    }

    /// Create an adapter against a custom base URL and model
    pub fn with_endpoint(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the API URL; the key is appended as an encoded query parameter
    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn generate_body(system: &str, user: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{system}\n\n{user}"),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 1000,
                top_p: Some(0.8),
                top_k: Some(10),
            },
        }
    }

    fn probe_body() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: PROBE_TEXT.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 100,
                top_p: None,
                top_k: None,
            },
        }
    }

    async fn post(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let response = self
            .client
            .post(self.api_url())
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Status {
                vendor: VendorId::Google.label(),
                status: status.as_u16(),
                body: error_text,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ResponseShape(e.to_string()))
    }

    /// First candidate's content, if present
    fn first_content(response: &GenerateContentResponse) -> Option<&CandidateContent> {
        response.candidates.as_ref()?.first()?.content.as_ref()
    }

    /// Text of the first part of the first candidate
    fn extract_text(response: &GenerateContentResponse) -> Option<&str> {
        Self::first_content(response)?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
    }
}

impl Default for GoogleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn vendor(&self) -> VendorId {
        VendorId::Google
    }

    async fn probe(&self, credential: &str) -> ConnectionStatus {
        if credential.trim().is_empty() {
            return ConnectionStatus::credential_required(VendorId::Google);
        }

        let result = self
            .post(credential.trim(), &Self::probe_body())
            .await
            .and_then(|response| match Self::first_content(&response) {
                Some(_) => Ok(()),
                None => Err(ProviderError::ResponseShape(
                    "Invalid response format from Gemini API".to_string(),
                )),
            });

        match result {
            Ok(()) => ConnectionStatus::connected(VendorId::Google),
            Err(e) => {
                debug!(error = %e, "Gemini probe failed");
                ConnectionStatus::failed(format!("Google Gemini connection failed: {e}"))
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
            return Err(ProviderError::MissingCredential(VendorId::Google.label()));
        }

        let response = self
            .post(credential.trim(), &Self::generate_body(system, user))
            .await?;

        let text = Self::extract_text(&response).ok_or_else(|| {
            ProviderError::ResponseShape("Invalid response format from Gemini API".to_string())
        })?;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn adapter(server: &MockServer) -> GoogleAdapter {
        GoogleAdapter::with_endpoint(server.uri(), "gemini-1.5-flash")
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[test]
    fn api_url_contains_model() {
        let adapter = GoogleAdapter::new();
        assert_eq!(
            adapter.api_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn generate_body_shape() {
        let body = serde_json::to_value(GoogleAdapter::generate_body("sys", "usr")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "sys\n\nusr" }] }],
                "generationConfig": {
                    "temperature": 0.7,
                    "maxOutputTokens": 1000,
                    "topP": 0.8,
                    "topK": 10
                }
            })
        );
    }

    #[test]
    fn probe_body_omits_sampling_fields() {
        let body = serde_json::to_value(GoogleAdapter::probe_body()).unwrap();
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 100);
        assert!(body["generationConfig"].get("topP").is_none());
    }

    #[tokio::test]
    async fn generate_returns_first_part_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "g-key"))
            .and(body_json(json!({
                "contents": [{ "parts": [{ "text": "sys\n\nusr" }] }],
                "generationConfig": {
                    "temperature": 0.7,
                    "maxOutputTokens": 1000,
                    "topP": 0.8,
                    "topK": 10
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("A sunset prompt")))
            .expect(1)
            .mount(&server)
            .await;

        let text = adapter(&server).generate("sys", "usr", "g-key").await.unwrap();
        assert_eq!(text, "A sunset prompt");
    }

    #[tokio::test]
    async fn generate_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;

        let err = adapter(&server).generate("s", "u", "bad").await.unwrap_err();
        assert_eq!(err.to_string(), "Google Gemini API error 403: denied");
    }

    #[tokio::test]
    async fn generate_missing_parts_is_shape_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = adapter(&server).generate("s", "u", "k").await.unwrap_err();
        assert!(matches!(err, ProviderError::ResponseShape(_)));
    }

    #[tokio::test]
    async fn generate_blank_text_is_empty_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("  ")))
            .mount(&server)
            .await;

        let err = adapter(&server).generate("s", "u", "k").await.unwrap_err();
        assert_eq!(err, ProviderError::EmptyResponse);
    }

    #[tokio::test]
    async fn probe_without_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("ok")))
            .expect(0)
            .mount(&server)
            .await;

        let status = adapter(&server).probe("").await;
        assert!(!status.success);
        assert_eq!(status.message, "Google Gemini API key required");
    }

    #[tokio::test]
    async fn probe_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "g-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("connected")))
            .expect(1)
            .mount(&server)
            .await;

        let status = adapter(&server).probe("g-key").await;
        assert!(status.success);
        assert_eq!(status.message, "Google Gemini connected successfully");
    }

    #[tokio::test]
    async fn probe_failure_carries_diagnostic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let status = adapter(&server).probe("bad").await;
        assert!(!status.success);
        assert!(status
            .message
            .starts_with("Google Gemini connection failed: "));
        assert!(status.message.contains("API key not valid"));
    }

    #[tokio::test]
    async fn key_with_reserved_characters_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "a&b=c d#e"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let text = adapter(&server).generate("s", "u", "a&b=c d#e").await.unwrap();
        assert_eq!(text, "ok");
    }
}
