//! Hosted inference provider (primary).
//!
//! Sends one flattened text prompt to a text-generation endpoint
//! (Hugging Face Inference style) and reads back `generated_text`.
//!
//! The endpoint answers in several shapes: a single object, an array of
//! objects, or an error object. Anything that is not usable text is
//! reported as "no reply" so the pipeline moves on; this provider never
//! returns a transport error.

use async_trait::async_trait;
use ruchulu_core::error::ProviderError;
use ruchulu_core::message::Role;
use ruchulu_core::provider::{Provider, ProviderRequest, usable_reply};
use ruchulu_core::reply::ReplySource;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// A hosted text-generation endpoint authenticated with a bearer token.
pub struct HostedInferenceProvider {
    name: String,
    endpoint: String,
    token: String,
    max_new_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl HostedInferenceProvider {
    /// Create a provider for `endpoint` with a per-request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name: "huggingface".into(),
            endpoint: endpoint.into(),
            token: token.into(),
            max_new_tokens: 180,
            temperature: 0.7,
            client,
        })
    }

    /// Override the generation bounds.
    pub fn with_generation(mut self, max_new_tokens: u32, temperature: f32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self.temperature = temperature;
        self
    }

    /// Flatten persona, live context, and the conversation into one prompt
    /// ending with a `Genie:` cue.
    fn build_prompt(request: &ProviderRequest) -> String {
        let conversation = request
            .history
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    Role::User => "User",
                    Role::Assistant => "Genie",
                };
                format!("{speaker}: {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nContext:\n{}\n\nLeaderboard:\n{}\n\nConversation so far:\n{}\nGenie:",
            request.persona,
            request.menu_context(),
            request.leaderboard_context(),
            conversation,
        )
    }

    fn build_body(&self, request: &ProviderRequest) -> InferenceBody {
        InferenceBody {
            inputs: Self::build_prompt(request),
            parameters: InferenceParameters {
                max_new_tokens: self.max_new_tokens,
                temperature: self.temperature,
                return_full_text: false,
            },
        }
    }
}

#[async_trait]
impl Provider for HostedInferenceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> ReplySource {
        ReplySource::PrimaryProvider
    }

    async fn complete(
        &self,
        request: &ProviderRequest,
    ) -> std::result::Result<Option<String>, ProviderError> {
        let body = self.build_body(request);

        debug!(
            provider = %self.name,
            prompt_chars = body.inputs.len(),
            "Sending inference request"
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    provider = %self.name,
                    timeout = e.is_timeout(),
                    error = %e,
                    "Inference request failed"
                );
                return Ok(None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(
                provider = %self.name,
                status = status.as_u16(),
                body = %error_body,
                "Inference endpoint returned error"
            );
            return Ok(None);
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(provider = %self.name, error = %e, "Failed to read inference response");
                return Ok(None);
            }
        };

        let reply = extract_generated_text(&bytes);
        if reply.is_none() {
            warn!(provider = %self.name, "Inference response had no generated text");
        }
        Ok(reply)
    }
}

// --- API types ---

#[derive(Debug, Serialize)]
struct InferenceBody {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

/// The response shapes a text-generation endpoint may return: an array of
/// generations or a single object. The object form may carry `error`
/// instead of, or alongside, `generated_text`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferencePayload {
    Batch(Vec<Generation>),
    Single(Generation),
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    generated_text: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl Generation {
    /// Generated text wins over any error field present alongside it.
    fn text(&self) -> Option<&str> {
        if let Some(text) = self.generated_text.as_deref() {
            return Some(text);
        }
        if let Some(error) = self.error.as_ref().filter(|e| !e.is_null()) {
            debug!(error = %error, "Inference endpoint reported an error payload");
        }
        None
    }
}

impl InferencePayload {
    fn generated_text(&self) -> Option<&str> {
        match self {
            InferencePayload::Batch(items) => items.first().and_then(Generation::text),
            InferencePayload::Single(g) => g.text(),
        }
    }
}

/// Decode a response body into trimmed reply text, if it carries any.
fn extract_generated_text(body: &[u8]) -> Option<String> {
    let payload: InferencePayload = serde_json::from_slice(body).ok()?;
    usable_reply(payload.generated_text())
}
