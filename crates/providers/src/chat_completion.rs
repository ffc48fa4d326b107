//! Chat-completion provider (secondary).
//!
//! Works with any OpenAI-compatible `/chat/completions` endpoint; the
//! deployments use OpenAI (server) and OpenRouter (client).
//!
//! Non-success statuses and network failures are returned as errors so the
//! caller can apply its failure policy. A success body without message
//! content is "no reply".

use async_trait::async_trait;
use ruchulu_core::error::ProviderError;
use ruchulu_core::message::Role;
use ruchulu_core::provider::{Provider, ProviderRequest, usable_reply};
use ruchulu_core::reply::ReplySource;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// An OpenAI-compatible chat-completion provider.
pub struct ChatCompletionProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    referer: Option<String>,
    title: Option<String>,
    client: reqwest::Client,
}

impl ChatCompletionProvider {
    /// Create a new chat-completion provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let name = name.into();
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(format!("{name}: missing API key")));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: ruchulu_config::DEFAULT_SECONDARY_MODEL.into(),
            temperature: 0.75,
            referer: None,
            title: None,
            client,
        })
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::new("openai", ruchulu_config::OPENAI_BASE_URL, api_key, timeout)
    }

    /// Create an OpenRouter provider (convenience constructor).
    pub fn openrouter(
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(
            Self::new("openrouter", ruchulu_config::OPENROUTER_BASE_URL, api_key, timeout)?
                .with_model(ruchulu_config::OPENROUTER_DEFAULT_MODEL),
        )
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Attribution headers (`HTTP-Referer`, `X-Title`) for OpenRouter-style gateways.
    pub fn with_attribution(mut self, referer: Option<String>, title: Option<String>) -> Self {
        self.referer = referer;
        self.title = title;
        self
    }

    /// Persona and live context as two system messages, then the history
    /// in the provider's role vocabulary.
    fn to_api_messages(request: &ProviderRequest) -> Vec<ApiMessage> {
        let context = format!(
            "Today's menu:\n{}\n\nLeaderboard:\n{}",
            request.menu_context(),
            request.leaderboard_context()
        );

        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ApiMessage {
            role: "system".into(),
            content: request.persona.clone(),
        });
        messages.push(ApiMessage {
            role: "system".into(),
            content: context,
        });
        messages.extend(request.history.iter().map(|m| ApiMessage {
            role: match m.role {
                Role::User => "user".into(),
                Role::Assistant => "assistant".into(),
            },
            content: m.content.clone(),
        }));
        messages
    }
}

#[async_trait]
impl Provider for ChatCompletionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> ReplySource {
        ReplySource::SecondaryProvider
    }

    async fn complete(
        &self,
        request: &ProviderRequest,
    ) -> std::result::Result<Option<String>, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ApiRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: Self::to_api_messages(request),
        };

        debug!(provider = %self.name, model = %self.model, "Sending completion request");

        let mut builder = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");

        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(format!("{}: {e}", self.name))
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(5);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(provider = %self.name, status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let api_response: ApiResponse = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(provider = %self.name, error = %e, "Unparseable completion response");
                return Ok(None);
            }
        };

        let reply = usable_reply(api_response.first_content());
        if reply.is_none() {
            warn!(provider = %self.name, "Completion response had no message content");
        }
        Ok(reply)
    }
}

// --- API types ---

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: Option<ApiResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ApiResponse {
    fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}
