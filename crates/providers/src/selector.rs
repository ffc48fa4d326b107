//! Provider selection: decides the upstream path from configured credentials.
//!
//! The decision is static per deployment: primary when its URL and token
//! are both present, otherwise secondary when its key is present, otherwise
//! the fallback oracle alone.

use ruchulu_config::{AppConfig, FailurePolicy, OPENROUTER_BASE_URL};
use ruchulu_core::error::ProviderError;
use std::sync::Arc;
use tracing::debug;

use crate::chain::ProviderChain;
use crate::chat_completion::ChatCompletionProvider;
use crate::hosted_inference::HostedInferenceProvider;

/// The first upstream path a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderPath {
    PrimaryProvider,
    SecondaryProvider,
    FallbackOnly,
}

impl std::fmt::Display for ProviderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProviderPath::PrimaryProvider => "primary (hosted inference)",
            ProviderPath::SecondaryProvider => "secondary (chat completion)",
            ProviderPath::FallbackOnly => "fallback only",
        })
    }
}

/// Pick the upstream path for this deployment.
pub fn select_path(config: &AppConfig) -> ProviderPath {
    if config.primary.is_configured() {
        ProviderPath::PrimaryProvider
    } else if config.secondary.is_configured() {
        ProviderPath::SecondaryProvider
    } else {
        ProviderPath::FallbackOnly
    }
}

/// Build the ordered candidate chain from configuration.
///
/// The primary provider always falls through on failure; the secondary
/// provider follows the deployment's failure policy.
pub fn build_chain(config: &AppConfig) -> Result<ProviderChain, ProviderError> {
    let genie = &config.genie;
    let timeout = genie.request_timeout();
    let mut chain = ProviderChain::new();

    if let (true, Some(url), Some(token)) = (
        config.primary.is_configured(),
        config.primary.api_url.as_deref(),
        config.primary.api_token.as_deref(),
    ) {
        let provider = HostedInferenceProvider::new(url, token, timeout)?
            .with_generation(genie.max_new_tokens, genie.primary_temperature);
        chain = chain.add(Arc::new(provider), timeout, FailurePolicy::FallThrough);
    }

    if let (true, Some(key)) = (
        config.secondary.is_configured(),
        config.secondary.api_key.as_deref(),
    ) {
        let base_url = config.secondary.base_url();
        let provider = ChatCompletionProvider::new(provider_name(base_url), base_url, key, timeout)?
            .with_model(config.secondary.model())
            .with_temperature(genie.secondary_temperature)
            .with_attribution(config.secondary.referer.clone(), config.secondary.title.clone());
        chain = chain.add(Arc::new(provider), timeout, genie.secondary_failure_policy());
    }

    debug!(providers = ?chain.names(), path = %select_path(config), "Provider chain built");
    Ok(chain)
}

/// Name a chat-completion endpoint for logs and error messages.
fn provider_name(base_url: &str) -> &'static str {
    if base_url.trim_end_matches('/') == OPENROUTER_BASE_URL {
        "openrouter"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else {
        "chat-completion"
    }
}
