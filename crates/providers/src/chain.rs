//! Ordered candidate chain with per-provider timeouts.
//!
//! Each candidate gets exactly one attempt. A candidate that produces no
//! usable text hands over to the next one; a transport failure or timeout
//! either hands over or ends the request, depending on that candidate's
//! failure policy. An exhausted chain is not an error: the caller answers
//! with the fallback oracle.

use ruchulu_config::FailurePolicy;
use ruchulu_core::error::{GenieError, ProviderError};
use ruchulu_core::provider::{Provider, ProviderRequest, usable_reply};
use ruchulu_core::reply::ReplySource;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Timeout used by [`ProviderChain::add_default`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// An ordered list of upstream providers tried one after another.
#[derive(Default)]
pub struct ProviderChain {
    chain: Vec<ChainEntry>,
}

/// A single entry in the chain.
struct ChainEntry {
    provider: Arc<dyn Provider>,
    timeout: Duration,
    on_failure: FailurePolicy,
}

/// Result of running the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// A provider answered with usable text.
    Reply {
        text: String,
        source: ReplySource,
        provider: String,
    },
    /// Every candidate declined or failed over.
    Exhausted,
}

impl ProviderChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider with a custom timeout and failure policy.
    pub fn add(
        mut self,
        provider: Arc<dyn Provider>,
        timeout: Duration,
        on_failure: FailurePolicy,
    ) -> Self {
        self.chain.push(ChainEntry {
            provider,
            timeout,
            on_failure,
        });
        self
    }

    /// Add a provider with the default timeout.
    pub fn add_default(self, provider: Arc<dyn Provider>, on_failure: FailurePolicy) -> Self {
        self.add(provider, DEFAULT_TIMEOUT, on_failure)
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Source tag of the first candidate, if any.
    pub fn first_source(&self) -> Option<ReplySource> {
        self.chain.first().map(|e| e.provider.source())
    }

    /// Provider names in attempt order.
    pub fn names(&self) -> Vec<&str> {
        self.chain.iter().map(|e| e.provider.name()).collect()
    }

    /// Try each candidate once, in order.
    pub async fn run(&self, request: &ProviderRequest) -> Result<ChainOutcome, GenieError> {
        for (i, entry) in self.chain.iter().enumerate() {
            let provider_name = entry.provider.name();

            info!(
                provider = %provider_name,
                attempt = i + 1,
                total = self.chain.len(),
                "Genie: trying provider"
            );

            let failure = match tokio::time::timeout(entry.timeout, entry.provider.complete(request))
                .await
            {
                Ok(Ok(text)) => match usable_reply(text.as_deref()) {
                    Some(text) => {
                        return Ok(ChainOutcome::Reply {
                            text,
                            source: entry.provider.source(),
                            provider: provider_name.to_string(),
                        });
                    }
                    None => {
                        warn!(provider = %provider_name, "Genie: provider gave no reply, trying next");
                        continue;
                    }
                },
                Ok(Err(e)) => e,
                Err(_) => ProviderError::Timeout(format!(
                    "Provider '{}' timed out after {}s",
                    provider_name,
                    entry.timeout.as_secs()
                )),
            };

            match entry.on_failure {
                FailurePolicy::Surface => {
                    warn!(provider = %provider_name, error = %failure, "Genie: provider failed, surfacing");
                    return Err(GenieError::Upstream {
                        provider: provider_name.to_string(),
                        source: failure,
                    });
                }
                FailurePolicy::FallThrough => {
                    warn!(provider = %provider_name, error = %failure, "Genie: provider failed, trying next");
                }
            }
        }

        Ok(ChainOutcome::Exhausted)
    }
}
