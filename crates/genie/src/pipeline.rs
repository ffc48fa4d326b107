//! The unified Genie pipeline, shared by the server callable and the
//! direct-from-client path. The deployment difference is only the
//! secondary provider's failure policy, which the chain carries.

use ruchulu_config::AppConfig;
use ruchulu_core::error::{GenieError, ProviderError};
use ruchulu_core::menu::{LeaderboardEntry, MenuItem};
use ruchulu_core::message::ConversationMessage;
use ruchulu_core::reply::{GenieReply, ReplySource};
use ruchulu_providers::{ChainOutcome, ProviderChain, build_chain};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::{DEFAULT_PERSONA, assemble};
use crate::mood::classify;
use crate::oracle::fallback_reply;

/// Inbound request: the caller's history plus live context snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenieRequest {
    #[serde(default)]
    pub history: Vec<ConversationMessage>,

    #[serde(default, alias = "menu")]
    pub dishes: Vec<MenuItem>,

    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl GenieRequest {
    pub fn new(history: Vec<ConversationMessage>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    pub fn with_dishes(mut self, dishes: Vec<MenuItem>) -> Self {
        self.dishes = dishes;
        self
    }

    pub fn with_leaderboard(mut self, leaderboard: Vec<LeaderboardEntry>) -> Self {
        self.leaderboard = leaderboard;
        self
    }
}

/// Stateless across requests; safe to share behind an `Arc`.
pub struct GeniePipeline {
    chain: ProviderChain,
    persona: String,
}

impl GeniePipeline {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain,
            persona: DEFAULT_PERSONA.into(),
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Build the provider chain and persona from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let pipeline = Self::new(build_chain(config)?);
        Ok(match config.genie.persona.as_deref() {
            Some(persona) if !persona.trim().is_empty() => pipeline.with_persona(persona),
            _ => pipeline,
        })
    }

    /// Upstream provider names in attempt order.
    pub fn providers(&self) -> Vec<&str> {
        self.chain.names()
    }

    /// Produce a reply. The only error is a provider failure configured to
    /// surface; every other path ends in a non-empty reply.
    pub async fn respond(&self, request: GenieRequest) -> Result<GenieReply, GenieError> {
        let GenieRequest {
            history,
            dishes,
            leaderboard,
        } = request;

        let context = assemble(&history, &dishes, &leaderboard);
        let latest = context.latest_user_message.clone();

        let outcome = if self.chain.is_empty() {
            debug!("Genie: no providers configured");
            ChainOutcome::Exhausted
        } else {
            let provider_request = context.into_request(self.persona.clone(), history);
            self.chain.run(&provider_request).await?
        };

        let (reply_text, source) = match outcome {
            ChainOutcome::Reply { text, source, provider } => {
                debug!(provider = %provider, "Genie: provider answered");
                (text, source)
            }
            ChainOutcome::Exhausted => (
                fallback_reply(latest.as_deref(), &dishes),
                ReplySource::Fallback,
            ),
        };

        let mood = classify(&reply_text);
        info!(source = %source, mood = %mood, chars = reply_text.len(), "Genie replied");

        Ok(GenieReply {
            reply_text,
            mood,
            source,
        })
    }
}
