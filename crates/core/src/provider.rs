//! Provider trait: the abstraction over upstream LLM backends.
//!
//! A Provider turns an assembled Genie request into reply text. Each
//! implementation issues at most one outbound call per request.
//!
//! Implementations: hosted inference (primary), chat completion (secondary).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::ConversationMessage;
use crate::reply::ReplySource;

/// Embedded in prompts when today's menu is empty.
pub const NO_LIVE_DISHES: &str = "No live dishes.";

/// Embedded in prompts when the leaderboard is empty.
pub const NO_CONTENDERS: &str = "No contenders yet.";

/// Provider-agnostic input for a single Genie request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The persona (system prompt) text
    pub persona: String,

    /// One line per dish, possibly empty
    pub menu_summary: String,

    /// One line per contender, possibly empty
    pub leaderboard_summary: String,

    /// Full conversation, oldest first
    pub history: Vec<ConversationMessage>,
}

impl ProviderRequest {
    /// The menu summary, or the placeholder when there are no dishes.
    pub fn menu_context(&self) -> &str {
        if self.menu_summary.is_empty() {
            NO_LIVE_DISHES
        } else {
            &self.menu_summary
        }
    }

    /// The leaderboard summary, or the placeholder when nobody has played.
    pub fn leaderboard_context(&self) -> &str {
        if self.leaderboard_summary.is_empty() {
            NO_CONTENDERS
        } else {
            &self.leaderboard_summary
        }
    }
}

/// Trim provider output, treating whitespace-only text as no reply.
pub fn usable_reply(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// The core Provider trait.
///
/// `Ok(Some(text))` is a usable, trimmed reply. `Ok(None)` means the call
/// produced nothing usable and the caller should move on to the next
/// candidate. `Err` is a transport failure whose handling depends on the
/// caller's failure policy.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "huggingface", "openai").
    fn name(&self) -> &str;

    /// The source tag attached to replies this provider serves.
    fn source(&self) -> ReplySource;

    /// Send a request and get the reply text, if any.
    async fn complete(
        &self,
        request: &ProviderRequest,
    ) -> std::result::Result<Option<String>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(menu: &str, board: &str) -> ProviderRequest {
        ProviderRequest {
            persona: "persona".into(),
            menu_summary: menu.into(),
            leaderboard_summary: board.into(),
            history: vec![],
        }
    }

    #[test]
    fn placeholders_substitute_empty_summaries() {
        let req = request("", "");
        assert_eq!(req.menu_context(), NO_LIVE_DISHES);
        assert_eq!(req.leaderboard_context(), NO_CONTENDERS);
    }

    #[test]
    fn summaries_pass_through_when_present() {
        let req = request("Dish (spice 3) - Tasty [available]", "Ravi: Dish (9 pts)");
        assert!(req.menu_context().starts_with("Dish"));
        assert!(req.leaderboard_context().starts_with("Ravi"));
    }

    #[test]
    fn usable_reply_trims_and_rejects_blank() {
        assert_eq!(usable_reply(Some("  hi \n")), Some("hi".into()));
        assert_eq!(usable_reply(Some("   ")), None);
        assert_eq!(usable_reply(None), None);
    }

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn source(&self) -> ReplySource {
            ReplySource::SecondaryProvider
        }

        async fn complete(
            &self,
            request: &ProviderRequest,
        ) -> std::result::Result<Option<String>, ProviderError> {
            Ok(usable_reply(request.history.last().map(|m| m.content.as_str())))
        }
    }

    #[tokio::test]
    async fn trait_objects_are_usable() {
        let provider: Box<dyn Provider> = Box::new(Echo);
        let mut req = request("", "");
        req.history.push(ConversationMessage::user(" spicy? "));
        let reply = provider.complete(&req).await.unwrap();
        assert_eq!(reply.as_deref(), Some("spicy?"));
        assert_eq!(provider.source(), ReplySource::SecondaryProvider);
    }
}
