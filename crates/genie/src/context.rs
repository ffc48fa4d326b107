//! Context assembly: turns history, menu, and leaderboard into
//! provider-agnostic summaries.
//!
//! Pure and deterministic: identical inputs always produce identical output.

use ruchulu_core::menu::{LeaderboardEntry, MenuItem};
use ruchulu_core::message::{ConversationMessage, Role};
use ruchulu_core::provider::ProviderRequest;

/// The Genie's persona. Replies stay short and call out unavailable dishes.
pub const DEFAULT_PERSONA: &str = "You are ATRIA RUCHULU's Food Genie: a witty, sarcastic yet \
knowledgeable AI sommelier for fiery Andhra cuisine. Answer with playful snark while still giving \
accurate info about dishes, spice levels, availability, and trivia. Keep replies under 120 words. \
If a dish is unavailable, make that clear.";

/// Summaries derived from one request's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    /// One line per dish, input order; empty for an empty menu
    pub menu_summary: String,
    /// One line per entry, input order; empty for an empty leaderboard
    pub leaderboard_summary: String,
    /// Content of the most recent user message
    pub latest_user_message: Option<String>,
}

impl AssembledContext {
    /// Combine with the persona and full history into a provider request.
    pub fn into_request(
        self,
        persona: impl Into<String>,
        history: Vec<ConversationMessage>,
    ) -> ProviderRequest {
        ProviderRequest {
            persona: persona.into(),
            menu_summary: self.menu_summary,
            leaderboard_summary: self.leaderboard_summary,
            history,
        }
    }
}

pub fn assemble(
    history: &[ConversationMessage],
    menu: &[MenuItem],
    leaderboard: &[LeaderboardEntry],
) -> AssembledContext {
    AssembledContext {
        menu_summary: menu_summary(menu),
        leaderboard_summary: leaderboard_summary(leaderboard),
        latest_user_message: latest_user_message(history).map(String::from),
    }
}

/// `"<name> (spice <level|n/a>) - <description|No description> [available|unavailable]"` per dish.
///
/// Exactly one line per dish: line breaks inside a field become spaces.
pub fn menu_summary(menu: &[MenuItem]) -> String {
    menu.iter()
        .map(|dish| {
            let spice = dish
                .spice_level
                .map(|level| level.to_string())
                .unwrap_or_else(|| "n/a".into());
            format!(
                "{} (spice {}) - {} [{}]",
                single_line(&dish.name),
                spice,
                single_line(dish.description.as_deref().unwrap_or("No description")),
                if dish.available { "available" } else { "unavailable" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"<name>: <dish> (<score> pts)"` per entry, in the order supplied.
pub fn leaderboard_summary(leaderboard: &[LeaderboardEntry]) -> String {
    leaderboard
        .iter()
        .map(|entry| {
            format!(
                "{}: {} ({} pts)",
                single_line(&entry.name),
                single_line(&entry.dish),
                entry.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn single_line(field: &str) -> String {
    field
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn latest_user_message(history: &[ConversationMessage]) -> Option<&str> {
    history
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
}
