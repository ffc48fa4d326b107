//! Live context snapshots: today's dishes and the spice leaderboard.

use serde::{Deserialize, Serialize};

/// A dish on today's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Spice level 0–5, when known
    #[serde(
        default,
        rename = "spice",
        alias = "spiceLevel",
        skip_serializing_if = "Option::is_none"
    )]
    pub spice_level: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    /// Create an available dish with no spice level or description.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            spice_level: None,
            description: None,
            available: true,
        }
    }

    pub fn with_spice(mut self, level: u8) -> Self {
        self.spice_level = Some(level);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// One contender on the spice leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub dish: String,
    pub score: i64,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, dish: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            dish: dish.into(),
            score,
        }
    }
}
