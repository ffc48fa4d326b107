//! Document store trait: the read-only menu/leaderboard source and the
//! write-only feedback sink behind the backend callables.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::menu::{LeaderboardEntry, MenuItem};

/// Feedback as submitted by a diner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub sentiment: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub emoji: String,
    #[serde(default)]
    pub dish_id: Option<String>,
}

/// Feedback after the store has accepted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub sentiment: String,
    pub comment: Option<String>,
    pub emoji: String,
    pub dish_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name (e.g., "in_memory").
    fn name(&self) -> &str;

    /// The menu published for `date`, empty when none exists.
    async fn menu_for(&self, date: NaiveDate) -> Result<Vec<MenuItem>, StoreError>;

    /// Leaderboard entries, highest score first, at most `limit`.
    async fn top_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Persist feedback and return the stored record.
    async fn add_feedback(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError>;
}
