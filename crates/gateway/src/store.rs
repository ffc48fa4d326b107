//! In-memory document store for development and tests. Menus and
//! leaderboard are fixed after seeding; feedback is append-only and keeps
//! only the most recent records.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use ruchulu_core::error::StoreError;
use ruchulu_core::menu::{LeaderboardEntry, MenuItem};
use ruchulu_core::store::{DocumentStore, FeedbackRecord, NewFeedback};
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Seed file layout: menus keyed by `YYYY-MM-DD`, plus leaderboard entries.
#[derive(Debug, Default, Deserialize)]
pub struct StoreSeed {
    #[serde(default)]
    pub menus: HashMap<String, Vec<MenuItem>>,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Feedback records kept before the oldest are dropped.
pub const DEFAULT_FEEDBACK_CAPACITY: usize = 10_000;

pub struct InMemoryStore {
    menus: RwLock<HashMap<NaiveDate, Vec<MenuItem>>>,
    leaderboard: RwLock<Vec<LeaderboardEntry>>,
    feedback: RwLock<VecDeque<FeedbackRecord>>,
    feedback_capacity: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            menus: RwLock::new(HashMap::new()),
            leaderboard: RwLock::new(Vec::new()),
            feedback: RwLock::new(VecDeque::new()),
            feedback_capacity: DEFAULT_FEEDBACK_CAPACITY,
        }
    }

    /// Keep at most `capacity` feedback records (minimum 1).
    pub fn with_feedback_capacity(mut self, capacity: usize) -> Self {
        self.feedback_capacity = capacity.max(1);
        self
    }

    pub fn with_menu(mut self, date: NaiveDate, dishes: Vec<MenuItem>) -> Self {
        self.menus.get_mut().insert(date, dishes);
        self
    }

    pub fn with_leaderboard(mut self, entries: Vec<LeaderboardEntry>) -> Self {
        *self.leaderboard.get_mut() = entries;
        self
    }

    /// Build a store from parsed seed data. Menu keys must be ISO dates.
    pub fn from_seed(seed: StoreSeed) -> Result<Self, StoreError> {
        let mut store = Self::new().with_leaderboard(seed.leaderboard);
        for (key, dishes) in seed.menus {
            let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d").map_err(|e| {
                StoreError::InvalidDocument(format!("menu key '{key}' is not a date: {e}"))
            })?;
            store = store.with_menu(date, dishes);
        }
        Ok(store)
    }

    /// Load seed data from a JSON file.
    pub fn from_seed_file(path: &Path) -> ruchulu_core::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Storage(format!("failed to read {}: {e}", path.display()))
        })?;
        let seed: StoreSeed = serde_json::from_str(&content)?;
        Ok(Self::from_seed(seed)?)
    }

    /// Number of feedback records currently held.
    pub async fn feedback_count(&self) -> usize {
        self.feedback.read().await.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn menu_for(&self, date: NaiveDate) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.menus.read().await.get(&date).cloned().unwrap_or_default())
    }

    async fn top_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut entries = self.leaderboard.read().await.clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn add_feedback(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let record = FeedbackRecord {
            id: Uuid::new_v4().to_string(),
            sentiment: feedback.sentiment,
            comment: feedback.comment,
            emoji: feedback.emoji,
            dish_id: feedback.dish_id,
            created_at: Utc::now(),
        };
        let mut feedback = self.feedback.write().await;
        while feedback.len() >= self.feedback_capacity {
            feedback.pop_front();
        }
        feedback.push_back(record.clone());
        Ok(record)
    }
}
