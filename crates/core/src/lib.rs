//! # Ruchulu Core
//!
//! Domain types, traits, and error definitions for the Ruchulu Food Genie.
//! This crate performs **no I/O**; it defines the domain model that the
//! provider adapters, the Genie pipeline, and the gateway implement against.
//!
//! ## Design Philosophy
//!
//! Upstream LLM backends and the document store are traits here.
//! Implementations live in their respective crates, which keeps the
//! pipeline testable with mock providers and an in-memory store.

pub mod error;
pub mod menu;
pub mod message;
pub mod provider;
pub mod reply;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, GenieError, ProviderError, Result, StoreError};
pub use menu::{LeaderboardEntry, MenuItem};
pub use message::{ConversationMessage, Role};
pub use provider::{Provider, ProviderRequest};
pub use reply::{GenieReply, Mood, ReplySource};
pub use store::{DocumentStore, FeedbackRecord, NewFeedback};
