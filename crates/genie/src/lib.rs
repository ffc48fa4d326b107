//! The Food Genie response pipeline.
//!
//! Given a conversation and live context (today's menu, the leaderboard),
//! the pipeline asks the configured upstream providers in order and always
//! ends with a non-empty reply, falling back to a scripted oracle when no
//! provider answers.
//!
//! ```text
//! assemble → provider chain → (oracle) → classify → GenieReply
//! ```

pub mod context;
pub mod mood;
pub mod oracle;
pub mod pipeline;

pub use context::{AssembledContext, DEFAULT_PERSONA, assemble};
pub use mood::classify;
pub use oracle::fallback_reply;
pub use pipeline::{GeniePipeline, GenieRequest};
