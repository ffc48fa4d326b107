//! The Genie's answer and its tags.

use serde::{Deserialize, Serialize};

/// Avatar state derived from the reply text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Idle,
    Delighted,
    Eyerolled,
    Warning,
    Sass,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Idle => "idle",
            Mood::Delighted => "delighted",
            Mood::Eyerolled => "eyerolled",
            Mood::Warning => "warning",
            Mood::Sass => "sass",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which producer served a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplySource {
    PrimaryProvider,
    SecondaryProvider,
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::PrimaryProvider => "primaryProvider",
            ReplySource::SecondaryProvider => "secondaryProvider",
            ReplySource::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for ReplySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete Genie reply. `reply_text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenieReply {
    #[serde(rename = "reply")]
    pub reply_text: String,
    pub mood: Mood,
    pub source: ReplySource,
}
