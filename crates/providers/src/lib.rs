//! Upstream provider implementations for the Ruchulu Food Genie.
//!
//! All providers implement the `ruchulu_core::Provider` trait.
//! The selector builds the ordered candidate chain from configuration.

pub mod chain;
pub mod chat_completion;
pub mod hosted_inference;
pub mod selector;

pub use chain::{ChainOutcome, ProviderChain};
pub use chat_completion::ChatCompletionProvider;
pub use hosted_inference::HostedInferenceProvider;
pub use selector::{ProviderPath, build_chain, select_path};
