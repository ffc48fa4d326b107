//! Error types for the Ruchulu domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for Ruchulu operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Genie pipeline errors ---
    #[error("Genie error: {0}")]
    Genie(#[from] GenieError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A transport-level failure talking to an upstream provider.
///
/// Empty or unparseable success bodies are *not* errors; adapters report
/// those as "no reply produced".
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A request-level failure surfaced to the caller of the Genie pipeline.
#[derive(Debug, Clone, Error)]
pub enum GenieError {
    /// A provider whose failures are configured to surface did not answer.
    #[error("Genie failed: {provider}: {source}")]
    Upstream {
        provider: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}
