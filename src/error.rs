//! Error types for the topic registry.

use thiserror::Error;

/// Main error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Subscription not found: {topic}/{subscription}")]
    SubscriptionNotFound { topic: String, subscription: String },

    #[error("Topic already registered: {0}")]
    TopicExists(String),

    #[error("Subscription already registered: {topic}/{subscription}")]
    SubscriptionExists { topic: String, subscription: String },

    #[error("Invalid resource name: {0:?}")]
    InvalidName(String),

    /// Failure surfaced by the namespace authority, passed through unchanged.
    #[error(transparent)]
    Authority(#[from] AuthorityError),
}

/// Error reported by a namespace authority client.
///
/// The registry never translates or retries these; callers see the value the
/// authority produced.
#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Remote entity not found: {0}")]
    EntityNotFound(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authority error: {0}")]
    Other(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
