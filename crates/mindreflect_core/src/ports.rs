//! crates/mindreflect_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the sentiment model and the generative-text API.

use async_trait::async_trait;
use crate::domain::Sentiment;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, API).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid response from external service: {0}")]
    InvalidResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SentimentAnalysisService: Send + Sync {
    /// Classifies a block of text, returning a label and its confidence.
    async fn analyze(&self, text: &str) -> PortResult<Sentiment>;
}

#[async_trait]
pub trait CoachingService: Send + Sync {
    /// Generates free-text output for a fully rendered prompt.
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}
