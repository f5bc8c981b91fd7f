//! AI provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction over the
//! generative-language backend, allowing the relay handlers to swap the
//! real Gemini client for a test double.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// Result of a provider response.
#[derive(Debug)]
pub struct ProviderResponse {
    /// Text of the first candidate's first part, if present.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Complete => "complete",
            FinishReason::Length => "length",
            FinishReason::ContentFilter => "content_filter",
        }
    }
}

/// Inline binary payload forwarded to the model alongside the prompt.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// MIME type.
    pub mime_type: String,

    /// Raw bytes; the provider handles wire encoding.
    pub data: Vec<u8>,
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a text response for a single prompt.
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        attachment: Option<&Attachment>,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
