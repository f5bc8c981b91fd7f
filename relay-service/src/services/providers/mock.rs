//! Mock provider implementations for testing.

use super::{Attachment, FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

enum MockReply {
    Text(String),
    Empty,
    Error,
}

/// Mock text provider for testing.
///
/// Counts `generate` calls so tests can assert whether an upstream call
/// was made at all.
pub struct MockTextProvider {
    reply: MockReply,
    calls: Arc<AtomicUsize>,
}

impl MockTextProvider {
    /// Provider that answers every prompt with the given text.
    pub fn replying(text: &str) -> Self {
        Self {
            reply: MockReply::Text(text.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Provider whose envelope contains no candidates.
    pub fn empty() -> Self {
        Self {
            reply: MockReply::Empty,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Provider whose upstream call always fails.
    pub fn failing() -> Self {
        Self {
            reply: MockReply::Error,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the call counter; stays valid after the provider is
    /// moved into the application state.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _system_instruction: Option<&str>,
        _attachment: Option<&Attachment>,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            MockReply::Text(text) => Ok(ProviderResponse {
                text: Some(text.clone()),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: text.len() as i32 / 4,
                finish_reason: FinishReason::Complete,
            }),
            MockReply::Empty => Ok(ProviderResponse {
                text: None,
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: 0,
                finish_reason: FinishReason::Complete,
            }),
            MockReply::Error => Err(ProviderError::NetworkError(
                "mock upstream failure".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.reply {
            MockReply::Error => Err(ProviderError::ApiError(
                "mock upstream failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
