//! Request DTOs for the relay HTTP API.
//!
//! Reply bodies are built dynamically in the handlers because the field
//! name differs per route.

use serde::Deserialize;

/// Inbound prompt payload.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}
