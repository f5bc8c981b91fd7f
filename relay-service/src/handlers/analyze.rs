//! Image categorization handler.
//!
//! Accepts one uploaded file, forwards it to the model as an inline-data
//! part with a fixed categorization prompt, and returns the model's
//! verdict.

use crate::services::metrics;
use crate::services::providers::Attachment;
use crate::startup::AppState;
use axum::{extract::Multipart, extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use std::time::Instant;

const CATEGORIZE_PROMPT: &str = "Categorize this image as 'Harmful', 'Neutral', or 'Good'.";

pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
        })?
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;

    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e)))?
        .to_vec();

    if data.len() > 20 * 1024 * 1024 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "File too large (max 20MB)"
        )));
    }

    let attachment = Attachment { mime_type, data };
    let model = state.config.gemini.model.as_str();
    let started = Instant::now();

    let response = state
        .text_provider
        .generate(CATEGORIZE_PROMPT, None, Some(&attachment))
        .await
        .map_err(|e| {
            // Detail stays in the log; the error text can carry the keyed URL.
            tracing::error!(error = %e, "Image analysis upstream call failed");
            metrics::record_provider_error("gemini", e.kind());
            metrics::record_relay_request("analyze-image", "error");
            AppError::BadGateway("AI provider request failed".to_string())
        })?;

    metrics::record_provider_latency("gemini", model, started.elapsed().as_secs_f64());
    metrics::record_tokens(model, response.input_tokens, response.output_tokens);
    metrics::record_relay_request("analyze-image", "ok");

    let category = response.text.unwrap_or_default();

    tracing::info!(
        category = %category,
        size = attachment.data.len(),
        "Image categorized"
    );

    Ok(Json(json!({ "category": category })))
}
