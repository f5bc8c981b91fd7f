//! Prompt relay handlers.
//!
//! Both routes wrap the same relay flow and differ only in their
//! `RouteOptions`: the keyword gate, the system instruction, the reply
//! field name, and the fixed failure message. The gate is a plain
//! case-insensitive substring check, not a classifier.

use crate::dtos::PromptRequest;
use crate::services::metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{Map, Value};
use std::time::Instant;

/// Fallback reply text when the upstream envelope has no candidates.
const NO_RESPONSE_FALLBACK: &str = "No response from Gemini";

/// Canned refusal for prompts that fail the keyword gate.
const HEALTH_REFUSAL: &str = "I'm here to help with health-related questions only. Please ask something related to health or wellness.";

const HEALTH_SYSTEM_INSTRUCTION: &str =
    "You are a helpful AI health assistant. Only respond to health-related questions.";

/// Per-route relay options.
pub struct RouteOptions {
    pub route: &'static str,
    pub keyword_filter: Option<&'static [&'static str]>,
    pub response_field: &'static str,
    pub system_instruction: Option<&'static str>,
    pub refusal_message: &'static str,
    pub unavailable_message: &'static str,
}

const HEALTH_CHAT_ROUTE: RouteOptions = RouteOptions {
    route: "ai-health-chat",
    keyword_filter: Some(&["health", "doctor"]),
    response_field: "msg",
    system_instruction: Some(HEALTH_SYSTEM_INSTRUCTION),
    refusal_message: HEALTH_REFUSAL,
    unavailable_message: "AI Assistant is currently unavailable.",
};

const ASK_ROUTE: RouteOptions = RouteOptions {
    route: "ask",
    keyword_filter: None,
    response_field: "message",
    system_instruction: None,
    refusal_message: HEALTH_REFUSAL,
    unavailable_message: "Something went wrong",
};

pub async fn ai_health_chat(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> impl IntoResponse {
    relay_prompt(&state, &HEALTH_CHAT_ROUTE, &request.prompt).await
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> impl IntoResponse {
    relay_prompt(&state, &ASK_ROUTE, &request.prompt).await
}

/// Case-insensitive substring match against the route's keyword list.
fn passes_keyword_filter(prompt: &str, filter: Option<&[&str]>) -> bool {
    match filter {
        None => true,
        Some(keywords) => {
            let lowered = prompt.to_lowercase();
            keywords.iter().any(|keyword| lowered.contains(keyword))
        }
    }
}

/// Build the one-field reply body; the field name differs per route.
fn reply(field: &str, text: &str) -> Json<Value> {
    let mut body = Map::new();
    body.insert(field.to_string(), Value::String(text.to_string()));
    Json(Value::Object(body))
}

async fn relay_prompt(
    state: &AppState,
    options: &RouteOptions,
    prompt: &str,
) -> (StatusCode, Json<Value>) {
    if !passes_keyword_filter(prompt, options.keyword_filter) {
        tracing::info!(route = options.route, "Prompt rejected by keyword gate");
        metrics::record_relay_request(options.route, "refused");

        return (
            StatusCode::OK,
            reply(options.response_field, options.refusal_message),
        );
    }

    let model = state.config.gemini.model.as_str();
    let started = Instant::now();

    match state
        .text_provider
        .generate(prompt, options.system_instruction, None)
        .await
    {
        Ok(response) => {
            metrics::record_provider_latency("gemini", model, started.elapsed().as_secs_f64());
            metrics::record_tokens(model, response.input_tokens, response.output_tokens);

            let outcome = if response.text.is_some() { "ok" } else { "empty" };
            let text = response
                .text
                .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());

            tracing::info!(
                route = options.route,
                finish_reason = response.finish_reason.as_str(),
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                "Prompt relayed"
            );
            metrics::record_relay_request(options.route, outcome);

            (StatusCode::OK, reply(options.response_field, &text))
        }
        Err(e) => {
            // Fixed message only; upstream detail stays in the server log.
            tracing::error!(route = options.route, error = %e, "Upstream call failed");
            metrics::record_provider_error("gemini", e.kind());
            metrics::record_relay_request(options.route, "error");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                reply(options.response_field, options.unavailable_message),
            )
        }
    }
}
