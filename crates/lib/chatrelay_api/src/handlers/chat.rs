// @zen-component: RELAY-ChatHandler
//
//! Chat request handler — relays a prompt and returns the reply as HTML.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Html;
use chatrelay_core::relay::relay;
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::pages;

/// Body of `POST /`.
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// `POST /` — forward the prompt upstream and render the reply.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> AppResult<Html<String>> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let prompt = body
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing prompt".into()))?;

    info!(prompt_chars = prompt.chars().count(), "relaying prompt");

    let fragment = relay(&state.client, &state.processor, &prompt).await?;
    Ok(Html(pages::reply_page(&fragment)))
}
