//! Chat API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_required_text};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub intent: &'static str,
}

/// POST /api/chat - 模板应答 (公共)
pub async fn chat(
    State(state): State<ServerState>,
    Json(req): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    validate_required_text(&req.message, "message", MAX_MESSAGE_LEN)?;

    let reply = state.chat.respond(&req.message).await?;
    Ok(Json(ChatResponse {
        response: reply.response,
        intent: reply.intent.as_str(),
    }))
}
