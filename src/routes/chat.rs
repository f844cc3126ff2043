use axum::{Json, body::Bytes, extract::State};
use tracing::info;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

/// The body is decoded as JSON whatever its `Content-Type` says.
pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let payload: ChatRequest = serde_json::from_slice(&body)?;

    // Any string is forwarded as-is, empty included.
    let prompt = payload
        .prompt_text()
        .ok_or_else(|| AppError::InvalidPrompt(payload.prompt.to_string()))?;

    let output = state.provider.complete(&prompt).await?;
    info!(
        prompt_len = prompt.len(),
        has_output = output.is_some(),
        "chat completion relayed"
    );

    Ok(Json(ChatResponse { output }))
}
