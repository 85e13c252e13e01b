use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assistant::prompts::CHAT_SYSTEM;
use crate::errors::AppError;
use crate::llm_client::Message;
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 2000;
const MAX_HISTORY_TURNS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Builds the message list sent upstream: the last `MAX_HISTORY_TURNS`
/// turns of history (starting on a user turn) followed by the new message.
pub fn build_conversation(req: ChatRequest) -> Result<Vec<Message>, AppError> {
    let message = req
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("message is required".to_string()))?;
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    for turn in &req.history {
        if turn.role != "user" && turn.role != "assistant" {
            return Err(AppError::Validation(format!(
                "Invalid history role '{}'. Must be 'user' or 'assistant'",
                turn.role
            )));
        }
        if turn.content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "history turns must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }
    }

    let skip = req.history.len().saturating_sub(MAX_HISTORY_TURNS);
    let mut conversation: Vec<Message> = req
        .history
        .into_iter()
        .skip(skip)
        .filter(|turn| !turn.content.trim().is_empty())
        .skip_while(|turn| turn.role != "user")
        .collect();

    conversation.push(Message {
        role: "user".to_string(),
        content: message,
    });
    Ok(conversation)
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload?;
    let conversation = build_conversation(req)?;

    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("The assistant is not configured".to_string()))?;

    let reply = llm
        .complete(CHAT_SYSTEM, &conversation)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    info!("Assistant answered ({} turns)", conversation.len());
    Ok(Json(ChatResponse { reply }))
}
