use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::assistant::chat::{chat_turn, ChatOutcome, ConversationMessage};
use crate::assistant::tailor::{tailor_resume, TailorOutcome};
use crate::errors::AppError;
use crate::profile::normalize::normalize_value;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub user_id: Uuid,
    pub resume: Value,
    pub job_description: String,
    /// Let the model pick entries from the stored master profile.
    #[serde(default)]
    pub use_master_profile: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationMessage>,
    pub resume: Value,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// POST /api/v1/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorOutcome>, AppError> {
    let resume = normalize_value(&req.resume);
    let master = if req.use_master_profile {
        state.masters.load(req.user_id).await
    } else {
        None
    };

    let outcome = tailor_resume(
        state.llm.as_ref(),
        &resume,
        &req.job_description,
        master.as_ref(),
        state.config.max_jd_chars,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatOutcome>, AppError> {
    let resume = normalize_value(&req.resume);
    let outcome = chat_turn(
        state.llm.as_ref(),
        &req.messages,
        &resume,
        req.job_description.as_deref(),
        req.bio.as_deref(),
    )
    .await?;
    Ok(Json(outcome))
}
