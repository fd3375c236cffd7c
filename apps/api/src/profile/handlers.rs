use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::models::session::{ChatMessage, WorkspaceSession, WorkspaceStatus};
use crate::profile::ingest::{extract_upload_text, import_resume, parse_resume_text};
use crate::profile::normalize::normalize_value;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resume: ResumeRecord,
}

#[derive(Deserialize)]
pub struct ImportRequest {
    pub user_id: Uuid,
    pub text: String,
    /// Current working record, if the user is extending one.
    #[serde(default)]
    pub working: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub resume: ResumeRecord,
    pub merged: bool,
}

#[derive(Deserialize)]
pub struct MergeRequest {
    pub user_id: Uuid,
    pub resume: Value,
}

#[derive(Deserialize)]
pub struct SaveSessionRequest {
    pub user_id: Uuid,
    pub resume: Value,
    pub status: WorkspaceStatus,
    #[serde(default)]
    pub chat_messages: Vec<ChatMessage>,
    #[serde(default)]
    pub job_description: String,
}

/// POST /api/v1/resume/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ResumeResponse>, AppError> {
    let resume =
        parse_resume_text(state.llm.as_ref(), &req.text, state.config.max_parse_chars).await?;
    Ok(Json(ResumeResponse { resume }))
}

/// POST /api/v1/resume/import
pub async fn handle_import(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    let outcome = import_resume(&state, req.user_id, &req.text, req.working.as_ref()).await?;
    Ok(Json(ImportResponse {
        resume: outcome.resume,
        merged: outcome.merged,
    }))
}

/// POST /api/v1/resume/import/file?user_id=
///
/// Multipart body: a `file` part plus an optional `working` part holding the
/// current working record as JSON.
pub async fn handle_import_file(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let mut text: Option<String> = None;
    let mut working: Option<Value> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                text = Some(
                    extract_upload_text(file_name.as_deref(), content_type.as_deref(), bytes)
                        .await?,
                );
            }
            Some("working") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read working record: {e}")))?;
                if !raw.trim().is_empty() {
                    working = Some(serde_json::from_str(&raw).map_err(|e| {
                        AppError::Validation(format!("working must be a JSON resume: {e}"))
                    })?);
                }
            }
            _ => {}
        }
    }

    let text = text.ok_or_else(|| AppError::Validation("file part is required".to_string()))?;
    let outcome = import_resume(&state, params.user_id, &text, working.as_ref()).await?;
    Ok(Json(ImportResponse {
        resume: outcome.resume,
        merged: outcome.merged,
    }))
}

/// GET /api/v1/master
pub async fn handle_get_master(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRecord>, AppError> {
    state
        .masters
        .load(params.user_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No master profile for user {}", params.user_id)))
}

/// POST /api/v1/master/merge
pub async fn handle_merge_master(
    State(state): State<AppState>,
    Json(req): Json<MergeRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    let incoming = normalize_value(&req.resume);
    Ok(Json(state.masters.merge_and_save(req.user_id, &incoming).await))
}

/// DELETE /api/v1/master
pub async fn handle_reset_master(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    state.masters.clear(params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<WorkspaceSession>, AppError> {
    state
        .sessions
        .load(params.user_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No saved session for user {}", params.user_id)))
}

/// PUT /api/v1/session
pub async fn handle_save_session(
    State(state): State<AppState>,
    Json(req): Json<SaveSessionRequest>,
) -> Result<StatusCode, AppError> {
    let session = WorkspaceSession {
        resume: normalize_value(&req.resume),
        status: req.status,
        chat_messages: req.chat_messages,
        job_description: req.job_description,
        saved_at: chrono::Utc::now(),
    };
    state.sessions.save(req.user_id, session).await;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/session
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    state.sessions.clear(params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedModel;
    use crate::models::resume::SectionKey;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn test_state(model: ScriptedModel) -> AppState {
        AppState::new(Arc::new(model), Arc::new(MemoryStore::new()), Config::for_tests())
    }

    #[tokio::test]
    async fn test_get_master_404_when_absent() {
        let state = test_state(ScriptedModel::default());
        let err = handle_get_master(State(state), Query(UserIdQuery { user_id: Uuid::new_v4() }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_merge_then_get_then_reset_master() {
        let state = test_state(ScriptedModel::default());
        let user_id = Uuid::new_v4();

        let Json(merged) = handle_merge_master(
            State(state.clone()),
            Json(MergeRequest {
                user_id,
                resume: json!({ "summary": "Hi", "skills": ["Rust", "rust", "Go"] }),
            }),
        )
        .await
        .unwrap();
        assert_eq!(merged.skills[0].skills, vec!["Rust", "Go"]);

        let Json(loaded) =
            handle_get_master(State(state.clone()), Query(UserIdQuery { user_id }))
                .await
                .unwrap();
        assert_eq!(loaded, merged);

        let status = handle_reset_master(State(state.clone()), Query(UserIdQuery { user_id }))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.masters.load(user_id).await.is_none());
    }

    #[tokio::test]
    async fn test_parse_endpoint_returns_normalized_resume() {
        let state = test_state(ScriptedModel::replying(&[r#"{"summary": "Parsed"}"#]));
        let Json(resp) = handle_parse(
            State(state),
            Json(ParseRequest {
                text: "some resume".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.resume.summary, "Parsed");
        assert_eq!(resp.resume.section_order, SectionKey::default_order());
    }

    #[tokio::test]
    async fn test_import_endpoint_reports_merge_mode() {
        let state = test_state(ScriptedModel::replying(&[r#"{"summary": "Parsed"}"#]));
        let Json(resp) = handle_import(
            State(state),
            Json(ImportRequest {
                user_id: Uuid::new_v4(),
                text: "resume".into(),
                working: Some(json!({ "summary": "Existing" })),
            }),
        )
        .await
        .unwrap();
        assert!(resp.merged);
        assert_eq!(resp.resume.summary, "Parsed");
    }

    #[tokio::test]
    async fn test_session_round_trip_through_handlers() {
        let state = test_state(ScriptedModel::default());
        let user_id = Uuid::new_v4();

        handle_save_session(
            State(state.clone()),
            Json(SaveSessionRequest {
                user_id,
                resume: json!({ "summary": "Working" }),
                status: WorkspaceStatus::Tailored,
                chat_messages: Vec::new(),
                job_description: "Rust role".into(),
            }),
        )
        .await
        .unwrap();

        let Json(session) =
            handle_get_session(State(state.clone()), Query(UserIdQuery { user_id }))
                .await
                .unwrap();
        assert_eq!(session.status, WorkspaceStatus::Tailored);
        assert_eq!(session.resume.summary, "Working");
        assert_eq!(session.job_description, "Rust role");

        handle_clear_session(State(state.clone()), Query(UserIdQuery { user_id }))
            .await
            .unwrap();
        assert!(handle_get_session(State(state), Query(UserIdQuery { user_id }))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_empty_session_is_not_persisted() {
        let state = test_state(ScriptedModel::default());
        let user_id = Uuid::new_v4();
        let status = handle_save_session(
            State(state.clone()),
            Json(SaveSessionRequest {
                user_id,
                resume: json!({}),
                status: WorkspaceStatus::Empty,
                chat_messages: Vec::new(),
                job_description: String::new(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.sessions.load(user_id).await.is_none());
    }
}
