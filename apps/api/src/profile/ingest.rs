//! Resume ingest: raw text (or an uploaded file) in, canonical record out,
//! with the result folded into the user's master profile.

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{decode_object, truncate_chars, ChatTurn, LanguageModel};
use crate::models::resume::ResumeRecord;
use crate::models::session::{WorkspaceSession, WorkspaceStatus};
use crate::profile::merge::{fill_contact_from_master, merge_into_master};
use crate::profile::normalize::normalize_value;
use crate::profile::prompts::{parse_system_prompt, parse_user_prompt};
use crate::state::AppState;

/// Result of an import: the new working record and how it was produced.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub resume: ResumeRecord,
    /// True when the parse extended a working record instead of starting one.
    pub merged: bool,
}

/// Asks the model to structure `text` and normalizes whatever comes back.
/// Text beyond `max_chars` characters is cut off before sending.
pub async fn parse_resume_text(
    llm: &dyn LanguageModel,
    text: &str,
    max_chars: usize,
) -> Result<ResumeRecord, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }

    let truncated = truncate_chars(text, max_chars);
    if truncated.len() < text.len() {
        info!(
            "Resume text truncated from {} to {} bytes before parsing",
            text.len(),
            truncated.len()
        );
    }

    let raw = llm
        .complete(&parse_system_prompt(), &[ChatTurn::user(parse_user_prompt(truncated))])
        .await?;

    let object = decode_object(&raw).ok_or_else(|| AppError::ModelOutput(raw.clone()))?;
    Ok(normalize_value(&Value::Object(object)))
}

/// Full import: parse, combine with the working record (or backfill contact
/// details from the master), push into the master, snapshot the session.
pub async fn import_resume(
    state: &AppState,
    user_id: Uuid,
    text: &str,
    working: Option<&Value>,
) -> Result<ImportOutcome, AppError> {
    let parsed = parse_resume_text(state.llm.as_ref(), text, state.config.max_parse_chars).await?;

    let outcome = match working {
        Some(working) => ImportOutcome {
            resume: merge_into_master(Some(&normalize_value(working)), &parsed),
            merged: true,
        },
        None => {
            let master = state.masters.load(user_id).await;
            ImportOutcome {
                resume: fill_contact_from_master(parsed, master.as_ref()),
                merged: false,
            }
        }
    };

    state.masters.merge_and_save(user_id, &outcome.resume).await;

    let session = match state.sessions.load(user_id).await {
        Some(mut session) => {
            session.resume = outcome.resume.clone();
            session.status = WorkspaceStatus::Loaded;
            session
        }
        None => WorkspaceSession {
            resume: outcome.resume.clone(),
            status: WorkspaceStatus::Loaded,
            chat_messages: Vec::new(),
            job_description: String::new(),
            saved_at: chrono::Utc::now(),
        },
    };
    state.sessions.save(user_id, session).await;

    info!(
        "Imported resume for user {user_id} ({}, {} experience entries)",
        if outcome.merged { "merged into working record" } else { "fresh" },
        outcome.resume.experience.len()
    );
    Ok(outcome)
}

/// Pulls plain text out of an uploaded file. PDFs go through `pdf-extract`
/// on the blocking pool; anything else is read as (lossy) UTF-8.
pub async fn extract_upload_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: bytes::Bytes,
) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }

    if !is_pdf(file_name, content_type) {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
        .map_err(|e| {
            warn!("PDF text extraction failed: {e}");
            AppError::Validation("could not read text from the PDF".to_string())
        })?;
    Ok(text)
}

fn is_pdf(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    content_type == Some("application/pdf")
        || file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm_client::testing::ScriptedModel;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    const PARSED_ACME: &str = r#"```json
{
  "contact": { "name": "Ada Lovelace", "email": "" },
  "summary": "Engineer",
  "sectionOrder": ["summary", "experience"],
  "experience": [{ "id": "e1", "company": "Acme Corp.", "role": "Engineer", "dates": "2020", "bullets": ["Built X"] }],
  "skills": ["Rust"]
}
```"#;

    const PARSED_GLOBEX: &str = r#"{
  "contact": { "name": "", "phone": "555" },
  "sectionOrder": ["experience", "projects"],
  "experience": [
    { "id": "g1", "company": "acme corp", "role": "engineer", "bullets": ["Reworded"] },
    { "id": "g2", "company": "Globex", "role": "Lead" }
  ],
  "projects": [{ "name": "Compiler" }]
}"#;

    fn state_with(model: ScriptedModel) -> AppState {
        AppState::new(Arc::new(model), Arc::new(MemoryStore::new()), Config::for_tests())
    }

    #[tokio::test]
    async fn test_parse_normalizes_model_output() {
        let model = ScriptedModel::replying(&[PARSED_ACME]);
        let record = parse_resume_text(&model, "resume text", 100).await.unwrap();
        assert_eq!(record.contact.name, "Ada Lovelace");
        assert_eq!(record.skills[0].label, "Skills");
        assert!(record.education.is_empty());
    }

    #[tokio::test]
    async fn test_parse_rejects_blank_text_without_calling_model() {
        let model = ScriptedModel::replying(&[PARSED_ACME]);
        let err = parse_resume_text(&model, "   ", 100).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parse_truncates_long_input() {
        let model = ScriptedModel::replying(&[PARSED_ACME]);
        let text = "x".repeat(50);
        parse_resume_text(&model, &text, 10).await.unwrap();
        let turns = model.last_turns();
        assert_eq!(turns[0].content, parse_user_prompt(&"x".repeat(10)));
    }

    #[tokio::test]
    async fn test_parse_free_text_reply_is_model_output_error() {
        let model = ScriptedModel::replying(&["I could not parse that, sorry."]);
        let err = parse_resume_text(&model, "resume", 100).await.unwrap_err();
        match err {
            AppError::ModelOutput(raw) => assert!(raw.contains("sorry")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_as_llm_error_and_leaves_master_alone() {
        let state = state_with(ScriptedModel::failing());
        let user = Uuid::new_v4();

        let err = import_resume(&state, user, "resume", None).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(
            axum::response::IntoResponse::into_response(err).status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(state.masters.load(user).await.is_none());
        assert!(state.sessions.load(user).await.is_none());
    }

    #[tokio::test]
    async fn test_first_import_seeds_master_and_session() {
        let state = state_with(ScriptedModel::replying(&[PARSED_ACME]));
        let user = Uuid::new_v4();

        let outcome = import_resume(&state, user, "resume", None).await.unwrap();
        assert!(!outcome.merged);
        assert_eq!(state.masters.load(user).await, Some(outcome.resume.clone()));

        let session = state.sessions.load(user).await.unwrap();
        assert_eq!(session.status, WorkspaceStatus::Loaded);
        assert_eq!(session.resume, outcome.resume);
    }

    #[tokio::test]
    async fn test_fresh_import_backfills_contact_from_master() {
        let state = state_with(ScriptedModel::replying(&[PARSED_ACME, PARSED_GLOBEX]));
        let user = Uuid::new_v4();
        import_resume(&state, user, "first", None).await.unwrap();

        let outcome = import_resume(&state, user, "second", None).await.unwrap();
        assert_eq!(outcome.resume.contact.name, "Ada Lovelace");
        assert_eq!(outcome.resume.contact.phone, "555");
        // A fresh working record holds only what this parse found.
        assert_eq!(outcome.resume.experience.len(), 2);

        let master = state.masters.load(user).await.unwrap();
        let companies: Vec<_> = master.experience.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(companies, vec!["Acme Corp.", "Globex"]);
        assert_eq!(master.projects.len(), 1);
    }

    #[tokio::test]
    async fn test_import_into_working_record_merges() {
        let state = state_with(ScriptedModel::replying(&[PARSED_ACME, PARSED_GLOBEX]));
        let user = Uuid::new_v4();
        let first = import_resume(&state, user, "first", None).await.unwrap();
        let working = serde_json::to_value(&first.resume).unwrap();

        let outcome = import_resume(&state, user, "second", Some(&working))
            .await
            .unwrap();
        assert!(outcome.merged);
        assert_eq!(outcome.resume.experience.len(), 2);
        assert_eq!(outcome.resume.experience[0].bullets, vec!["Built X"]);
        assert_eq!(outcome.resume.summary, "Engineer");
        assert_eq!(outcome.resume.contact.phone, "555");
    }

    #[tokio::test]
    async fn test_extract_plain_text_upload() {
        let text = extract_upload_text(Some("cv.txt"), Some("text/plain"), "Ada\nEngineer".into())
            .await
            .unwrap();
        assert_eq!(text, "Ada\nEngineer");
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_upload() {
        let err = extract_upload_text(Some("cv.txt"), None, bytes::Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_extract_reports_unreadable_pdf() {
        let err = extract_upload_text(Some("CV.PDF"), None, "not a pdf".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_pdf_detection() {
        assert!(is_pdf(None, Some("application/pdf")));
        assert!(is_pdf(Some("Resume.Pdf"), None));
        assert!(!is_pdf(Some("resume.txt"), Some("text/plain")));
    }
}
