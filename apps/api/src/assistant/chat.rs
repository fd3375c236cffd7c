use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::assistant::complete_from_source;
use crate::assistant::prompts::{chat_system_prompt, CHAT_PRIMED_ACK};
use crate::errors::AppError;
use crate::llm_client::{decode_object, truncate_chars, ChatTurn, LanguageModel};
use crate::models::resume::ResumeRecord;
use crate::models::session::ChatRole;

/// Only the most recent messages are sent.
pub const HISTORY_LIMIT: usize = 8;
const JD_CONTEXT_CHARS: usize = 3_000;
const BIO_CONTEXT_CHARS: usize = 2_000;
/// Cap on a free-text answer passed through as the reply.
const FREEFORM_REPLY_CHARS: usize = 800;

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub reply: String,
    pub updated_resume: Option<ResumeRecord>,
}

/// One coaching turn over the working record. A model edit comes back as
/// `updated_resume`; nothing is persisted here.
pub async fn chat_turn(
    llm: &dyn LanguageModel,
    messages: &[ConversationMessage],
    resume: &ResumeRecord,
    job_description: Option<&str>,
    bio: Option<&str>,
) -> Result<ChatOutcome, AppError> {
    if messages.is_empty() {
        return Err(AppError::Validation("messages are required".to_string()));
    }

    let recent = &messages[messages.len().saturating_sub(HISTORY_LIMIT)..];
    let mut turns = Vec::with_capacity(recent.len() + 2);
    turns.push(ChatTurn::user(context_block(resume, job_description, bio)?));
    turns.push(ChatTurn::assistant(CHAT_PRIMED_ACK));
    turns.extend(recent.iter().map(|m| match m.role {
        ChatRole::User => ChatTurn::user(m.content.clone()),
        ChatRole::Assistant => ChatTurn::assistant(m.content.clone()),
    }));

    let raw = llm.complete(&chat_system_prompt(), &turns).await?;

    let Some(mut object) = decode_object(&raw) else {
        warn!("Chat reply was not JSON; passing through as text");
        return Ok(ChatOutcome {
            reply: truncate_chars(&raw, FREEFORM_REPLY_CHARS).to_string(),
            updated_resume: None,
        });
    };

    let reply = match object.remove("reply") {
        Some(Value::String(reply)) => reply,
        _ => String::new(),
    };
    let updated_resume = match object.remove("updatedResume") {
        Some(Value::Object(updated)) => Some(complete_from_source(updated, resume)),
        _ => None,
    };
    debug!(edited = updated_resume.is_some(), "chat turn complete");

    Ok(ChatOutcome {
        reply,
        updated_resume,
    })
}

fn context_block(
    resume: &ResumeRecord,
    job_description: Option<&str>,
    bio: Option<&str>,
) -> Result<String, AppError> {
    let mut parts = vec![format!(
        "CURRENT RESUME JSON:\n{}",
        serde_json::to_string_pretty(resume).map_err(anyhow::Error::from)?
    )];
    if let Some(jd) = job_description.filter(|jd| !jd.trim().is_empty()) {
        parts.push(format!("JOB DESCRIPTION:\n{}", truncate_chars(jd, JD_CONTEXT_CHARS)));
    }
    if let Some(bio) = bio.filter(|bio| !bio.trim().is_empty()) {
        parts.push(format!("USER BACKGROUND:\n{}", truncate_chars(bio, BIO_CONTEXT_CHARS)));
    }
    Ok(parts.join("\n\n---\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::TurnRole;
    use crate::models::resume::AwardEntry;

    fn user(content: &str) -> ConversationMessage {
        ConversationMessage {
            role: ChatRole::User,
            content: content.to_string(),
        }
    }

    fn working() -> ResumeRecord {
        let mut record = ResumeRecord::empty();
        record.summary = "Engineer".into();
        record.awards = vec![AwardEntry {
            id: "a1".into(),
            name: "Hackathon winner".into(),
            ..Default::default()
        }];
        record
    }

    #[tokio::test]
    async fn test_answer_without_edit() {
        let model = ScriptedModel::replying(&[r#"{"reply": "Lead with impact.", "updatedResume": null}"#]);
        let outcome = chat_turn(&model, &[user("Thoughts?")], &working(), None, None)
            .await
            .unwrap();
        assert_eq!(outcome.reply, "Lead with impact.");
        assert!(outcome.updated_resume.is_none());
    }

    #[tokio::test]
    async fn test_edit_is_backfilled_and_normalized() {
        let model = ScriptedModel::replying(&[
            r#"```json
{"reply": "Tightened summary.", "updatedResume": {"summary": "Rust engineer", "skills": ["Rust"]}}
```"#,
        ]);
        let outcome = chat_turn(&model, &[user("Fix summary")], &working(), None, None)
            .await
            .unwrap();
        let updated = outcome.updated_resume.unwrap();
        assert_eq!(updated.summary, "Rust engineer");
        assert_eq!(updated.awards, working().awards);
        assert_eq!(updated.skills[0].skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_free_text_reply_is_truncated() {
        let long = "word ".repeat(400);
        let model = ScriptedModel::replying(&[long.as_str()]);
        let outcome = chat_turn(&model, &[user("Hi")], &working(), None, None)
            .await
            .unwrap();
        assert_eq!(outcome.reply.chars().count(), FREEFORM_REPLY_CHARS);
        assert!(outcome.updated_resume.is_none());
    }

    #[tokio::test]
    async fn test_history_window_and_primed_exchange() {
        let model = ScriptedModel::replying(&[r#"{"reply": "ok"}"#]);
        let messages: Vec<_> = (0..12).map(|i| user(&format!("message {i}"))).collect();
        chat_turn(
            &model,
            &messages,
            &working(),
            Some("j".repeat(5_000).as_str()),
            Some("   "),
        )
        .await
        .unwrap();

        let turns = model.last_turns();
        assert_eq!(turns.len(), HISTORY_LIMIT + 2);
        assert!(turns[0].content.starts_with("CURRENT RESUME JSON:"));
        assert!(turns[0].content.contains(&format!("JOB DESCRIPTION:\n{}", "j".repeat(3_000))));
        assert!(!turns[0].content.contains(&"j".repeat(3_001)));
        assert!(!turns[0].content.contains("USER BACKGROUND"));
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].content, CHAT_PRIMED_ACK);
        assert_eq!(turns[2].content, "message 4");
        assert_eq!(turns[9].content, "message 11");
    }

    #[tokio::test]
    async fn test_empty_history_rejected() {
        let model = ScriptedModel::default();
        let err = chat_turn(&model, &[], &working(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
