//! Job-description tailoring. Rewrites the working record for one JD and
//! explains the changes.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::assistant::complete_from_source;
use crate::assistant::prompts::tailor_system_prompt;
use crate::errors::AppError;
use crate::llm_client::{decode_object, truncate_chars, ChatTurn, LanguageModel};
use crate::models::resume::ResumeRecord;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Changed,
    Added,
    Removed,
}

/// A field the editor should mark, addressed by dot path
/// (`experience.0.bullets.1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: HighlightKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningEntry {
    pub section: String,
    pub change: String,
    pub why: String,
    /// What the candidate should go and quantify; set only when the source
    /// material lacked it.
    #[serde(alias = "coachingNote", skip_serializing_if = "Option::is_none")]
    pub coaching_note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TailorOutcome {
    pub tailored: ResumeRecord,
    pub highlights: Vec<Highlight>,
    pub reasoning: Vec<ReasoningEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Tailors `resume` to `job_description`, optionally letting the model draw
/// on the full master profile.
pub async fn tailor_resume(
    llm: &dyn LanguageModel,
    resume: &ResumeRecord,
    job_description: &str,
    master: Option<&ResumeRecord>,
    max_jd_chars: usize,
) -> Result<TailorOutcome, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }

    let jd = truncate_chars(job_description, max_jd_chars);
    let mut user_message = format!(
        "RESUME:\n{}\n\nJOB DESCRIPTION:\n{jd}",
        serde_json::to_string_pretty(resume).context("serializing resume for tailoring")?
    );
    if let Some(master) = master {
        user_message.push_str(&format!(
            "\n\nMASTER PROFILE (full career history, select the most relevant entries):\n{}",
            serde_json::to_string_pretty(master).context("serializing master profile")?
        ));
    }

    let raw = llm
        .complete(&tailor_system_prompt(), &[ChatTurn::user(user_message)])
        .await?;

    let mut object = decode_object(&raw).ok_or_else(|| AppError::ModelOutput(raw.clone()))?;
    let tailored = match object.remove("tailored") {
        Some(Value::Object(tailored)) => complete_from_source(tailored, resume),
        _ => return Err(AppError::ModelOutput(raw)),
    };

    let highlights: Vec<Highlight> = lenient_list(object.remove("highlights"));
    let reasoning: Vec<ReasoningEntry> = lenient_list(object.remove("reasoning"));

    info!(
        "Tailored resume: {} highlights, {} reasoning entries, master profile {}",
        highlights.len(),
        reasoning.len(),
        if master.is_some() { "included" } else { "not included" }
    );

    Ok(TailorOutcome {
        tailored,
        highlights,
        reasoning,
    })
}

/// Decodes each list element on its own; elements that do not fit are skipped.
fn lenient_list<T: serde::de::DeserializeOwned>(raw: Option<Value>) -> Vec<T> {
    match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}
