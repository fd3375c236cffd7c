// Resume parse prompt. The reply is normalized before anything else sees it,
// so the schema here is guidance, not a contract.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NO_FABRICATION_INSTRUCTION, RESUME_SCHEMA};

const PARSE_SYSTEM_HEAD: &str = "\
You are a precise resume parser. Convert raw resume text into one structured JSON object.

RULES:
1. Extract only what is written. Missing fields are \"\" or [].
2. Copy bullet points verbatim; normalize bullet glyphs (•, -, *) to nothing, change nothing else.
3. Extract ALL experience, education, projects, certifications, awards, publications and skills.
4. sectionOrder lists the sections in the order they appear in the text, and only those.
5. Give every entry and skill category a short (6-7 char) random alphanumeric id.
6. Copy dates exactly as written.
7. Group skills into focused categories (\"Databases\", \"Cloud & DevOps\") rather than one catch-all.
8. contact.title is the headline from the resume header only; leave it empty if there is none.";

pub fn parse_system_prompt() -> String {
    format!(
        "{PARSE_SYSTEM_HEAD}\n\n{NO_FABRICATION_INSTRUCTION}\n\nOUTPUT SCHEMA:\n{RESUME_SCHEMA}\n\n{JSON_ONLY_INSTRUCTION}"
    )
}

pub fn parse_user_prompt(text: &str) -> String {
    format!("Parse this resume text:\n\n{text}")
}
