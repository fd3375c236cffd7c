// Shared prompt fragments. Each module that calls the model keeps its own
// prompts.rs next to it and builds on these.

/// Appended to every system prompt whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Return ONLY the JSON object described above. \
No markdown code fences, no commentary before or after it.";

/// Resume record shape the model must read and write.
pub const RESUME_SCHEMA: &str = r#"{
  "contact": { "name": "", "title": "", "email": "", "phone": "", "location": "", "linkedin": "", "github": "" },
  "summary": "",
  "sectionOrder": ["summary", "experience", "skills", "education"],
  "experience": [{ "id": "", "company": "", "role": "", "location": "", "dates": "", "bullets": [] }],
  "skills": [{ "id": "", "label": "", "skills": [] }],
  "education": [{ "id": "", "institution": "", "degree": "", "dates": "", "details": "" }],
  "projects": [{ "id": "", "name": "", "description": "", "dates": "", "bullets": [] }],
  "certifications": [{ "id": "", "name": "", "issuer": "", "date": "", "details": "" }],
  "awards": [{ "id": "", "name": "", "description": "", "date": "" }],
  "publications": [{ "id": "", "title": "", "venue": "", "date": "", "description": "" }]
}
sectionOrder values: "summary" | "experience" | "skills" | "education" | "projects" | "certifications" | "awards" | "publications""#;

/// Grounding rule shared by every prompt that touches resume content.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
CRITICAL: Never invent facts. Every company, title, date, metric, tool and \
outcome must appear in the material provided. Missing data stays empty.";

/// Rule for prompts that hand a record back to be stored.
pub const PRESERVE_IDS_INSTRUCTION: &str = "\
Preserve every existing entry `id` exactly. Entries you add get a new short \
random alphanumeric id.";
