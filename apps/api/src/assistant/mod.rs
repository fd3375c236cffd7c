//! Model-driven editing of the working record: JD tailoring and the coaching
//! chat. Neither writes to the master profile.

pub mod chat;
pub mod handlers;
pub mod prompts;
pub mod tailor;

use serde_json::{json, Map, Value};

use crate::models::resume::ResumeRecord;
use crate::profile::normalize::normalize_value;

/// Record keys a model rewrite tends to drop; absent or null ones are taken
/// from the record it started from.
const CARRIED_OVER_KEYS: [&str; 5] = [
    "projects",
    "certifications",
    "awards",
    "publications",
    "sectionOrder",
];

/// Normalizes a model-written record after backfilling dropped keys from `source`.
pub fn complete_from_source(mut candidate: Map<String, Value>, source: &ResumeRecord) -> ResumeRecord {
    if let Value::Object(source) = json!(source) {
        for key in CARRIED_OVER_KEYS {
            if candidate.get(key).map_or(true, Value::is_null) {
                if let Some(value) = source.get(key) {
                    candidate.insert(key.to_string(), value.clone());
                }
            }
        }
    }
    normalize_value(&Value::Object(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ProjectEntry, SectionKey};

    fn source() -> ResumeRecord {
        let mut record = ResumeRecord::empty();
        record.section_order = vec![SectionKey::Projects, SectionKey::Experience];
        record.projects = vec![ProjectEntry {
            id: "p1".into(),
            name: "Compiler".into(),
            ..Default::default()
        }];
        record
    }

    #[test]
    fn test_missing_keys_taken_from_source() {
        let candidate = json!({ "summary": "Tailored", "projects": null });
        let Value::Object(candidate) = candidate else { unreachable!() };
        let record = complete_from_source(candidate, &source());
        assert_eq!(record.summary, "Tailored");
        assert_eq!(record.projects, source().projects);
        assert_eq!(record.section_order, source().section_order);
    }

    #[test]
    fn test_present_keys_are_kept_even_when_empty() {
        let candidate = json!({ "projects": [], "sectionOrder": ["summary"] });
        let Value::Object(candidate) = candidate else { unreachable!() };
        let record = complete_from_source(candidate, &source());
        assert!(record.projects.is_empty());
        assert_eq!(record.section_order, vec![SectionKey::Summary]);
    }

    #[test]
    fn test_experience_is_not_backfilled() {
        let mut src = source();
        src.experience = vec![Default::default()];
        let record = complete_from_source(Map::new(), &src);
        assert!(record.experience.is_empty());
    }
}
