//! Schema normalizer. The only way untrusted resume-shaped data becomes a
//! `ResumeRecord`.
//!
//! Input is decoded leniently into a `PartialResume` (every field optional,
//! wrong types read as absent), then `normalize` fills every gap with its
//! default and upgrades legacy shapes. Neither step can fail.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::models::resume::{
    AwardEntry, CertificationEntry, Contact, EducationEntry, ExperienceEntry, ProjectEntry,
    PublicationEntry, ResumeRecord, SectionKey, SkillCategory,
};
use crate::profile::ids::{ensure_unique_ids, generate_id, LEGACY_SKILLS_ID};

pub const DEFAULT_SKILL_LABEL: &str = "Skills";

/// Skills as they may arrive: the legacy flat string list or categories.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillsInput {
    Flat(Vec<String>),
    Categorized(Vec<SkillCategory>),
}

/// Deep-partial view of a resume. `None` means "absent or unusable".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialResume {
    pub contact: Option<Contact>,
    pub summary: Option<String>,
    pub section_order: Option<Vec<SectionKey>>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub skills: Option<SkillsInput>,
    pub education: Option<Vec<EducationEntry>>,
    pub projects: Option<Vec<ProjectEntry>>,
    pub certifications: Option<Vec<CertificationEntry>>,
    pub awards: Option<Vec<AwardEntry>>,
    pub publications: Option<Vec<PublicationEntry>>,
}

impl From<&Value> for PartialResume {
    fn from(raw: &Value) -> Self {
        PartialResume {
            contact: raw.get("contact").and_then(Value::as_object).map(decode_contact),
            summary: raw.get("summary").filter(|v| !v.is_null()).map(|v| text(Some(v))),
            section_order: raw
                .get("sectionOrder")
                .and_then(Value::as_array)
                .map(|tags| decode_section_order(tags)),
            experience: entries(raw.get("experience"), decode_experience),
            skills: raw.get("skills").and_then(Value::as_array).map(|s| decode_skills(s)),
            education: entries(raw.get("education"), decode_education),
            projects: entries(raw.get("projects"), decode_project),
            certifications: entries(raw.get("certifications"), decode_certification),
            awards: entries(raw.get("awards"), decode_award),
            publications: entries(raw.get("publications"), decode_publication),
        }
    }
}

/// Turns a partial record into a complete canonical one.
pub fn normalize(partial: PartialResume) -> ResumeRecord {
    let mut record = ResumeRecord {
        contact: partial.contact.unwrap_or_default(),
        summary: partial.summary.unwrap_or_default(),
        section_order: partial
            .section_order
            .unwrap_or_else(SectionKey::default_order),
        experience: partial.experience.unwrap_or_default(),
        skills: migrate_skills(partial.skills),
        education: partial.education.unwrap_or_default(),
        projects: partial.projects.unwrap_or_default(),
        certifications: partial.certifications.unwrap_or_default(),
        awards: partial.awards.unwrap_or_default(),
        publications: partial.publications.unwrap_or_default(),
    };

    ensure_unique_ids(&mut record.experience);
    ensure_unique_ids(&mut record.skills);
    ensure_unique_ids(&mut record.education);
    ensure_unique_ids(&mut record.projects);
    ensure_unique_ids(&mut record.certifications);
    ensure_unique_ids(&mut record.awards);
    ensure_unique_ids(&mut record.publications);

    record
}

/// Decodes and normalizes any JSON value. Non-objects yield an empty record.
pub fn normalize_value(raw: &Value) -> ResumeRecord {
    normalize(PartialResume::from(raw))
}

fn migrate_skills(skills: Option<SkillsInput>) -> Vec<SkillCategory> {
    match skills {
        None => Vec::new(),
        Some(SkillsInput::Flat(items)) => {
            let skills = clean_skills(items);
            if skills.is_empty() {
                return Vec::new();
            }
            vec![SkillCategory {
                id: LEGACY_SKILLS_ID.to_string(),
                label: DEFAULT_SKILL_LABEL.to_string(),
                skills,
            }]
        }
        Some(SkillsInput::Categorized(categories)) => categories
            .into_iter()
            .map(|cat| SkillCategory {
                id: if cat.id.is_empty() { generate_id() } else { cat.id },
                label: if cat.label.is_empty() {
                    DEFAULT_SKILL_LABEL.to_string()
                } else {
                    cat.label
                },
                skills: clean_skills(cat.skills),
            })
            .collect(),
    }
}

/// Drops empty strings and case-insensitive repeats, keeping first spellings.
fn clean_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient decoding
// ────────────────────────────────────────────────────────────────────────────

fn text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn text_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| matches!(item, Value::String(_) | Value::Number(_) | Value::Bool(_)))
            .map(|item| text(Some(item)))
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn entries<T>(v: Option<&Value>, decode: fn(&Map<String, Value>) -> T) -> Option<Vec<T>> {
    v.and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).map(decode).collect())
}

fn decode_section_order(tags: &[Value]) -> Vec<SectionKey> {
    let mut order = Vec::new();
    for key in tags.iter().filter_map(Value::as_str).filter_map(SectionKey::parse) {
        if !order.contains(&key) {
            order.push(key);
        }
    }
    order
}

fn decode_skills(items: &[Value]) -> SkillsInput {
    if items.first().is_some_and(Value::is_string) {
        return SkillsInput::Flat(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect(),
        );
    }
    SkillsInput::Categorized(
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|cat| SkillCategory {
                id: text(cat.get("id")),
                label: text(cat.get("label")),
                skills: text_list(cat.get("skills")),
            })
            .collect(),
    )
}

fn decode_contact(c: &Map<String, Value>) -> Contact {
    Contact {
        name: text(c.get("name")),
        title: text(c.get("title")),
        email: text(c.get("email")),
        phone: text(c.get("phone")),
        location: text(c.get("location")),
        linkedin: text(c.get("linkedin")),
        github: text(c.get("github")),
    }
}

fn decode_experience(e: &Map<String, Value>) -> ExperienceEntry {
    let location = text(e.get("location"));
    ExperienceEntry {
        id: text(e.get("id")),
        company: text(e.get("company")),
        role: text(e.get("role")),
        location: (!location.is_empty()).then_some(location),
        dates: text(e.get("dates")),
        bullets: text_list(e.get("bullets")),
    }
}

fn decode_education(e: &Map<String, Value>) -> EducationEntry {
    EducationEntry {
        id: text(e.get("id")),
        institution: text(e.get("institution")),
        degree: text(e.get("degree")),
        dates: text(e.get("dates")),
        details: text(e.get("details")),
    }
}

fn decode_project(e: &Map<String, Value>) -> ProjectEntry {
    ProjectEntry {
        id: text(e.get("id")),
        name: text(e.get("name")),
        description: text(e.get("description")),
        dates: text(e.get("dates")),
        bullets: text_list(e.get("bullets")),
    }
}

fn decode_certification(e: &Map<String, Value>) -> CertificationEntry {
    CertificationEntry {
        id: text(e.get("id")),
        name: text(e.get("name")),
        issuer: text(e.get("issuer")),
        date: text(e.get("date")),
        details: text(e.get("details")),
    }
}

fn decode_award(e: &Map<String, Value>) -> AwardEntry {
    AwardEntry {
        id: text(e.get("id")),
        name: text(e.get("name")),
        description: text(e.get("description")),
        date: text(e.get("date")),
    }
}

fn decode_publication(e: &Map<String, Value>) -> PublicationEntry {
    PublicationEntry {
        id: text(e.get("id")),
        title: text(e.get("title")),
        venue: text(e.get("venue")),
        date: text(e.get("date")),
        description: text(e.get("description")),
    }
}
