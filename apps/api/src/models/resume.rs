use serde::{Deserialize, Serialize};

/// Section tags that may appear in `sectionOrder`. A tag missing from the
/// order hides the section without touching its underlying list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Summary,
    Experience,
    Skills,
    Education,
    Projects,
    Certifications,
    Awards,
    Publications,
}

impl SectionKey {
    pub const ALL: [SectionKey; 8] = [
        SectionKey::Summary,
        SectionKey::Experience,
        SectionKey::Skills,
        SectionKey::Education,
        SectionKey::Projects,
        SectionKey::Certifications,
        SectionKey::Awards,
        SectionKey::Publications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Summary => "summary",
            SectionKey::Experience => "experience",
            SectionKey::Skills => "skills",
            SectionKey::Education => "education",
            SectionKey::Projects => "projects",
            SectionKey::Certifications => "certifications",
            SectionKey::Awards => "awards",
            SectionKey::Publications => "publications",
        }
    }

    pub fn parse(tag: &str) -> Option<SectionKey> {
        SectionKey::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    /// Order used when a record carries no `sectionOrder` at all.
    pub fn default_order() -> Vec<SectionKey> {
        vec![
            SectionKey::Summary,
            SectionKey::Experience,
            SectionKey::Skills,
            SectionKey::Education,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
}

impl Contact {
    pub fn fields(&self) -> [&String; 7] {
        [
            &self.name,
            &self.title,
            &self.email,
            &self.phone,
            &self.location,
            &self.linkedin,
            &self.github,
        ]
    }

    pub fn fields_mut(&mut self) -> [&mut String; 7] {
        [
            &mut self.name,
            &mut self.title,
            &mut self.email,
            &mut self.phone,
            &mut self.location,
            &mut self.linkedin,
            &mut self.github,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub id: String,
    /// Free text, e.g. "Programming Languages".
    pub label: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Opaque display string, copied as written ("2019 - Present").
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub dates: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationEntry {
    pub id: String,
    pub title: String,
    pub venue: String,
    pub date: String,
    pub description: String,
}

/// The canonical resume record. Values of this type are always complete:
/// build them through `profile::normalize` when the source is untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub contact: Contact,
    pub summary: String,
    #[serde(rename = "sectionOrder")]
    pub section_order: Vec<SectionKey>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<SkillCategory>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub awards: Vec<AwardEntry>,
    pub publications: Vec<PublicationEntry>,
}

impl ResumeRecord {
    pub fn empty() -> Self {
        Self {
            contact: Contact::default(),
            summary: String::new(),
            section_order: SectionKey::default_order(),
            experience: Vec::new(),
            skills: Vec::new(),
            education: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            awards: Vec::new(),
            publications: Vec::new(),
        }
    }
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self::empty()
    }
}

/// Common surface of every repeatable entry kind.
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_identified!(
    SkillCategory,
    ExperienceEntry,
    EducationEntry,
    ProjectEntry,
    CertificationEntry,
    AwardEntry,
    PublicationEntry,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_key_round_trips_through_str() {
        for key in SectionKey::ALL {
            assert_eq!(SectionKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SectionKey::parse("hobbies"), None);
    }

    #[test]
    fn test_record_serializes_section_order_camel_case() {
        let json = serde_json::to_value(ResumeRecord::empty()).unwrap();
        assert_eq!(
            json["sectionOrder"],
            serde_json::json!(["summary", "experience", "skills", "education"])
        );
        assert!(json.get("section_order").is_none());
    }

    #[test]
    fn test_experience_location_omitted_when_absent() {
        let entry = ExperienceEntry {
            id: "a1".into(),
            company: "Acme".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("location").is_none());
    }
}
