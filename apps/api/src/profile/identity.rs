//! Fuzzy identity: decides whether two entries of one kind are the same
//! real-world item.
//!
//! Comparison keys are lower-cased with everything except ASCII letters and
//! digits removed. Differently spelled names never match; short common names
//! ("MIT", "Portfolio Website") from unrelated sources always do.

use crate::models::resume::{
    AwardEntry, CertificationEntry, EducationEntry, ExperienceEntry, ProjectEntry,
    PublicationEntry, SkillCategory,
};

/// "Acme Corp." and "acme corp" both become "acmecorp".
pub fn identity_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

pub fn same_key(a: &str, b: &str) -> bool {
    identity_key(a) == identity_key(b)
}

pub trait SameEntity {
    fn is_same(&self, other: &Self) -> bool;
}

impl SameEntity for ExperienceEntry {
    fn is_same(&self, other: &Self) -> bool {
        same_key(&self.company, &other.company) && same_key(&self.role, &other.role)
    }
}

impl SameEntity for EducationEntry {
    fn is_same(&self, other: &Self) -> bool {
        same_key(&self.institution, &other.institution)
    }
}

impl SameEntity for ProjectEntry {
    fn is_same(&self, other: &Self) -> bool {
        same_key(&self.name, &other.name)
    }
}

impl SameEntity for CertificationEntry {
    fn is_same(&self, other: &Self) -> bool {
        same_key(&self.name, &other.name)
    }
}

impl SameEntity for AwardEntry {
    fn is_same(&self, other: &Self) -> bool {
        same_key(&self.name, &other.name)
    }
}

impl SameEntity for PublicationEntry {
    fn is_same(&self, other: &Self) -> bool {
        same_key(&self.title, &other.title)
    }
}

/// Categories are matched by label; their skills are unioned, not compared.
impl SameEntity for SkillCategory {
    fn is_same(&self, other: &Self) -> bool {
        same_key(&self.label, &other.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(company: &str, role: &str) -> ExperienceEntry {
        ExperienceEntry {
            company: company.to_string(),
            role: role.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_key_strips_case_and_punctuation() {
        assert_eq!(identity_key("Acme Corp."), "acmecorp");
        assert_eq!(identity_key("  C++ / Rust-Lang "), "crustlang");
        assert_eq!(identity_key("B.S. 2020"), "bs2020");
    }

    #[test]
    fn test_identity_key_drops_non_ascii_letters() {
        assert_eq!(identity_key("Café Über"), "cafber");
    }

    #[test]
    fn test_experience_matches_on_company_and_role() {
        assert!(exp("Acme Corp.", "Engineer").is_same(&exp("acme corp", "engineer")));
    }

    #[test]
    fn test_experience_needs_both_fields() {
        assert!(!exp("Acme", "Engineer").is_same(&exp("Acme", "Manager")));
        assert!(!exp("Acme", "Engineer").is_same(&exp("Globex", "Engineer")));
    }

    #[test]
    fn test_experience_ignores_dates_and_bullets() {
        let mut a = exp("Acme", "Engineer");
        a.dates = "2019 - 2021".into();
        a.bullets = vec!["Built things".into()];
        let b = exp("Acme", "Engineer");
        assert!(a.is_same(&b));
    }

    #[test]
    fn test_differently_spelled_names_do_not_match() {
        let a = EducationEntry {
            institution: "Massachusetts Institute of Technology".into(),
            ..Default::default()
        };
        let b = EducationEntry {
            institution: "MIT".into(),
            ..Default::default()
        };
        assert!(!a.is_same(&b));
    }

    #[test]
    fn test_publication_matches_on_title() {
        let a = PublicationEntry {
            title: "Fast Merges: A Study".into(),
            venue: "ICSE".into(),
            ..Default::default()
        };
        let b = PublicationEntry {
            title: "fast merges - a study".into(),
            venue: "arXiv".into(),
            ..Default::default()
        };
        assert!(a.is_same(&b));
    }

    #[test]
    fn test_skill_category_matches_on_label() {
        let a = SkillCategory {
            id: "x".into(),
            label: "Cloud & DevOps".into(),
            skills: vec![],
        };
        let b = SkillCategory {
            id: "y".into(),
            label: "cloud devops".into(),
            skills: vec!["AWS".into()],
        };
        assert!(a.is_same(&b));
    }
}
