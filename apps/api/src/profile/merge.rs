//! Profile merge engine. Folds a freshly parsed record into the master
//! profile.
//!
//! Union semantics throughout: master entries, ids and ordering survive,
//! incoming data only fills gaps or appends. Both inputs must already be
//! canonical (see `profile::normalize`); the merge itself cannot fail.

use std::collections::HashSet;

use tracing::debug;

use crate::models::resume::{Contact, ResumeRecord, SectionKey, SkillCategory};
use crate::profile::identity::same_key;
use crate::profile::ids::{ensure_unique_ids, generate_id};
use crate::profile::reconcile::reconcile;

/// Merges `incoming` into `master`. With no master yet, `incoming` becomes
/// the seed verbatim.
pub fn merge_into_master(master: Option<&ResumeRecord>, incoming: &ResumeRecord) -> ResumeRecord {
    let Some(master) = master else {
        return incoming.clone();
    };

    let mut merged = ResumeRecord {
        contact: merge_contact(&master.contact, &incoming.contact),
        summary: if incoming.summary.is_empty() {
            master.summary.clone()
        } else {
            incoming.summary.clone()
        },
        section_order: merge_section_order(&master.section_order, &incoming.section_order),
        experience: reconcile(&master.experience, &incoming.experience),
        skills: merge_skills(&master.skills, &incoming.skills),
        education: reconcile(&master.education, &incoming.education),
        projects: reconcile(&master.projects, &incoming.projects),
        certifications: reconcile(&master.certifications, &incoming.certifications),
        awards: reconcile(&master.awards, &incoming.awards),
        publications: reconcile(&master.publications, &incoming.publications),
    };

    // Appended entries may carry an id the master already uses.
    ensure_unique_ids(&mut merged.experience);
    ensure_unique_ids(&mut merged.education);
    ensure_unique_ids(&mut merged.projects);
    ensure_unique_ids(&mut merged.certifications);
    ensure_unique_ids(&mut merged.awards);
    ensure_unique_ids(&mut merged.publications);

    debug!(
        experience = merged.experience.len() - master.experience.len(),
        education = merged.education.len() - master.education.len(),
        projects = merged.projects.len() - master.projects.len(),
        skill_categories = merged.skills.len() - master.skills.len(),
        "merged incoming record into master"
    );

    merged
}

/// Incoming contact values win when non-empty; blanks never erase master data.
pub fn merge_contact(master: &Contact, incoming: &Contact) -> Contact {
    let mut contact = master.clone();
    for (slot, value) in contact.fields_mut().into_iter().zip(incoming.fields()) {
        if !value.is_empty() {
            slot.clone_from(value);
        }
    }
    contact
}

/// Keeps master's order and appends tags only incoming has, in incoming's
/// relative order.
pub fn merge_section_order(master: &[SectionKey], incoming: &[SectionKey]) -> Vec<SectionKey> {
    let mut order = master.to_vec();
    for key in incoming {
        if !order.contains(key) {
            order.push(*key);
        }
    }
    order
}

/// Same-label categories have their skills unioned (case-insensitive, master
/// order first); unknown labels are appended whole. Among several same-label
/// categories the one sharing the incoming id is preferred.
pub fn merge_skills(master: &[SkillCategory], incoming: &[SkillCategory]) -> Vec<SkillCategory> {
    let mut merged = master.to_vec();
    for category in incoming {
        let target = merged
            .iter()
            .position(|c| c.id == category.id && same_key(&c.label, &category.label))
            .or_else(|| {
                merged
                    .iter()
                    .position(|c| same_key(&c.label, &category.label))
            });
        match target.map(|idx| &mut merged[idx]) {
            Some(existing) => {
                let mut seen: HashSet<String> =
                    existing.skills.iter().map(|s| s.to_lowercase()).collect();
                for skill in &category.skills {
                    if seen.insert(skill.to_lowercase()) {
                        existing.skills.push(skill.clone());
                    }
                }
            }
            None => {
                let mut appended = category.clone();
                if appended.id.is_empty() {
                    appended.id = generate_id();
                }
                merged.push(appended);
            }
        }
    }
    ensure_unique_ids(&mut merged);
    merged
}

/// Fills each empty contact field of `parsed` from the master. Used when a
/// parse starts a fresh working record rather than extending one.
pub fn fill_contact_from_master(parsed: ResumeRecord, master: Option<&ResumeRecord>) -> ResumeRecord {
    let Some(master) = master else {
        return parsed;
    };
    let mut parsed = parsed;
    for (slot, fallback) in parsed
        .contact
        .fields_mut()
        .into_iter()
        .zip(master.contact.fields())
    {
        if slot.is_empty() && !fallback.is_empty() {
            slot.clone_from(fallback);
        }
    }
    parsed
}
