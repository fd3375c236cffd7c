use uuid::Uuid;

use crate::models::resume::Identified;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
pub const ID_LEN: usize = 7;

/// Fixed id for the category synthesized from a legacy flat skills list.
pub const LEGACY_SKILLS_ID: &str = "skills-general";

/// Short opaque token, unique enough within one record (a few dozen entries).
/// Not meant to be globally unique.
pub fn generate_id() -> String {
    let mut n = Uuid::new_v4().as_u128();
    (0..ID_LEN)
        .map(|_| {
            let c = ALPHABET[(n % 36) as usize] as char;
            n /= 36;
            c
        })
        .collect()
}

/// Gives a fresh id to every entry whose id is empty or already taken by an
/// earlier entry. Earlier entries keep theirs, so callers put the list whose
/// ids must survive first.
pub fn ensure_unique_ids<T: Identified>(entries: &mut [T]) {
    let mut seen = std::collections::HashSet::with_capacity(entries.len());
    for entry in entries.iter_mut() {
        if entry.id().is_empty() || seen.contains(entry.id()) {
            let mut fresh = generate_id();
            while seen.contains(&fresh) {
                fresh = generate_id();
            }
            entry.set_id(fresh);
        }
        seen.insert(entry.id().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::AwardEntry;

    fn award(id: &str) -> AwardEntry {
        AwardEntry {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generated_ids_differ() {
        let ids: std::collections::HashSet<_> = (0..50).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_ensure_unique_ids_fills_blanks() {
        let mut list = vec![award("a"), award("")];
        ensure_unique_ids(&mut list);
        assert_eq!(list[0].id, "a");
        assert_eq!(list[1].id.len(), ID_LEN);
    }

    #[test]
    fn test_ensure_unique_ids_keeps_first_duplicate() {
        let mut list = vec![award("a"), award("b"), award("a")];
        ensure_unique_ids(&mut list);
        assert_eq!(list[0].id, "a");
        assert_eq!(list[1].id, "b");
        assert_ne!(list[2].id, "a");
        assert_ne!(list[2].id, "b");
    }
}
