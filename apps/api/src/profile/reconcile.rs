use crate::profile::identity::SameEntity;

/// Append-only union of two lists of one entry kind.
///
/// Returns every `master` entry untouched and in order, followed by each
/// `incoming` entry that matches nothing already in the result. A matched
/// incoming entry is discarded whole; its fields are never folded into the
/// master entry.
pub fn reconcile_by<T, F>(master: &[T], incoming: &[T], is_same: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let mut result = master.to_vec();
    for entry in incoming {
        if !result.iter().any(|existing| is_same(existing, entry)) {
            result.push(entry.clone());
        }
    }
    result
}

/// `reconcile_by` using the kind's own identity rule.
pub fn reconcile<T: SameEntity + Clone>(master: &[T], incoming: &[T]) -> Vec<T> {
    reconcile_by(master, incoming, T::is_same)
}
