use crate::fs::lister::Entry;

/// Index of the first real entry whose name contains `term` (case-sensitive).
///
/// The scan always starts at index 0. An empty term never matches.
pub fn find(entries: &[Entry], term: &str) -> Option<usize> {
    if term.is_empty() {
        return None;
    }
    entries
        .iter()
        .position(|e| e.is_real() && e.name.contains(term))
}
