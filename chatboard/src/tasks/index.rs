//! Visible-to-absolute index translation.
//!
//! Chat commands reference tasks by a 1-based *visible* index into one
//! of the two entry classes: normal entries are numbered `1..k` in the
//! overlay, repeating entries get their own independent numbering for
//! `!deleterepeat`. The mapping is recomputed from the entry sequence
//! on every command — deletions and insertions invalidate any cached
//! numbering, so none is kept.

use super::TaskEntry;

/// Which sub-list a visible index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryClass {
    /// Non-repeating, numbered entries.
    Normal,
    /// Recurring, unnumbered entries.
    Repeating,
}

impl EntryClass {
    /// Whether the entry belongs to this class.
    #[must_use]
    pub const fn matches(self, entry: &TaskEntry) -> bool {
        match self {
            Self::Normal => !entry.repeating,
            Self::Repeating => entry.repeating,
        }
    }
}

/// Absolute indices of the entries in `class`, in sequence order.
///
/// The visible index `n` names `subclass_indices(..)[n - 1]`.
#[must_use]
pub fn subclass_indices(entries: &[TaskEntry], class: EntryClass) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| class.matches(entry))
        .map(|(absolute, _)| absolute)
        .collect()
}

/// Parse a raw argument piece as a 1-based visible index.
///
/// Anything that is not a positive integer fails the parse, which makes
/// the enclosing command (or batch element) a no-op.
#[must_use]
pub fn parse_visible(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&n| n >= 1)
}

/// Translate a visible index into an absolute index, or `None` when it
/// falls outside the sub-list.
#[must_use]
pub fn resolve(entries: &[TaskEntry], class: EntryClass, visible: usize) -> Option<usize> {
    subclass_indices(entries, class)
        .get(visible.checked_sub(1)?)
        .copied()
}

/// Resolve a semicolon-separated batch of visible indices against a
/// mapping computed once, up front.
///
/// Pieces that fail to parse or fall out of range are skipped
/// individually; surviving absolute indices keep argument order.
#[must_use]
pub fn resolve_batch(entries: &[TaskEntry], class: EntryClass, raw_args: &str) -> Vec<usize> {
    let mapping = subclass_indices(entries, class);
    raw_args
        .split(';')
        .filter_map(parse_visible)
        .filter_map(|visible| mapping.get(visible - 1).copied()) // visible >= 1 via parse_visible
        .collect()
}
