//! The command-to-state reducer.
//!
//! [`apply`] is a pure function from (store, sender, command) to an
//! optional replacement store. `None` means the command was a no-op —
//! malformed argument, unresolvable index, missing privilege, or a
//! target that does not exist. Chat has no backchannel for error
//! reporting, so every failure is absorbed as "state unchanged" and the
//! caller only persists and re-renders on `Some`.
//!
//! Invariants maintained for every reachable store:
//! - per user, at most one entry has `current == true`;
//! - a `current` entry is never repeating;
//! - entry texts are non-empty (blank inputs are discarded, not stored).

use chatboard_irc::ChatSender;

use crate::commands::{CommandKind, ParsedCommand};

use super::index::{self, EntryClass};
use super::perms;
use super::{TaskEntry, TaskStore, UserTaskList};

/// Apply one recognized command to the store.
///
/// `owner_key` is the configured channel owner's user key (lower-cased),
/// consulted by the permission gate for `!clearall` / `!clearuser`.
#[must_use]
pub fn apply(
    store: &TaskStore,
    sender: &ChatSender,
    owner_key: &str,
    cmd: &ParsedCommand,
) -> Option<TaskStore> {
    let user_key = sender.username.to_lowercase();
    match cmd.kind {
        CommandKind::Task => append(store, &user_key, &sender.display_name, &cmd.args, false),
        CommandKind::Repeat => append(store, &user_key, &sender.display_name, &cmd.args, true),
        CommandKind::Current => set_current(store, &user_key, &cmd.args),
        CommandKind::DeleteTask => delete_batch(store, &user_key, &cmd.args, EntryClass::Normal),
        CommandKind::DeleteRepeat => {
            delete_batch(store, &user_key, &cmd.args, EntryClass::Repeating)
        }
        CommandKind::Done => mark_batch(store, &user_key, &cmd.args, true),
        CommandKind::Undone => mark_batch(store, &user_key, &cmd.args, false),
        CommandKind::Clear => remove_key(store, &user_key),
        CommandKind::ClearAll => clear_all(store, sender, owner_key),
        CommandKind::ClearUser => clear_user(store, sender, owner_key, &cmd.args),
    }
}

/// `!task` / `!repeat`: append one entry per non-empty trimmed text.
///
/// When the user has no current entry, the first newly added
/// *non-repeating* entry becomes current. For `!repeat` that test never
/// fires: repeating entries are never promoted.
fn append(
    store: &TaskStore,
    user_key: &str,
    display_name: &str,
    args: &str,
    repeating: bool,
) -> Option<TaskStore> {
    let mut fresh: Vec<TaskEntry> = args
        .split(';')
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| TaskEntry::new(text.to_string(), repeating))
        .collect();
    if fresh.is_empty() {
        return None;
    }

    let mut next = store.clone();
    let list = next
        .entry(user_key.to_string())
        .or_insert_with(|| UserTaskList {
            display_name: display_name.to_string(),
            entries: Vec::new(),
        });
    if !list.has_current() {
        if let Some(first_normal) = fresh.iter_mut().find(|e| !e.repeating) {
            list.clear_current();
            first_normal.current = true;
        }
    }
    list.entries.append(&mut fresh);
    Some(next)
}

/// `!current <n>`: move the highlight to the n-th normal entry.
fn set_current(store: &TaskStore, user_key: &str, args: &str) -> Option<TaskStore> {
    let list = store.get(user_key)?;
    let visible = index::parse_visible(args)?;
    let absolute = index::resolve(&list.entries, EntryClass::Normal, visible)?;

    let mut next = store.clone();
    let list = next.get_mut(user_key)?;
    for (i, entry) in list.entries.iter_mut().enumerate() {
        entry.current = i == absolute;
    }
    Some(next)
}

/// `!deletetask` / `!deleterepeat`: remove a batch of entries from one
/// sub-list.
///
/// All indices are resolved against a mapping computed before any
/// deletion, then removed in descending absolute order so earlier
/// removals never shift positions still pending. Unresolvable pieces
/// are skipped individually.
fn delete_batch(
    store: &TaskStore,
    user_key: &str,
    args: &str,
    class: EntryClass,
) -> Option<TaskStore> {
    let list = store.get(user_key)?;
    let mut absolutes = index::resolve_batch(&list.entries, class, args);
    if absolutes.is_empty() {
        return None;
    }
    absolutes.sort_unstable_by(|a, b| b.cmp(a));
    absolutes.dedup();

    let mut next = store.clone();
    let list = next.get_mut(user_key)?;
    for absolute in absolutes {
        list.entries.remove(absolute);
    }
    Some(next)
}

/// `!done` / `!undone`: flip the done flag on a batch of normal entries,
/// then re-resolve which entry is current.
fn mark_batch(store: &TaskStore, user_key: &str, args: &str, done: bool) -> Option<TaskStore> {
    let list = store.get(user_key)?;
    let absolutes = index::resolve_batch(&list.entries, EntryClass::Normal, args);
    if absolutes.is_empty() {
        return None;
    }

    let mut next = store.clone();
    let list = next.get_mut(user_key)?;
    for &absolute in &absolutes {
        let entry = &mut list.entries[absolute];
        entry.done = done;
        entry.current = false;
    }

    if done {
        // The highlight moves to the first still-open normal entry, or
        // goes away entirely when the list is finished.
        let target = list.first_open_normal();
        for (i, entry) in list.entries.iter_mut().enumerate() {
            entry.current = target == Some(i);
        }
    } else if !list.has_current() {
        if let Some(target) = list.first_open_normal() {
            list.entries[target].current = true;
        }
    }
    Some(next)
}

/// `!clear`: drop the sender's own list.
fn remove_key(store: &TaskStore, user_key: &str) -> Option<TaskStore> {
    if !store.contains_key(user_key) {
        return None;
    }
    let mut next = store.clone();
    next.remove(user_key);
    Some(next)
}

/// `!clearall`: wipe the whole store. Privileged.
fn clear_all(store: &TaskStore, sender: &ChatSender, owner_key: &str) -> Option<TaskStore> {
    if !perms::is_privileged(sender, owner_key) || store.is_empty() {
        return None;
    }
    Some(TaskStore::new())
}

/// `!clearuser <name>`: drop the named user's list. Privileged.
///
/// A leading `@` (chat mention syntax) is stripped and the lookup is
/// case-insensitive via lower-casing.
fn clear_user(
    store: &TaskStore,
    sender: &ChatSender,
    owner_key: &str,
    args: &str,
) -> Option<TaskStore> {
    if !perms::is_privileged(sender, owner_key) {
        return None;
    }
    let name = args.split_whitespace().next()?;
    let name = name.strip_prefix('@').unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    remove_key(store, &name.to_lowercase())
}
