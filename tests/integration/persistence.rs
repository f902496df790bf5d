// Test-specific lint overrides: integration tests use unwrap/expect freely.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::missing_docs_in_private_items
)]

//! Snapshot persistence across simulated restarts: every accepted
//! command is followed by a save, and a fresh process must restore
//! exactly the state the previous one last committed.

use chatboard::commands::parse;
use chatboard::persist;
use chatboard::tasks::TaskStore;
use chatboard::tasks::reducer::apply;
use chatboard_irc::ChatSender;

fn viewer(name: &str) -> ChatSender {
    ChatSender {
        username: name.to_lowercase(),
        display_name: name.to_string(),
        is_moderator: false,
        is_broadcaster: false,
    }
}

/// Apply a line and, when accepted, snapshot — the main loop's contract.
fn feed_and_save(store: TaskStore, sender: &ChatSender, line: &str, path: &std::path::Path) -> TaskStore {
    let Some(cmd) = parse(line) else { return store };
    match apply(&store, sender, "somestreamer", &cmd) {
        Some(next) => {
            persist::save(path, &next).unwrap();
            next
        }
        None => store,
    }
}

#[test]
fn restart_restores_last_committed_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let mut store = TaskStore::new();
    for line in ["!task outline;record", "!repeat hydrate", "!done 1"] {
        store = feed_and_save(store, &viewer("Alice"), line, &path);
    }

    // "Restart": load from disk into a fresh store.
    let restored = persist::load(&path);
    assert_eq!(restored, store);
    assert_eq!(restored["alice"].display_name, "Alice");
    assert!(restored["alice"].entries[0].done);
}

#[test]
fn rejected_commands_do_not_touch_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let store = feed_and_save(TaskStore::new(), &viewer("alice"), "!task A", &path);
    let before = std::fs::read_to_string(&path).unwrap();

    // A no-op command must not rewrite the file.
    let after_store = feed_and_save(store.clone(), &viewer("alice"), "!done 42", &path);
    assert_eq!(after_store, store);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn clear_persists_the_removal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let mut store = TaskStore::new();
    store = feed_and_save(store, &viewer("alice"), "!task A", &path);
    store = feed_and_save(store, &viewer("bob"), "!task B", &path);
    feed_and_save(store, &viewer("alice"), "!clear", &path);

    let restored = persist::load(&path);
    assert!(!restored.contains_key("alice"));
    assert!(restored.contains_key("bob"));
}

#[test]
fn corrupted_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "][ definitely not json").unwrap();
    assert!(persist::load(&path).is_empty());
}
