// Test-specific lint overrides: integration tests use unwrap/expect freely.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::missing_docs_in_private_items
)]

//! End-to-end command flows: raw chat lines through the parser, the
//! permission gate, and the reducer.
//!
//! These tests validate the observable contract of the command engine:
//! - visible indices are stable across interleaved repeating entries
//! - batch edits cannot invalidate each other's indices
//! - destructive commands are role-gated
//! - the store round-trips through its serialized form

use chatboard::commands::parse;
use chatboard::tasks::reducer::apply;
use chatboard::tasks::TaskStore;
use chatboard_irc::ChatSender;

const OWNER_KEY: &str = "somestreamer";

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn viewer(name: &str) -> ChatSender {
    ChatSender {
        username: name.to_lowercase(),
        display_name: name.to_string(),
        is_moderator: false,
        is_broadcaster: false,
    }
}

fn broadcaster(name: &str) -> ChatSender {
    ChatSender {
        is_broadcaster: true,
        ..viewer(name)
    }
}

/// Feed one raw chat line through parser + reducer, keeping the old
/// store on a no-op (which is exactly what the main loop does).
fn feed(store: TaskStore, sender: &ChatSender, line: &str) -> TaskStore {
    match parse(line) {
        Some(cmd) => apply(&store, sender, OWNER_KEY, &cmd).unwrap_or(store),
        None => store,
    }
}

fn feed_all(sender: &ChatSender, lines: &[&str]) -> TaskStore {
    lines
        .iter()
        .fold(TaskStore::new(), |store, line| feed(store, sender, line))
}

fn texts(store: &TaskStore, key: &str) -> Vec<String> {
    store[key].entries.iter().map(|e| e.text.clone()).collect()
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[test]
fn first_task_of_a_session_becomes_current() {
    let store = feed_all(&viewer("Alice"), &["!task Buy milk;Walk dog"]);
    let entries = &store["alice"].entries;
    assert_eq!(entries.len(), 2);
    assert!(entries[0].current);
    assert!(!entries[1].current);
    assert!(entries.iter().all(|e| !e.repeating && !e.done));
}

#[test]
fn visible_index_stability_across_repeating_entries() {
    // Insertion order A, X(repeating), B, C: "!deletetask 2" must
    // remove B (visible number 2), not X (absolute index 1).
    let store = feed_all(
        &viewer("alice"),
        &["!task A", "!repeat X", "!task B;C", "!deletetask 2"],
    );
    assert_eq!(texts(&store, "alice"), vec!["A", "X", "C"]);
}

#[test]
fn batch_delete_converges_with_sequential_deletes() {
    let batch = feed_all(&viewer("alice"), &["!task A;B;C", "!deletetask 1;3"]);
    let sequential = feed_all(&viewer("alice"), &["!task A;B;C", "!deletetask 1", "!deletetask 2"]);
    assert_eq!(texts(&batch, "alice"), vec!["B"]);
    assert_eq!(batch, sequential);
}

#[test]
fn done_replay_is_idempotent() {
    let once = feed_all(&viewer("alice"), &["!task A", "!done 1"]);
    let twice = feed(once.clone(), &viewer("alice"), "!done 1");
    assert_eq!(once, twice);
}

#[test]
fn working_session_keeps_current_invariants() {
    let lines = [
        "!repeat hydrate",
        "!task outline;record;edit",
        "!done 1",
        "!current 3",
        "!task upload",
        "!undone 1",
        "!deletetask 2",
        "!deleterepeat 1",
    ];
    let mut store = TaskStore::new();
    for line in lines {
        store = feed(store, &viewer("alice"), line);
        let currents = store["alice"]
            .entries
            .iter()
            .filter(|e| e.current)
            .count();
        assert!(currents <= 1, "after {line}");
        assert!(
            store["alice"]
                .entries
                .iter()
                .all(|e| !(e.current && e.repeating)),
            "after {line}"
        );
    }
}

#[test]
fn unknown_commands_and_chatter_change_nothing() {
    let base = feed_all(&viewer("alice"), &["!task A"]);
    for line in ["hello there", "!lurk", "!taskforce B", "PogChamp", ""] {
        let after = feed(base.clone(), &viewer("alice"), line);
        assert_eq!(after, base, "line {line:?} mutated the store");
    }
}

#[test]
fn malformed_arguments_change_nothing() {
    let base = feed_all(&viewer("alice"), &["!task A;B"]);
    for line in ["!done zero", "!current 99", "!deletetask x;y", "!undone"] {
        let after = feed(base.clone(), &viewer("alice"), line);
        assert_eq!(after, base, "line {line:?} mutated the store");
    }
}

// ---------------------------------------------------------------------------
// Role gating
// ---------------------------------------------------------------------------

#[test]
fn clearuser_requires_privilege() {
    let store = feed_all(&viewer("Bob"), &["!task B"]);

    let denied = feed(store.clone(), &viewer("alice"), "!clearuser @Bob");
    assert_eq!(denied, store);

    let allowed = feed(store, &broadcaster("SomeStreamer"), "!clearuser @Bob");
    assert!(!allowed.contains_key("bob"));
}

#[test]
fn owner_key_grants_privilege_without_badges() {
    let store = feed_all(&viewer("Bob"), &["!task B"]);
    // The configured owner is privileged even when the transport
    // reports no moderator flag or broadcaster badge.
    let cleared = feed(store, &viewer("SomeStreamer"), "!clearall");
    assert!(cleared.is_empty());
}

#[test]
fn clearall_wipes_every_user() {
    let mut store = feed_all(&viewer("alice"), &["!task A", "!repeat R"]);
    store = feed(store, &viewer("bob"), "!task B");
    assert_eq!(store.len(), 2);
    let cleared = feed(store, &broadcaster("somestreamer"), "!clearall");
    assert!(cleared.is_empty());
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn serialized_store_round_trips_with_invariants_intact() {
    let store = feed_all(
        &viewer("Alice"),
        &[
            "!repeat hydrate;stretch",
            "!task outline;record;edit",
            "!done 1",
            "!current 2",
        ],
    );

    let json = serde_json::to_string(&store).unwrap();
    let restored: TaskStore = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, store);
    for list in restored.values() {
        assert!(list.entries.iter().filter(|e| e.current).count() <= 1);
        assert!(list.entries.iter().all(|e| !(e.current && e.repeating)));
        assert!(list.entries.iter().all(|e| !e.text.is_empty()));
    }
    // Order must survive exactly.
    assert_eq!(
        texts(&restored, "alice"),
        vec!["hydrate", "stretch", "outline", "record", "edit"]
    );
}
