// Test-specific lint overrides: property tests use unwrap/expect freely.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::missing_docs_in_private_items
)]

//! Property-based reducer tests.
//!
//! Uses proptest to verify, for arbitrary command sessions:
//! 1. Per user, at most one entry is current, and never a repeating one.
//! 2. Stored texts are non-empty and trimmed.
//! 3. The store survives a JSON round-trip exactly.
//! 4. Checking off an already-done entry is idempotent.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use chatboard::commands::parse;
use chatboard::tasks::TaskStore;
use chatboard::tasks::reducer::apply;
use chatboard_irc::ChatSender;

const OWNER_KEY: &str = "somestreamer";

// --- Strategies ---

/// A small pool of senders; the owner shows up so privileged paths run.
fn arb_sender() -> impl Strategy<Value = ChatSender> {
    (
        prop::sample::select(vec!["alice", "bob", "charlie", "somestreamer"]),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, is_moderator, is_broadcaster)| ChatSender {
            username: name.to_string(),
            display_name: name.to_uppercase(),
            is_moderator,
            is_broadcaster,
        })
}

/// Semicolon-joined index batch like "2;5;1".
fn arb_index_batch() -> impl Strategy<Value = String> {
    prop::collection::vec(1usize..9, 1..4).prop_map(|ns| {
        ns.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    })
}

/// One raw chat line: any command with loosely-shaped arguments,
/// including garbage that must be absorbed as a no-op.
fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ;]{0,24}".prop_map(|t| format!("!task {t}")),
        "[a-z ;]{0,24}".prop_map(|t| format!("!repeat {t}")),
        (1usize..9).prop_map(|n| format!("!current {n}")),
        arb_index_batch().prop_map(|b| format!("!deletetask {b}")),
        arb_index_batch().prop_map(|b| format!("!deleterepeat {b}")),
        arb_index_batch().prop_map(|b| format!("!done {b}")),
        arb_index_batch().prop_map(|b| format!("!undone {b}")),
        Just("!clear".to_string()),
        Just("!clearall".to_string()),
        "[a-z@]{0,10}".prop_map(|n| format!("!clearuser {n}")),
        "[a-z !;0-9]{0,24}".prop_map(|noise| noise),
    ]
}

/// Run a session, asserting the structural invariants after every step.
fn run_session(ops: &[(ChatSender, String)]) -> Result<TaskStore, TestCaseError> {
    let mut store = TaskStore::new();
    for (sender, line) in ops {
        if let Some(cmd) = parse(line) {
            if let Some(next) = apply(&store, sender, OWNER_KEY, &cmd) {
                store = next;
            }
        }
        for (key, list) in &store {
            let currents = list.entries.iter().filter(|e| e.current).count();
            prop_assert!(currents <= 1, "{key} has {currents} current after {line:?}");
            prop_assert!(
                list.entries.iter().all(|e| !(e.current && e.repeating)),
                "{key} has a repeating current after {line:?}"
            );
            prop_assert!(
                list.entries
                    .iter()
                    .all(|e| !e.text.is_empty() && e.text == e.text.trim()),
                "{key} stored an untrimmed or empty text after {line:?}"
            );
        }
    }
    Ok(store)
}

// --- Properties ---

proptest! {
    #[test]
    fn invariants_hold_for_arbitrary_sessions(
        ops in prop::collection::vec((arb_sender(), arb_line()), 0..40)
    ) {
        run_session(&ops)?;
    }

    #[test]
    fn store_round_trips_through_json(
        ops in prop::collection::vec((arb_sender(), arb_line()), 0..40)
    ) {
        let store = run_session(&ops)?;
        let json = serde_json::to_string(&store).unwrap();
        let restored: TaskStore = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, store);
    }

    #[test]
    fn done_is_idempotent(
        ops in prop::collection::vec((arb_sender(), arb_line()), 0..20),
        visible in 1usize..6,
    ) {
        let store = run_session(&ops)?;
        let sender = ChatSender {
            username: "alice".to_string(),
            display_name: "Alice".to_string(),
            is_moderator: false,
            is_broadcaster: false,
        };
        let cmd = parse(&format!("!done {visible}")).unwrap();
        let once = apply(&store, &sender, OWNER_KEY, &cmd).unwrap_or_else(|| store.clone());
        let twice = apply(&once, &sender, OWNER_KEY, &cmd).unwrap_or_else(|| once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn clear_removes_exactly_the_sender(
        ops in prop::collection::vec((arb_sender(), arb_line()), 0..20),
    ) {
        let store = run_session(&ops)?;
        let cmd = parse("!clear").unwrap();
        for key in store.keys() {
            let sender = ChatSender {
                username: key.clone(),
                display_name: key.clone(),
                is_moderator: false,
                is_broadcaster: false,
            };
            let next = apply(&store, &sender, OWNER_KEY, &cmd).unwrap();
            prop_assert!(!next.contains_key(key));
            prop_assert_eq!(next.len(), store.len() - 1);
            for (other, list) in &next {
                prop_assert_eq!(list, &store[other]);
            }
        }
    }
}
