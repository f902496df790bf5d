//! Per-user task state for the overlay.
//!
//! The store maps a lower-cased chat login (the *user key*) to that
//! viewer's task list. All mutation goes through [`reducer::apply`],
//! which takes the current store and returns a replacement — callers
//! never edit a [`UserTaskList`] in place.
//!
//! Entries come in two classes that are never merged or renumbered into
//! each other: *normal* entries, numbered `1..k` for reference in chat
//! commands, and *repeating* entries, rendered without numbers. At most
//! one entry per user carries the `current` flag, and only a normal
//! entry may carry it.

pub mod index;
pub mod perms;
pub mod reducer;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single task on someone's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Display text. Never empty: blank texts are discarded on input.
    pub text: String,
    /// Whether the task has been checked off.
    #[serde(default)]
    pub done: bool,
    /// Whether this is a recurring task. Fixed at creation.
    #[serde(default)]
    pub repeating: bool,
    /// Whether this is the highlighted "working on it now" task.
    /// Only ever true on a non-repeating entry.
    #[serde(default)]
    pub current: bool,
}

impl TaskEntry {
    /// Build a fresh, unchecked entry.
    #[must_use]
    pub fn new(text: String, repeating: bool) -> Self {
        Self {
            text,
            done: false,
            repeating,
            current: false,
        }
    }
}

/// One viewer's task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTaskList {
    /// Case-preserving name shown in the overlay.
    pub display_name: String,
    /// Entries in insertion order. Position here is the absolute index.
    pub entries: Vec<TaskEntry>,
}

impl UserTaskList {
    /// Whether any entry carries the `current` flag.
    #[must_use]
    pub fn has_current(&self) -> bool {
        self.entries.iter().any(|e| e.current)
    }

    /// Clear the `current` flag on every entry.
    pub fn clear_current(&mut self) {
        for entry in &mut self.entries {
            entry.current = false;
        }
    }

    /// Absolute index of the first normal entry that is not done.
    #[must_use]
    pub fn first_open_normal(&self) -> Option<usize> {
        self.entries.iter().position(|e| !e.repeating && !e.done)
    }
}

/// The whole overlay state: user key → task list.
///
/// A `BTreeMap` keeps iteration (and thus rendering and serialization)
/// deterministic across runs.
pub type TaskStore = BTreeMap<String, UserTaskList>;
