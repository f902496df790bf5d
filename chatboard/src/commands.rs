//! Chat command recognition.
//!
//! The first whitespace token of a message, case-folded, names the
//! command; the remaining tokens rejoined with single spaces form the
//! raw argument string that each reducer operation interprets for
//! itself. Messages that do not start with a known command are inert —
//! chat is full of ordinary conversation, and the overlay must never
//! answer it with errors.

/// The commands the reducer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `!task <text>[;<text>...]` — add normal entries.
    Task,
    /// `!repeat <text>[;<text>...]` — add repeating entries.
    Repeat,
    /// `!current <n>` — highlight a normal entry.
    Current,
    /// `!deletetask <n>[;<n>...]` — delete normal entries.
    DeleteTask,
    /// `!deleterepeat <n>[;<n>...]` — delete repeating entries.
    DeleteRepeat,
    /// `!done <n>[;<n>...]` — check normal entries off.
    Done,
    /// `!undone <n>[;<n>...]` — uncheck normal entries.
    Undone,
    /// `!clear` — drop the sender's whole list.
    Clear,
    /// `!clearall` — drop every list (privileged).
    ClearAll,
    /// `!clearuser <name>` — drop one user's list (privileged).
    ClearUser,
}

/// A recognized command with its raw argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Which command was named.
    pub kind: CommandKind,
    /// Remaining tokens, rejoined with single spaces. May be empty.
    pub args: String,
}

/// Recognize a command in a raw chat message.
///
/// Returns `None` for everything that is not one of the known commands.
#[must_use]
pub fn parse(message: &str) -> Option<ParsedCommand> {
    let mut tokens = message.split_whitespace();
    let kind = match tokens.next()?.to_lowercase().as_str() {
        "!task" => CommandKind::Task,
        "!repeat" => CommandKind::Repeat,
        "!current" => CommandKind::Current,
        "!deletetask" => CommandKind::DeleteTask,
        "!deleterepeat" => CommandKind::DeleteRepeat,
        "!done" => CommandKind::Done,
        "!undone" => CommandKind::Undone,
        "!clear" => CommandKind::Clear,
        "!clearall" => CommandKind::ClearAll,
        "!clearuser" => CommandKind::ClearUser,
        _ => return None,
    };
    Some(ParsedCommand {
        kind,
        args: tokens.collect::<Vec<_>>().join(" "),
    })
}
