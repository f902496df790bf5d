//! Server-to-client IRC line parsing.
//!
//! Twitch delivers chat over the IRC line protocol: an optional `@tags`
//! block, an optional `:prefix`, a command, parameters, and an optional
//! trailing parameter after ` :`. [`parse_line`] recognizes the handful
//! of commands chatboard cares about and surfaces everything else as
//! [`ServerMessage::Other`] — unknown input is inert, never an error.

use serde::{Deserialize, Serialize};

use crate::tags;

/// Metadata about the author of a chat message, extracted from the
/// message prefix and IRCv3 tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSender {
    /// Login name from the message prefix, lower-cased. This is the
    /// stable identity used as the store key.
    pub username: String,
    /// Case-preserving display name (`display-name` tag, falling back
    /// to the login name when the tag is absent or empty).
    pub display_name: String,
    /// Whether the `mod=1` tag was present.
    pub is_moderator: bool,
    /// Whether the `badges` tag carried a broadcaster badge.
    pub is_broadcaster: bool,
}

/// A chat message addressed to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privmsg {
    /// Channel name without the leading `#`.
    pub channel: String,
    /// Who sent the message.
    pub sender: ChatSender,
    /// The message text (trailing parameter).
    pub text: String,
}

/// A parsed server-to-client line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// A chat message in a joined channel.
    Privmsg(Privmsg),
    /// Keepalive probe; the transport must answer with `PONG <payload>`.
    Ping {
        /// Payload to echo back.
        payload: String,
    },
    /// Numeric 001 — login accepted.
    Welcome,
    /// Server notice (login failures arrive this way before the
    /// connection is closed).
    Notice {
        /// Human-readable notice text.
        text: String,
    },
    /// Confirmation that a channel was joined.
    Join {
        /// Channel name without the leading `#`.
        channel: String,
    },
    /// Any command chatboard does not interpret.
    Other {
        /// The raw command token.
        command: String,
    },
}

/// Parse one raw IRC line.
///
/// Returns `None` for blank lines (and lines that contain nothing but a
/// tag block or prefix). Malformed-but-nonempty lines come back as
/// [`ServerMessage::Other`] so the caller can log and move on.
#[must_use]
pub fn parse_line(line: &str) -> Option<ServerMessage> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut rest = line.trim_start();
    if rest.is_empty() {
        return None;
    }

    // Optional @tags block.
    let tag_map = if let Some(tagged) = rest.strip_prefix('@') {
        let (block, remainder) = tagged.split_once(' ')?;
        rest = remainder.trim_start();
        tags::parse_tags(block)
    } else {
        std::collections::HashMap::new()
    };

    // Optional :prefix (nick!user@host or server name).
    let prefix = if let Some(prefixed) = rest.strip_prefix(':') {
        let (pfx, remainder) = prefixed.split_once(' ')?;
        rest = remainder.trim_start();
        Some(pfx)
    } else {
        None
    };

    // Command token, then parameters with an optional trailing part.
    let (command, params) = match rest.split_once(' ') {
        Some((cmd, params)) => (cmd, params),
        None => (rest, ""),
    };
    if command.is_empty() {
        return None;
    }
    let (middle, trailing) = split_trailing(params);

    let msg = match command {
        "PING" => ServerMessage::Ping {
            payload: trailing.unwrap_or(middle).to_string(),
        },
        "PRIVMSG" => {
            let channel = channel_name(middle.split_whitespace().next().unwrap_or(""));
            let login = login_name(prefix.unwrap_or(""));
            if login.is_empty() {
                return Some(ServerMessage::Other {
                    command: command.to_string(),
                });
            }
            ServerMessage::Privmsg(Privmsg {
                channel,
                sender: build_sender(&login, &tag_map),
                text: trailing.unwrap_or("").to_string(),
            })
        }
        "001" => ServerMessage::Welcome,
        "NOTICE" => ServerMessage::Notice {
            text: trailing.unwrap_or("").to_string(),
        },
        "JOIN" => ServerMessage::Join {
            channel: channel_name(trailing.unwrap_or(middle)),
        },
        other => ServerMessage::Other {
            command: other.to_string(),
        },
    };
    Some(msg)
}

/// Split a parameter string into middle parameters and the trailing
/// parameter (everything after the first ` :` or a leading `:`).
fn split_trailing(params: &str) -> (&str, Option<&str>) {
    if let Some(trailing) = params.strip_prefix(':') {
        return ("", Some(trailing));
    }
    match params.split_once(" :") {
        Some((middle, trailing)) => (middle.trim_end(), Some(trailing)),
        None => (params.trim_end(), None),
    }
}

/// Extract the login name from a `nick!user@host` prefix, lower-cased.
/// A server-name prefix (no `!`) yields the empty string.
fn login_name(prefix: &str) -> String {
    match prefix.split_once('!') {
        Some((nick, _)) => nick.to_lowercase(),
        None => String::new(),
    }
}

/// Strip the `#` sigil from a channel parameter.
fn channel_name(param: &str) -> String {
    param.trim_start_matches('#').to_string()
}

/// Assemble sender metadata from the login name and the tag map.
fn build_sender(login: &str, tag_map: &std::collections::HashMap<String, String>) -> ChatSender {
    let display_name = tag_map
        .get("display-name")
        .filter(|name| !name.is_empty())
        .map_or_else(|| login.to_string(), ToString::to_string);
    let is_moderator = tag_map.get("mod").is_some_and(|v| v == "1");
    let is_broadcaster = tag_map.get("badges").is_some_and(|badges| {
        badges
            .split(',')
            .any(|badge| badge.starts_with("broadcaster/"))
    });
    ChatSender {
        username: login.to_string(),
        display_name,
        is_moderator,
        is_broadcaster,
    }
}
