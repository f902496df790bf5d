//! IRCv3 message-tag parsing.
//!
//! Twitch prefixes chat lines with `@key=value;key=value` tag blocks when
//! the `twitch.tv/tags` capability is requested. Values use the IRCv3
//! escape scheme: `\:` for `;`, `\s` for space, `\\` for backslash, plus
//! `\r` and `\n`.

use std::collections::HashMap;

/// Parse a raw tag block (without the leading `@`) into a key → value map.
///
/// Keys without a `=` get an empty value. Duplicate keys keep the last
/// occurrence, matching the IRCv3 recommendation.
#[must_use]
pub fn parse_tags(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), unescape(value)),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Undo IRCv3 tag-value escaping.
///
/// An invalid escape sequence yields the escaped character verbatim; a
/// trailing lone backslash is dropped. Both per the IRCv3 spec.
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(';'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
