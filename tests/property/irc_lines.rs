// Test-specific lint overrides: property tests use unwrap/expect freely.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::missing_docs_in_private_items
)]

//! Property-based IRC line parsing tests.
//!
//! Uses proptest to verify:
//! 1. Arbitrary input never panics the parser (total function).
//! 2. Constructed chat lines round-trip sender, channel, and text.
//! 3. Tag unescaping never panics and never grows its input.

use proptest::prelude::*;

use chatboard_irc::{ServerMessage, parse_line, tags};

proptest! {
    #[test]
    fn parse_line_never_panics(line in "\\PC{0,200}") {
        let _ = parse_line(&line);
    }

    #[test]
    fn parse_line_tolerates_raw_bytes_as_chars(line in prop::collection::vec(any::<char>(), 0..120)) {
        let line: String = line.into_iter().collect();
        let _ = parse_line(&line);
    }

    #[test]
    fn constructed_privmsg_round_trips(
        nick in "[a-z][a-z0-9_]{0,15}",
        channel in "[a-z][a-z0-9_]{0,15}",
        text in "[^\r\n\u{0}]{0,100}",
    ) {
        let line = format!(":{nick}!{nick}@{nick}.tmi.twitch.tv PRIVMSG #{channel} :{text}");
        match parse_line(&line) {
            Some(ServerMessage::Privmsg(msg)) => {
                prop_assert_eq!(msg.sender.username, nick);
                prop_assert_eq!(msg.channel, channel);
                prop_assert_eq!(msg.text, text);
            }
            other => prop_assert!(false, "expected Privmsg, got {other:?}"),
        }
    }

    #[test]
    fn tagged_privmsg_keeps_display_name(
        display in "[A-Za-z0-9_]{1,20}",
        moderator in any::<bool>(),
    ) {
        let mod_flag = u8::from(moderator);
        let line = format!(
            "@display-name={display};mod={mod_flag} :user!user@user.tmi.twitch.tv PRIVMSG #chan :hi"
        );
        match parse_line(&line) {
            Some(ServerMessage::Privmsg(msg)) => {
                prop_assert_eq!(msg.sender.display_name, display);
                prop_assert_eq!(msg.sender.is_moderator, moderator);
            }
            other => prop_assert!(false, "expected Privmsg, got {other:?}"),
        }
    }

    #[test]
    fn unescape_never_panics_or_grows(value in "\\PC{0,200}") {
        let out = tags::unescape(&value);
        prop_assert!(out.chars().count() <= value.chars().count());
    }

    #[test]
    fn parse_tags_never_panics(block in "[a-z0-9=;\\\\:/-]{0,120}") {
        let _ = tags::parse_tags(&block);
    }
}
