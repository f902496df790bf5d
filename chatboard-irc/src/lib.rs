//! Twitch-flavored IRC wire format for `chatboard`.
//!
//! Pure parsing and formatting — no I/O. The transport layer feeds raw
//! lines into [`message::parse_line`] and writes lines produced by the
//! [`client`] helpers.

pub mod client;
pub mod message;
pub mod tags;

pub use message::{ChatSender, Privmsg, ServerMessage, parse_line};
