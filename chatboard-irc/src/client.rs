//! Client-to-server line formatting.
//!
//! The login handshake is order-sensitive: capabilities, then `PASS`,
//! then `NICK`, then `JOIN`. Twitch rejects the connection when `PASS`
//! arrives after `NICK`.

/// Capability request for tag metadata and Twitch command extensions.
#[must_use]
pub const fn cap_req() -> &'static str {
    "CAP REQ :twitch.tv/tags twitch.tv/commands"
}

/// Authentication line. Twitch expects the token with an `oauth:` sigil.
#[must_use]
pub fn pass(token: &str) -> String {
    format!("PASS oauth:{token}")
}

/// Login-name line.
#[must_use]
pub fn nick(login: &str) -> String {
    format!("NICK {}", login.to_lowercase())
}

/// Channel join line. Accepts the channel with or without the `#` sigil.
#[must_use]
pub fn join(channel: &str) -> String {
    format!("JOIN #{}", channel.trim_start_matches('#').to_lowercase())
}

/// Keepalive response echoing the server's `PING` payload.
#[must_use]
pub fn pong(payload: &str) -> String {
    format!("PONG :{payload}")
}
