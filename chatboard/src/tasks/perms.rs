//! Role gate for destructive commands.

use chatboard_irc::ChatSender;

/// Whether the sender may run `!clearall` / `!clearuser`.
///
/// Privilege comes from the transport-reported moderator flag, the
/// broadcaster badge, or matching the configured channel owner's key.
/// `owner_key` is expected lower-cased (the config layer normalizes it).
#[must_use]
pub fn is_privileged(sender: &ChatSender, owner_key: &str) -> bool {
    sender.is_moderator
        || sender.is_broadcaster
        || (!owner_key.is_empty() && sender.username.to_lowercase() == owner_key)
}
