/// Lobby configuration constants.
///
/// This module defines parameters for player registration and per-session
/// flood protection.

/// Minimum length of a player name.
pub const MIN_NAME_LEN: usize = 2;

/// Maximum length of a player name.
pub const MAX_NAME_LEN: usize = 24;

/// Maximum client messages accepted per second before the session is closed.
pub const MAX_MESSAGES_PER_SECOND: u32 = 20;
