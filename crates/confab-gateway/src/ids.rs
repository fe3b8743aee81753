//! Identifier newtypes shared across the gateway surface.
//!
//! Snowflake-style numeric ids for messages, channels, and users, plus
//! the reaction symbol key used by tallies and pagination controls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// Unique identifier of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Unique identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

macro_rules! impl_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Get the raw id value.
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

impl_id!(MessageId, "message");
impl_id!(ChannelId, "channel");
impl_id!(UserId, "user");

/// A reaction symbol: the unicode emoji (or custom emote key) attached
/// to a message.
///
/// Symbols are compared by their textual form, which is what the
/// gateway delivers in reaction events and what the transport expects
/// when creating reactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionSymbol(String);

impl ReactionSymbol {
    /// Create a symbol from its textual form.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get the textual form of the symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReactionSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ReactionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(MessageId(7).to_string(), "message-7");
        assert_eq!(ChannelId(12).to_string(), "channel-12");
        assert_eq!(UserId(3).to_string(), "user-3");
    }

    #[test]
    fn test_symbol_equality_by_text() {
        let a = ReactionSymbol::new("😀");
        let b = ReactionSymbol::from("😀");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "😀");
        assert_ne!(a, ReactionSymbol::new("😢"));
    }
}
