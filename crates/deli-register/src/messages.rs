//! # Operator Messages
//!
//! The single-slot message area above the cart: add confirmations, stock
//! warnings, rejection alerts. Each message carries an explicit auto-dismiss
//! deadline owned by the center; setting a new message supersedes the old
//! one and its deadline in the same call, so a stale dismissal can never
//! fire late and blank out a fresh message.

use serde::Serialize;
use std::time::{Duration, Instant};

/// How long a message stays up before auto-dismissing.
pub const MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Visual weight of an operator message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    /// Routine confirmations ("Added Soda").
    Info,
    /// Needs attention but nothing is wrong ("only 1 on hand").
    Warn,
    /// Something was rejected or failed.
    Error,
}

/// A message currently on screen.
#[derive(Debug, Clone)]
pub struct OperatorMessage {
    pub level: MessageLevel,
    pub text: String,
    expires_at: Instant,
}

impl OperatorMessage {
    /// When this message auto-dismisses.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// The single message slot.
#[derive(Debug, Default)]
pub struct MessageCenter {
    current: Option<OperatorMessage>,
}

impl MessageCenter {
    /// Creates an empty message center.
    pub fn new() -> Self {
        MessageCenter { current: None }
    }

    /// Shows a message, replacing whatever was up along with its deadline.
    pub fn set(&mut self, level: MessageLevel, text: impl Into<String>, now: Instant) {
        self.current = Some(OperatorMessage {
            level,
            text: text.into(),
            expires_at: now + MESSAGE_TTL,
        });
    }

    /// The message currently on screen, if any.
    pub fn current(&self) -> Option<&OperatorMessage> {
        self.current.as_ref()
    }

    /// Dismisses an expired message. Returns true if one was dismissed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(message) = &self.current {
            if now >= message.expires_at {
                self.current = None;
                return true;
            }
        }
        false
    }

    /// Clears the slot immediately.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_auto_dismisses() {
        let mut center = MessageCenter::new();
        let now = Instant::now();

        center.set(MessageLevel::Info, "Added Soda", now);
        assert!(center.current().is_some());

        assert!(!center.tick(now + Duration::from_secs(1)));
        assert!(center.tick(now + MESSAGE_TTL));
        assert!(center.current().is_none());
    }

    #[test]
    fn test_new_message_supersedes_deadline() {
        let mut center = MessageCenter::new();
        let start = Instant::now();

        center.set(MessageLevel::Info, "first", start);
        let later = start + Duration::from_secs(3);
        center.set(MessageLevel::Warn, "second", later);

        // The first message's deadline has passed, but the second message
        // replaced it and carries its own.
        assert!(!center.tick(start + MESSAGE_TTL));
        assert_eq!(center.current().unwrap().text, "second");

        assert!(center.tick(later + MESSAGE_TTL));
    }
}
