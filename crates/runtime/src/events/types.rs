//! Event types for different topics.

use pursuit_core::{
    ChatMessage, ErrorSeverity, PursuitError, PursuitFault, RollResult, Side, UserId,
};
use serde::{Deserialize, Serialize};

/// Events related to pursuit chat messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A new pursuit card was posted (first round or a resolved round)
    MessageCreated {
        message: Box<ChatMessage>,
        requested_by: UserId,
    },

    /// A roll result was merged into an existing card
    MessageUpdated {
        message: Box<ChatMessage>,
        side: Side,
        result: RollResult,
        requested_by: UserId,
        /// Whether the update arrived through the player relay
        relayed: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Warn,
    Error,
}

impl From<ErrorSeverity> for NotificationLevel {
    fn from(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Recoverable => NotificationLevel::Warn,
            ErrorSeverity::Validation => NotificationLevel::Error,
        }
    }
}

/// Notification addressed to one user.
///
/// `key` is the localization key; `message` is the untranslated fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub user: UserId,
    pub level: NotificationLevel,
    pub key: String,
    pub message: String,
}

impl NotificationEvent {
    pub fn from_error(user: UserId, error: &PursuitError) -> Self {
        Self {
            user,
            level: error.severity().into(),
            key: error.error_code().to_owned(),
            message: error.to_string(),
        }
    }
}
