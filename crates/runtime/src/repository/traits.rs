//! Repository contract for persisted chat messages.

use pursuit_core::{ChatMessage, MessageId};

use super::error::Result;

/// Storage for pursuit chat messages keyed by [`MessageId`].
///
/// A saved message replaces any previous message with the same id.
pub trait MessageRepository: Send + Sync {
    /// Save (insert or replace) a message
    fn save(&self, message: &ChatMessage) -> Result<()>;

    /// Load a message by id
    fn load(&self, id: MessageId) -> Result<Option<ChatMessage>>;

    /// All stored message ids in ascending order
    fn list_ids(&self) -> Result<Vec<MessageId>>;

    /// Id to assign to the next new message
    fn next_id(&self) -> Result<MessageId> {
        Ok(self
            .list_ids()?
            .last()
            .copied()
            .unwrap_or_default()
            .next())
    }

    /// All stored messages in ascending id order
    fn list(&self) -> Result<Vec<ChatMessage>> {
        let mut messages = Vec::new();
        for id in self.list_ids()? {
            if let Some(message) = self.load(id)? {
                messages.push(message);
            }
        }
        Ok(messages)
    }
}
