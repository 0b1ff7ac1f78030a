//! In-memory MessageRepository implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use pursuit_core::{ChatMessage, MessageId};

use crate::repository::{MessageRepository, RepositoryError, Result};

/// Keeps messages in a map; contents are lost when dropped.
#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<BTreeMap<MessageId, ChatMessage>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageRepository for InMemoryMessageRepository {
    fn save(&self, message: &ChatMessage) -> Result<()> {
        let mut messages = self
            .messages
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        messages.insert(message.id, message.clone());
        Ok(())
    }

    fn load(&self, id: MessageId) -> Result<Option<ChatMessage>> {
        let messages = self
            .messages
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(messages.get(&id).cloned())
    }

    fn list_ids(&self) -> Result<Vec<MessageId>> {
        let messages = self
            .messages
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(messages.keys().copied().collect())
    }
}
