//! File-based MessageRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use pursuit_core::{ChatMessage, MessageId};

use crate::repository::{MessageRepository, RepositoryError, Result};

/// Stores each message as `message_{id}.json` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, so a crash
/// never leaves a half-written message behind.
pub struct FileMessageRepository {
    base_dir: PathBuf,
}

impl FileMessageRepository {
    /// Create a repository rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn message_path(&self, id: MessageId) -> PathBuf {
        self.base_dir.join(format!("message_{}.json", id.0))
    }
}

impl MessageRepository for FileMessageRepository {
    fn save(&self, message: &ChatMessage) -> Result<()> {
        let path = self.message_path(message.id);
        let temp_path = path.with_extension("json.tmp");

        let bytes =
            serde_json::to_vec_pretty(message).map_err(|e| RepositoryError::Json(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved message[{}] to {}", message.id, path.display());

        Ok(())
    }

    fn load(&self, id: MessageId) -> Result<Option<ChatMessage>> {
        let path = self.message_path(id);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let message: ChatMessage =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;

        if message.id != id {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds message {}",
                path.display(),
                message.id
            )));
        }

        Ok(Some(message))
    }

    fn list_ids(&self) -> Result<Vec<MessageId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id_str) = filename
                    .strip_prefix("message_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = id_str.parse::<u64>()
            {
                ids.push(MessageId(id));
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
