use std::path::PathBuf;

use tracing::warn;

use super::error::{RepositoryError, RepositoryResult};
use super::message_repository::{BoxFuture, MessageRepository};
use crate::livechat::models::ChatMessage;

/// JSON file-based repository for the conversation.
/// Stores the whole message list in ~/.config/livechat/messages.json
pub struct JsonMessageRepository {
    messages_path: PathBuf,
}

impl JsonMessageRepository {
    pub fn new() -> RepositoryResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RepositoryError::InitializationError {
                message: "Could not determine config directory".to_string(),
            })?
            .join("livechat");

        Ok(Self {
            messages_path: config_dir.join("messages.json"),
        })
    }

    /// Repository rooted at an explicit file path.
    pub fn with_path(messages_path: PathBuf) -> Self {
        Self { messages_path }
    }
}

impl MessageRepository for JsonMessageRepository {
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Option<Vec<ChatMessage>>>> {
        let path = self.messages_path.clone();

        Box::pin(async move {
            smol::unblock(move || {
                if !path.exists() {
                    return Ok(None);
                }

                let content = std::fs::read_to_string(&path)?;

                // No schema versioning exists for this file. A value that
                // does not parse is discarded so the caller reseeds, rather
                // than surfacing a parse fault to the user.
                match serde_json::from_str::<Vec<ChatMessage>>(&content) {
                    Ok(messages) => Ok(Some(messages)),
                    Err(err) => {
                        warn!(?path, error = %err, "Discarding unparsable saved conversation");
                        Ok(None)
                    }
                }
            })
            .await
        })
    }

    fn save(&self, messages: Vec<ChatMessage>) -> BoxFuture<'static, RepositoryResult<()>> {
        let path = self.messages_path.clone();

        Box::pin(async move {
            smol::unblock(move || {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                let json = serde_json::to_string_pretty(&messages)?;

                // Write to file atomically (write to temp, then rename)
                let temp_path = path.with_extension("json.tmp");
                std::fs::write(&temp_path, json)?;
                std::fs::rename(&temp_path, &path)?;

                Ok(())
            })
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::livechat::models::{Attachment, ReplyTarget};

    fn sample_messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                id: "1".to_string(),
                text: "Hello! How can I help you today?".to_string(),
                is_user: false,
                timestamp: "09:00:00".to_string(),
                is_edited: false,
                attachments: Vec::new(),
                reply_to: None,
            },
            ChatMessage {
                id: "1700000000000".to_string(),
                text: "hi".to_string(),
                is_user: true,
                timestamp: "09:00:05".to_string(),
                is_edited: true,
                attachments: vec![Attachment {
                    name: "doc.txt".to_string(),
                    url: "/data/att/doc.txt".to_string(),
                }],
                reply_to: Some(ReplyTarget {
                    id: "1".to_string(),
                    text: "Hello! How can I help you today?".to_string(),
                    is_user: false,
                }),
            },
        ]
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMessageRepository::with_path(dir.path().join("messages.json"));

        let messages = sample_messages();
        repo.save(messages.clone()).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded, Some(messages));
    }

    #[tokio::test]
    async fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMessageRepository::with_path(dir.path().join("messages.json"));

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn load_malformed_file_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let repo = JsonMessageRepository::with_path(path);
        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded, None, "corrupt data is discarded, not surfaced");
    }

    #[tokio::test]
    async fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMessageRepository::with_path(dir.path().join("messages.json"));

        repo.save(sample_messages()).await.unwrap();
        repo.save(Vec::new()).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded, Some(Vec::new()));
    }
}
