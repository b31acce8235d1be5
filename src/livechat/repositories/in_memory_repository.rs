use std::sync::{Arc, Mutex};

use super::error::RepositoryResult;
use super::message_repository::{BoxFuture, MessageRepository};
use crate::livechat::models::ChatMessage;

/// In-memory repository for the conversation.
/// Useful for testing and development.
#[derive(Clone, Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<Mutex<Option<Vec<ChatMessage>>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageRepository for InMemoryMessageRepository {
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Option<Vec<ChatMessage>>>> {
        let messages = self.messages.clone();

        Box::pin(async move {
            let store = messages.lock().unwrap_or_else(|e| e.into_inner());
            Ok(store.clone())
        })
    }

    fn save(&self, snapshot: Vec<ChatMessage>) -> BoxFuture<'static, RepositoryResult<()>> {
        let messages = self.messages.clone();

        Box::pin(async move {
            let mut store = messages.lock().unwrap_or_else(|e| e.into_inner());
            *store = Some(snapshot);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, text: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            text: text.to_string(),
            is_user: true,
            timestamp: "12:00:00".to_string(),
            is_edited: false,
            attachments: Vec::new(),
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn empty_repository_loads_none() {
        let repo = InMemoryMessageRepository::new();
        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_then_load() {
        let repo = InMemoryMessageRepository::new();
        let messages = vec![message("1", "one"), message("2", "two")];

        repo.save(messages.clone()).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(messages));
    }

    #[tokio::test]
    async fn save_overwrites() {
        let repo = InMemoryMessageRepository::new();
        repo.save(vec![message("1", "one")]).await.unwrap();
        repo.save(vec![message("2", "two")]).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "2");
    }
}
