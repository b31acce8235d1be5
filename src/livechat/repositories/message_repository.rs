use std::future::Future;
use std::pin::Pin;

use super::error::RepositoryResult;
use crate::livechat::models::ChatMessage;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Repository trait for the persisted conversation.
///
/// The conversation is stored as one JSON array of messages under a fixed
/// key. There is no schema versioning: implementations must fail closed on
/// data they cannot parse, returning `Ok(None)` so the caller reseeds.
pub trait MessageRepository: Send + Sync + 'static {
    /// Load the saved message list. `None` means nothing usable is stored.
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Option<Vec<ChatMessage>>>>;

    /// Save the full message list, replacing whatever was stored.
    fn save(&self, messages: Vec<ChatMessage>) -> BoxFuture<'static, RepositoryResult<()>>;
}
