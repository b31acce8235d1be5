pub mod chat_store;
pub mod message;

pub use chat_store::{ChatStore, ComposerMode, SendOutcome};
pub use message::{Attachment, ChatMessage, ReplyTarget};
