pub mod error;
pub mod in_memory_repository;
pub mod json_message_repository;
pub mod message_repository;

pub use error::{RepositoryError, RepositoryResult};
pub use in_memory_repository::InMemoryMessageRepository;
pub use json_message_repository::JsonMessageRepository;
pub use message_repository::MessageRepository;
