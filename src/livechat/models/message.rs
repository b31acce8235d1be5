use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A file attached to a message. `url` points into the app-managed
/// attachment store, not at the user's original file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// Snapshot of the message being replied to, taken at send time.
/// Never re-validated against the live list; it may outlive its target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub id: String,
    pub text: String,
    pub is_user: bool,
}

/// A single chat message as displayed and as persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    pub timestamp: String,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub reply_to: Option<ReplyTarget>,
}

impl ChatMessage {
    /// Create a message authored by the local user.
    pub fn user(text: String, attachments: Vec<Attachment>, reply_to: Option<ReplyTarget>) -> Self {
        Self {
            id: next_message_id(),
            text,
            is_user: true,
            timestamp: display_timestamp(),
            is_edited: false,
            attachments,
            reply_to,
        }
    }

    /// Create a support-side message.
    pub fn support(text: String) -> Self {
        Self {
            // Offset by one so a reply scheduled in the same millisecond as
            // another message still gets a distinct id.
            id: next_message_id_offset(1),
            text,
            is_user: false,
            timestamp: display_timestamp(),
            is_edited: false,
            attachments: Vec::new(),
            reply_to: None,
        }
    }
}

/// Time-based message id token (Unix milliseconds).
pub fn next_message_id() -> String {
    next_message_id_offset(0)
}

fn next_message_id_offset(offset: u128) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    (millis + offset).to_string()
}

/// Wall-clock display string for message captions.
pub fn display_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
