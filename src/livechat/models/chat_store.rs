use gpui::Global;

use super::message::{Attachment, ChatMessage, ReplyTarget, display_timestamp};

/// Greeting shown when no saved conversation exists.
const SEED_GREETING: &str = "Hello! How can I help you today?";

/// Auto-reply sent when the user's message was not a reply.
const AUTO_REPLY_PLAIN: &str = "Thanks for your message! Our team will get back to you shortly.";

/// Longest slice of the reply target quoted back by the auto-reply.
const REPLY_EXCERPT_LEN: usize = 30;

/// What the composer is currently doing. The variants are mutually
/// exclusive by construction: entering one replaces the other.
#[derive(Clone, Debug, PartialEq)]
pub enum ComposerMode {
    Idle,
    Editing(ChatMessage),
    Replying(ReplyTarget),
}

/// Result of a send, so the caller knows whether to schedule an auto-reply.
#[derive(Clone, Debug, PartialEq)]
pub enum SendOutcome {
    /// An existing message was rewritten in place.
    Edited { id: String },
    /// A new user message was appended.
    Sent { reply_to: Option<ReplyTarget> },
}

/// Global store for the conversation: the ordered message list, the
/// composer mode, and the typing flag.
pub struct ChatStore {
    messages: Vec<ChatMessage>,
    composer_mode: ComposerMode,
    is_typing: bool,
}

impl Global for ChatStore {}

impl ChatStore {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            composer_mode: ComposerMode::Idle,
            is_typing: false,
        }
    }

    /// A store holding only the seed greeting.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.messages.push(ChatMessage {
            id: "1".to_string(),
            text: SEED_GREETING.to_string(),
            is_user: false,
            timestamp: display_timestamp(),
            is_edited: false,
            attachments: Vec::new(),
            reply_to: None,
        });
        store
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Replace the message list wholesale (used when restoring from disk).
    pub fn replace_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    pub fn composer_mode(&self) -> &ComposerMode {
        &self.composer_mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.composer_mode, ComposerMode::Editing(_))
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// Enter edit mode for the message with `id`. Returns the message text
    /// to seed the composer with, or `None` if no such message exists.
    pub fn request_edit(&mut self, id: &str) -> Option<String> {
        let message = self.messages.iter().find(|m| m.id == id)?.clone();
        let text = message.text.clone();
        self.composer_mode = ComposerMode::Editing(message);
        Some(text)
    }

    /// Enter reply mode targeting the given snapshot.
    pub fn request_reply(&mut self, target: ReplyTarget) {
        self.composer_mode = ComposerMode::Replying(target);
    }

    pub fn cancel_edit(&mut self) {
        if matches!(self.composer_mode, ComposerMode::Editing(_)) {
            self.composer_mode = ComposerMode::Idle;
        }
    }

    pub fn cancel_reply(&mut self) {
        if matches!(self.composer_mode, ComposerMode::Replying(_)) {
            self.composer_mode = ComposerMode::Idle;
        }
    }

    /// Apply a composer submit.
    ///
    /// In edit mode the target message is rewritten in place and
    /// `attachments` are ignored. Otherwise a new user message is appended
    /// (carrying the reply target if one was active) and the typing flag is
    /// raised until the matching auto-reply lands.
    pub fn send(&mut self, text: String, attachments: Vec<Attachment>) -> SendOutcome {
        match std::mem::replace(&mut self.composer_mode, ComposerMode::Idle) {
            ComposerMode::Editing(target) => {
                if let Some(message) = self.messages.iter_mut().find(|m| m.id == target.id) {
                    message.text = text;
                    message.is_edited = true;
                    message.timestamp = display_timestamp();
                }
                SendOutcome::Edited { id: target.id }
            }
            mode => {
                let reply_to = match mode {
                    ComposerMode::Replying(target) => Some(target),
                    _ => None,
                };
                self.messages
                    .push(ChatMessage::user(text, attachments, reply_to.clone()));
                self.is_typing = true;
                SendOutcome::Sent { reply_to }
            }
        }
    }

    /// Append the synthesized support reply and drop the typing flag, as a
    /// single mutation.
    pub fn push_auto_reply(&mut self, reply_to: Option<&ReplyTarget>) {
        let text = match reply_to {
            Some(target) => format!(
                "Thanks for your reply regarding \"{}\". Our team will get back to you shortly.",
                excerpt(&target.text, REPLY_EXCERPT_LEN)
            ),
            None => AUTO_REPLY_PLAIN.to_string(),
        };
        self.is_typing = false;
        self.messages.push(ChatMessage::support(text));
    }

    /// Remove the message with `id`. Other messages are left untouched,
    /// including any `reply_to` still pointing at the removed id.
    pub fn delete_message(&mut self, id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

/// First `max` characters of `text`, with a trailing ellipsis when truncated.
fn excerpt(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut head: String = text.chars().take(max).collect();
        head.push_str("...");
        head
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_target(id: &str, text: &str) -> ReplyTarget {
        ReplyTarget {
            id: id.to_string(),
            text: text.to_string(),
            is_user: false,
        }
    }

    #[test]
    fn seeded_store_holds_one_greeting() {
        let store = ChatStore::seeded();
        assert_eq!(store.messages().len(), 1);
        assert!(!store.messages()[0].is_user);
        assert_eq!(store.messages()[0].id, "1");
        assert_eq!(store.composer_mode(), &ComposerMode::Idle);
        assert!(!store.is_typing());
    }

    #[test]
    fn send_appends_user_message_and_raises_typing() {
        let mut store = ChatStore::seeded();
        let outcome = store.send("hi".to_string(), Vec::new());

        assert_eq!(outcome, SendOutcome::Sent { reply_to: None });
        assert_eq!(store.messages().len(), 2);
        let last = store.messages().last().unwrap();
        assert!(last.is_user);
        assert_eq!(last.text, "hi");
        assert!(store.is_typing());
        assert_eq!(store.composer_mode(), &ComposerMode::Idle);
    }

    #[test]
    fn send_while_replying_attaches_target_and_clears_mode() {
        let mut store = ChatStore::seeded();
        store.request_reply(reply_target("1", "Hello! How can I help you today?"));

        let outcome = store.send("replying".to_string(), Vec::new());

        match outcome {
            SendOutcome::Sent { reply_to: Some(target) } => assert_eq!(target.id, "1"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let last = store.messages().last().unwrap();
        assert_eq!(last.reply_to.as_ref().map(|r| r.id.as_str()), Some("1"));
        assert_eq!(store.composer_mode(), &ComposerMode::Idle);
    }

    #[test]
    fn send_while_editing_rewrites_in_place() {
        let mut store = ChatStore::seeded();
        store.send("original".to_string(), Vec::new());
        let id = store.messages().last().unwrap().id.clone();
        let count = store.messages().len();

        let seed = store.request_edit(&id);
        assert_eq!(seed.as_deref(), Some("original"));

        let outcome = store.send(
            "corrected".to_string(),
            vec![Attachment {
                name: "ignored.png".to_string(),
                url: "/tmp/ignored.png".to_string(),
            }],
        );

        assert_eq!(outcome, SendOutcome::Edited { id: id.clone() });
        assert_eq!(store.messages().len(), count);
        let edited = store.messages().iter().find(|m| m.id == id).unwrap();
        assert_eq!(edited.text, "corrected");
        assert!(edited.is_edited);
        assert!(edited.attachments.is_empty(), "edit ignores attachments");
        assert_eq!(store.composer_mode(), &ComposerMode::Idle);
    }

    #[test]
    fn request_edit_unknown_id_is_a_no_op() {
        let mut store = ChatStore::seeded();
        assert_eq!(store.request_edit("missing"), None);
        assert_eq!(store.composer_mode(), &ComposerMode::Idle);
    }

    #[test]
    fn edit_and_reply_modes_are_mutually_exclusive() {
        let mut store = ChatStore::seeded();
        store.send("mine".to_string(), Vec::new());
        let id = store.messages().last().unwrap().id.clone();

        store.request_reply(reply_target("1", "Hello!"));
        store.request_edit(&id);
        assert!(matches!(store.composer_mode(), ComposerMode::Editing(_)));

        store.request_reply(reply_target("1", "Hello!"));
        assert!(matches!(store.composer_mode(), ComposerMode::Replying(_)));
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut store = ChatStore::seeded();
        store.request_reply(reply_target("1", "Hello!"));
        store.cancel_reply();
        assert_eq!(store.composer_mode(), &ComposerMode::Idle);

        store.send("mine".to_string(), Vec::new());
        let id = store.messages().last().unwrap().id.clone();
        store.request_edit(&id);
        store.cancel_edit();
        assert_eq!(store.composer_mode(), &ComposerMode::Idle);
    }

    #[test]
    fn auto_reply_lowers_typing_and_appends_support_message() {
        let mut store = ChatStore::seeded();
        store.send("hi".to_string(), Vec::new());
        assert!(store.is_typing());

        store.push_auto_reply(None);

        assert!(!store.is_typing());
        assert_eq!(store.messages().len(), 3);
        let last = store.messages().last().unwrap();
        assert!(!last.is_user);
        assert_eq!(last.text, AUTO_REPLY_PLAIN);
    }

    #[test]
    fn auto_reply_quotes_truncated_target() {
        let mut store = ChatStore::seeded();
        let long = "a".repeat(40);
        store.send("reply".to_string(), Vec::new());
        store.push_auto_reply(Some(&reply_target("1", &long)));

        let last = store.messages().last().unwrap();
        let expected_quote = format!("{}...", "a".repeat(30));
        assert!(
            last.text.contains(&expected_quote),
            "auto-reply should quote 30 chars: {}",
            last.text
        );
    }

    #[test]
    fn delete_removes_exactly_one_and_leaves_dangling_replies() {
        let mut store = ChatStore::seeded();
        store.send("first".to_string(), Vec::new());
        let first_id = store.messages().last().unwrap().id.clone();
        store.request_reply(reply_target(&first_id, "first"));
        store.send("second".to_string(), Vec::new());

        assert!(store.delete_message(&first_id));
        assert!(!store.delete_message(&first_id), "second delete finds nothing");

        assert_eq!(store.messages().len(), 2);
        let second = store.messages().last().unwrap();
        assert_eq!(
            second.reply_to.as_ref().map(|r| r.id.as_str()),
            Some(first_id.as_str()),
            "reply reference is left dangling on purpose"
        );
    }

    #[test]
    fn seeded_send_scenario() {
        let mut store = ChatStore::seeded();
        store.send("hi".to_string(), Vec::new());

        assert_eq!(store.messages().len(), 2);
        assert!(!store.messages()[0].is_user);
        assert!(store.messages()[1].is_user);
        assert!(store.is_typing());

        store.push_auto_reply(None);
        assert_eq!(store.messages().len(), 3);
        assert!(!store.messages()[2].is_user);
        assert!(!store.is_typing());
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("short", 30), "short");
        assert_eq!(excerpt(&"x".repeat(30), 30), "x".repeat(30));
        assert_eq!(excerpt(&"x".repeat(31), 30), format!("{}...", "x".repeat(30)));
        // Multi-byte characters must not split.
        let emoji = "😀".repeat(35);
        let cut = excerpt(&emoji, 30);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 33);
    }
}
