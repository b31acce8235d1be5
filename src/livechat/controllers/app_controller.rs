use gpui::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::livechat::models::{ChatStore, ReplyTarget, SendOutcome};
use crate::livechat::repositories::{JsonMessageRepository, MessageRepository};
use crate::livechat::services::AttachmentStore;
use crate::livechat::views::ChatView;

/// Delay before the simulated support reply lands, long enough to show the
/// typing animation.
const AUTO_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Global state to hold the main ChatApp entity
#[derive(Default)]
pub struct GlobalChatApp {
    pub entity: Option<WeakEntity<ChatApp>>,
}

impl Global for GlobalChatApp {}

/// Owns the conversation: wires the composer into the message store,
/// schedules the simulated support reply, and mirrors every mutation to
/// disk.
pub struct ChatApp {
    pub chat_view: Entity<ChatView>,
    message_repo: Arc<dyn MessageRepository>,
    attachment_store: Arc<AttachmentStore>,
}

impl ChatApp {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        // Initialize the global conversation store if not already done
        if !cx.has_global::<ChatStore>() {
            cx.set_global(ChatStore::seeded());
        }

        let message_repo: Arc<dyn MessageRepository> = Arc::new(
            JsonMessageRepository::new().expect("Failed to create message repository"),
        );
        let attachment_store =
            Arc::new(AttachmentStore::new().expect("Failed to create attachment store"));

        let chat_view = cx.new(|cx| ChatView::new(attachment_store.clone(), window, cx));

        let app = Self {
            chat_view,
            message_repo,
            attachment_store,
        };

        // Store entity in global state for later access
        let app_weak = cx.entity().downgrade();
        if !cx.has_global::<GlobalChatApp>() {
            cx.set_global(GlobalChatApp {
                entity: Some(app_weak),
            });
        } else {
            cx.update_global::<GlobalChatApp, _>(|global, _| {
                global.entity = Some(app_weak);
            });
        }

        app.setup_callbacks(cx);
        app.load_messages(cx);

        app
    }

    /// Set up the composer callbacks
    fn setup_callbacks(&self, cx: &mut Context<Self>) {
        let app_entity = cx.entity();

        self.chat_view.update(cx, |view, cx| {
            let input_state = view.chat_input_state().clone();

            let app_for_send = app_entity.clone();
            let app_for_cancel_edit = app_entity.clone();
            let app_for_cancel_reply = app_entity.clone();

            input_state.update(cx, |state, _cx| {
                state.set_on_send(move |message, files, cx| {
                    let app = app_for_send.clone();
                    app.update(cx, |app, cx| {
                        app.send_message(message, files, cx);
                    });
                });

                state.set_on_cancel_edit(move |cx| {
                    let app = app_for_cancel_edit.clone();
                    app.update(cx, |app, cx| {
                        app.cancel_edit(cx);
                    });
                });

                state.set_on_cancel_reply(move |cx| {
                    let app = app_for_cancel_reply.clone();
                    app.update(cx, |app, cx| {
                        app.cancel_reply(cx);
                    });
                });
            });
        });
    }

    /// Restore the saved conversation, if one parses. A missing or corrupt
    /// snapshot keeps the seed greeting.
    fn load_messages(&self, cx: &mut Context<Self>) {
        let repo = self.message_repo.clone();
        let chat_view = self.chat_view.clone();

        cx.spawn(async move |_weak, cx| {
            match repo.load().await {
                Ok(Some(messages)) => {
                    info!(count = messages.len(), "Restored saved conversation");
                    cx.update_global::<ChatStore, _>(|store, _| {
                        store.replace_messages(messages);
                    })
                    .ok();
                    chat_view
                        .update(cx, |view, cx| {
                            view.scroll_to_bottom();
                            cx.notify();
                        })
                        .ok();
                }
                Ok(None) => {
                    info!("No saved conversation, starting from the greeting");
                }
                Err(err) => {
                    warn!(error = %err, "Failed to load saved conversation");
                }
            }
        })
        .detach();
    }

    /// Apply a composer submit: rewrite the message under edit, or append a
    /// new user message and schedule the simulated reply.
    pub fn send_message(&mut self, text: String, files: Vec<PathBuf>, cx: &mut Context<Self>) {
        debug!(message = %text, file_count = files.len(), "Sending message");

        // Files are ignored when editing, so skip the import entirely.
        let editing = cx.global::<ChatStore>().is_editing();
        let mut attachments = Vec::new();
        if !editing {
            for path in &files {
                match self.attachment_store.import(path) {
                    Ok(attachment) => attachments.push(attachment),
                    Err(err) => {
                        warn!(?path, error = %err, "Failed to import attachment, skipping");
                    }
                }
            }
        }

        let outcome = cx.update_global::<ChatStore, _>(|store, _| store.send(text, attachments));

        match outcome {
            SendOutcome::Edited { id } => {
                debug!(id = %id, "Message edited in place");
            }
            SendOutcome::Sent { reply_to } => {
                self.schedule_auto_reply(reply_to, cx);
            }
        }

        self.persist_messages(cx);
        self.refresh_chat(cx);
    }

    /// One-shot timer for the simulated support reply. Timers are never
    /// cancelled; overlapping sends each produce their own reply.
    fn schedule_auto_reply(&self, reply_to: Option<ReplyTarget>, cx: &mut Context<Self>) {
        cx.spawn(async move |weak, cx| {
            cx.background_executor().timer(AUTO_REPLY_DELAY).await;

            let _ = weak.update(cx, |app, cx| {
                cx.update_global::<ChatStore, _>(|store, _| {
                    store.push_auto_reply(reply_to.as_ref());
                });
                app.persist_messages(cx);
                app.refresh_chat(cx);
            });
        })
        .detach();
    }

    /// Enter edit mode for `id`, seeding the composer with its text.
    pub fn request_edit(&mut self, id: &str, cx: &mut Context<Self>) {
        let seed = cx.update_global::<ChatStore, _>(|store, _| store.request_edit(id));

        match seed {
            Some(text) => {
                self.chat_view.update(cx, |view, cx| {
                    view.chat_input_state().update(cx, |state, cx| {
                        state.begin_editing(text);
                        cx.notify();
                    });
                });
                cx.notify();
            }
            None => {
                warn!(id = %id, "Edit requested for unknown message");
            }
        }
    }

    /// Enter reply mode targeting the given snapshot.
    pub fn request_reply(&mut self, target: ReplyTarget, cx: &mut Context<Self>) {
        cx.update_global::<ChatStore, _>(|store, _| store.request_reply(target.clone()));

        self.chat_view.update(cx, |view, cx| {
            view.chat_input_state().update(cx, |state, cx| {
                state.begin_replying(target);
                cx.notify();
            });
        });
        cx.notify();
    }

    pub fn cancel_edit(&mut self, cx: &mut Context<Self>) {
        cx.update_global::<ChatStore, _>(|store, _| store.cancel_edit());
        cx.notify();
    }

    pub fn cancel_reply(&mut self, cx: &mut Context<Self>) {
        cx.update_global::<ChatStore, _>(|store, _| store.cancel_reply());
        cx.notify();
    }

    /// Remove the message with `id`. Replies pointing at it keep their
    /// snapshot; no cascading repair happens.
    pub fn delete_message(&mut self, id: &str, cx: &mut Context<Self>) {
        let removed = cx.update_global::<ChatStore, _>(|store, _| store.delete_message(id));

        if removed {
            self.persist_messages(cx);
            self.refresh_chat(cx);
        } else {
            warn!(id = %id, "Delete requested for unknown message");
        }
    }

    /// Mirror the current message list to disk. The snapshot is taken on
    /// the UI thread; the write happens on a background task.
    fn persist_messages(&self, cx: &mut Context<Self>) {
        let repo = self.message_repo.clone();
        let snapshot = cx.global::<ChatStore>().messages().to_vec();

        cx.spawn(async move |_weak, _cx| {
            if let Err(err) = repo.save(snapshot).await {
                warn!(error = %err, "Failed to persist conversation");
            }
        })
        .detach();
    }

    fn refresh_chat(&self, cx: &mut Context<Self>) {
        self.chat_view.update(cx, |view, cx| {
            view.scroll_to_bottom();
            cx.notify();
        });
        cx.notify();
    }
}
