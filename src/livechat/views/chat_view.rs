use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::ActiveTheme;
use gpui_component::input::{InputEvent, InputState};
use gpui_component::scroll::ScrollableElement;
use std::sync::Arc;

use super::chat_input::{ChatInput, ChatInputState};
use super::message_component::{MessageAction, render_message};
use super::typing_indicator::TypingIndicator;
use crate::livechat::controllers::{ChatApp, GlobalChatApp};
use crate::livechat::models::{ChatMessage, ChatStore, ReplyTarget};
use crate::livechat::services::AttachmentStore;

/// Main chat view: the scrollable message list above the composer.
pub struct ChatView {
    chat_input_state: Entity<ChatInputState>,
    scroll_handle: ScrollHandle,
}

impl ChatView {
    pub fn new(
        attachment_store: Arc<AttachmentStore>,
        window: &mut Window,
        cx: &mut App,
    ) -> Self {
        let input = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Type your message...")
                .clean_on_escape()
                .auto_grow(1, 8)
        });

        let chat_input_state = cx.new(|_cx| ChatInputState::new(input.clone(), attachment_store));
        let scroll_handle = ScrollHandle::new();

        // Subscribe to input events to handle Enter key
        let state_for_enter = chat_input_state.clone();
        cx.subscribe(&input, move |_input_state, event: &InputEvent, cx| {
            if let InputEvent::PressEnter { secondary } = event {
                // Only send on plain Enter (not Shift+Enter)
                if !secondary {
                    state_for_enter.update(cx, |state, cx| {
                        state.send_message(cx);
                    });
                }
            }
        })
        .detach();

        // Focus the input immediately after creation
        chat_input_state.update(cx, |state, cx| {
            state.input.update(cx, |input, cx| {
                input.focus(window, cx);
            });
        });

        Self {
            chat_input_state,
            scroll_handle,
        }
    }

    /// Get the chat input state entity (for wiring callbacks)
    pub fn chat_input_state(&self) -> &Entity<ChatInputState> {
        &self.chat_input_state
    }

    /// Scroll to the bottom of the message list
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_handle.set_offset(point(px(0.0), px(-f32::MAX)));
    }

    fn message_callbacks(
        &self,
        msg: &ChatMessage,
        app: Option<WeakEntity<ChatApp>>,
    ) -> (MessageAction, Option<MessageAction>, Option<MessageAction>) {
        let on_reply: MessageAction = {
            let app = app.clone();
            let target = ReplyTarget {
                id: msg.id.clone(),
                text: msg.text.clone(),
                is_user: msg.is_user,
            };
            Arc::new(move |_window, cx| {
                if let Some(app) = app.as_ref().and_then(|app| app.upgrade()) {
                    let target = target.clone();
                    app.update(cx, |app, cx| {
                        app.request_reply(target, cx);
                    });
                }
            })
        };

        // Edit and delete exist only for the local user's own messages.
        if !msg.is_user {
            return (on_reply, None, None);
        }

        let on_edit: MessageAction = {
            let app = app.clone();
            let id = msg.id.clone();
            Arc::new(move |_window, cx| {
                if let Some(app) = app.as_ref().and_then(|app| app.upgrade()) {
                    let id = id.clone();
                    app.update(cx, |app, cx| {
                        app.request_edit(&id, cx);
                    });
                }
            })
        };

        let on_delete: MessageAction = {
            let id = msg.id.clone();
            Arc::new(move |_window, cx| {
                if let Some(app) = app.as_ref().and_then(|app| app.upgrade()) {
                    let id = id.clone();
                    app.update(cx, |app, cx| {
                        app.delete_message(&id, cx);
                    });
                }
            })
        };

        (on_reply, Some(on_edit), Some(on_delete))
    }
}

impl Render for ChatView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Apply deferred composer mutations (clear / seed / focus)
        self.chat_input_state.update(cx, |state, cx| {
            state.apply_pending(window, cx);
        });

        let (messages, is_typing) = {
            let store = cx.global::<ChatStore>();
            (store.messages().to_vec(), store.is_typing())
        };
        let app = cx
            .try_global::<GlobalChatApp>()
            .and_then(|global| global.entity.clone());

        div()
            .flex_1()
            .h_full()
            .w_full()
            .flex()
            .flex_col()
            .bg(cx.theme().background)
            .overflow_hidden()
            .child(
                // Message list - scrollable area
                div()
                    .flex_1()
                    .min_h_0()
                    .relative()
                    .child(
                        div()
                            .id("chat-messages")
                            .track_scroll(&self.scroll_handle)
                            .overflow_scroll()
                            .size_full()
                            .child(
                                div()
                                    .p_4()
                                    .w_full()
                                    .max_w(px(640.))
                                    .mx_auto()
                                    .flex()
                                    .flex_col()
                                    .children(messages.iter().enumerate().map(
                                        |(index, msg)| {
                                            let (on_reply, on_edit, on_delete) =
                                                self.message_callbacks(msg, app.clone());
                                            render_message(
                                                msg, index, on_reply, on_edit, on_delete, cx,
                                            )
                                        },
                                    ))
                                    .when(is_typing, |list| list.child(TypingIndicator)),
                            ),
                    )
                    .vertical_scrollbar(&self.scroll_handle),
            )
            .child(
                // Chat input - fixed at bottom
                div()
                    .flex_shrink_0()
                    .p_4()
                    .w_full()
                    .max_w(px(640.))
                    .mx_auto()
                    .child(ChatInput::new(self.chat_input_state.clone())),
            )
    }
}
