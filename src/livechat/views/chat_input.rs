use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::ActiveTheme;
use gpui_component::button::Button;
use gpui_component::input::{Input, InputState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::attachment_kind::{AttachmentKind, classify};
use crate::livechat::models::ReplyTarget;
use crate::livechat::services::{AttachmentStore, PreviewHandle};

/// Callback type for sending messages (with the selected files)
pub type SendMessageCallback =
    Arc<dyn Fn(String, Vec<PathBuf>, &mut Context<ChatInputState>) + Send + Sync>;

/// Callback type for leaving edit or reply mode from the composer
pub type CancelCallback = Arc<dyn Fn(&mut Context<ChatInputState>) + Send + Sync>;

/// Submit is allowed iff the trimmed draft is non-empty or files are pending.
pub fn can_send(text: &str, pending_file_count: usize) -> bool {
    !text.trim().is_empty() || pending_file_count > 0
}

/// State for the chat input component
pub struct ChatInputState {
    pub input: Entity<InputState>,
    pending_files: Vec<PathBuf>,
    previews: Vec<Option<PreviewHandle>>,
    attachment_store: Arc<AttachmentStore>,
    should_clear: bool,
    pending_seed: Option<String>,
    pending_focus: bool,
    editing: bool,
    replying_to: Option<ReplyTarget>,
    on_send: Option<SendMessageCallback>,
    on_cancel_edit: Option<CancelCallback>,
    on_cancel_reply: Option<CancelCallback>,
}

impl ChatInputState {
    pub fn new(input: Entity<InputState>, attachment_store: Arc<AttachmentStore>) -> Self {
        Self {
            input,
            pending_files: Vec::new(),
            previews: Vec::new(),
            attachment_store,
            should_clear: false,
            pending_seed: None,
            pending_focus: false,
            editing: false,
            replying_to: None,
            on_send: None,
            on_cancel_edit: None,
            on_cancel_reply: None,
        }
    }

    /// Set the callback for sending messages
    pub fn set_on_send<F>(&mut self, callback: F)
    where
        F: Fn(String, Vec<PathBuf>, &mut Context<ChatInputState>) + Send + Sync + 'static,
    {
        self.on_send = Some(Arc::new(callback));
    }

    pub fn set_on_cancel_edit<F>(&mut self, callback: F)
    where
        F: Fn(&mut Context<ChatInputState>) + Send + Sync + 'static,
    {
        self.on_cancel_edit = Some(Arc::new(callback));
    }

    pub fn set_on_cancel_reply<F>(&mut self, callback: F)
    where
        F: Fn(&mut Context<ChatInputState>) + Send + Sync + 'static,
    {
        self.on_cancel_reply = Some(Arc::new(callback));
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn replying_to(&self) -> Option<&ReplyTarget> {
        self.replying_to.as_ref()
    }

    /// Seed the draft with the message under edit and focus the input.
    pub fn begin_editing(&mut self, seed: String) {
        self.editing = true;
        self.replying_to = None;
        self.pending_seed = Some(seed);
        self.pending_focus = true;
    }

    /// Leave edit mode, clearing the seeded draft.
    pub fn end_editing(&mut self) {
        if self.editing {
            self.editing = false;
            self.pending_seed = Some(String::new());
        }
    }

    /// Show the reply banner for `target` and focus the input.
    pub fn begin_replying(&mut self, target: ReplyTarget) {
        self.replying_to = Some(target);
        self.editing = false;
        self.pending_focus = true;
    }

    pub fn end_replying(&mut self) {
        self.replying_to = None;
    }

    /// Replace the pending file selection. Every preview of the previous
    /// selection is released before the new batch is acquired.
    pub fn set_files(&mut self, paths: Vec<PathBuf>, _cx: &mut Context<Self>) {
        self.release_previews();
        self.pending_files.clear();

        for path in paths {
            let preview = match self.attachment_store.preview(&path) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    warn!(?path, error = %err, "Failed to snapshot preview");
                    None
                }
            };
            self.pending_files.push(path);
            self.previews.push(preview);
        }
    }

    /// Remove one pending file, releasing its preview.
    pub fn remove_file(&mut self, index: usize) {
        if index < self.pending_files.len() {
            self.pending_files.remove(index);
            if let Some(Some(mut preview)) = self.previews.get_mut(index).map(Option::take) {
                preview.release();
            }
            self.previews.remove(index);
        }
    }

    /// (file name, preview path if one exists) per pending file.
    pub fn file_chips(&self) -> Vec<(String, Option<PathBuf>)> {
        self.pending_files
            .iter()
            .zip(self.previews.iter())
            .map(|(path, preview)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (name, preview.as_ref().map(|p| p.path().to_path_buf()))
            })
            .collect()
    }

    fn release_previews(&mut self) {
        for preview in self.previews.iter_mut().flatten() {
            preview.release();
        }
        self.previews.clear();
    }

    fn clear_selection(&mut self) {
        self.release_previews();
        self.pending_files.clear();
    }

    /// Send the current draft. A draft that fails the send predicate is
    /// ignored entirely.
    pub fn send_message(&mut self, cx: &mut Context<Self>) {
        let message = self.input.read(cx).text().to_string();
        let files = self.pending_files.clone();

        debug!(message = %message, file_count = files.len(), "send_message called");

        if !can_send(&message, files.len()) {
            debug!("Draft empty and no files pending, not sending");
            return;
        }

        if let Some(on_send) = &self.on_send {
            on_send(message, files, cx);
        } else {
            warn!("on_send callback is not set");
        }

        self.should_clear = true;
        self.clear_selection();

        if self.editing {
            self.editing = false;
            if let Some(on_cancel_edit) = self.on_cancel_edit.clone() {
                on_cancel_edit(cx);
            }
        }

        cx.notify();
    }

    pub fn cancel_edit_clicked(&mut self, cx: &mut Context<Self>) {
        self.end_editing();
        if let Some(on_cancel_edit) = self.on_cancel_edit.clone() {
            on_cancel_edit(cx);
        }
        cx.notify();
    }

    pub fn cancel_reply_clicked(&mut self, cx: &mut Context<Self>) {
        self.end_replying();
        if let Some(on_cancel_reply) = self.on_cancel_reply.clone() {
            on_cancel_reply(cx);
        }
        cx.notify();
    }

    /// Apply deferred input mutations that need a window: clearing after a
    /// send, seeding the draft on entering edit mode, and focus requests.
    pub fn apply_pending(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.should_clear {
            self.input.update(cx, |input, cx| {
                input.set_value("", window, cx);
            });
            self.should_clear = false;
        }

        if let Some(seed) = self.pending_seed.take() {
            self.input.update(cx, |input, cx| {
                input.set_value(seed, window, cx);
            });
        }

        if self.pending_focus {
            self.input.update(cx, |input, cx| {
                input.focus(window, cx);
            });
            self.pending_focus = false;
        }
    }
}

impl Drop for ChatInputState {
    fn drop(&mut self) {
        // Previews release themselves on drop; doing it here keeps the
        // release path explicit.
        self.release_previews();
    }
}

fn render_file_chip(
    name: &str,
    preview: Option<PathBuf>,
    index: usize,
    state: &Entity<ChatInputState>,
    cx: &App,
) -> impl IntoElement + use<> {
    let state = state.clone();
    let kind = classify(name);
    let image_preview = match kind {
        AttachmentKind::Image => preview,
        _ => None,
    };

    div()
        .relative()
        .w_16()
        .h_16()
        .flex()
        .items_center()
        .justify_center()
        .overflow_hidden()
        .rounded_md()
        .bg(cx.theme().background)
        .when_some(image_preview, |chip, preview_path| {
            chip.child(
                img(preview_path)
                    .w_full()
                    .h_full()
                    .object_fit(gpui::ObjectFit::Cover),
            )
        })
        .when(kind == AttachmentKind::Video, |chip| {
            chip.child(
                div()
                    .text_color(cx.theme().muted_foreground)
                    .child("▶"),
            )
        })
        .when(kind == AttachmentKind::File, |chip| {
            chip.child(
                div()
                    .px_1()
                    .text_xs()
                    .text_color(cx.theme().muted_foreground)
                    .overflow_hidden()
                    .child(name.to_string()),
            )
        })
        .child(
            div()
                .absolute()
                .top_0()
                .right_0()
                .w_5()
                .h_5()
                .bg(cx.theme().muted_foreground)
                .rounded_full()
                .flex()
                .items_center()
                .justify_center()
                .cursor_pointer()
                .text_color(cx.theme().background)
                .text_xs()
                .child("×")
                .on_mouse_down(MouseButton::Left, move |_event, _window, cx| {
                    state.update(cx, |state, cx| {
                        state.remove_file(index);
                        cx.notify();
                    });
                }),
        )
}

/// Chat input component for rendering
#[derive(IntoElement)]
pub struct ChatInput {
    state: Entity<ChatInputState>,
}

impl ChatInput {
    pub fn new(state: Entity<ChatInputState>) -> Self {
        Self { state }
    }
}

impl RenderOnce for ChatInput {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let state_for_send = self.state.clone();
        let state_for_attach = self.state.clone();
        let state_for_cancel_edit = self.state.clone();
        let state_for_cancel_reply = self.state.clone();
        let input_entity = self.state.read(cx).input.clone();

        let is_editing = self.state.read(cx).is_editing();
        let replying_to = self.state.read(cx).replying_to().cloned();
        let chips = self.state.read(cx).file_chips();
        let draft = self.state.read(cx).input.read(cx).text().to_string();
        let sendable = can_send(&draft, chips.len());

        div()
            .border_1()
            .px_3()
            .py_3()
            .rounded_2xl()
            .border_color(cx.theme().border)
            .bg(cx.theme().secondary)
            .when_some(replying_to, |composer, target| {
                composer.child(
                    div()
                        .flex()
                        .flex_row()
                        .items_center()
                        .justify_between()
                        .mb_2()
                        .p_2()
                        .rounded_md()
                        .bg(cx.theme().background)
                        .text_sm()
                        .child(
                            div()
                                .overflow_hidden()
                                .text_color(cx.theme().muted_foreground)
                                .child(format!(
                                    "Replying to {}: \"{}\"",
                                    if target.is_user { "you" } else { "support" },
                                    target.text
                                )),
                        )
                        .child(
                            div()
                                .ml_2()
                                .cursor_pointer()
                                .text_color(cx.theme().muted_foreground)
                                .child("×")
                                .on_mouse_down(MouseButton::Left, move |_event, _window, cx| {
                                    state_for_cancel_reply.update(cx, |state, cx| {
                                        state.cancel_reply_clicked(cx);
                                    });
                                }),
                        ),
                )
            })
            .when(is_editing, |composer| {
                composer.child(
                    div().flex().flex_row().justify_end().mb_2().child(
                        div()
                            .text_sm()
                            .cursor_pointer()
                            .text_color(cx.theme().muted_foreground)
                            .child("Cancel Edit")
                            .on_mouse_down(MouseButton::Left, move |_event, _window, cx| {
                                state_for_cancel_edit.update(cx, |state, cx| {
                                    state.cancel_edit_clicked(cx);
                                });
                            }),
                    ),
                )
            })
            .when(!chips.is_empty(), |composer| {
                composer.child(
                    div()
                        .flex()
                        .flex_row()
                        .gap_2()
                        .p_2()
                        .mb_2()
                        .rounded_lg()
                        .children(chips.into_iter().enumerate().map(
                            |(index, (name, preview))| {
                                render_file_chip(&name, preview, index, &self.state, cx)
                            },
                        )),
                )
            })
            .child(
                div()
                    .flex()
                    .flex_row()
                    .child(Input::new(&input_entity).appearance(false)),
            )
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .gap_2()
                    .child(
                        Button::new("attach")
                            .label("+")
                            .tooltip("Attach files")
                            .on_click(move |_event, _window, cx| {
                                let state = state_for_attach.clone();
                                cx.spawn(async move |cx| {
                                    let receiver = cx
                                        .update(|cx| {
                                            cx.prompt_for_paths(PathPromptOptions {
                                                files: true,
                                                directories: false,
                                                multiple: true,
                                                prompt: Some("Select Files".into()),
                                            })
                                        })
                                        .ok()?;

                                    if let Ok(Some(paths)) = receiver.await.ok()? {
                                        state
                                            .update(cx, |state, cx| {
                                                state.set_files(paths, cx);
                                                cx.notify();
                                            })
                                            .ok()?;
                                    }
                                    Some(())
                                })
                                .detach();
                            }),
                    )
                    .child(div().flex_grow())
                    .child(
                        // Send button, disabled while the draft is unsendable
                        div()
                            .px_3()
                            .py_1()
                            .rounded_sm()
                            .text_color(rgb(0xffffff))
                            .child("Send")
                            .map(|button| {
                                if sendable {
                                    button
                                        .bg(rgb(0xffa033))
                                        .cursor_pointer()
                                        .hover(|style| style.bg(rgb(0xff8c1a)))
                                        .on_mouse_down(
                                            MouseButton::Left,
                                            move |_event, _window, cx| {
                                                state_for_send.update(cx, |state, cx| {
                                                    state.send_message(cx);
                                                });
                                            },
                                        )
                                } else {
                                    button.bg(rgb(0xffd9a8))
                                }
                            }),
                    ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::can_send;

    #[test]
    fn can_send_requires_text_or_files() {
        assert!(!can_send("", 0));
        assert!(!can_send("   ", 0));
        assert!(!can_send("\n\t", 0));
        assert!(can_send("hi", 0));
        assert!(can_send("  hi  ", 0));
        assert!(can_send("", 1));
        assert!(can_send("   ", 2));
    }
}
