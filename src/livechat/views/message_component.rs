use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::popover::Popover;
use gpui_component::{
    ActiveTheme, Sizable, WindowExt as _,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use std::sync::Arc;

use super::message_attachments::render_attachments;
use crate::livechat::models::ChatMessage;

/// Callback invoked by a message action menu entry.
pub type MessageAction = Arc<dyn Fn(&mut Window, &mut App)>;

/// Small round author badge: "U" for the local user, "S" for support.
pub fn render_avatar(is_user: bool, cx: &App) -> Div {
    div()
        .w_8()
        .h_8()
        .flex_shrink_0()
        .rounded_full()
        .bg(cx.theme().secondary)
        .flex()
        .items_center()
        .justify_center()
        .text_sm()
        .text_color(cx.theme().muted_foreground)
        .child(if is_user { "U" } else { "S" })
}

/// Render one message row: avatar, optional reply excerpt, the bubble with
/// its action menu, attachments below the bubble, and the caption line.
///
/// `on_edit` and `on_delete` are only supplied for the local user's own
/// messages; the menu additionally hides both entries for support messages.
pub fn render_message(
    msg: &ChatMessage,
    index: usize,
    on_reply: MessageAction,
    on_edit: Option<MessageAction>,
    on_delete: Option<MessageAction>,
    cx: &App,
) -> Div {
    let is_user = msg.is_user;

    let mut column = div().flex().flex_col().max_w(px(420.));
    column = if is_user {
        column.items_end()
    } else {
        column.items_start()
    };

    if let Some(reply) = &msg.reply_to {
        column = column.child(
            div()
                .rounded_lg()
                .px_3()
                .py_1()
                .mb_1()
                .text_xs()
                .bg(cx.theme().secondary)
                .border_l_2()
                .border_color(cx.theme().border)
                .child(
                    div()
                        .text_color(cx.theme().muted_foreground)
                        .child(format!(
                            "Replying to: {}",
                            if reply.is_user { "You" } else { "Support" }
                        )),
                )
                .child(
                    div()
                        .max_w(px(250.))
                        .overflow_hidden()
                        .child(reply.text.clone()),
                ),
        );
    }

    let bubble = div()
        .rounded_2xl()
        .px_4()
        .py_2()
        .text_sm()
        .map(|bubble| {
            if is_user {
                bubble
                    .bg(cx.theme().primary)
                    .text_color(cx.theme().primary_foreground)
            } else {
                bubble.bg(cx.theme().secondary)
            }
        })
        .child(msg.text.clone());

    let menu = render_action_menu(msg, index, on_reply, on_edit, on_delete, cx);

    let bubble_row = if is_user {
        h_flex().items_center().gap_1().child(menu).child(bubble)
    } else {
        h_flex().items_center().gap_1().child(bubble).child(menu)
    };
    column = column.child(bubble_row);

    if !msg.attachments.is_empty() {
        column = column.child(render_attachments(
            &msg.attachments,
            &format!("msg-{index}"),
            cx,
        ));
    }

    let caption = if msg.is_edited {
        format!("{} • edited", msg.timestamp)
    } else {
        msg.timestamp.clone()
    };
    column = column.child(
        div()
            .text_xs()
            .text_color(cx.theme().muted_foreground)
            .mt_1()
            .child(caption),
    );

    let row = div().flex().flex_row().gap_3().mb_4();
    if is_user {
        row.justify_end().child(column).child(render_avatar(true, cx))
    } else {
        row.child(render_avatar(false, cx)).child(column)
    }
}

/// The contextual action menu, anchored next to the bubble and dismissed on
/// any outside interaction.
fn render_action_menu(
    msg: &ChatMessage,
    index: usize,
    on_reply: MessageAction,
    on_edit: Option<MessageAction>,
    on_delete: Option<MessageAction>,
    _cx: &App,
) -> impl IntoElement {
    let is_user = msg.is_user;
    let copy_text = msg.text.clone();

    let trigger = Button::new(ElementId::Name(format!("message-actions-{index}").into()))
        .ghost()
        .xsmall()
        .label("⋯")
        .tooltip("Message actions");

    Popover::new(ElementId::Name(format!("message-menu-{index}").into()))
        .trigger(trigger)
        .appearance(false)
        .content(move |_, _window, cx| {
            let on_reply = on_reply.clone();
            let on_edit = on_edit.clone();
            let on_delete = on_delete.clone();
            let copy_text = copy_text.clone();

            div()
                .flex()
                .flex_col()
                .bg(cx.theme().background)
                .border_1()
                .border_color(cx.theme().border)
                .rounded_md()
                .shadow_md()
                .p_1()
                .min_w(px(160.0))
                .child(menu_item("Copy", cx).on_mouse_down(
                    MouseButton::Left,
                    move |_event, window, cx| {
                        cx.write_to_clipboard(ClipboardItem::new_string(copy_text.clone()));
                        window.push_notification("Message copied to clipboard", cx);
                    },
                ))
                .child(menu_item("Reply", cx).on_mouse_down(
                    MouseButton::Left,
                    move |_event, window, cx| {
                        on_reply(window, cx);
                    },
                ))
                .when(is_user, |menu| {
                    menu.when_some(on_edit, |menu, on_edit| {
                        menu.child(menu_item("Edit", cx).on_mouse_down(
                            MouseButton::Left,
                            move |_event, window, cx| {
                                on_edit(window, cx);
                            },
                        ))
                    })
                    .when_some(on_delete, |menu, on_delete| {
                        menu.child(
                            menu_item("Delete", cx)
                                .text_color(gpui_component::red_500())
                                .on_mouse_down(MouseButton::Left, move |_event, window, cx| {
                                    confirm_delete(on_delete.clone(), window, cx);
                                }),
                        )
                    })
                })
        })
}

fn menu_item(label: &'static str, cx: &App) -> Div {
    div()
        .px_3()
        .py_2()
        .rounded_sm()
        .cursor_pointer()
        .hover(|style| style.bg(cx.theme().secondary))
        .text_sm()
        .child(label)
}

/// Deletion is destructive, so it goes through a confirmation dialog; only
/// a confirmed dialog invokes the delete callback.
fn confirm_delete(on_delete: MessageAction, window: &mut Window, cx: &mut App) {
    window.open_dialog(cx, move |dialog, _, _| {
        let on_delete = on_delete.clone();

        dialog
            .title("Delete Message")
            .overlay(true)
            .keyboard(true)
            .close_button(true)
            .overlay_closable(true)
            .w(px(380.))
            .child(
                v_flex()
                    .gap_3()
                    .p_4()
                    .child(
                        div()
                            .text_sm()
                            .child("This message will be removed from the conversation. This cannot be undone."),
                    )
                    .child(
                        h_flex()
                            .gap_2()
                            .justify_end()
                            .pt_2()
                            .child(Button::new("delete-cancel").label("Cancel").on_click(
                                move |_, window, cx| {
                                    window.close_dialog(cx);
                                },
                            ))
                            .child(
                                Button::new("delete-confirm").primary().label("Delete").on_click(
                                    move |_, window, cx| {
                                        window.close_dialog(cx);
                                        on_delete(window, cx);
                                    },
                                ),
                            ),
                    ),
            )
    });
}
