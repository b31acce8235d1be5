use gpui::*;
use gpui_component::ActiveTheme;
use std::path::PathBuf;

use super::attachment_kind::{AttachmentKind, classify};
use crate::livechat::models::Attachment;

/// Render a message's attachments as a vertical strip. Sits below the
/// bubble, outside of it.
pub fn render_attachments(attachments: &[Attachment], id_prefix: &str, cx: &App) -> Div {
    div()
        .flex()
        .flex_col()
        .gap_2()
        .mt_1()
        .children(
            attachments
                .iter()
                .enumerate()
                .map(|(index, file)| render_attachment(file, &format!("{id_prefix}-att-{index}"), cx)),
        )
}

fn render_attachment(file: &Attachment, id: &str, cx: &App) -> Div {
    match classify(&file.name) {
        AttachmentKind::Image => render_image(file, cx),
        AttachmentKind::Video => render_video(file, id, cx),
        AttachmentKind::File => render_file_row(file, cx),
    }
}

fn render_image(file: &Attachment, cx: &App) -> Div {
    div()
        .flex()
        .flex_col()
        .child(
            div()
                .w(px(240.))
                .h(px(180.))
                .rounded_lg()
                .overflow_hidden()
                .child(
                    img(PathBuf::from(&file.url))
                        .w_full()
                        .h_full()
                        .object_fit(gpui::ObjectFit::Cover),
                ),
        )
        .child(caption(&file.name, cx))
}

fn render_video(file: &Attachment, _id: &str, cx: &App) -> Div {
    // No in-app playback; a labelled chip stands in for the player.
    div()
        .flex()
        .flex_col()
        .child(
            div()
                .w(px(240.))
                .h(px(72.))
                .rounded_lg()
                .bg(cx.theme().secondary)
                .flex()
                .items_center()
                .justify_center()
                .text_color(cx.theme().muted_foreground)
                .child("▶"),
        )
        .child(caption(&file.name, cx))
}

fn render_file_row(file: &Attachment, cx: &App) -> Div {
    div()
        .flex()
        .flex_row()
        .items_center()
        .gap_2()
        .p_2()
        .rounded_md()
        .bg(cx.theme().secondary)
        .text_xs()
        .child(
            div()
                .px_1()
                .rounded_sm()
                .bg(cx.theme().background)
                .text_color(cx.theme().muted_foreground)
                .child("FILE"),
        )
        .child(
            div()
                .max_w(px(200.))
                .overflow_hidden()
                .child(file.name.clone()),
        )
}

fn caption(name: &str, cx: &App) -> Div {
    div()
        .text_xs()
        .text_color(cx.theme().muted_foreground)
        .mt_1()
        .max_w(px(240.))
        .overflow_hidden()
        .child(name.to_string())
}
