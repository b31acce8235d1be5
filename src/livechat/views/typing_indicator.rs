use gpui::*;
use gpui_component::ActiveTheme;
use std::time::Duration;

use super::message_component::render_avatar;

/// Animated three-dot placeholder shown while the support reply is pending.
/// Purely decorative; holds no state.
#[derive(IntoElement)]
pub struct TypingIndicator;

impl RenderOnce for TypingIndicator {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .gap_3()
            .mb_4()
            .child(render_avatar(false, cx))
            .child(
                div().flex().items_end().child(
                    div()
                        .rounded_2xl()
                        .px_4()
                        .py_2()
                        .bg(cx.theme().secondary)
                        .flex()
                        .items_center()
                        .justify_center()
                        .gap_1()
                        .child(dot(0, cx))
                        .child(dot(1, cx))
                        .child(dot(2, cx)),
                ),
            )
    }
}

fn dot(index: usize, cx: &App) -> impl IntoElement {
    let color = cx.theme().muted_foreground.opacity(0.5);

    div()
        .w_2()
        .h_2()
        .rounded_full()
        .bg(color)
        .with_animation(
            ("typing-dot", index),
            // Slightly different periods keep the dots out of phase.
            Animation::new(Duration::from_millis(600 + index as u64 * 150))
                .repeat()
                .with_easing(pulsating_between(0.3, 1.0)),
            |el, delta| el.opacity(delta),
        )
}
