use gpui::*;
use gpui_component::{
    ActiveTheme, Icon, IconName, Sizable, Theme, ThemeMode,
    button::{Button, ButtonVariants},
    h_flex,
};

/// Window header: app title on the left, light/dark toggle on the right.
#[derive(IntoElement)]
pub struct ChatHeader;

impl RenderOnce for ChatHeader {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let is_dark = cx.theme().mode.is_dark();

        h_flex()
            .w_full()
            .flex_shrink_0()
            .items_center()
            .justify_between()
            .py_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .child(
                h_flex()
                    .items_center()
                    .gap_2()
                    .pl_4()
                    .child(Icon::new(IconName::CircleUser))
                    .child(div().text_lg().child("Live Chat")),
            )
            .child(
                div().pr_3().child(
                    Button::new("theme-toggle")
                        .ghost()
                        .small()
                        .label(if is_dark { "Light" } else { "Dark" })
                        .on_click(move |_event, _window, cx| {
                            let mode = if is_dark {
                                ThemeMode::Light
                            } else {
                                ThemeMode::Dark
                            };
                            Theme::global_mut(cx).mode = mode;
                            Theme::change(mode, None, cx);
                            cx.refresh_windows();
                        }),
                ),
            )
    }
}
