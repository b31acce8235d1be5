use gpui::*;
use gpui_component::{ActiveTheme as _, Root};

use super::chat_header::ChatHeader;
use crate::livechat::controllers::ChatApp;

impl Render for ChatApp {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let dialog_layer = Root::render_dialog_layer(window, cx);

        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(cx.theme().background)
            .child(ChatHeader)
            .child(self.chat_view.clone())
            .children(dialog_layer)
    }
}
