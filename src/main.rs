use gpui::*;
use gpui_component::*;
use tracing::info;

mod livechat;

use livechat::ChatApp;

actions!(livechat, [Quit]);

fn register_actions(cx: &mut App) {
    cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);
    cx.on_action(|_: &Quit, cx: &mut App| {
        cx.quit();
    });
}

fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting LiveChat application");

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        cx.activate(true);

        // Initialize the component library (theme, input, popover, dialogs)
        init(cx);

        register_actions(cx);

        let options = WindowOptions {
            titlebar: Some(TitlebarOptions {
                title: Some("Live Chat".into()),
                ..Default::default()
            }),
            window_bounds: Some(WindowBounds::Windowed(Bounds {
                size: size(px(520.0), px(760.0)),
                origin: point(px(0.0), px(0.0)),
            })),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let view = cx.new(|cx| ChatApp::new(window, cx));

            cx.new(|cx| Root::new(view, window, cx))
        })
        .expect("Failed to open main window");
    });
}
