use arc_console::gui::ConsoleApp;
use arc_console::realm::spawn_user_fetch;
use arc_console::service::AppService;
use arc_console::logging;
use arc_console::settings::Settings;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging, settings.log_file.clone().map(Into::into));

    let service = AppService::new();
    let session = service.clone();
    let user_rx = match settings.realm_client() {
        Ok(client) => spawn_user_fetch(client),
        Err(e) => {
            tracing::error!("user info disabled: {e}");
            let (tx, rx) = std::sync::mpsc::channel();
            let _ = tx.send(Err(e));
            rx
        }
    };

    let (w, h) = settings.window_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([w, h])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Archive Console",
        native_options,
        Box::new(move |cc| {
            let app = ConsoleApp::new(&cc.egui_ctx, service, &settings).with_user_fetch(user_rx);
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))?;

    session.end_session();
    Ok(())
}
