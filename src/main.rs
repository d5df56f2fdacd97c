use console_dashboard::dashboard::{Dashboard, JsonFileStore, WidgetRegistry};
use console_dashboard::gui::DashboardApp;
use console_dashboard::logging;
use console_dashboard::settings::Settings;
use eframe::egui;

const SETTINGS_FILE: &str = "settings.json";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging);

    let store = JsonFileStore::open(settings.store_path())?;
    tracing::info!(path = %store.path().display(), "opened dashboard store");

    let mut dashboard =
        Dashboard::new(WidgetRegistry::with_defaults(), store).with_gaps(settings.gaps());
    dashboard.set_arranging(settings.start_in_arrange_mode);

    let (width, height) = settings.window_size.unwrap_or((1280.0, 860.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Console Dashboard",
        native_options,
        Box::new(move |_cc| Box::new(DashboardApp::new(dashboard, SETTINGS_FILE))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
