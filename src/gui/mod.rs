use crate::dashboard::{Dashboard, KeyValueStore, WidgetId, GRID_COLUMNS};
use crate::settings::Settings;
use eframe::egui;

/// Desktop shell around the dashboard grid.
pub struct DashboardApp<S: KeyValueStore> {
    dashboard: Dashboard<S>,
    settings_path: String,
    window_size: Option<(f32, f32)>,
}

impl<S: KeyValueStore> DashboardApp<S> {
    pub fn new(dashboard: Dashboard<S>, settings_path: impl Into<String>) -> Self {
        Self {
            dashboard,
            settings_path: settings_path.into(),
            window_size: None,
        }
    }

    pub fn window_size(&self) -> Option<(f32, f32)> {
        self.window_size
    }

    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.window_size = Some((width, height));
    }

    /// Write the last seen window size back to the settings file, leaving the
    /// other settings as they are on disk.
    pub fn save_window_size(&self) -> anyhow::Result<()> {
        let Some(size) = self.window_size else {
            return Ok(());
        };
        let mut settings = Settings::load(&self.settings_path)?;
        settings.window_size = Some(size);
        settings.save(&self.settings_path)
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let catalog: Vec<(WidgetId, String)> = self
            .dashboard
            .registry()
            .iter()
            .map(|w| (w.id.clone(), w.title.clone()))
            .collect();

        ui.horizontal_wrapped(|ui| {
            ui.label("Widgets:");
            for (id, title) in &catalog {
                let active = self.dashboard.is_active(id);
                if ui.selectable_label(active, title).clicked() {
                    self.dashboard.toggle_widget(id);
                }
            }
            ui.separator();
            let mut arranging = self.dashboard.is_arranging();
            if ui
                .toggle_value(&mut arranging, "Arrange mode")
                .on_hover_text("Drag widgets to snap them anywhere on the grid")
                .changed()
            {
                self.dashboard.set_arranging(arranging);
            }
            if ui.button("Reset layout").clicked() {
                self.dashboard.reset_layout();
            }
        });

        if !self.dashboard.is_arranging() {
            return;
        }
        ui.horizontal_wrapped(|ui| {
            ui.label("Widths:");
            for (id, title) in &catalog {
                if !self.dashboard.is_active(id) {
                    continue;
                }
                let mut width = self.dashboard.width_of(id);
                ui.label(title);
                if ui
                    .add(egui::DragValue::new(&mut width).clamp_range(1..=GRID_COLUMNS))
                    .changed()
                {
                    self.dashboard.set_width(id, width);
                }
            }
        });
    }
}

impl<S: KeyValueStore> eframe::App for DashboardApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.set_window_size(rect.width(), rect.height());
        }
        egui::TopBottomPanel::top("dashboard_toolbar").show(ctx, |ui| {
            self.toolbar(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.dashboard.ui(ui);
                });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.save_window_size() {
            tracing::warn!(path = %self.settings_path, error = %e, "failed to save window size");
        }
    }
}
