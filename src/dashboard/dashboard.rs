use crate::dashboard::config::{DashboardState, KeyValueStore, LayoutPersistence};
use crate::dashboard::drag::{resolve_drop, DragController, DragPreview, GridGeometry};
use crate::dashboard::grid::{clamp_width, content_height, to_pixels, GridGaps};
use crate::dashboard::layout::{pack, Layout, LayoutEntry, WidgetId, WidgetWidths};
use crate::dashboard::widgets::WidgetRegistry;
use eframe::egui;

/// Pointer callbacks collected while rendering and applied afterwards.
#[derive(Debug, Clone, PartialEq)]
enum PointerEvent {
    Start(WidgetId, egui::Rect),
    Move(WidgetId, egui::Rect),
    End(WidgetId, egui::Rect),
    Cancel(WidgetId),
}

/// Widget grid with drag-to-rearrange and persisted arrangement.
pub struct Dashboard<S: KeyValueStore> {
    registry: WidgetRegistry,
    persistence: LayoutPersistence<S>,
    active: Vec<WidgetId>,
    widths: WidgetWidths,
    layout: Layout,
    drag: DragController,
    gaps: GridGaps,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Restore the dashboard from `store`, falling back to defaults for any
    /// record that is missing or corrupt.
    pub fn new(registry: WidgetRegistry, store: S) -> Self {
        let persistence = LayoutPersistence::new(store);
        let state = persistence.load(&registry);
        let mut dashboard = Self {
            widths: registry.widths(),
            registry,
            persistence,
            active: Vec::new(),
            layout: Layout::new(),
            drag: DragController::new(),
            gaps: GridGaps::default(),
        };
        dashboard.apply_state(state);
        dashboard
    }

    pub fn with_gaps(mut self, gaps: GridGaps) -> Self {
        self.gaps = gaps;
        self
    }

    fn apply_state(&mut self, state: DashboardState) {
        self.active = state.order;
        self.widths = self.registry.widths().with_overrides(state.widths);
        self.layout = state.layout;
        self.repack();
    }

    /// Full repack preferring current positions, then catalog defaults.
    fn repack(&mut self) {
        let previous = self.layout.with_fallback(&self.registry.default_layout());
        self.layout = pack(&self.active, &self.widths, &previous, None);
        tracing::debug!(widgets = self.layout.len(), rows = self.layout.rows(), "dashboard repacked");
    }

    fn persist(&mut self) {
        self.persistence
            .save(&self.active, &self.layout, self.widths.overrides());
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn active_ids(&self) -> &[WidgetId] {
        &self.active
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|a| a == id)
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn width_of(&self, id: &str) -> u32 {
        self.widths.width_of(id)
    }

    pub fn gaps(&self) -> GridGaps {
        self.gaps
    }

    /// Show or hide a widget.
    pub fn toggle_widget(&mut self, id: &str) {
        if !self.registry.contains(id) {
            tracing::debug!(widget = id, "ignoring toggle of unknown widget");
            return;
        }
        if self.is_active(id) {
            self.drag.cancel(id);
            self.active.retain(|a| a != id);
        } else {
            self.active.push(id.to_string());
        }
        self.repack();
        self.persist();
    }

    /// Change a widget's width, clamped to the grid. Returns the applied width.
    pub fn set_width(&mut self, id: &str, width: u32) -> Option<u32> {
        if !self.registry.contains(id) {
            tracing::debug!(widget = id, "ignoring width change of unknown widget");
            return None;
        }
        let width = clamp_width(width);
        if self.widths.overrides().get(id) == Some(&width) {
            return Some(width);
        }
        self.widths.set(id, width);
        self.repack();
        self.persist();
        Some(width)
    }

    /// Restore the default widget set, widths and arrangement.
    pub fn reset_layout(&mut self) {
        if let Some(id) = self.drag.dragging_id().map(str::to_string) {
            self.drag.cancel(&id);
        }
        let defaults = self.persistence.reset(&self.registry);
        self.active = defaults.order;
        self.widths = self.registry.widths();
        self.layout = defaults.layout;
        tracing::info!("dashboard layout reset");
    }

    pub fn is_arranging(&self) -> bool {
        self.drag.is_arranging()
    }

    pub fn set_arranging(&mut self, arranging: bool) {
        self.drag.set_arranging(arranging);
    }

    /// Record where the grid is drawn; needed to snap pointer positions.
    pub fn set_geometry(&mut self, container: egui::Rect, gaps: GridGaps) {
        self.gaps = gaps;
        self.drag.set_geometry(GridGeometry::new(container, gaps));
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        self.drag.preview()
    }

    pub fn dragging_id(&self) -> Option<&str> {
        self.drag.dragging_id()
    }

    pub fn on_drag_start(&mut self, id: &str, initial: egui::Rect) -> bool {
        if !self.is_active(id) {
            return false;
        }
        let width = self.widths.width_of(id);
        self.drag.start(id, width, initial)
    }

    pub fn on_drag_move(&mut self, id: &str, translated: egui::Rect) -> Option<DragPreview> {
        self.drag.update(id, translated).copied()
    }

    /// Drop the dragged widget. Returns `true` when the layout changed.
    pub fn on_drag_end(&mut self, id: &str, translated: egui::Rect) -> bool {
        let Some(target) = self.drag.finish(id, translated) else {
            return false;
        };
        if !self.is_active(id) {
            return false;
        }
        let next = resolve_drop(&self.layout, &self.active, &self.widths, id, target);
        if next == self.layout {
            return false;
        }
        self.layout = next;
        self.persist();
        true
    }

    pub fn on_drag_cancel(&mut self, id: &str) {
        self.drag.cancel(id);
    }

    fn dispatch(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Start(id, rect) => {
                self.on_drag_start(&id, rect);
            }
            PointerEvent::Move(id, rect) => {
                self.on_drag_move(&id, rect);
            }
            PointerEvent::End(id, rect) => {
                self.on_drag_end(&id, rect);
            }
            PointerEvent::Cancel(id) => self.on_drag_cancel(&id),
        }
    }

    /// Draw the grid and turn pointer input into drag callbacks.
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let arranging = self.drag.is_arranging();
        // A spare row to drop into while arranging.
        let rows = self.layout.rows().max(1).saturating_add(u32::from(arranging));
        let size = egui::vec2(ui.available_width(), content_height(rows, self.gaps));
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let geometry = GridGeometry::new(rect, self.gaps);
        self.drag.set_geometry(geometry);
        let origin = rect.min.to_vec2();

        if let Some(preview) = self.drag.preview() {
            let preview_rect = preview.rect.translate(origin);
            let visuals = ui.visuals();
            ui.painter().rect_filled(
                preview_rect,
                8.0,
                visuals.selection.bg_fill.gamma_multiply(0.25),
            );
            ui.painter()
                .rect_stroke(preview_rect, 8.0, visuals.selection.stroke);
        }

        let dragging = self.drag.dragging_id().map(str::to_string);
        let entries: Vec<(WidgetId, LayoutEntry)> = self
            .active
            .iter()
            .filter_map(|id| self.layout.get(id).map(|e| (id.clone(), *e)))
            .collect();
        let (press_origin, escape) =
            ui.input(|i| (i.pointer.press_origin(), i.key_pressed(egui::Key::Escape)));
        let mut events = Vec::new();
        let mut drag_seen = false;

        for (id, entry) in entries {
            let slot_rect = to_pixels(&entry, geometry.column_width(), self.gaps).translate(origin);
            let is_dragged = dragging.as_deref() == Some(id.as_str());

            if arranging {
                let response = ui.interact(
                    slot_rect,
                    ui.id().with(("dashboard-widget", &id)),
                    egui::Sense::drag(),
                );
                let pointer = response.interact_pointer_pos();
                let translated = match (press_origin, pointer) {
                    (Some(from), Some(to)) => slot_rect.translate(to - from),
                    _ => slot_rect,
                };
                if response.drag_stopped() && is_dragged {
                    drag_seen = true;
                    events.push(PointerEvent::End(id.clone(), translated));
                } else if response.dragged() {
                    if is_dragged {
                        drag_seen = true;
                        events.push(PointerEvent::Move(id.clone(), translated));
                    } else if let (Some(from), Some(to)) = (press_origin, pointer) {
                        if DragController::activation_reached(from, to) {
                            events.push(PointerEvent::Start(id.clone(), translated));
                        }
                    }
                }
                if is_dragged {
                    ui.painter().rect_stroke(
                        translated,
                        8.0,
                        ui.visuals().widgets.active.fg_stroke,
                    );
                }
            }

            self.slot_ui(ui, &id, slot_rect, arranging);
        }

        if let Some(id) = dragging {
            if escape || !drag_seen {
                events.push(PointerEvent::Cancel(id));
            }
        }
        for event in events {
            self.dispatch(event);
        }
    }

    fn slot_ui(&self, ui: &mut egui::Ui, id: &str, slot_rect: egui::Rect, arranging: bool) {
        let Some(widget) = self.registry.get(id) else {
            return;
        };
        let clip = slot_rect.intersect(ui.clip_rect());
        ui.allocate_ui_at_rect(slot_rect, |slot_ui| {
            slot_ui.set_clip_rect(clip);
            slot_ui.set_min_size(slot_rect.size());
            egui::Frame::group(slot_ui.style()).show(slot_ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if arranging {
                            ui.label("⠿");
                        }
                        ui.strong(&widget.title);
                        ui.weak(&widget.description);
                    });
                    ui.separator();
                    widget.render(ui);
                });
            });
        });
    }
}
