use crate::dashboard::grid::{clamp_column, clamp_width};
use crate::dashboard::layout::{Layout, LayoutEntry, WidgetId, WidgetWidths};
use eframe::egui;
use std::collections::BTreeMap;
use std::sync::Arc;

mod catalog;

pub use catalog::{business_widgets, DEFAULT_ORDER};

/// Draws the body of a widget. The grid never inspects what it draws.
pub type RenderFn = Arc<dyn Fn(&mut egui::Ui) + Send + Sync>;

/// Catalog entry describing one dashboard widget.
#[derive(Clone)]
pub struct WidgetDescriptor {
    pub id: WidgetId,
    pub title: String,
    pub description: String,
    pub default_width: u32,
    /// Cell used when the widget has never been placed before.
    pub default_position: Option<(u32, u32)>,
    render: RenderFn,
}

impl std::fmt::Debug for WidgetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("default_width", &self.default_width)
            .field("default_position", &self.default_position)
            .finish_non_exhaustive()
    }
}

impl WidgetDescriptor {
    pub fn new(id: &str, title: &str, description: &str, default_width: u32) -> Self {
        let text = description.to_string();
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            default_width: clamp_width(default_width),
            default_position: None,
            render: Arc::new(move |ui: &mut egui::Ui| {
                ui.weak(&text);
            }),
        }
    }

    pub fn with_default_position(mut self, row: u32, col: u32) -> Self {
        self.default_position = Some((row.max(1), clamp_column(col as i64, self.default_width)));
        self
    }

    pub fn with_renderer(mut self, render: impl Fn(&mut egui::Ui) + Send + Sync + 'static) -> Self {
        self.render = Arc::new(render);
        self
    }

    pub fn render(&self, ui: &mut egui::Ui) {
        (self.render)(ui)
    }
}

/// Ordered widget catalog.
#[derive(Clone, Debug, Default)]
pub struct WidgetRegistry {
    widgets: Vec<WidgetDescriptor>,
    default_order: Vec<WidgetId>,
}

impl WidgetRegistry {
    /// Registry holding the sales console widgets.
    pub fn with_defaults() -> Self {
        let mut reg = Self::default();
        for widget in business_widgets() {
            reg.register(widget);
        }
        reg.set_default_order(DEFAULT_ORDER.iter().map(|id| id.to_string()).collect());
        reg
    }

    /// Add a widget, replacing any descriptor with the same id.
    pub fn register(&mut self, widget: WidgetDescriptor) {
        if let Some(existing) = self.widgets.iter_mut().find(|w| w.id == widget.id) {
            *existing = widget;
        } else {
            self.widgets.push(widget);
        }
    }

    /// Widgets shown on a fresh dashboard. Unknown ids are dropped.
    pub fn set_default_order(&mut self, order: Vec<WidgetId>) {
        self.default_order = order.into_iter().filter(|id| self.contains(id)).collect();
    }

    pub fn default_order(&self) -> Vec<WidgetId> {
        if self.default_order.is_empty() {
            self.ids().cloned().collect()
        } else {
            self.default_order.clone()
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.widgets.iter().any(|w| w.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WidgetDescriptor> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetDescriptor> {
        self.widgets.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &WidgetId> {
        self.widgets.iter().map(|w| &w.id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Width table seeded with every widget's default.
    pub fn widths(&self) -> WidgetWidths {
        WidgetWidths::new(
            self.widgets
                .iter()
                .map(|w| (w.id.clone(), w.default_width))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    /// Default cells of widgets that declare one.
    pub fn default_layout(&self) -> Layout {
        self.widgets
            .iter()
            .filter_map(|w| {
                let (row, col) = w.default_position?;
                Some((
                    w.id.clone(),
                    LayoutEntry {
                        row,
                        col,
                        width: w.default_width,
                    },
                ))
            })
            .collect()
    }
}
