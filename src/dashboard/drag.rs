use crate::dashboard::grid::{
    clamp_column, column_width, snap_rect, to_pixels, Cell, GridGaps, GRID_COLUMNS,
};
use crate::dashboard::layout::{
    pack, place_into, ForcedPlacement, Layout, LayoutEntry, WidgetId, WidgetWidths,
};
use eframe::egui;

/// Pointer travel required before a press turns into a drag.
pub const DRAG_ACTIVATION_DISTANCE: f32 = 4.0;

/// Rows below its old row a displaced widget may settle in before a full repack.
const DISPLACED_ROW_SEARCH: u32 = 3;

/// Measured grid container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Absolute bounds of the grid, scroll offset already applied.
    pub container: egui::Rect,
    pub gaps: GridGaps,
}

impl GridGeometry {
    pub fn new(container: egui::Rect, gaps: GridGaps) -> Self {
        Self { container, gaps }
    }

    pub fn column_width(&self) -> f32 {
        column_width(self.container.width(), self.gaps)
    }

    pub fn snap(&self, rect: egui::Rect, width: u32) -> Cell {
        snap_rect(rect, self.container, self.gaps, width)
    }

    /// Container-relative rectangle covered by a widget of `width` at `cell`.
    pub fn cell_rect(&self, cell: Cell, width: u32) -> egui::Rect {
        let entry = LayoutEntry {
            row: cell.row,
            col: clamp_column(cell.col as i64, width),
            width,
        };
        to_pixels(&entry, self.column_width(), self.gaps)
    }
}

/// Snapped drop target shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub cell: Cell,
    /// Container-relative overlay bounds.
    pub rect: egui::Rect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        id: WidgetId,
        width: u32,
        preview: Option<DragPreview>,
    },
}

/// Pointer-drag life cycle for rearranging widgets.
///
/// Never touches the committed layout; [`DragController::finish`] only reports
/// where the widget was dropped.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    geometry: Option<GridGeometry>,
    arranging: bool,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_geometry(&mut self, geometry: GridGeometry) {
        self.geometry = Some(geometry);
    }

    pub fn is_arranging(&self) -> bool {
        self.arranging
    }

    /// Enable or disable arrange mode. Leaving it abandons any drag.
    pub fn set_arranging(&mut self, arranging: bool) {
        self.arranging = arranging;
        if !arranging {
            self.state = DragState::Idle;
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn dragging_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { id, .. } => Some(id.as_str()),
            DragState::Idle => None,
        }
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        match &self.state {
            DragState::Dragging { preview, .. } => preview.as_ref(),
            DragState::Idle => None,
        }
    }

    pub fn activation_reached(origin: egui::Pos2, current: egui::Pos2) -> bool {
        origin.distance(current) >= DRAG_ACTIVATION_DISTANCE
    }

    fn snap_preview(&self, rect: egui::Rect, width: u32) -> Option<DragPreview> {
        let geometry = self.geometry?;
        let cell = geometry.snap(rect, width);
        Some(DragPreview {
            cell,
            rect: geometry.cell_rect(cell, width),
        })
    }

    /// Begin dragging `id`. Ignored outside arrange mode.
    pub fn start(&mut self, id: &str, width: u32, initial: egui::Rect) -> bool {
        if !self.arranging {
            return false;
        }
        let preview = self.snap_preview(initial, width);
        tracing::debug!(widget = id, "drag started");
        self.state = DragState::Dragging {
            id: id.to_string(),
            width,
            preview,
        };
        true
    }

    /// Track the dragged element and refresh the preview.
    pub fn update(&mut self, id: &str, translated: egui::Rect) -> Option<&DragPreview> {
        let width = match &self.state {
            DragState::Dragging { id: active, width, .. } if active == id => *width,
            _ => return None,
        };
        let next = self.snap_preview(translated, width);
        if let DragState::Dragging { preview, .. } = &mut self.state {
            *preview = next;
        }
        self.preview()
    }

    /// End the drag and report the snapped drop cell.
    pub fn finish(&mut self, id: &str, translated: egui::Rect) -> Option<Cell> {
        let width = match &self.state {
            DragState::Dragging { id: active, width, .. } if active == id => *width,
            _ => return None,
        };
        self.state = DragState::Idle;
        let cell = self.geometry.map(|g| g.snap(translated, width));
        tracing::debug!(widget = id, ?cell, "drag finished");
        cell
    }

    pub fn cancel(&mut self, id: &str) {
        if self.dragging_id() == Some(id) {
            tracing::debug!(widget = id, "drag cancelled");
            self.state = DragState::Idle;
        }
    }
}

fn nearby_slot(layout: &Layout, id: &str, from_row: u32, width: u32) -> Option<LayoutEntry> {
    for row in from_row..=from_row.saturating_add(DISPLACED_ROW_SEARCH) {
        for col in 1..=GRID_COLUMNS - width + 1 {
            let candidate = LayoutEntry { row, col, width };
            if layout.overlapping(&candidate, id).is_empty() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Commit a drop of `id` at `target`, relocating whatever it lands on.
pub fn resolve_drop(
    layout: &Layout,
    active_ids: &[WidgetId],
    widths: &WidgetWidths,
    id: &str,
    target: Cell,
) -> Layout {
    let width = widths.width_of(id);
    let dropped = LayoutEntry {
        row: target.row.max(1),
        col: clamp_column(target.col as i64, width),
        width,
    };

    let mut next = layout.clone();
    let displaced: Vec<(WidgetId, LayoutEntry)> = next
        .overlapping(&dropped, id)
        .into_iter()
        .filter_map(|other| next.get(&other).copied().map(|entry| (other, entry)))
        .collect();
    for (other, _) in &displaced {
        next.remove(other);
    }
    next.insert(id, dropped);

    for (other, original) in displaced {
        let other_width = widths.width_of(&other);
        let entry = nearby_slot(&next, &other, original.row, other_width)
            .unwrap_or_else(|| repack_displaced(&next, active_ids, widths, &other, id, &dropped, original));
        tracing::debug!(widget = %other, row = entry.row, col = entry.col, "displaced widget moved");
        next.insert(other, entry);
    }

    next
}

fn repack_displaced(
    partial: &Layout,
    active_ids: &[WidgetId],
    widths: &WidgetWidths,
    displaced: &str,
    dragged: &str,
    dropped: &LayoutEntry,
    original: LayoutEntry,
) -> LayoutEntry {
    let mut ids: Vec<WidgetId> = active_ids
        .iter()
        .filter(|a| partial.contains(a))
        .cloned()
        .collect();
    ids.push(displaced.to_string());
    let forced = ForcedPlacement {
        id: dragged.to_string(),
        row: dropped.row,
        col: dropped.col,
    };
    let packed = pack(&ids, widths, partial, Some(&forced));
    match packed.get(displaced) {
        Some(entry) if partial.overlapping(entry, displaced).is_empty() => *entry,
        _ => place_into(partial, displaced, (original.row, original.col), widths.width_of(displaced)),
    }
}
