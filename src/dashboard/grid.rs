use crate::dashboard::layout::LayoutEntry;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// Number of columns on the dashboard grid.
pub const GRID_COLUMNS: u32 = 12;

/// Height of every grid row in points.
pub const ROW_HEIGHT: f32 = 260.0;

fn default_gap() -> f32 {
    16.0
}

/// Spacing between grid columns and rows in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGaps {
    #[serde(default = "default_gap")]
    pub column: f32,
    #[serde(default = "default_gap")]
    pub row: f32,
}

impl Default for GridGaps {
    fn default() -> Self {
        Self {
            column: default_gap(),
            row: default_gap(),
        }
    }
}

/// A 1-based grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

/// Clamp a widget width to the grid.
pub fn clamp_width(width: u32) -> u32 {
    width.clamp(1, GRID_COLUMNS)
}

/// Clamp a 1-based column so a widget of `width` never hangs off the right edge.
pub fn clamp_column(col: i64, width: u32) -> u32 {
    let max_col = (GRID_COLUMNS - clamp_width(width) + 1) as i64;
    col.clamp(1, max_col) as u32
}

/// Width of one column for a container of `container_width` points.
pub fn column_width(container_width: f32, gaps: GridGaps) -> f32 {
    let cols = GRID_COLUMNS as f32;
    ((container_width - gaps.column * (cols - 1.0)) / cols).max(0.0)
}

/// Convert an absolute point to the cell a widget of `width` would snap to.
pub fn to_cell(point: egui::Pos2, container: egui::Rect, gaps: GridGaps, width: u32) -> Cell {
    let col_w = column_width(container.width(), gaps);
    let rel = point - container.min;

    let col_pitch = col_w + gaps.column;
    let raw_col = if col_pitch > 0.0 {
        ((rel.x + gaps.column / 2.0) / col_pitch).floor() as i64 + 1
    } else {
        1
    };
    let raw_row = ((rel.y + gaps.row / 2.0) / (ROW_HEIGHT + gaps.row)).floor() as i64 + 1;

    Cell {
        row: raw_row.clamp(1, u32::MAX as i64) as u32,
        col: clamp_column(raw_col, width),
    }
}

/// Snap a dragged element by the middle of its first column and its vertical
/// centre, so the element lands on the nearest cell under its left edge.
pub fn snap_rect(rect: egui::Rect, container: egui::Rect, gaps: GridGaps, width: u32) -> Cell {
    let col_w = column_width(container.width(), gaps);
    let anchor = egui::pos2(rect.left() + col_w / 2.0, rect.center().y);
    to_cell(anchor, container, gaps, width)
}

/// Container-relative pixel bounds of a layout entry.
pub fn to_pixels(entry: &LayoutEntry, column_width: f32, gaps: GridGaps) -> egui::Rect {
    let width = clamp_width(entry.width);
    let left = (entry.col.max(1) - 1) as f32 * (column_width + gaps.column);
    let top = (entry.row.max(1) - 1) as f32 * (ROW_HEIGHT + gaps.row);
    let w = width as f32 * column_width + (width - 1) as f32 * gaps.column;
    egui::Rect::from_min_size(egui::pos2(left, top), egui::vec2(w, ROW_HEIGHT))
}

/// Total height needed to show `rows` grid rows.
pub fn content_height(rows: u32, gaps: GridGaps) -> f32 {
    if rows == 0 {
        return 0.0;
    }
    rows as f32 * ROW_HEIGHT + (rows - 1) as f32 * gaps.row
}
