pub mod config;
pub mod dashboard;
pub mod drag;
pub mod grid;
pub mod layout;
pub mod widgets;

pub use config::{DashboardState, JsonFileStore, KeyValueStore, LayoutPersistence, MemoryStore};
pub use dashboard::Dashboard;
pub use drag::{resolve_drop, DragController, DragPreview, DragState, GridGeometry};
pub use grid::{Cell, GridGaps, GRID_COLUMNS, ROW_HEIGHT};
pub use layout::{pack, ForcedPlacement, Layout, LayoutEntry, WidgetId, WidgetWidths};
pub use widgets::{WidgetDescriptor, WidgetRegistry};
