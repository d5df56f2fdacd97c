use console_dashboard::dashboard::{
    pack, resolve_drop, Cell, Dashboard, ForcedPlacement, GridGaps, GridGeometry, Layout,
    LayoutEntry, MemoryStore, WidgetDescriptor, WidgetId, WidgetRegistry, WidgetWidths,
};
use eframe::egui;

fn entry(row: u32, col: u32, width: u32) -> LayoutEntry {
    LayoutEntry { row, col, width }
}

fn abc_registry() -> WidgetRegistry {
    let mut reg = WidgetRegistry::default();
    reg.register(WidgetDescriptor::new("a", "A", "eight wide", 8));
    reg.register(WidgetDescriptor::new("b", "B", "four wide", 4));
    reg.register(WidgetDescriptor::new("c", "C", "six wide", 6));
    reg
}

fn ids(list: &[&str]) -> Vec<WidgetId> {
    list.iter().map(|s| s.to_string()).collect()
}

fn container() -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(20.0, 40.0), egui::vec2(896.0, 3000.0))
}

#[test]
fn new_widgets_pack_in_catalog_order() {
    let reg = abc_registry();
    let layout = pack(&ids(&["a", "b", "c"]), &reg.widths(), &Layout::new(), None);
    assert_eq!(layout.get("a"), Some(&entry(1, 1, 8)));
    assert_eq!(layout.get("b"), Some(&entry(1, 9, 4)));
    assert_eq!(layout.get("c"), Some(&entry(2, 1, 6)));
}

#[test]
fn packing_again_is_a_no_op() {
    let reg = abc_registry();
    let active = ids(&["a", "b", "c"]);
    let first = pack(&active, &reg.widths(), &Layout::new(), None);
    let second = pack(&active, &reg.widths(), &first, None);
    assert_eq!(first, second);
}

#[test]
fn forced_cell_is_honoured_when_free() {
    let reg = abc_registry();
    let active = ids(&["a", "b", "c"]);
    let previous = pack(&active, &reg.widths(), &Layout::new(), None);
    let forced = ForcedPlacement {
        id: "c".into(),
        row: 3,
        col: 4,
    };
    let layout = pack(&active, &reg.widths(), &previous, Some(&forced));
    assert_eq!(layout.get("c"), Some(&entry(3, 4, 6)));
    assert_eq!(layout.get("a"), previous.get("a"));
    assert_eq!(layout.get("b"), previous.get("b"));
}

#[test]
fn dropping_c_on_the_first_row_displaces_a_and_b() {
    let reg = abc_registry();
    let active = ids(&["a", "b", "c"]);
    let layout = pack(&active, &reg.widths(), &Layout::new(), None);
    let next = resolve_drop(&layout, &active, &reg.widths(), "c", Cell { row: 1, col: 5 });
    assert_eq!(next.get("c"), Some(&entry(1, 5, 6)));
    assert!(next.first_overlap().is_none());
    for (_, e) in next.iter() {
        assert!(e.is_in_bounds());
    }
    assert_eq!(next.len(), 3);
}

#[test]
fn narrow_drop_on_wide_widget_relocates_it() {
    let mut widths = WidgetWidths::default();
    widths.set("a", 4);
    widths.set("b", 6);
    let layout: Layout = [
        ("a".to_string(), entry(3, 1, 4)),
        ("b".to_string(), entry(2, 2, 6)),
    ]
    .into_iter()
    .collect();
    let next = resolve_drop(&layout, &ids(&["a", "b"]), &widths, "a", Cell { row: 2, col: 3 });
    assert_eq!(next.get("a"), Some(&entry(2, 3, 4)));
    let b = next.get("b").copied().unwrap();
    assert_eq!(b.width, 6);
    assert!(!b.overlaps(&entry(2, 3, 4)));
    assert!(next.first_overlap().is_none());
}

#[test]
fn full_drag_cycle_through_pointer_callbacks() {
    let mut dashboard = Dashboard::new(abc_registry(), MemoryStore::new());
    dashboard.set_geometry(container(), GridGaps::default());
    assert_eq!(dashboard.active_ids(), ids(&["a", "b", "c"]).as_slice());
    assert_eq!(dashboard.layout().get("c"), Some(&entry(2, 1, 6)));

    let geometry = GridGeometry::new(container(), GridGaps::default());
    let at = |cell: Cell| geometry.cell_rect(cell, 6).translate(container().min.to_vec2());

    // static outside arrange mode
    assert!(!dashboard.on_drag_start("c", at(Cell { row: 2, col: 1 })));

    dashboard.set_arranging(true);
    assert!(dashboard.on_drag_start("c", at(Cell { row: 2, col: 1 })));
    assert_eq!(dashboard.dragging_id(), Some("c"));
    let preview = dashboard.on_drag_move("c", at(Cell { row: 4, col: 7 })).unwrap();
    assert_eq!(preview.cell, Cell { row: 4, col: 7 });

    assert!(dashboard.on_drag_end("c", at(Cell { row: 4, col: 7 })));
    assert_eq!(dashboard.layout().get("c"), Some(&entry(4, 7, 6)));
    assert_eq!(dashboard.layout().get("a"), Some(&entry(1, 1, 8)));
    assert_eq!(dashboard.layout().get("b"), Some(&entry(1, 9, 4)));
    assert!(dashboard.dragging_id().is_none());
}

#[test]
fn dropping_on_own_cell_changes_nothing() {
    let mut dashboard = Dashboard::new(abc_registry(), MemoryStore::new());
    dashboard.set_geometry(container(), GridGaps::default());
    dashboard.set_arranging(true);
    let geometry = GridGeometry::new(container(), GridGaps::default());
    let home = geometry
        .cell_rect(Cell { row: 1, col: 9 }, 4)
        .translate(container().min.to_vec2());
    dashboard.on_drag_start("b", home);
    assert!(!dashboard.on_drag_end("b", home));
}

#[test]
fn hidden_widgets_cannot_be_dragged() {
    let mut dashboard = Dashboard::new(abc_registry(), MemoryStore::new());
    dashboard.set_geometry(container(), GridGaps::default());
    dashboard.set_arranging(true);
    dashboard.toggle_widget("b");
    assert!(!dashboard.on_drag_start("b", container()));
    assert!(!dashboard.layout().contains("b"));
}
