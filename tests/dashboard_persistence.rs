use console_dashboard::dashboard::config::{LAYOUT_KEY, ORDER_KEY, WIDTHS_KEY};
use console_dashboard::dashboard::{
    Dashboard, DashboardState, JsonFileStore, KeyValueStore, Layout, LayoutEntry,
    LayoutPersistence, WidgetRegistry,
};
use console_dashboard::settings::{Settings, STORE_PATH_ENV};
use serial_test::serial;
use std::collections::BTreeMap;
use tempfile::tempdir;

fn custom_state() -> DashboardState {
    let mut layout = Layout::new();
    layout.insert("topCustomers", LayoutEntry { row: 1, col: 1, width: 12 });
    layout.insert("tasks", LayoutEntry { row: 2, col: 4, width: 5 });
    DashboardState {
        order: vec!["topCustomers".into(), "tasks".into()],
        layout,
        widths: BTreeMap::from([("topCustomers".to_string(), 12), ("tasks".to_string(), 5)]),
    }
}

#[test]
fn file_store_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let registry = WidgetRegistry::with_defaults();

    let mut persistence = LayoutPersistence::new(JsonFileStore::open(&path).unwrap());
    persistence.save_state(&custom_state());
    drop(persistence);

    let reopened = LayoutPersistence::new(JsonFileStore::open(&path).unwrap());
    assert_eq!(reopened.load(&registry), custom_state());
}

#[test]
fn corrupt_key_on_disk_only_affects_that_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let registry = WidgetRegistry::with_defaults();

    let mut store = JsonFileStore::open(&path).unwrap();
    let state = custom_state();
    store.set(ORDER_KEY, serde_json::to_string(&state.order).unwrap()).unwrap();
    store.set(LAYOUT_KEY, serde_json::to_string(&state.layout).unwrap()).unwrap();
    store.set(WIDTHS_KEY, "[[[".into()).unwrap();
    drop(store);

    let loaded = LayoutPersistence::new(JsonFileStore::open(&path).unwrap()).load(&registry);
    assert_eq!(loaded.order, state.order);
    assert_eq!(loaded.layout, state.layout);
    assert!(loaded.widths.is_empty());
}

#[test]
fn dashboard_restores_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");

    let expected = {
        let mut dashboard =
            Dashboard::new(WidgetRegistry::with_defaults(), JsonFileStore::open(&path).unwrap());
        dashboard.toggle_widget("dealDistribution");
        dashboard.set_width("tasks", 12);
        dashboard.layout().clone()
    };

    let dashboard =
        Dashboard::new(WidgetRegistry::with_defaults(), JsonFileStore::open(&path).unwrap());
    assert_eq!(dashboard.layout(), &expected);
    assert!(!dashboard.is_active("dealDistribution"));
    assert_eq!(dashboard.width_of("tasks"), 12);
    assert!(dashboard.layout().first_overlap().is_none());
}

#[test]
fn records_from_an_older_catalog_fall_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut store = JsonFileStore::open(&path).unwrap();
    store
        .set(ORDER_KEY, r#"["revenue","pipelineForecast"]"#.into())
        .unwrap();
    drop(store);

    let registry = WidgetRegistry::with_defaults();
    let dashboard = Dashboard::new(registry.clone(), JsonFileStore::open(&path).unwrap());
    assert_eq!(dashboard.active_ids(), registry.default_order().as_slice());
}

#[test]
#[serial]
fn settings_point_at_store_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("from_env.json");
    std::env::set_var(STORE_PATH_ENV, &path);
    let resolved = Settings::default().store_path();
    std::env::remove_var(STORE_PATH_ENV);
    assert_eq!(resolved, path);

    let store = JsonFileStore::open(&resolved).unwrap();
    assert_eq!(store.path(), path.as_path());
}
