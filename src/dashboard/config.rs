use crate::dashboard::grid::GRID_COLUMNS;
use crate::dashboard::layout::{pack, Layout, WidgetId};
use crate::dashboard::widgets::WidgetRegistry;
use anyhow::{bail, ensure};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const ORDER_KEY: &str = "dashboard.widgets.v1";
pub const LAYOUT_KEY: &str = "dashboard.layout.v1";
pub const WIDTHS_KEY: &str = "dashboard.spans.v1";

/// String key-value storage backing the dashboard.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()>;
}

/// Store kept only in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, treating a missing, empty or unreadable file as an empty store.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        let values = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "dashboard store unreadable, starting empty");
                    BTreeMap::new()
                }
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// Everything the dashboard persists between sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub order: Vec<WidgetId>,
    pub layout: Layout,
    pub widths: BTreeMap<WidgetId, u32>,
}

impl DashboardState {
    pub fn defaults(registry: &WidgetRegistry) -> Self {
        let order = registry.default_order();
        let layout = pack(&order, &registry.widths(), &registry.default_layout(), None);
        Self {
            order,
            layout,
            widths: BTreeMap::new(),
        }
    }
}

/// Reads and writes [`DashboardState`] through a [`KeyValueStore`].
pub struct LayoutPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> LayoutPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Write the three records. Failures are logged and otherwise ignored.
    pub fn save(&mut self, order: &[WidgetId], layout: &Layout, widths: &BTreeMap<WidgetId, u32>) {
        self.write(ORDER_KEY, serde_json::to_string(order));
        self.write(LAYOUT_KEY, serde_json::to_string(layout));
        self.write(WIDTHS_KEY, serde_json::to_string(widths));
    }

    pub fn save_state(&mut self, state: &DashboardState) {
        self.save(&state.order, &state.layout, &state.widths);
    }

    fn write(&mut self, key: &str, encoded: serde_json::Result<String>) {
        let result = encoded
            .map_err(anyhow::Error::from)
            .and_then(|value| self.store.set(key, value));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "failed to persist dashboard record");
        }
    }

    /// Read the three records, replacing any corrupt one with its default.
    pub fn load(&self, registry: &WidgetRegistry) -> DashboardState {
        let defaults = DashboardState::defaults(registry);
        DashboardState {
            order: self.read(ORDER_KEY, |raw| decode_order(raw, registry), defaults.order),
            layout: self.read(LAYOUT_KEY, |raw| decode_layout(raw, registry), defaults.layout),
            widths: self.read(WIDTHS_KEY, |raw| decode_widths(raw, registry), defaults.widths),
        }
    }

    /// Overwrite all records with defaults.
    pub fn reset(&mut self, registry: &WidgetRegistry) -> DashboardState {
        let defaults = DashboardState::defaults(registry);
        self.save_state(&defaults);
        defaults
    }

    fn read<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&str) -> anyhow::Result<T>,
        default: T,
    ) -> T {
        let Some(raw) = self.store.get(key) else {
            return default;
        };
        match decode(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt dashboard record");
                default
            }
        }
    }
}

fn ensure_known(id: &str, registry: &WidgetRegistry) -> anyhow::Result<()> {
    ensure!(registry.contains(id), "unknown widget '{id}'");
    Ok(())
}

fn decode_order(raw: &str, registry: &WidgetRegistry) -> anyhow::Result<Vec<WidgetId>> {
    let order: Vec<WidgetId> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    for id in &order {
        ensure_known(id, registry)?;
        if !seen.insert(id.as_str()) {
            bail!("widget '{id}' listed twice");
        }
    }
    Ok(order)
}

fn decode_layout(raw: &str, registry: &WidgetRegistry) -> anyhow::Result<Layout> {
    let layout: Layout = serde_json::from_str(raw)?;
    for (id, entry) in layout.iter() {
        ensure_known(id, registry)?;
        ensure!(entry.is_in_bounds(), "widget '{id}' is outside the grid");
    }
    Ok(layout)
}

fn decode_widths(raw: &str, registry: &WidgetRegistry) -> anyhow::Result<BTreeMap<WidgetId, u32>> {
    let widths: BTreeMap<WidgetId, u32> = serde_json::from_str(raw)?;
    for (id, width) in &widths {
        ensure_known(id, registry)?;
        ensure!(
            (1..=GRID_COLUMNS).contains(width),
            "widget '{id}' has invalid width {width}"
        );
    }
    Ok(widths)
}
