use crate::dashboard::grid::GridGaps;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding where the dashboard store lives.
pub const STORE_PATH_ENV: &str = "DASHBOARD_STORE_PATH";

const STORE_FILE: &str = "dashboard_store.json";

fn default_gap() -> f32 {
    16.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// File holding the persisted dashboard layout. If `None`, a file in the
    /// platform config directory is used.
    #[serde(default)]
    pub store_path: Option<String>,
    /// Horizontal gap between grid columns.
    #[serde(default = "default_gap")]
    pub column_gap: f32,
    /// Vertical gap between grid rows.
    #[serde(default = "default_gap")]
    pub row_gap: f32,
    /// Open the dashboard with arrange mode already enabled.
    #[serde(default)]
    pub start_in_arrange_mode: bool,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            store_path: None,
            column_gap: default_gap(),
            row_gap: default_gap(),
            start_in_arrange_mode: false,
            window_size: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn gaps(&self) -> GridGaps {
        GridGaps {
            column: self.column_gap.max(0.0),
            row: self.row_gap.max(0.0),
        }
    }

    /// Resolve the store location: environment override, then the settings
    /// value, then `<config dir>/console_dashboard/dashboard_store.json`.
    pub fn store_path(&self) -> PathBuf {
        if let Ok(path) = std::env::var(STORE_PATH_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        if let Some(path) = self.store_path.as_deref().filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(path);
        }
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("console_dashboard")
            .join(STORE_FILE)
    }
}
