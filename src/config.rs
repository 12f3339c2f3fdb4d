use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "mall_spending.json";

pub const DEFAULT_BASE_TITLE: &str = "Average Consumer Spending at Shopping Mall in Istanbul, Turkey";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Settings for one dashboard session. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Transactions CSV, relative to the working directory.
    pub data_path: PathBuf,
    /// Prefix for bar labels and summary figures.
    pub currency_symbol: String,
    /// Chart title when no age filter is active.
    pub base_title: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/data.csv"),
            currency_symbol: "₺".to_string(),
            base_title: DEFAULT_BASE_TITLE.to_string(),
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl DashboardConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Like [`DashboardConfig::load`] but falls back to defaults on a broken file.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}
