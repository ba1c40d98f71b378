//! Configuration loading and parsing.
//!
//! Parses `gridpanel.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [panel]
//! close_delay_ticks = 2
//! max_rows = 6
//!
//! [title]
//! page_format = "{base} - Page {page}/{pages}"
//! ```
//!
//! Missing files and parse errors fall back to defaults. Unknown fields are
//! ignored. `max_rows` is clamped into `1..=6` when settings are derived; the
//! raw parsed value is retained on `ConfigFile`.
//!
//! Settings are resolved once here and threaded into every panel as a
//! `PanelSettings` value; nothing downstream reads the file again.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::info;

/// Grid row ceiling that no configuration can exceed.
pub const HARD_MAX_ROWS: u8 = 6;

pub const DEFAULT_PAGE_FORMAT: &str = "{base} - Page {page}/{pages}";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    #[serde(default = "PanelConfig::default_close_delay_ticks")]
    pub close_delay_ticks: u32,
    #[serde(default = "PanelConfig::default_max_rows")]
    pub max_rows: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            close_delay_ticks: Self::default_close_delay_ticks(),
            max_rows: Self::default_max_rows(),
        }
    }
}

impl PanelConfig {
    const fn default_close_delay_ticks() -> u32 {
        2
    }
    const fn default_max_rows() -> u8 {
        HARD_MAX_ROWS
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TitleConfig {
    #[serde(default = "TitleConfig::default_page_format")]
    pub page_format: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            page_format: Self::default_page_format(),
        }
    }
}

impl TitleConfig {
    fn default_page_format() -> String {
        DEFAULT_PAGE_FORMAT.to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub title: TitleConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Effective, validated settings handed to panels at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    pub close_delay_ticks: u32,
    pub max_rows: u8,
    pub page_format: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            close_delay_ticks: PanelConfig::default_close_delay_ticks(),
            max_rows: HARD_MAX_ROWS,
            page_format: DEFAULT_PAGE_FORMAT.to_string(),
        }
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("gridpanel.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("gridpanel").join("gridpanel.toml");
    }
    PathBuf::from("gridpanel.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
        }),
        Err(e) => {
            info!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Derive the settings panels are built with, clamping `max_rows`.
    pub fn panel_settings(&self) -> PanelSettings {
        let raw = self.file.panel.max_rows;
        let max_rows = raw.clamp(1, HARD_MAX_ROWS);
        if max_rows != raw {
            info!(target: "config", raw, clamped = max_rows, "max_rows_clamped");
        }
        PanelSettings {
            close_delay_ticks: self.file.panel.close_delay_ticks,
            max_rows,
            page_format: self.file.title.page_format.clone(),
        }
    }
}
