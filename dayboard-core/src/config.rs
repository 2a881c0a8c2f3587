//! Board configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{BoardError, BoardResult};

const DEFAULT_DAYS_AHEAD: i64 = 30;
const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_DAY_WIDTH: f32 = 32.0;

fn default_days_ahead() -> i64 {
    DEFAULT_DAYS_AHEAD
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_day_width() -> f32 {
    DEFAULT_DAY_WIDTH
}

/// Global configuration at ~/.config/dayboard/config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Where item files live; defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,

    /// How far ahead the calendar mirror looks.
    #[serde(default = "default_days_ahead")]
    pub days_ahead: i64,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Timeline column width in pixels.
    #[serde(default = "default_day_width")]
    pub day_width: f32,

    /// When a mutation fails and Local items are reloaded, also re-fetch
    /// the calendar mirror.
    #[serde(default)]
    pub refresh_external_on_error: bool,

    pub calendar: Option<CalendarSection>,
}

/// The `[calendar]` section: which provider binary mirrors events onto
/// the board, plus whatever provider-specific keys it needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarSection {
    pub provider: String,
    #[serde(flatten)]
    pub config: HashMap<String, toml::Value>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            data_dir: None,
            days_ahead: DEFAULT_DAYS_AHEAD,
            page_size: DEFAULT_PAGE_SIZE,
            day_width: DEFAULT_DAY_WIDTH,
            refresh_external_on_error: false,
            calendar: None,
        }
    }
}

impl BoardConfig {
    pub fn config_path() -> BoardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BoardError::Config("Could not determine config directory".into()))?
            .join("dayboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it is absent.
    pub fn load() -> BoardResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| BoardError::Config(e.to_string()))
    }

    /// Resolved item-file directory.
    pub fn data_path(&self) -> BoardResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join("dayboard"))
                .ok_or_else(|| BoardError::Config("Could not determine data directory".into())),
        }
    }
}
