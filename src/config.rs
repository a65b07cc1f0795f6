use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How long transient notices stay in the message bar, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeDurations {
    pub info_secs: f32,
    pub warn_secs: f32,
    pub transform_warn_secs: f32,
}

impl Default for NoticeDurations {
    fn default() -> Self {
        Self {
            info_secs: 2.0,
            warn_secs: 3.0,
            transform_warn_secs: 5.0,
        }
    }
}

impl NoticeDurations {
    pub fn info(&self) -> Duration {
        seconds(self.info_secs, Self::default().info_secs)
    }

    pub fn warn(&self) -> Duration {
        seconds(self.warn_secs, Self::default().warn_secs)
    }

    pub fn transform_warn(&self) -> Duration {
        seconds(self.transform_warn_secs, Self::default().transform_warn_secs)
    }
}

/// Negative and NaN values mean no delay; values too large for a `Duration`
/// fall back to `fallback`.
fn seconds(secs: f32, fallback: f32) -> Duration {
    Duration::try_from_secs_f32(secs.max(0.0))
        .unwrap_or_else(|_| Duration::from_secs_f32(fallback))
}

/// User-tunable settings of the cell editing tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorConfig {
    /// Title of the toolbar and its menu entry
    pub toolbar_title: String,
    /// Page opened by the help action
    pub help_url: String,
    pub notices: NoticeDurations,
    /// Drop the redo stack whenever a new edit is recorded
    pub clear_redo_on_edit: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            toolbar_title: "Raster Cell Editor".to_owned(),
            help_url: "https://github.com/erpas/serval/wiki".to_owned(),
            notices: NoticeDurations::default(),
            clear_redo_on_edit: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
