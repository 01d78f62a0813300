//! Launcher configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mazebound_tick::AutoMoveConfig;
use serde::{Deserialize, Serialize};

use crate::error::LaunchError;

/// Runtime settings for the launcher.
///
/// All fields have defaults, so a partial (or absent) configuration file
/// is fine. Loaded from JSON by [`LauncherConfig::from_file`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Map file to play. `None` selects the built-in map.
    pub map: Option<PathBuf>,

    /// Name of the points policy to load from the registry.
    pub points_policy: String,

    /// Cadence of the auto-movement scheduler, in milliseconds.
    pub auto_move_interval_ms: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            map: None,
            points_policy: "default".to_string(),
            auto_move_interval_ms: AutoMoveConfig::DEFAULT_INTERVAL.as_millis() as u64,
        }
    }
}

impl LauncherConfig {
    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LaunchError> {
        let path = path.as_ref();
        let settings = |source: Box<dyn std::error::Error + Send + Sync>| LaunchError::Settings {
            path: path.display().to_string(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(|e| settings(Box::new(e)))?;
        let config: Self = serde_json::from_str(&text).map_err(|e| settings(Box::new(e)))?;
        Ok(config.validated())
    }

    /// Fixes any unusable values so the config is safe to use.
    ///
    /// An empty policy name falls back to `"default"`; a zero interval
    /// falls back to the stock cadence.
    pub fn validated(mut self) -> Self {
        if self.points_policy.is_empty() {
            tracing::warn!("empty points policy name — falling back to \"default\"");
            self.points_policy = "default".to_string();
        }
        if self.auto_move_interval_ms == 0 {
            let default_ms = AutoMoveConfig::DEFAULT_INTERVAL.as_millis() as u64;
            tracing::warn!(default_ms, "auto-move interval of zero — falling back to default");
            self.auto_move_interval_ms = default_ms;
        }
        self
    }

    /// The scheduler configuration this selects.
    pub fn auto_move(&self) -> AutoMoveConfig {
        AutoMoveConfig {
            interval: Duration::from_millis(self.auto_move_interval_ms),
        }
    }
}
