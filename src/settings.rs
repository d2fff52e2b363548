//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use gantt_timeline::{Scale, TimelineResult, WindowConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Scale the chart opens with.
    pub scale: Scale,
    /// Virtual window tunables.
    pub window: WindowConfig,
}

impl AppSettings {
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "GanttTimeline")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .unwrap_or_else(|| PathBuf::from("settings.json"))
    }

    /// Read settings, falling back to defaults for a missing or bad file and
    /// for window tunables that do not validate.
    pub fn load(path: &Path) -> Self {
        let mut settings: Self = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read settings, using defaults");
                Self::default()
            }
        };

        if let Err(e) = settings.window.validate() {
            warn!(error = %e, "window settings rejected, using defaults");
            settings.window = WindowConfig::default();
        }
        settings
    }

    pub fn save(&self, path: &Path) -> TimelineResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
