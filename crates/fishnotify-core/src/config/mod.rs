//! Persisted settings and polling constants.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Current settings schema version.
pub const CONFIG_VERSION: u32 = 0;

/// Default settings file name.
pub const DEFAULT_CONFIG_FILE: &str = "fishnotify.json";

/// User settings, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Schema version; no migrations exist yet.
    pub version: u32,
    /// Print a chat line for every bite in addition to the audio cue.
    pub chat_alerts: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            chat_alerts: false,
        }
    }
}

impl Configuration {
    /// Load settings; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::ConfigParseError(format!("{}: {}", path.display(), e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Flip `chat_alerts` and persist the result.
    ///
    /// The in-memory value is left unchanged if saving fails.
    pub fn toggle_chat_alerts<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
        self.chat_alerts = !self.chat_alerts;
        if let Err(e) = self.save(path) {
            self.chat_alerts = !self.chat_alerts;
            return Err(e);
        }
        Ok(self.chat_alerts)
    }
}

/// Polling loop timing.
pub mod polling {
    use std::time::Duration;

    /// Interval between detection ticks (about one frame at 60 fps).
    pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

    /// Delay between attempts to find the game process.
    pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

    /// Ticks between process liveness checks.
    pub const LIVENESS_CHECK_TICKS: u32 = 60;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::load(dir.path().join("absent.json")).unwrap();

        assert_eq!(config, Configuration::default());
        assert!(!config.chat_alerts);
        assert_eq!(config.version, 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let config = Configuration {
            version: 0,
            chat_alerts: true,
        };
        config.save(&path).unwrap();

        assert_eq!(Configuration::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, r#"{"chatAlerts": true, "extra": 1}"#).unwrap();

        let config = Configuration::load(&path).unwrap();
        assert!(config.chat_alerts);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Configuration::load(&path),
            Err(Error::ConfigParseError(_))
        ));
    }

    #[test]
    fn test_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Configuration::default();
        assert!(config.toggle_chat_alerts(&path).unwrap());
        assert!(Configuration::load(&path).unwrap().chat_alerts);

        assert!(!config.toggle_chat_alerts(&path).unwrap());
        assert!(!Configuration::load(&path).unwrap().chat_alerts);
    }

    #[test]
    fn test_toggle_keeps_value_when_save_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file
        let path = dir.path().to_path_buf();

        let mut config = Configuration::default();
        assert!(config.toggle_chat_alerts(&path).is_err());
        assert!(!config.chat_alerts);
    }

    #[test]
    fn test_polling_constants() {
        assert_eq!(polling::TICK_INTERVAL.as_millis(), 16);
        assert_eq!(polling::RECONNECT_DELAY.as_secs(), 5);
    }
}
