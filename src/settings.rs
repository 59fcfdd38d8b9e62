//! Session settings
//!
//! Loaded from a JSON file; any missing field takes its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::timer::secs_to_ticks;

/// Tunables for an attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length of one loop in seconds
    pub timer_secs: f32,
    /// Rollovers allowed before the attempt is lost
    pub max_loops: u32,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// How long the win/lose message stays up (milliseconds)
    pub end_grace_ms: u64,

    // === Campaign ===
    /// Directory holding `level_N.json` files
    pub level_dir: PathBuf,
    /// Number of levels in the campaign
    pub level_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer_secs: DEFAULT_TIMER_SECS,
            max_loops: DEFAULT_MAX_LOOPS,
            tick_rate: TICK_RATE,
            end_grace_ms: END_GRACE_MS,

            level_dir: PathBuf::from("levels"),
            level_count: LEVEL_COUNT,
        }
    }
}

impl Settings {
    /// Loop length in whole ticks (at least one)
    pub fn timer_ticks(&self) -> u32 {
        secs_to_ticks(self.timer_secs, self.tick_rate)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("No settings at {} ({}), using defaults", path.display(), e),
        }

        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_loops, 3);
        assert_eq!(settings.timer_ticks(), 1200);
        assert_eq!(settings.end_grace_ms, 2000);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "max_loops": 5 }"#).unwrap();
        assert_eq!(settings.max_loops, 5);
        assert_eq!(settings.tick_rate, 60);
        assert_eq!(settings.level_dir, PathBuf::from("levels"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load("no/such/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("time_loop_settings_{}.json", std::process::id()));
        let settings = Settings {
            timer_secs: 5.0,
            max_loops: 2,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
