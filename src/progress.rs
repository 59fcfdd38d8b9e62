//! Campaign progression
//!
//! Tracks which level is next and the best escape on each level. Only
//! finished attempts are stored, never a run in progress.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::level::level_path;
use crate::sim::{Outcome, SessionState};

/// Best escape on one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Loops used before escaping
    pub loops: u32,
    /// Total ticks in the attempt
    pub ticks: u64,
}

impl LevelRecord {
    /// Fewer loops wins; ties go to fewer ticks
    pub fn beats(&self, other: &LevelRecord) -> bool {
        (self.loops, self.ticks) < (other.loops, other.ticks)
    }
}

/// Campaign position and per-level bests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Level to play next (1-based)
    pub current_level: u32,
    pub level_count: u32,
    /// Best record per level number
    #[serde(default)]
    pub best: BTreeMap<u32, LevelRecord>,
}

impl Progress {
    pub fn new(level_count: u32) -> Self {
        Self {
            current_level: 1,
            level_count: level_count.max(1),
            best: BTreeMap::new(),
        }
    }

    /// Apply a finished attempt on the current level.
    ///
    /// A win advances to the next level, wrapping back to the first after
    /// the last. A loss stays put. Returns true if the win set a new best.
    pub fn record_attempt(&mut self, outcome: Outcome, loops: u32, ticks: u64) -> bool {
        if outcome == Outcome::Lost {
            log::info!("Level {} lost, retrying", self.current_level);
            return false;
        }

        let level = self.current_level;
        let record = LevelRecord { loops, ticks };
        let is_best = self.best.get(&level).is_none_or(|prev| record.beats(prev));
        if is_best {
            self.best.insert(level, record);
            log::info!("New best on level {}: {} loop(s), {} ticks", level, loops, ticks);
        }

        self.current_level = if level >= self.level_count {
            1
        } else {
            level + 1
        };
        is_best
    }

    /// Apply the result of a session, if it has one
    pub fn record_session(&mut self, state: &SessionState) -> bool {
        match state.outcome() {
            Some(outcome) => self.record_attempt(outcome, state.loop_count, state.time_ticks),
            None => false,
        }
    }

    /// File of the level to play next, inside `dir`
    pub fn current_level_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        level_path(dir, self.current_level)
    }

    pub fn best_for(&self, level: u32) -> Option<LevelRecord> {
        self.best.get(&level).copied()
    }

    /// Load progress from a JSON file, starting fresh if missing or malformed
    pub fn load(path: impl AsRef<Path>, level_count: u32) -> Self {
        let path = path.as_ref();
        if let Ok(json) = std::fs::read_to_string(path) {
            match serde_json::from_str::<Progress>(&json) {
                Ok(progress) => {
                    log::info!("Loaded progress (level {})", progress.current_level);
                    return progress;
                }
                Err(e) => log::warn!("Ignoring malformed progress {}: {}", path.display(), e),
            }
        }

        log::info!("No progress found, starting fresh");
        Self::new(level_count)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Progress saved ({} level records)", self.best.len());
        Ok(())
    }
}
