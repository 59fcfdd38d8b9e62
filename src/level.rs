//! Level files
//!
//! A level is hand-authored JSON:
//!
//! ```json
//! {
//!   "platforms": [[0, 560, 800, 40]],
//!   "player_start": [100, 500],
//!   "exit": [700, 500, 40, 60],
//!   "button": [300, 540, 40, 20],
//!   "door": [650, 440, 20, 120],
//!   "moving_platform": { "rect": [200, 400, 100, 20], "x1": 200, "x2": 500, "speed": 2 }
//! }
//! ```
//!
//! `platforms` is required, `player_start` and `exit` have defaults, the
//! puzzle elements are optional. Loaded once per attempt and never mutated.

use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_EXIT, DEFAULT_PLAYER_START};
use crate::point;
use crate::sim::Rect;

/// Why a level could not be loaded
#[derive(Debug, Error)]
pub enum LevelFormatError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rectangle for `{field}`: {rect:?} ({reason})")]
    InvalidRect {
        field: String,
        rect: [i32; 4],
        reason: &'static str,
    },

    #[error("invalid moving platform: {0}")]
    InvalidMovingPlatform(String),
}

pub type Result<T> = std::result::Result<T, LevelFormatError>;

/// Moving platform as described by a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingPlatformDef {
    pub rect: Rect,
    /// Leftmost x
    pub x1: i32,
    /// Rightmost x
    pub x2: i32,
    /// Units per tick
    pub speed: i32,
}

/// Immutable level geometry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Rect>,
    pub player_start: IVec2,
    pub exit: Rect,
    pub button: Option<Rect>,
    pub door: Option<Rect>,
    pub moving_platform: Option<MovingPlatformDef>,
}

/// On-disk shape
#[derive(Debug, Deserialize)]
struct LevelFile {
    platforms: Vec<[i32; 4]>,
    #[serde(default = "default_player_start")]
    player_start: (i32, i32),
    #[serde(default = "default_exit")]
    exit: [i32; 4],
    #[serde(default)]
    button: Option<[i32; 4]>,
    #[serde(default)]
    door: Option<[i32; 4]>,
    #[serde(default)]
    moving_platform: Option<MovingPlatformFile>,
}

#[derive(Debug, Deserialize)]
struct MovingPlatformFile {
    rect: [i32; 4],
    x1: i32,
    x2: i32,
    speed: i32,
}

fn default_player_start() -> (i32, i32) {
    DEFAULT_PLAYER_START
}

fn default_exit() -> [i32; 4] {
    DEFAULT_EXIT
}

/// Load and validate a level file
pub fn load_level(path: impl AsRef<Path>) -> Result<Level> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LevelFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = parse_level(&json)?;
    log::info!(
        "Loaded level {} ({} platforms, button: {}, door: {}, moving platform: {})",
        path.display(),
        level.platforms.len(),
        level.button.is_some(),
        level.door.is_some(),
        level.moving_platform.is_some()
    );
    Ok(level)
}

/// Parse and validate level JSON
pub fn parse_level(json: &str) -> Result<Level> {
    let file: LevelFile = serde_json::from_str(json)?;

    let platforms = file
        .platforms
        .iter()
        .enumerate()
        .map(|(i, r)| checked_rect(&format!("platforms[{i}]"), *r))
        .collect::<Result<Vec<_>>>()?;

    let moving_platform = file
        .moving_platform
        .map(|mp| {
            let rect = checked_rect("moving_platform.rect", mp.rect)?;
            if mp.x1 > mp.x2 {
                return Err(LevelFormatError::InvalidMovingPlatform(format!(
                    "x1 ({}) is greater than x2 ({})",
                    mp.x1, mp.x2
                )));
            }
            if mp.speed < 0 {
                return Err(LevelFormatError::InvalidMovingPlatform(format!(
                    "negative speed {}",
                    mp.speed
                )));
            }
            // Every x the platform can reach, one step past either bound
            // included, must keep its right edge representable.
            let lowest = mp.x1.min(rect.x).checked_sub(mp.speed);
            let highest = mp
                .x2
                .max(rect.x)
                .checked_add(mp.speed)
                .and_then(|x| x.checked_add(rect.w));
            if lowest.is_none() || highest.is_none() {
                return Err(LevelFormatError::InvalidMovingPlatform(format!(
                    "travel from {} to {} at speed {} overflows",
                    mp.x1, mp.x2, mp.speed
                )));
            }
            Ok(MovingPlatformDef {
                rect,
                x1: mp.x1,
                x2: mp.x2,
                speed: mp.speed,
            })
        })
        .transpose()?;

    Ok(Level {
        platforms,
        player_start: point(file.player_start),
        exit: checked_rect("exit", file.exit)?,
        button: file.button.map(|r| checked_rect("button", r)).transpose()?,
        door: file.door.map(|r| checked_rect("door", r)).transpose()?,
        moving_platform,
    })
}

/// Path of the `n`th level (1-based) inside `dir`
pub fn level_path(dir: impl AsRef<Path>, n: u32) -> PathBuf {
    dir.as_ref().join(format!("level_{n}.json"))
}

fn checked_rect(field: &str, r: [i32; 4]) -> Result<Rect> {
    if r[2] <= 0 || r[3] <= 0 {
        return Err(LevelFormatError::InvalidRect {
            field: field.to_string(),
            rect: r,
            reason: "width and height must be positive",
        });
    }
    if r[0].checked_add(r[2]).is_none() || r[1].checked_add(r[3]).is_none() {
        return Err(LevelFormatError::InvalidRect {
            field: field.to_string(),
            rect: r,
            reason: "right or bottom edge out of range",
        });
    }
    Ok(Rect::from_array(r))
}
