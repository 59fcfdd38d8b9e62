//! Time Loop - a puzzle platformer where your past runs help you escape
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, recording/replay, puzzles, loop state)
//! - `level`: Level file loading and validation
//! - `settings`: Session configuration
//! - `progress`: Campaign progression across levels

pub mod level;
pub mod progress;
pub mod settings;
pub mod sim;

pub use level::{Level, LevelFormatError, MovingPlatformDef, load_level, parse_level};
pub use progress::Progress;
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Actor hitbox
    pub const ACTOR_WIDTH: i32 = 40;
    pub const ACTOR_HEIGHT: i32 = 60;

    /// Horizontal speed (units per tick)
    pub const MOVE_SPEED: i32 = 5;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_VELOCITY: f64 = -12.0;
    /// Added to vertical velocity every tick
    pub const GRAVITY: f64 = 0.6;

    /// Loop timer duration
    pub const DEFAULT_TIMER_SECS: f32 = 20.0;
    /// Rollovers allowed before the attempt is lost
    pub const DEFAULT_MAX_LOOPS: u32 = 3;
    /// How long the win/lose message stays up before the attempt finishes
    pub const END_GRACE_MS: u64 = 2000;

    /// Level defaults when a file omits them
    pub const DEFAULT_PLAYER_START: (i32, i32) = (100, 500);
    pub const DEFAULT_EXIT: [i32; 4] = [700, 500, 40, 60];
    pub const LEVEL_COUNT: u32 = 10;

    /// Ghost motion trail length (positions)
    pub const GHOST_TRAIL_LENGTH: usize = 8;
    /// The walk frame flips once more than this many walking ticks have passed
    pub const WALK_FRAME_TICKS: u32 = 8;
}

/// Integer part of a velocity, truncated toward zero.
///
/// Sub-unit remainders are dropped every tick, never carried. Recordings are
/// only reproducible if this stays exactly a truncation.
#[inline]
pub fn truncate_velocity(vel: f64) -> i32 {
    vel as i32
}

/// Convert a `(x, y)` pair from a level file into a point
#[inline]
pub fn point(xy: (i32, i32)) -> IVec2 {
    IVec2::new(xy.0, xy.1)
}
