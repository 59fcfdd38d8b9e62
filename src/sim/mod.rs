//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, counted in ticks
//! - Integer positions; velocity truncated, never rounded
//! - Fixed phase order within a tick (see `tick`)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod collision;
pub mod puzzle;
pub mod recorder;
pub mod rect;
pub mod state;
pub mod tick;
pub mod timer;

pub use actor::{Actor, Ghost, Player, Pose, TickContext, WalkCycle};
pub use collision::{LandingResult, resolve_landing, surface_snapshot};
pub use puzzle::{Button, Door, MovingPlatform};
pub use recorder::{DisplacementFrame, Recorder, Recording};
pub use rect::Rect;
pub use state::{ActorView, GameEvent, GamePhase, GhostView, Outcome, SessionState, Snapshot};
pub use tick::{TickInput, tick};
pub use timer::LoopTimer;
