//! Session state and core simulation types
//!
//! Everything one attempt at a level needs lives in [`SessionState`]. It is
//! owned by whoever drives the tick loop and passed to [`super::tick`] by
//! reference; there is no global world.

use std::time::Duration;

use glam::IVec2;
use serde::Serialize;

use super::actor::{Actor, Ghost, Player, Pose};
use super::puzzle::{Button, Door, MovingPlatform};
use super::recorder::{Recorder, Recording};
use super::rect::Rect;
use super::timer::LoopTimer;
use crate::level::Level;
use crate::settings::Settings;

/// Current phase of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Loops are being played
    Running,
    /// Exit reached, win message showing
    WonPending,
    /// Loop limit hit, lose message showing
    LostPending,
    /// Attempt over, control goes back to the level flow
    Finished,
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Edge-triggered notifications for sound and visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Button went from released to pressed
    ButtonPressed,
    /// Button went from pressed to released
    ButtonReleased,
    /// Timer ran out; `loop_count` is the new count
    LoopRollover { loop_count: u32 },
    Won,
    Lost,
    /// Grace period over
    Finished { outcome: Outcome },
}

/// One attempt at a level
#[derive(Debug, Clone)]
pub struct SessionState {
    pub level: Level,
    pub phase: GamePhase,
    /// The live, input-driven actor
    pub player: Player,
    /// One ghost per completed loop, oldest first
    pub ghosts: Vec<Ghost>,
    /// Archived runs, one per completed loop
    pub recordings: Vec<Recording>,
    /// Records the current loop
    pub recorder: Recorder,
    pub timer: LoopTimer,
    pub button: Option<Button>,
    /// Only present when the level also has a button
    pub door: Option<Door>,
    pub moving_platform: Option<MovingPlatform>,
    /// Completed loops (0-based)
    pub loop_count: u32,
    pub max_loops: u32,
    /// Simulation ticks since the attempt started
    pub time_ticks: u64,
    /// Set once the exit is reached or the loop limit is hit
    pub outcome: Option<Outcome>,
    /// When the outcome was decided (caller's clock)
    pub decided_at: Option<Duration>,
    /// How long the win/lose message stays up
    pub end_grace: Duration,
    /// Pending events, drained by the caller
    pub events: Vec<GameEvent>,
}

impl SessionState {
    /// Start a fresh attempt at `level`
    pub fn new(level: Level, settings: &Settings) -> Self {
        let button = level.button.map(Button::new);
        let door = match (level.door, &button) {
            (Some(rect), Some(_)) => Some(Door::new(rect)),
            (Some(_), None) => {
                log::warn!("Level has a door but no button; ignoring the door");
                None
            }
            (None, _) => None,
        };
        let moving_platform = level
            .moving_platform
            .map(|mp| MovingPlatform::new(mp.rect, mp.x1, mp.x2, mp.speed));

        Self {
            player: Player::new(level.player_start),
            ghosts: Vec::new(),
            recordings: Vec::new(),
            recorder: Recorder::new(),
            timer: LoopTimer::new(settings.timer_ticks(), settings.tick_rate),
            button,
            door,
            moving_platform,
            loop_count: 0,
            max_loops: settings.max_loops,
            time_ticks: 0,
            phase: GamePhase::Running,
            outcome: None,
            decided_at: None,
            end_grace: Duration::from_millis(settings.end_grace_ms),
            events: Vec::new(),
            level,
        }
    }

    /// Rectangles of every actor that can press a button: the player, then ghosts
    pub fn actor_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        std::iter::once(self.player.rect()).chain(self.ghosts.iter().map(|g| g.rect()))
    }

    /// Whether the exit is currently passable
    pub fn exit_open(&self) -> bool {
        self.door.as_ref().is_none_or(|d| d.open)
    }

    /// Final result, once decided
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Plain-data view for a renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            player: ActorView {
                rect: self.player.rect,
                pose: self.player.pose,
                walk_frame: self.player.walk.frame,
            },
            ghosts: self
                .ghosts
                .iter()
                .map(|g| GhostView {
                    actor: ActorView {
                        rect: g.rect,
                        pose: g.pose,
                        walk_frame: g.walk.frame,
                    },
                    trail: g.trail.clone(),
                })
                .collect(),
            platforms: self.level.platforms.clone(),
            moving_platform: self.moving_platform.as_ref().map(|mp| mp.rect),
            button: self.button.as_ref().map(|b| (b.rect, b.pressed)),
            door: self.door.as_ref().map(|d| (d.rect, d.open)),
            exit: self.level.exit,
            time_remaining: self.timer.remaining_secs(),
            loop_count: self.loop_count,
            max_loops: self.max_loops,
        }
    }
}

/// Render view of an actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorView {
    pub rect: Rect,
    pub pose: Pose,
    pub walk_frame: u8,
}

/// Render view of a ghost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GhostView {
    pub actor: ActorView,
    /// Recent positions, oldest first
    pub trail: Vec<IVec2>,
}

/// Read-only copy of everything a renderer draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: ActorView,
    pub ghosts: Vec<GhostView>,
    pub platforms: Vec<Rect>,
    pub moving_platform: Option<Rect>,
    pub button: Option<(Rect, bool)>,
    pub door: Option<(Rect, bool)>,
    pub exit: Rect,
    /// Seconds left in the current loop
    pub time_remaining: f32,
    pub loop_count: u32,
    pub max_loops: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::parse_level;

    #[test]
    fn test_new_session() {
        let level = parse_level(
            r#"{ "platforms": [[0, 560, 800, 40]], "button": [300, 540, 40, 20], "door": [650, 440, 20, 120] }"#,
        )
        .unwrap();
        let state = SessionState::new(level, &Settings::default());

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.rect.pos(), IVec2::new(100, 500));
        assert!(state.ghosts.is_empty());
        assert!(state.button.is_some());
        assert!(state.door.is_some());
        assert!(!state.exit_open());
        assert_eq!(state.timer.remaining_ticks(), 1200);
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn test_door_without_button_is_dropped() {
        let level =
            parse_level(r#"{ "platforms": [], "door": [650, 440, 20, 120] }"#).unwrap();
        let state = SessionState::new(level, &Settings::default());
        assert!(state.door.is_none());
        assert!(state.exit_open());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let level = parse_level(
            r#"{ "platforms": [[0, 560, 800, 40]],
                 "moving_platform": { "rect": [200, 400, 100, 20], "x1": 200, "x2": 400, "speed": 2 } }"#,
        )
        .unwrap();
        let state = SessionState::new(level, &Settings::default());
        let snap = state.snapshot();

        assert_eq!(snap.player.rect, state.player.rect);
        assert_eq!(snap.moving_platform, Some(Rect::new(200, 400, 100, 20)));
        assert_eq!(snap.button, None);
        assert_eq!(snap.loop_count, 0);
        assert_eq!(snap.max_loops, 3);
        assert!((snap.time_remaining - 20.0).abs() < 1e-4);
    }
}
