//! Fixed timestep simulation tick
//!
//! One call to [`tick`] runs the phases below in this exact order. Each phase
//! is also public so tests can drive them one at a time.
//!
//! 1. [`advance_platform`] moves the moving platform
//! 2. [`collision_surfaces`] snapshots static + moving platforms
//! 3. [`advance_player`] applies input and integrates the player
//! 4. [`record_player`] records the player's new position
//! 5. [`advance_timer`] counts the loop timer down
//! 6. [`advance_ghosts`] replays one frame for every ghost
//! 7. [`update_puzzles`] recomputes the button, then the door
//! 8. [`rollover`] if the timer ran out, otherwise 9. [`check_exit`]
//!
//! Reordering any of these changes what players see: a ghost must have moved
//! before the button is evaluated, the platform before anyone collides with it.

use std::str::FromStr;
use std::time::Duration;

use super::actor::{Actor, Ghost, Player, TickContext};
use super::collision::surface_snapshot;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, Outcome, SessionState};

/// Keys held during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl TickInput {
    /// Nothing held
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Default::default()
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Default::default()
        }
    }
}

impl FromStr for TickInput {
    type Err = String;

    /// Parse `idle` or a `+`-joined key list such as `right+jump`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut input = TickInput::default();
        for key in s.split('+').map(str::trim) {
            match key.to_lowercase().as_str() {
                "idle" | "" => {}
                "left" => input.left = true,
                "right" => input.right = true,
                "jump" => input.jump = true,
                other => return Err(format!("unknown key `{other}`")),
            }
        }
        Ok(input)
    }
}

/// Advance the session by one tick.
///
/// `now` is the caller's monotonic clock; it only stamps the win/loss and
/// times the end-of-run message, never the simulation itself.
pub fn tick(state: &mut SessionState, input: &TickInput, now: Duration) {
    match state.phase {
        GamePhase::Running => {}
        GamePhase::WonPending | GamePhase::LostPending => {
            check_grace(state, now);
            return;
        }
        GamePhase::Finished => return,
    }

    state.time_ticks += 1;

    advance_platform(state);
    let surfaces = collision_surfaces(state);
    let ctx = TickContext {
        input,
        surfaces: &surfaces,
    };
    advance_player(state, &ctx);
    record_player(state);
    advance_timer(state);
    advance_ghosts(state, &ctx);
    update_puzzles(state);

    if state.timer.is_time_up() {
        rollover(state, now);
    } else {
        check_exit(state, now);
    }
}

/// Phase 1: move the moving platform
pub fn advance_platform(state: &mut SessionState) {
    if let Some(platform) = state.moving_platform.as_mut() {
        platform.update();
    }
}

/// Phase 2: this tick's collision surfaces, static platforms first
pub fn collision_surfaces(state: &SessionState) -> Vec<Rect> {
    surface_snapshot(
        &state.level.platforms,
        state.moving_platform.as_ref().map(|mp| mp.rect),
    )
}

/// Phase 3: input and physics for the live player
pub fn advance_player(state: &mut SessionState, ctx: &TickContext<'_>) {
    state.player.advance(ctx);
}

/// Phase 4: capture the player's displacement for this tick
pub fn record_player(state: &mut SessionState) {
    state.recorder.record(state.player.rect.pos());
}

/// Phase 5: count the loop timer down
pub fn advance_timer(state: &mut SessionState) {
    state.timer.advance();
}

/// Phase 6: replay one frame on every ghost
pub fn advance_ghosts(state: &mut SessionState, ctx: &TickContext<'_>) {
    for ghost in &mut state.ghosts {
        ghost.advance(ctx);
    }
}

/// Phase 7: button from every actor, then door from the button
pub fn update_puzzles(state: &mut SessionState) {
    let rects: Vec<Rect> = state.actor_rects().collect();
    let Some(button) = state.button.as_mut() else {
        return;
    };

    let was_pressed = button.pressed;
    button.update(rects);
    match (was_pressed, button.pressed) {
        (false, true) => {
            log::debug!("Button pressed at tick {}", state.time_ticks);
            state.events.push(GameEvent::ButtonPressed);
        }
        (true, false) => {
            log::debug!("Button released at tick {}", state.time_ticks);
            state.events.push(GameEvent::ButtonReleased);
        }
        _ => {}
    }

    if let Some(door) = state.door.as_mut() {
        door.update(button);
    }
}

/// Phase 8: the loop ran out. Archive the run, rebuild every ghost from
/// scratch, reset the player, and check the loop limit.
pub fn rollover(state: &mut SessionState, now: Duration) {
    let recorder = std::mem::take(&mut state.recorder);
    state.recordings.push(recorder.into_recording());

    let start = state.level.player_start;
    state.ghosts = state
        .recordings
        .iter()
        .map(|recording| Ghost::new(recording.clone(), start))
        .collect();
    state.player = Player::new(start);
    state.timer.reset();
    state.loop_count += 1;

    log::info!(
        "Loop {}/{} over, {} ghost(s) now replaying",
        state.loop_count,
        state.max_loops,
        state.ghosts.len()
    );
    state.events.push(GameEvent::LoopRollover {
        loop_count: state.loop_count,
    });

    if state.loop_count >= state.max_loops {
        decide(state, Outcome::Lost, now);
    }
}

/// Phase 9: win if the exit is open and the player stands in it
pub fn check_exit(state: &mut SessionState, now: Duration) {
    if state.exit_open() && state.player.rect.overlaps(&state.level.exit) {
        decide(state, Outcome::Won, now);
    }
}

/// Finish the attempt once the end-of-run message has been up long enough
pub fn check_grace(state: &mut SessionState, now: Duration) {
    let (Some(decided_at), Some(outcome)) = (state.decided_at, state.outcome) else {
        return;
    };
    if now.saturating_sub(decided_at) > state.end_grace {
        state.phase = GamePhase::Finished;
        state.events.push(GameEvent::Finished { outcome });
        log::info!("Attempt finished ({:?})", outcome);
    }
}

fn decide(state: &mut SessionState, outcome: Outcome, now: Duration) {
    state.outcome = Some(outcome);
    state.decided_at = Some(now);
    match outcome {
        Outcome::Won => {
            state.phase = GamePhase::WonPending;
            state.events.push(GameEvent::Won);
            log::info!(
                "Escaped after {} loop(s), tick {}",
                state.loop_count,
                state.time_ticks
            );
        }
        Outcome::Lost => {
            state.phase = GamePhase::LostPending;
            state.events.push(GameEvent::Lost);
            log::info!("Loop limit reached ({} loops)", state.loop_count);
        }
    }
}
