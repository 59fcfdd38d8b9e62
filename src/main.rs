//! Time Loop entry point
//!
//! Headless runner: plays one attempt at a level while holding a fixed set
//! of keys every tick, then reports how it ended. Windowing, rendering and
//! audio live elsewhere.
//!
//! Usage:
//! - `time-loop <level.json> [keys]` plays a single level file.
//! - With `TIME_LOOP_PROGRESS` set to a JSON progress file, `time-loop [keys]`
//!   plays the campaign's current level from the settings' `level_dir` and
//!   records the result against that level.
//!
//! Keys is `idle` or a `+`-joined list such as `right+jump` (default
//! `right`). Set `TIME_LOOP_SETTINGS` to a JSON settings file to override the
//! defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use time_loop::sim::{GameEvent, SessionState, TickInput, tick};
use time_loop::{Progress, Settings, load_level};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::var("TIME_LOOP_SETTINGS") {
        Ok(path) => Settings::load(path),
        Err(_) => Settings::default(),
    };

    let mut args = std::env::args().skip(1);
    let campaign = std::env::var("TIME_LOOP_PROGRESS").ok().map(|path| {
        let progress = Progress::load(&path, settings.level_count);
        (PathBuf::from(path), progress)
    });

    let level_path = match &campaign {
        Some((_, progress)) => progress.current_level_path(&settings.level_dir),
        None => args
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("usage: time-loop <level.json> [keys]"))?,
    };
    let input: TickInput = args
        .next()
        .as_deref()
        .unwrap_or("right")
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let level = load_level(&level_path)
        .with_context(|| format!("loading {}", level_path.display()))?;
    let mut state = SessionState::new(level, &settings);
    log::info!(
        "Time Loop starting: {} with {:?}",
        level_path.display(),
        input
    );

    // Enough ticks to exhaust every loop and sit out the end-of-run message
    let grace_ticks = settings.end_grace_ms * settings.tick_rate as u64 / 1000 + 2;
    let max_ticks = settings.timer_ticks() as u64 * (settings.max_loops as u64 + 1) + grace_ticks;
    let dt = Duration::from_secs_f64(1.0 / settings.tick_rate.max(1) as f64);

    let mut now = Duration::ZERO;
    let mut frames = 0u64;
    while !state.is_finished() && frames < max_ticks {
        now += dt;
        frames += 1;
        tick(&mut state, &input, now);
        for event in state.drain_events() {
            match event {
                GameEvent::ButtonPressed | GameEvent::ButtonReleased => log::debug!("{:?}", event),
                _ => log::info!("{:?}", event),
            }
        }
    }

    let outcome = state
        .outcome()
        .ok_or_else(|| anyhow!("attempt did not finish within {max_ticks} ticks"))?;

    println!(
        "{:?} after {} loop(s), {} simulation ticks",
        outcome, state.loop_count, state.time_ticks
    );

    if let Some((path, mut progress)) = campaign {
        let played = progress.current_level;
        if progress.record_session(&state) {
            println!("New best on level {played}!");
        }
        progress
            .save(&path)
            .with_context(|| format!("saving progress to {}", path.display()))?;
        println!("Next level: {}", progress.current_level);
    }
    Ok(())
}
