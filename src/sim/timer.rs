//! Loop countdown timer
//!
//! Counted in whole ticks so the timer can never drift from the recordings:
//! a loop of N ticks always produces a recording of N frames.

/// Countdown for one loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTimer {
    duration_ticks: u32,
    remaining_ticks: u32,
    tick_rate: u32,
}

impl LoopTimer {
    /// Timer lasting `duration_ticks` ticks at `tick_rate` ticks per second
    pub fn new(duration_ticks: u32, tick_rate: u32) -> Self {
        Self {
            duration_ticks,
            remaining_ticks: duration_ticks,
            tick_rate: tick_rate.max(1),
        }
    }

    /// Timer for a duration in seconds, rounded to whole ticks (at least one)
    pub fn from_secs(secs: f32, tick_rate: u32) -> Self {
        Self::new(secs_to_ticks(secs, tick_rate), tick_rate)
    }

    /// Count down one tick, clamped at zero
    pub fn advance(&mut self) {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.remaining_ticks = self.duration_ticks;
    }

    pub fn is_time_up(&self) -> bool {
        self.remaining_ticks == 0
    }

    pub fn duration_ticks(&self) -> u32 {
        self.duration_ticks
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    /// Remaining time in seconds (for display)
    pub fn remaining_secs(&self) -> f32 {
        self.remaining_ticks as f32 / self.tick_rate as f32
    }

    /// Ticks elapsed in the current loop
    pub fn elapsed_ticks(&self) -> u32 {
        self.duration_ticks - self.remaining_ticks
    }
}

/// Whole ticks covering `secs`, never less than one
pub fn secs_to_ticks(secs: f32, tick_rate: u32) -> u32 {
    let ticks = (secs.max(0.0) * tick_rate as f32).round() as u32;
    ticks.max(1)
}
