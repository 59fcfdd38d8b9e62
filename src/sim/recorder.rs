//! Motion recording
//!
//! A recording is the per-tick displacement of the live player, indexed from
//! tick 0. Frame 0 is always zero so that recordings and ghost cursors stay
//! aligned with the number of player updates.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Movement applied to an actor during exactly one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DisplacementFrame {
    pub dx: i32,
    pub dy: i32,
}

impl DisplacementFrame {
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn as_ivec2(&self) -> IVec2 {
        IVec2::new(self.dx, self.dy)
    }
}

impl From<IVec2> for DisplacementFrame {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// A finished, immutable run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recording {
    frames: Vec<DisplacementFrame>,
}

impl Recording {
    pub fn frames(&self) -> &[DisplacementFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DisplacementFrame> {
        self.frames.get(index).copied()
    }

    /// Net displacement of the first `ticks` frames
    pub fn net_displacement(&self, ticks: usize) -> IVec2 {
        self.frames
            .iter()
            .take(ticks)
            .fold(IVec2::ZERO, |acc, f| acc + f.as_ivec2())
    }
}

impl From<Vec<DisplacementFrame>> for Recording {
    fn from(frames: Vec<DisplacementFrame>) -> Self {
        Self { frames }
    }
}

/// Captures the live player's displacement once per tick
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    frames: Vec<DisplacementFrame>,
    last_pos: Option<IVec2>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the player's absolute position for this tick
    pub fn record(&mut self, pos: IVec2) {
        let frame = match self.last_pos {
            None => DisplacementFrame::ZERO,
            Some(prev) => DisplacementFrame::from(pos - prev),
        };
        self.frames.push(frame);
        self.last_pos = Some(pos);
    }

    /// Frames recorded so far
    pub fn moves(&self) -> &[DisplacementFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Finish recording and hand over the frames
    pub fn into_recording(self) -> Recording {
        Recording::from(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut recorder = Recorder::new();
        recorder.record(IVec2::new(100, 500));
        assert_eq!(recorder.moves(), &[DisplacementFrame::ZERO]);
    }

    #[test]
    fn test_frames_are_deltas() {
        let mut recorder = Recorder::new();
        recorder.record(IVec2::new(100, 500));
        recorder.record(IVec2::new(105, 500));
        recorder.record(IVec2::new(110, 488));

        let recording = recorder.into_recording();
        assert_eq!(
            recording.frames(),
            &[
                DisplacementFrame::ZERO,
                DisplacementFrame::new(5, 0),
                DisplacementFrame::new(5, -12),
            ]
        );
    }

    #[test]
    fn test_empty_recorder() {
        let recorder = Recorder::new();
        assert!(recorder.is_empty());
        assert!(recorder.into_recording().is_empty());
    }

    #[test]
    fn test_recording_json_shape() {
        let recording = Recording::from(vec![DisplacementFrame::ZERO, DisplacementFrame::new(5, -1)]);
        let json = serde_json::to_string(&recording).unwrap();
        assert_eq!(json, r#"[{"dx":0,"dy":0},{"dx":5,"dy":-1}]"#);
    }

    proptest! {
        #[test]
        fn recording_is_telescoping_sum(
            start in (-1000i32..1000, -1000i32..1000),
            steps in prop::collection::vec((-20i32..20, -20i32..20), 1..200),
        ) {
            let mut pos = IVec2::new(start.0, start.1);
            let mut recorder = Recorder::new();
            recorder.record(pos);
            for (dx, dy) in &steps {
                pos += IVec2::new(*dx, *dy);
                recorder.record(pos);
            }

            let recording = recorder.into_recording();
            prop_assert_eq!(recording.len(), steps.len() + 1);
            prop_assert_eq!(IVec2::new(start.0, start.1) + recording.net_displacement(recording.len()), pos);
        }
    }
}
