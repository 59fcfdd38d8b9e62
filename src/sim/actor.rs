//! Live player and replay ghosts
//!
//! Both expose the same collidable rectangle. They differ only in where
//! their motion comes from: the player integrates input and gravity, a ghost
//! replays a recording one frame per tick.

use glam::IVec2;
use serde::Serialize;

use super::collision::resolve_landing;
use super::recorder::{DisplacementFrame, Recording};
use super::rect::Rect;
use super::tick::TickInput;
use crate::consts::*;
use crate::truncate_velocity;

/// Animation pose, derived from motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Pose {
    #[default]
    Idle,
    Walk,
    Jump,
}

/// Two-frame walk animation counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkCycle {
    pub frame: u8,
    timer: u32,
}

impl WalkCycle {
    /// Advance one tick in the given pose
    pub fn step(&mut self, pose: Pose) {
        if pose == Pose::Walk {
            self.timer += 1;
            if self.timer > WALK_FRAME_TICKS {
                self.frame = 1 - self.frame;
                self.timer = 0;
            }
        } else {
            self.frame = 0;
            self.timer = 0;
        }
    }
}

/// What an actor may read while advancing one tick
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub input: &'a TickInput,
    /// Static platforms followed by the moving platform, if any
    pub surfaces: &'a [Rect],
}

/// Anything that occupies space in the level and moves once per tick
pub trait Actor {
    /// Current collidable rectangle
    fn rect(&self) -> Rect;

    /// Current animation pose
    fn pose(&self) -> Pose;

    /// Advance one tick and return the new top-left position
    fn advance(&mut self, ctx: &TickContext<'_>) -> IVec2;
}

/// The input-driven actor
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Vertical velocity (units per tick, positive is down)
    pub vel_y: f64,
    pub grounded: bool,
    pub pose: Pose,
    pub walk: WalkCycle,
}

impl Player {
    pub fn new(start: IVec2) -> Self {
        Self {
            rect: Rect::at(start, ACTOR_WIDTH, ACTOR_HEIGHT),
            vel_y: 0.0,
            grounded: false,
            pose: Pose::Idle,
            walk: WalkCycle::default(),
        }
    }

    /// Apply held keys: horizontal moves happen immediately, a jump only
    /// sets vertical velocity.
    ///
    /// Jump is level-triggered: holding it re-jumps on every grounded tick.
    pub fn handle_input(&mut self, input: &TickInput) {
        let mut moving = false;
        if input.left {
            self.rect.x -= MOVE_SPEED;
            moving = true;
        }
        if input.right {
            self.rect.x += MOVE_SPEED;
            moving = true;
        }
        if input.jump && self.grounded {
            self.vel_y = JUMP_VELOCITY;
            self.grounded = false;
        }

        self.pose = if !self.grounded {
            Pose::Jump
        } else if moving {
            Pose::Walk
        } else {
            Pose::Idle
        };
    }

    /// Integrate gravity and land on surfaces
    pub fn update(&mut self, surfaces: &[Rect]) {
        self.vel_y += GRAVITY;
        self.rect.y += truncate_velocity(self.vel_y);

        let landing = resolve_landing(self.rect, self.vel_y, surfaces);
        self.rect = landing.rect;
        self.vel_y = landing.vel_y;
        self.grounded = landing.grounded;

        self.walk.step(self.pose);
    }
}

impl Actor for Player {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn advance(&mut self, ctx: &TickContext<'_>) -> IVec2 {
        self.handle_input(ctx.input);
        self.update(ctx.surfaces);
        self.rect.pos()
    }
}

/// A past run replayed frame by frame
#[derive(Debug, Clone)]
pub struct Ghost {
    pub rect: Rect,
    recording: Recording,
    /// Index of the next frame to replay
    cursor: usize,
    pub pose: Pose,
    pub walk: WalkCycle,
    /// Recent positions for the motion trail (oldest first)
    pub trail: Vec<IVec2>,
}

impl Ghost {
    pub fn new(recording: Recording, start: IVec2) -> Self {
        Self {
            rect: Rect::at(start, ACTOR_WIDTH, ACTOR_HEIGHT),
            recording,
            cursor: 0,
            pose: Pose::Idle,
            walk: WalkCycle::default(),
            trail: Vec::with_capacity(GHOST_TRAIL_LENGTH),
        }
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True once every frame has been replayed. The ghost stays where it is.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.recording.len()
    }

    /// Replay the next frame, or do nothing if the recording is used up
    pub fn update(&mut self) {
        let Some(frame) = self.recording.get(self.cursor) else {
            return;
        };
        self.rect.translate(frame.as_ivec2());
        self.cursor += 1;

        self.pose = pose_for_frame(frame);
        self.walk.step(self.pose);

        self.trail.push(self.rect.pos());
        if self.trail.len() > GHOST_TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }
}

impl Actor for Ghost {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn advance(&mut self, _ctx: &TickContext<'_>) -> IVec2 {
        self.update();
        self.rect.pos()
    }
}

fn pose_for_frame(frame: DisplacementFrame) -> Pose {
    if frame.dy < 0 {
        Pose::Jump
    } else if frame.dx != 0 {
        Pose::Walk
    } else {
        Pose::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn floor() -> Rect {
        Rect::new(0, 560, 800, 40)
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut player = Player::new(IVec2::new(100, 500));
        let surfaces = [floor()];

        // Tick 1: 0.6 truncates to 0, bottom only touches the floor
        player.update(&surfaces);
        assert_eq!(player.rect.y, 500);
        assert!(!player.grounded);

        // Tick 2: 1.2 moves one unit into the floor and snaps back
        player.update(&surfaces);
        assert_eq!(player.rect.y, 500);
        assert!(player.grounded);
        assert_eq!(player.vel_y, 0.0);
    }

    #[test]
    fn test_horizontal_input() {
        let mut player = Player::new(IVec2::new(100, 500));
        player.handle_input(&TickInput::right());
        assert_eq!(player.rect.x, 105);

        player.handle_input(&TickInput {
            left: true,
            ..Default::default()
        });
        assert_eq!(player.rect.x, 100);

        // Both held cancel out
        player.handle_input(&TickInput {
            left: true,
            right: true,
            ..Default::default()
        });
        assert_eq!(player.rect.x, 100);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut player = Player::new(IVec2::new(100, 500));
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        player.handle_input(&jump);
        assert_eq!(player.vel_y, 0.0);

        player.grounded = true;
        player.handle_input(&jump);
        assert_eq!(player.vel_y, JUMP_VELOCITY);
        assert!(!player.grounded);
        assert_eq!(player.pose, Pose::Jump);
        // Jump never moves the rect directly
        assert_eq!(player.rect.y, 500);
    }

    #[test]
    fn test_jump_arc_truncates_velocity() {
        let mut player = Player::new(IVec2::new(100, 500));
        player.grounded = true;
        player.handle_input(&TickInput {
            jump: true,
            ..Default::default()
        });
        player.update(&[floor()]);
        // -12 + 0.6 = -11.4, truncated toward zero
        assert_eq!(player.rect.y, 489);

        player.update(&[floor()]);
        // -10.8 -> -10
        assert_eq!(player.rect.y, 479);
    }

    #[test]
    fn test_player_lands_after_jump() {
        let mut player = Player::new(IVec2::new(100, 500));
        let surfaces = [floor()];
        player.grounded = true;
        player.handle_input(&TickInput {
            jump: true,
            ..Default::default()
        });

        for _ in 0..100 {
            player.update(&surfaces);
            if player.grounded {
                break;
            }
        }
        assert!(player.grounded);
        assert_eq!(player.rect.bottom(), 560);
    }

    #[test]
    fn test_walk_cycle_flips_after_nine_ticks() {
        let mut walk = WalkCycle::default();
        for _ in 0..8 {
            walk.step(Pose::Walk);
        }
        assert_eq!(walk.frame, 0);
        walk.step(Pose::Walk);
        assert_eq!(walk.frame, 1);

        walk.step(Pose::Idle);
        assert_eq!(walk.frame, 0);
    }

    #[test]
    fn test_ghost_replays_then_freezes() {
        let recording = Recording::from(vec![
            DisplacementFrame::ZERO,
            DisplacementFrame::new(5, 0),
            DisplacementFrame::new(5, -11),
        ]);
        let mut ghost = Ghost::new(recording, IVec2::new(100, 500));

        ghost.update();
        assert_eq!(ghost.rect.pos(), IVec2::new(100, 500));
        assert_eq!(ghost.pose, Pose::Idle);

        ghost.update();
        assert_eq!(ghost.rect.pos(), IVec2::new(105, 500));
        assert_eq!(ghost.pose, Pose::Walk);

        ghost.update();
        assert_eq!(ghost.rect.pos(), IVec2::new(110, 489));
        assert_eq!(ghost.pose, Pose::Jump);
        assert!(ghost.is_exhausted());

        for _ in 0..10 {
            ghost.update();
        }
        assert_eq!(ghost.rect.pos(), IVec2::new(110, 489));
        assert_eq!(ghost.pose, Pose::Jump);
        assert_eq!(ghost.cursor(), 3);
    }

    #[test]
    fn test_ghost_trail_is_bounded() {
        let frames = vec![DisplacementFrame::new(1, 0); 20];
        let mut ghost = Ghost::new(Recording::from(frames), IVec2::ZERO);
        for _ in 0..20 {
            ghost.update();
        }
        assert_eq!(ghost.trail.len(), GHOST_TRAIL_LENGTH);
        assert_eq!(ghost.trail.first(), Some(&IVec2::new(13, 0)));
        assert_eq!(ghost.trail.last(), Some(&IVec2::new(20, 0)));
    }

    #[test]
    fn test_actors_share_interface() {
        let surfaces = [floor()];
        let input = TickInput::right();
        let ctx = TickContext {
            input: &input,
            surfaces: &surfaces,
        };

        let mut actors: Vec<Box<dyn Actor>> = vec![
            Box::new(Player::new(IVec2::new(100, 500))),
            Box::new(Ghost::new(
                Recording::from(vec![DisplacementFrame::ZERO]),
                IVec2::new(100, 500),
            )),
        ];

        let positions: Vec<IVec2> = actors.iter_mut().map(|a| a.advance(&ctx)).collect();
        assert_eq!(positions, vec![IVec2::new(105, 500), IVec2::new(100, 500)]);
        assert!(actors.iter().all(|a| a.rect().w == ACTOR_WIDTH));
    }

    proptest! {
        #[test]
        fn ghost_position_is_prefix_sum(
            steps in prop::collection::vec((-10i32..10, -15i32..15), 0..120),
            extra in 0usize..50,
        ) {
            let frames: Vec<DisplacementFrame> = steps
                .iter()
                .map(|(dx, dy)| DisplacementFrame::new(*dx, *dy))
                .collect();
            let recording = Recording::from(frames);
            let start = IVec2::new(100, 500);
            let mut ghost = Ghost::new(recording.clone(), start);

            for t in 1..=recording.len() {
                ghost.update();
                prop_assert_eq!(ghost.rect.pos(), start + recording.net_displacement(t));
            }

            let frozen = ghost.rect.pos();
            for _ in 0..extra {
                ghost.update();
                prop_assert_eq!(ghost.rect.pos(), frozen);
            }
        }
    }
}
