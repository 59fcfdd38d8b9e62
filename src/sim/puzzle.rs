//! Puzzle elements: pressure button, gated door, moving platform

use super::rect::Rect;

/// A pressure button, pressed while any tracked actor stands on it
#[derive(Debug, Clone)]
pub struct Button {
    pub rect: Rect,
    pub pressed: bool,
}

impl Button {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            pressed: false,
        }
    }

    /// Recompute `pressed` from scratch. Not sticky, not debounced.
    pub fn update<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = Rect>,
    {
        self.pressed = entities.into_iter().any(|r| self.rect.overlaps(&r));
    }
}

/// A door that is open exactly while its button is pressed
#[derive(Debug, Clone)]
pub struct Door {
    pub rect: Rect,
    pub open: bool,
}

impl Door {
    pub fn new(rect: Rect) -> Self {
        Self { rect, open: false }
    }

    /// Must run after the button's update in the same tick
    pub fn update(&mut self, button: &Button) {
        self.open = button.pressed;
    }
}

/// A platform sliding back and forth between two x bounds.
///
/// Its rectangle is both drawn and collided with.
#[derive(Debug, Clone)]
pub struct MovingPlatform {
    pub rect: Rect,
    pub min_x: i32,
    pub max_x: i32,
    /// Units per tick
    pub speed: i32,
    /// +1 moving right, -1 moving left
    pub direction: i32,
}

impl MovingPlatform {
    pub fn new(rect: Rect, min_x: i32, max_x: i32, speed: i32) -> Self {
        Self {
            rect,
            min_x,
            max_x,
            speed,
            direction: 1,
        }
    }

    /// Move one tick, clamping to the bounds and reversing at them
    pub fn update(&mut self) {
        self.rect.x += self.speed * self.direction;
        if self.rect.x < self.min_x {
            self.rect.x = self.min_x;
            self.direction = 1;
        } else if self.rect.x > self.max_x {
            self.rect.x = self.max_x;
            self.direction = -1;
        }
    }
}
