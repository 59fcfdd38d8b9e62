//! Axis-aligned integer rectangles
//!
//! Screen space: x grows right, y grows down. A rectangle covers
//! `[x, x + w) x [y, y + h)`.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from the `[x, y, w, h]` array form used in level files
    pub const fn from_array(r: [i32; 4]) -> Self {
        Self::new(r[0], r[1], r[2], r[3])
    }

    /// Rectangle of the given size with its top-left corner at `pos`
    pub fn at(pos: IVec2, w: i32, h: i32) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Move so the bottom edge sits at `y`
    #[inline]
    pub fn set_bottom(&mut self, y: i32) {
        self.y = y - self.h;
    }

    /// Shift by a displacement
    #[inline]
    pub fn translate(&mut self, delta: IVec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// True if the rectangle has no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Strict overlap test. Rectangles that only share an edge do not
    /// overlap, and an empty rectangle overlaps nothing.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

impl From<[i32; 4]> for Rect {
    fn from(r: [i32; 4]) -> Self {
        Self::from_array(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_interior() {
        let a = Rect::new(0, 0, 40, 60);
        let b = Rect::new(20, 30, 40, 60);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        // Actor standing exactly on a floor
        let actor = Rect::new(100, 500, 40, 60);
        let floor = Rect::new(0, 560, 800, 40);
        assert!(!actor.overlaps(&floor));

        // Side by side
        let left = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        assert!(!left.overlaps(&right));
    }

    #[test]
    fn test_one_unit_penetration_overlaps() {
        let actor = Rect::new(100, 501, 40, 60);
        let floor = Rect::new(0, 560, 800, 40);
        assert!(actor.overlaps(&floor));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let empty = Rect::new(5, 5, 0, 10);
        let big = Rect::new(0, 0, 100, 100);
        assert!(!empty.overlaps(&big));
        assert!(!big.overlaps(&empty));
    }

    #[test]
    fn test_set_bottom_and_translate() {
        let mut r = Rect::new(10, 10, 40, 60);
        r.set_bottom(560);
        assert_eq!(r.y, 500);
        assert_eq!(r.bottom(), 560);

        r.translate(IVec2::new(-5, 3));
        assert_eq!(r.pos(), IVec2::new(5, 503));
    }
}
