//! Collision detection and response against platform surfaces
//!
//! Only one rule exists: an actor that overlaps a surface while falling
//! lands on top of it. Horizontal penetration and head bumps are never
//! corrected.

use super::rect::Rect;

/// Result of resolving an actor against the current surfaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingResult {
    /// Actor rectangle after resolution
    pub rect: Rect,
    /// Vertical velocity after resolution
    pub vel_y: f64,
    /// Whether the actor ended the tick standing on something
    pub grounded: bool,
}

/// Resolve landings against `surfaces`, tested in the given order.
///
/// `rect` is the actor after its vertical move. Each overlapping surface is
/// checked against the velocity as it stands at that point, so once one
/// surface zeroes the velocity later overlaps no longer snap.
pub fn resolve_landing(rect: Rect, vel_y: f64, surfaces: &[Rect]) -> LandingResult {
    let mut result = LandingResult {
        rect,
        vel_y,
        grounded: false,
    };

    for surface in surfaces {
        if result.rect.overlaps(surface) && result.vel_y > 0.0 {
            result.rect.set_bottom(surface.top());
            result.vel_y = 0.0;
            result.grounded = true;
        }
    }

    result
}

/// Collision surfaces for one tick: static platforms first, then the
/// moving platform at its current position.
pub fn surface_snapshot(platforms: &[Rect], moving: Option<Rect>) -> Vec<Rect> {
    let mut surfaces = Vec::with_capacity(platforms.len() + 1);
    surfaces.extend_from_slice(platforms);
    surfaces.extend(moving);
    surfaces
}
