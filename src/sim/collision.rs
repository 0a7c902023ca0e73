//! Pairwise axis-aligned collision resolution
//!
//! Detects projected bounding-box contact between a moving rectangle and a
//! partner, then reflects velocity on the axis of contact.
//!
//! The two per-axis checks are independent, not mutually exclusive, so a
//! corner contact can negate both components in the same tick. That corner
//! double-bounce is deliberate and pinned by tests.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Per-axis reflection outcome of a bounds or collision check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    /// Horizontal velocity was negated
    pub x: bool,
    /// Vertical velocity was negated
    pub y: bool,
}

impl Reflection {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Check whether `a`, displaced by its current velocity, would overlap `b`
/// at `b`'s current position (inclusive on shared edges)
pub fn projected_overlap(a: &Entity, b: &Entity) -> bool {
    a.right() + a.vel.x >= b.left()
        && a.left() + a.vel.x <= b.right()
        && a.bottom() + a.vel.y >= b.top()
        && a.top() + a.vel.y <= b.bottom()
}

/// Detect projected contact between moving `a` and partner `b` (static or
/// moving) and negate `a`'s velocity on each axis of contact.
///
/// The horizontal check pairs `a`'s projected horizontal span with the
/// current vertical spans; the vertical check is the mirror image. Consistent
/// with [`check_bounds`](super::bounds::check_bounds), detection is pre-move,
/// so the two compose within one tick.
///
/// Velocity only: no push-out, no restitution. `a` still advances by the
/// (possibly just-reflected) velocity this tick, so a transient overlap on
/// the contact tick is expected; the pair separates on the following tick.
/// Only `a` is mutated; for two movers, resolve each direction as its own
/// configured pair.
pub fn resolve_pair(a: &mut Entity, b: &Entity) -> Reflection {
    let mut reflected = Reflection::default();

    // Horizontal contact: projected x-span against b, current y-spans overlapping
    if a.right() + a.vel.x >= b.left()
        && a.left() + a.vel.x <= b.right()
        && a.top() <= b.bottom()
        && a.bottom() >= b.top()
    {
        a.vel.x = -a.vel.x;
        reflected.x = true;
    }

    // Vertical contact: projected y-span against b, current x-spans overlapping
    if a.bottom() + a.vel.y >= b.top()
        && a.top() + a.vel.y <= b.bottom()
        && a.right() >= b.left()
        && a.left() <= b.right()
    {
        a.vel.y = -a.vel.y;
        reflected.y = true;
    }

    reflected
}
