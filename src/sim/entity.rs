//! Entity state and bounding-box accessors
//!
//! An entity is plain data: top-left position, size, and per-tick velocity.
//! Mutation happens only inside the tick driver and the collision resolvers,
//! never concurrently.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique entity identifier, assigned at session setup
pub type EntityId = u32;

/// Entity class, determines which tick-driver rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityClass {
    /// Bounces off field edges and configured collision partners
    Mover,
    /// Static body; never moved by the simulation
    Obstacle,
    /// Advances ignoring walls; removed past the removal margin or on hit
    Projectile,
}

/// An axis-aligned rectangle with a per-tick velocity
///
/// `pos` is the top-left corner; y grows downward (screen coordinates).
/// Velocity is a displacement per tick, and reflection only ever negates a
/// component, never rescales it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub class: EntityClass,
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height, both strictly positive
    pub size: Vec2,
    /// Displacement applied once per tick
    pub vel: Vec2,
}

impl Entity {
    pub fn new(id: EntityId, class: EntityClass, pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            class,
            pos,
            size,
            vel,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Apply velocity to position: one add, both axes
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Current-position bounding-box overlap with another entity (inclusive)
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }
}
