//! Simulation and session state
//!
//! Everything a tick mutates lives here: class-separated entity lists, the
//! fire-cooldown timers, and the explicit session scoreboard. Iteration
//! order is stable (entities are kept sorted by id) so a seeded session
//! replays identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Field;
use super::collision::Reflection;
use super::config::{ConfigError, SimConfig};
use super::entity::{Entity, EntityClass, EntityId};

/// Events emitted by one tick, in the order they occurred
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A mover reflected off a field edge
    WallBounce { id: EntityId, reflected: Reflection },
    /// A mover reflected off a configured partner
    PairBounce {
        id: EntityId,
        partner: EntityId,
        reflected: Reflection,
    },
    /// A projectile was spawned by an accepted fire request
    ProjectileFired { id: EntityId, by: EntityId },
    /// A projectile struck an obstacle; both were removed
    ProjectileHit { id: EntityId, target: EntityId },
    /// A projectile left the field past the removal margin
    ProjectileExpired { id: EntityId },
    /// The session reached a terminal condition this tick
    SessionOver { won: bool },
}

/// Explicit per-session scoreboard
///
/// Score, life count, and running flag travel through the tick driver as a
/// value instead of living in ambient globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub lives: u8,
    pub running: bool,
}

impl SessionState {
    pub fn new(lives: u8) -> Self {
        Self {
            score: 0,
            lives,
            running: true,
        }
    }

    /// Deduct one life. The caller owns the rules for when this happens; the
    /// tick driver only observes the result.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }
}

/// RNG state wrapper, kept re-seedable for reproducibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Per-mover fire cooldown timer, in seconds remaining
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cooldown {
    pub id: EntityId,
    pub remaining: f32,
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub field: Field,
    pub removal_margin: f32,
    pub win_score: u64,
    pub fire_cooldown: f32,
    /// Wall-bouncing entities (sorted by id)
    pub movers: Vec<Entity>,
    /// Static bodies (sorted by id)
    pub obstacles: Vec<Entity>,
    /// Live projectiles, owned exclusively by the tick driver (sorted by id)
    pub projectiles: Vec<Entity>,
    /// Pairs the resolver checks each tick, in configured order
    pub collision_pairs: Vec<(EntityId, EntityId)>,
    /// One timer per mover
    pub cooldowns: Vec<Cooldown>,
    pub session: SessionState,
    /// Monotonic tick counter
    pub time_ticks: u64,
    next_id: EntityId,
}

impl SimState {
    /// Build a session from a validated configuration
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            field: config.field,
            removal_margin: config.removal_margin,
            win_score: config.win_score,
            fire_cooldown: config.fire_cooldown,
            movers: Vec::new(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            collision_pairs: config.collision_pairs.clone(),
            cooldowns: Vec::new(),
            session: SessionState::new(config.starting_lives),
            time_ticks: 0,
            next_id: 1,
        };

        for spec in &config.entities {
            let id = state.next_entity_id();
            let entity = Entity::new(id, spec.class, spec.pos, spec.size, spec.vel);
            match spec.class {
                EntityClass::Mover => {
                    state.cooldowns.push(Cooldown { id, remaining: 0.0 });
                    state.movers.push(entity);
                }
                EntityClass::Obstacle => state.obstacles.push(entity),
                EntityClass::Projectile => state.projectiles.push(entity),
            }
        }
        state.normalize_order();

        Ok(state)
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn mover(&self, id: EntityId) -> Option<&Entity> {
        self.movers.iter().find(|m| m.id == id)
    }

    pub fn mover_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.movers.iter_mut().find(|m| m.id == id)
    }

    /// Look up a collision partner by id (movers first, then obstacles)
    pub fn partner(&self, id: EntityId) -> Option<Entity> {
        self.mover(id)
            .or_else(|| self.obstacles.iter().find(|o| o.id == id))
            .copied()
    }

    /// Spawn a projectile at a mover's leading edge with the given velocity,
    /// subject to that mover's cooldown. Returns the projectile id if a
    /// projectile was actually spawned.
    ///
    /// The projectile's trailing edge sits on the mover's leading edge along
    /// each axis the fire velocity moves on; it is centered on the other
    /// axis, so a horizontal shot leaves the firer's box immediately.
    pub fn try_fire(&mut self, from: EntityId, vel: Vec2) -> Option<EntityId> {
        let mover = *self.mover(from)?;

        let cooldown = self.cooldowns.iter_mut().find(|c| c.id == from)?;
        if cooldown.remaining > 0.0 {
            return None;
        }
        cooldown.remaining = self.fire_cooldown;

        let size = Vec2::new(
            crate::consts::PROJECTILE_WIDTH,
            crate::consts::PROJECTILE_HEIGHT,
        );
        let mut pos = mover.center() - size / 2.0;
        if vel.x > 0.0 {
            pos.x = mover.right();
        } else if vel.x < 0.0 {
            pos.x = mover.left() - size.x;
        }
        if vel.y > 0.0 {
            pos.y = mover.bottom();
        } else if vel.y < 0.0 {
            pos.y = mover.top() - size.y;
        }

        let id = self.next_entity_id();
        self.projectiles
            .push(Entity::new(id, EntityClass::Projectile, pos, size, vel));
        Some(id)
    }

    /// Scatter `count` wall-bouncing movers across the field with positions
    /// and velocity signs drawn from the given RNG. Deterministic for a
    /// given seed; used by headless runs and tests.
    pub fn scatter_movers(&mut self, count: usize, size: Vec2, speed: f32, rng: &mut Pcg32) {
        for _ in 0..count {
            let x = rng.random_range(0.0..(self.field.width - size.x).max(1.0));
            let y = rng.random_range(0.0..(self.field.height - size.y).max(1.0));
            let vx = if rng.random_bool(0.5) { speed } else { -speed };
            let vy = if rng.random_bool(0.5) { speed } else { -speed };

            let id = self.next_entity_id();
            self.cooldowns.push(Cooldown { id, remaining: 0.0 });
            self.movers.push(Entity::new(
                id,
                EntityClass::Mover,
                Vec2::new(x, y),
                size,
                Vec2::new(vx, vy),
            ));
        }
        self.normalize_order();
    }

    /// Ensure entity lists are sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.movers.sort_by_key(|e| e.id);
        self.obstacles.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|e| e.id);
    }
}
