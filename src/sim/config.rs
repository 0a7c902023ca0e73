//! Session configuration and fail-fast validation
//!
//! All inputs here are programmer-supplied setup, not user input. Malformed
//! configuration (zero-size entity, negative field, dangling pair ids) is
//! rejected with a descriptive error at session setup; nothing is fallible
//! mid-session.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Field;
use super::entity::{EntityClass, EntityId};

/// Initial state for one entity
///
/// Ids are assigned from declaration order at setup (first spec gets id 1),
/// so `collision_pairs` can reference entities before they exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpec {
    pub class: EntityClass,
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub vel: Vec2,
}

impl EntitySpec {
    pub fn new(class: EntityClass, pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Self {
            class,
            pos,
            size,
            vel,
        }
    }
}

/// Complete session configuration, fixed at session start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub field: Field,
    /// Distance past a field edge at which a projectile is dropped
    #[serde(default = "default_removal_margin")]
    pub removal_margin: f32,
    /// Score at which the session ends
    #[serde(default = "default_win_score")]
    pub win_score: u64,
    #[serde(default = "default_lives")]
    pub starting_lives: u8,
    /// Seconds between accepted fire requests per mover
    #[serde(default = "default_fire_cooldown")]
    pub fire_cooldown: f32,
    pub entities: Vec<EntitySpec>,
    /// (mover id, partner id) pairs the resolver checks each tick, in order
    #[serde(default)]
    pub collision_pairs: Vec<(EntityId, EntityId)>,
}

fn default_removal_margin() -> f32 {
    crate::consts::REMOVAL_MARGIN
}

fn default_win_score() -> u64 {
    crate::consts::WIN_SCORE
}

fn default_lives() -> u8 {
    crate::consts::STARTING_LIVES
}

fn default_fire_cooldown() -> f32 {
    crate::consts::FIRE_COOLDOWN
}

impl SimConfig {
    /// A config with no entities and the crate defaults
    pub fn with_field(width: f32, height: f32) -> Self {
        Self {
            field: Field::new(width, height),
            removal_margin: default_removal_margin(),
            win_score: default_win_score(),
            starting_lives: default_lives(),
            fire_cooldown: default_fire_cooldown(),
            entities: Vec::new(),
            collision_pairs: Vec::new(),
        }
    }

    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The id an entity spec at `index` will receive at setup
    pub fn id_for_index(index: usize) -> EntityId {
        index as EntityId + 1
    }

    /// Validate the whole configuration, failing fast on the first problem
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field.width > 0.0 && self.field.height > 0.0)
            || !self.field.width.is_finite()
            || !self.field.height.is_finite()
        {
            return Err(ConfigError::BadField {
                width: self.field.width,
                height: self.field.height,
            });
        }
        if !(self.removal_margin >= 0.0) || !self.removal_margin.is_finite() {
            return Err(ConfigError::BadRemovalMargin {
                margin: self.removal_margin,
            });
        }
        if self.win_score == 0 {
            return Err(ConfigError::BadWinScore);
        }
        if !(self.fire_cooldown >= 0.0) || !self.fire_cooldown.is_finite() {
            return Err(ConfigError::BadCooldown {
                seconds: self.fire_cooldown,
            });
        }

        for (index, spec) in self.entities.iter().enumerate() {
            let id = Self::id_for_index(index);
            if !(spec.size.x > 0.0 && spec.size.y > 0.0) || !spec.size.is_finite() {
                return Err(ConfigError::BadSize { id, size: spec.size });
            }
            if !spec.pos.is_finite() || !spec.vel.is_finite() {
                return Err(ConfigError::NonFinite { id });
            }
        }

        let class_of = |id: EntityId| {
            let index = id.checked_sub(1)? as usize;
            self.entities.get(index).map(|s| s.class)
        };
        for &(a, b) in &self.collision_pairs {
            let (Some(a_class), Some(b_class)) = (class_of(a), class_of(b)) else {
                return Err(ConfigError::UnknownPair { a, b });
            };
            if a_class != EntityClass::Mover {
                return Err(ConfigError::PairNotMover { id: a });
            }
            if b_class == EntityClass::Projectile || a == b {
                return Err(ConfigError::BadPartner { a, b });
            }
        }

        Ok(())
    }
}

/// Setup-time configuration failure
#[derive(Debug)]
pub enum ConfigError {
    /// Field dimensions must be strictly positive and finite
    BadField { width: f32, height: f32 },
    /// Removal margin must be non-negative and finite
    BadRemovalMargin { margin: f32 },
    /// Win score must be at least 1
    BadWinScore,
    /// Fire cooldown must be non-negative and finite
    BadCooldown { seconds: f32 },
    /// Entity size must be strictly positive on both axes
    BadSize { id: EntityId, size: Vec2 },
    /// Entity position or velocity is NaN or infinite
    NonFinite { id: EntityId },
    /// Collision pair references an id that was never declared
    UnknownPair { a: EntityId, b: EntityId },
    /// The first member of a collision pair must be a mover
    PairNotMover { id: EntityId },
    /// Partner must be a distinct mover or obstacle
    BadPartner { a: EntityId, b: EntityId },
    /// Configuration JSON failed to parse
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadField { width, height } => write!(
                f,
                "field dimensions must be positive and finite, got {width}x{height}"
            ),
            Self::BadRemovalMargin { margin } => {
                write!(f, "removal margin must be non-negative, got {margin}")
            }
            Self::BadWinScore => write!(f, "win score must be at least 1"),
            Self::BadCooldown { seconds } => {
                write!(f, "fire cooldown must be non-negative, got {seconds}s")
            }
            Self::BadSize { id, size } => write!(
                f,
                "entity {id} size must be positive on both axes, got {}x{}",
                size.x, size.y
            ),
            Self::NonFinite { id } => {
                write!(f, "entity {id} has a non-finite position or velocity")
            }
            Self::UnknownPair { a, b } => {
                write!(f, "collision pair ({a}, {b}) references an unknown entity id")
            }
            Self::PairNotMover { id } => {
                write!(f, "collision pair must start with a mover, entity {id} is not one")
            }
            Self::BadPartner { a, b } => write!(
                f,
                "collision pair ({a}, {b}) partner must be a distinct mover or obstacle"
            ),
            Self::Parse(err) => write!(f, "configuration JSON is invalid: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
