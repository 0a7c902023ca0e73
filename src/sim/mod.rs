//! Deterministic simulation module
//!
//! All motion and collision logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod collision;
pub mod config;
pub mod entity;
pub mod state;
pub mod tick;

pub use bounds::{Field, check_bounds};
pub use collision::{Reflection, projected_overlap, resolve_pair};
pub use config::{ConfigError, EntitySpec, SimConfig};
pub use entity::{Entity, EntityClass, EntityId};
pub use state::{RngState, SessionState, SimEvent, SimState};
pub use tick::{TickInput, tick};
