//! Boxbounce - axis-aligned rectangle motion and collision simulation
//!
//! Core module:
//! - `sim`: Deterministic simulation (entities, wall bounds, pairwise
//!   collision, fixed-tick driver)
//!
//! The crate does no rendering, input polling, timing, or I/O of its own.
//! The host invokes [`sim::tick`] at a fixed cadence (nominally 60 Hz),
//! feeding translated input in and reading entity positions out after each
//! tick completes.

pub mod sim;

pub use sim::{
    ConfigError, Entity, EntityClass, Field, Reflection, SessionState, SimConfig, SimEvent,
    SimState, TickInput, tick,
};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz host callback cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default field dimensions
    pub const FIELD_WIDTH: f32 = 700.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Distance past a field edge at which a projectile is dropped
    pub const REMOVAL_MARGIN: f32 = 50.0;

    /// Default per-tick mover speed
    pub const MOVER_SPEED: f32 = 4.0;
    /// Default per-tick projectile speed
    pub const PROJECTILE_SPEED: f32 = 14.0;
    /// Projectile dimensions
    pub const PROJECTILE_WIDTH: f32 = 12.0;
    pub const PROJECTILE_HEIGHT: f32 = 4.0;

    /// Seconds between accepted fire requests per mover
    pub const FIRE_COOLDOWN: f32 = 0.3;

    /// Session defaults
    pub const WIN_SCORE: u64 = 3;
    pub const STARTING_LIVES: u8 = 5;
}
