//! Boxbounce headless demo
//!
//! Builds a small session - a scatter of wall-bouncing movers, one mover/
//! obstacle collision pair, and a firing mover - then drives it for a fixed
//! number of ticks at the nominal 60 Hz step and prints the outcome as JSON.
//!
//! Usage: `boxbounce [seed] [ticks]`. Set `RUST_LOG=debug` for per-bounce
//! detail.

use glam::Vec2;

use boxbounce::consts::*;
use boxbounce::sim::{
    EntityClass, EntitySpec, RngState, SimConfig, SimEvent, SimState, TickInput, tick,
};

fn demo_config() -> SimConfig {
    let mut config = SimConfig::with_field(FIELD_WIDTH, FIELD_HEIGHT);
    config.entities = vec![
        // A bouncing mover paired against a static block, collisions_lab style
        EntitySpec::new(
            EntityClass::Mover,
            Vec2::new(40.0, 40.0),
            Vec2::new(24.0, 24.0),
            Vec2::new(MOVER_SPEED, MOVER_SPEED),
        ),
        EntitySpec::new(
            EntityClass::Obstacle,
            Vec2::new(320.0, 160.0),
            Vec2::new(60.0, 80.0),
            Vec2::ZERO,
        ),
        // A shooter that stays put and fires across the field
        EntitySpec::new(
            EntityClass::Mover,
            Vec2::new(60.0, 180.0),
            Vec2::new(30.0, 30.0),
            Vec2::ZERO,
        ),
    ];
    config.collision_pairs = vec![(1, 2)];
    config
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    log::info!("boxbounce demo starting, seed {seed}, {ticks} ticks");

    let config = demo_config();
    let mut state = match SimState::new(&config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    // Extra wall-only movers, deterministic for the seed
    let mut rng = RngState::new(seed).to_rng();
    state.scatter_movers(4, Vec2::new(20.0, 20.0), MOVER_SPEED, &mut rng);

    let mut wall_bounces = 0u64;
    let mut pair_bounces = 0u64;
    let mut hits = 0u64;

    for n in 0..ticks {
        // The shooter fires toward the obstacle every tick; the cooldown
        // decides which requests actually spawn a projectile.
        let input = TickInput {
            fire: vec![(3, Vec2::new(PROJECTILE_SPEED, 0.0))],
            ..Default::default()
        };
        let events = tick(&mut state, &input, SIM_DT);
        for event in &events {
            match event {
                SimEvent::WallBounce { .. } => wall_bounces += 1,
                SimEvent::PairBounce { .. } => pair_bounces += 1,
                SimEvent::ProjectileHit { .. } => hits += 1,
                SimEvent::SessionOver { won } => {
                    log::info!("session over at tick {n}: won={won}");
                }
                _ => {}
            }
        }
        if !state.session.running {
            break;
        }
    }

    log::info!(
        "finished after {} ticks: {wall_bounces} wall bounces, {pair_bounces} pair bounces, {hits} hits",
        state.time_ticks
    );

    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to serialize final state: {err}");
            std::process::exit(1);
        }
    }
}
