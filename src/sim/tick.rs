//! Fixed timestep simulation tick
//!
//! One tick advances the whole session deterministically, in this order:
//!
//! 1. Inbound control: velocity overrides, then cooldown-gated fire requests.
//! 2. Bounds check for every mover (velocity only).
//! 3. Pairwise collision for every configured pair (velocity only).
//! 4. Projectile hit detection against obstacles (projected position).
//! 5. Apply velocity to position, one add per entity.
//! 6. Drop projectiles past the removal margin.
//!
//! Steps 2 and 3 both evaluate projected next-tick positions, so they
//! compose within the tick; position moves once, at step 5, by whatever
//! velocity survived the checks. None of this is fallible: setup validation
//! has already run, and the remaining edge cases (tunneling, corner
//! double-bounce) are documented behavior.

use glam::Vec2;
use log::{debug, info};

use super::bounds::check_bounds;
use super::collision::{projected_overlap, resolve_pair};
use super::entity::EntityId;
use super::state::{SimEvent, SimState};

/// Inbound control for one tick, produced by the excluded input layer
///
/// Keyboard/mouse state has already been translated into velocity values by
/// the host; this module never polls devices.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Replace a mover's velocity before physics runs
    pub velocity_overrides: Vec<(EntityId, Vec2)>,
    /// Spawn a projectile from this mover with this velocity, subject to the
    /// mover's fire cooldown
    pub fire: Vec<(EntityId, Vec2)>,
}

/// Advance the session by one fixed timestep
///
/// `dt` is the host's tick duration in seconds; it only drives the fire
/// cooldown timers, never the displacement (velocity is per-tick). A session
/// whose running flag is clear ignores ticks entirely.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();

    if !state.session.running {
        return events;
    }

    state.time_ticks += 1;

    for cooldown in &mut state.cooldowns {
        cooldown.remaining = (cooldown.remaining - dt).max(0.0);
    }

    // 1. Inbound control
    for &(id, vel) in &input.velocity_overrides {
        if let Some(mover) = state.mover_mut(id) {
            mover.vel = vel;
        }
    }
    for &(id, vel) in &input.fire {
        if let Some(projectile_id) = state.try_fire(id, vel) {
            debug!("mover {id} fired projectile {projectile_id}");
            events.push(SimEvent::ProjectileFired {
                id: projectile_id,
                by: id,
            });
        }
    }

    // 2. Walls (velocity only)
    let field = state.field;
    for mover in &mut state.movers {
        let reflected = check_bounds(mover, &field);
        if reflected.any() {
            debug!("mover {} wall bounce x={} y={}", mover.id, reflected.x, reflected.y);
            events.push(SimEvent::WallBounce {
                id: mover.id,
                reflected,
            });
        }
    }

    // 3. Configured pairs (velocity only), in configured order
    let pairs = state.collision_pairs.clone();
    for (mover_id, partner_id) in pairs {
        // Snapshot the partner so a mover can be checked against another
        // mover without aliasing; setup validation guarantees both exist.
        let Some(partner) = state.partner(partner_id) else {
            continue;
        };
        let Some(mover) = state.mover_mut(mover_id) else {
            continue;
        };
        let reflected = resolve_pair(mover, &partner);
        if reflected.any() {
            debug!(
                "mover {mover_id} bounced off {partner_id} x={} y={}",
                reflected.x, reflected.y
            );
            events.push(SimEvent::PairBounce {
                id: mover_id,
                partner: partner_id,
                reflected,
            });
        }
    }

    // 4. Projectile hits (projected position), removing both sides
    let mut hits: Vec<(EntityId, EntityId)> = Vec::new();
    for projectile in &state.projectiles {
        for obstacle in &state.obstacles {
            if projected_overlap(projectile, obstacle) {
                hits.push((projectile.id, obstacle.id));
                break;
            }
        }
    }
    for (projectile_id, target_id) in hits {
        state.projectiles.retain(|p| p.id != projectile_id);
        state.obstacles.retain(|o| o.id != target_id);
        state.session.score += 1;
        info!(
            "projectile {projectile_id} hit {target_id}, score {}",
            state.session.score
        );
        events.push(SimEvent::ProjectileHit {
            id: projectile_id,
            target: target_id,
        });
    }

    // 5. Move everything that moves
    for mover in &mut state.movers {
        mover.advance();
    }
    for projectile in &mut state.projectiles {
        projectile.advance();
    }

    // 6. Drop projectiles that left the field, before the next tick begins
    let margin = state.removal_margin;
    state.projectiles.retain(|projectile| {
        if field.beyond_margin(projectile, margin) {
            debug!("projectile {} expired off-field", projectile.id);
            events.push(SimEvent::ProjectileExpired { id: projectile.id });
            false
        } else {
            true
        }
    });

    // Terminal condition: win score reached or lives exhausted
    if state.session.score >= state.win_score || state.session.lives == 0 {
        let won = state.session.score >= state.win_score;
        state.session.running = false;
        info!(
            "session over after {} ticks: {}",
            state.time_ticks,
            if won { "won" } else { "out of lives" }
        );
        events.push(SimEvent::SessionOver { won });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::config::{EntitySpec, SimConfig};
    use crate::sim::entity::EntityClass;
    use glam::Vec2;

    fn mover_spec(pos: (f32, f32), vel: (f32, f32)) -> EntitySpec {
        EntitySpec::new(
            EntityClass::Mover,
            Vec2::new(pos.0, pos.1),
            Vec2::new(20.0, 20.0),
            Vec2::new(vel.0, vel.1),
        )
    }

    fn obstacle_spec(pos: (f32, f32), size: (f32, f32)) -> EntitySpec {
        EntitySpec::new(
            EntityClass::Obstacle,
            Vec2::new(pos.0, pos.1),
            Vec2::new(size.0, size.1),
            Vec2::ZERO,
        )
    }

    #[test]
    fn test_wall_reflection_scenario() {
        // Field 700x400, mover at (690,10) size 20x20 vel (5,0): one tick
        // negates vx and lands at (685,10).
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.entities = vec![mover_spec((690.0, 10.0), (5.0, 0.0))];
        let mut state = SimState::new(&config).unwrap();

        let events = tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.movers[0].vel, Vec2::new(-5.0, 0.0));
        assert_eq!(state.movers[0].pos, Vec2::new(685.0, 10.0));
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::WallBounce { id: 1, reflected } if reflected.x && !reflected.y
        )));
    }

    #[test]
    fn test_pair_collision_scenario() {
        // Mover at (95,100) 10x10 vel (5,0) against a static 30x40 obstacle
        // at (100,90): vx negates and x lands on 90.
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.entities = vec![
            EntitySpec::new(
                EntityClass::Mover,
                Vec2::new(95.0, 100.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(5.0, 0.0),
            ),
            obstacle_spec((100.0, 90.0), (30.0, 40.0)),
        ];
        config.collision_pairs = vec![(1, 2)];
        let mut state = SimState::new(&config).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.movers[0].vel.x, -5.0);
        assert_eq!(state.movers[0].pos.x, 90.0);
    }

    #[test]
    fn test_idempotent_rest() {
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.entities = vec![mover_spec((300.0, 200.0), (0.0, 0.0))];
        let mut state = SimState::new(&config).unwrap();

        for _ in 0..120 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(events.is_empty());
        }
        assert_eq!(state.movers[0].pos, Vec2::new(300.0, 200.0));
    }

    #[test]
    fn test_two_movers_head_on() {
        // Symmetric pair config: each mover resolves against the other.
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.entities = vec![
            mover_spec((100.0, 100.0), (5.0, 0.0)),
            mover_spec((124.0, 100.0), (-5.0, 0.0)),
        ];
        config.collision_pairs = vec![(1, 2), (2, 1)];
        let mut state = SimState::new(&config).unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.movers[0].vel.x, -5.0);
        assert_eq!(state.movers[1].vel.x, 5.0);
    }

    #[test]
    fn test_fire_and_projectile_expiry() {
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.entities = vec![mover_spec((650.0, 200.0), (0.0, 0.0))];
        let mut state = SimState::new(&config).unwrap();

        let input = TickInput {
            fire: vec![(1, Vec2::new(14.0, 0.0))],
            ..Default::default()
        };
        let events = tick(&mut state, &input, SIM_DT);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::ProjectileFired { by: 1, .. })));
        assert_eq!(state.projectiles.len(), 1);

        // Projectile leaves the mover's right edge at x=670 moving +14/tick;
        // removal margin 50 puts the drop threshold at x > 750. Run until it
        // expires.
        let mut expired = false;
        for _ in 0..20 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            if events
                .iter()
                .any(|e| matches!(e, SimEvent::ProjectileExpired { .. }))
            {
                expired = true;
                break;
            }
        }
        assert!(expired);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_fire_cooldown_swallows_second_request() {
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.entities = vec![mover_spec((100.0, 200.0), (0.0, 0.0))];
        let mut state = SimState::new(&config).unwrap();

        let input = TickInput {
            fire: vec![(1, Vec2::new(14.0, 0.0))],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);

        // 0.3 s cooldown at 60 Hz elapses after 18 ticks
        for _ in 0..18 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_projectile_hit_scores_and_removes_both() {
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.win_score = 2;
        config.entities = vec![
            mover_spec((100.0, 200.0), (0.0, 0.0)),
            obstacle_spec((140.0, 190.0), (30.0, 60.0)),
        ];
        let mut state = SimState::new(&config).unwrap();

        let input = TickInput {
            fire: vec![(1, Vec2::new(14.0, 0.0))],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        let mut hit = false;
        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            if events
                .iter()
                .any(|e| matches!(e, SimEvent::ProjectileHit { .. }))
            {
                hit = true;
                break;
            }
        }
        assert!(hit);
        assert_eq!(state.session.score, 1);
        assert!(state.obstacles.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_session_ends_at_win_score_and_freezes() {
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.win_score = 1;
        config.entities = vec![
            mover_spec((100.0, 200.0), (0.0, 0.0)),
            obstacle_spec((140.0, 190.0), (30.0, 60.0)),
        ];
        let mut state = SimState::new(&config).unwrap();

        let input = TickInput {
            fire: vec![(1, Vec2::new(14.0, 0.0))],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let mut over = false;
        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            if events
                .iter()
                .any(|e| matches!(e, SimEvent::SessionOver { won: true }))
            {
                over = true;
                break;
            }
        }
        assert!(over);
        assert!(!state.session.running);

        // A stopped session ignores further ticks entirely.
        let ticks_before = state.time_ticks;
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, ticks_before);
    }

    #[test]
    fn test_lives_exhausted_ends_session() {
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.starting_lives = 1;
        config.entities = vec![mover_spec((300.0, 200.0), (4.0, 4.0))];
        let mut state = SimState::new(&config).unwrap();

        state.session.lose_life();
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::SessionOver { won: false })));
        assert!(!state.session.running);
    }

    #[test]
    fn test_velocity_override_applies_before_physics() {
        let mut config = SimConfig::with_field(700.0, 400.0);
        config.entities = vec![mover_spec((300.0, 200.0), (0.0, 0.0))];
        let mut state = SimState::new(&config).unwrap();

        let input = TickInput {
            velocity_overrides: vec![(1, Vec2::new(3.0, -3.0))],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.movers[0].pos, Vec2::new(303.0, 197.0));
    }
}
