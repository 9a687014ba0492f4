//! Meteor spawning and difficulty ramp
//!
//! Both timers are plain accumulators advanced by `dt`, so spawning is a pure
//! function of elapsed playtime and the RNG.

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityId, EntityKind, GameState, Meteor, SessionState};
use crate::consts::*;

/// Advance spawn and ramp timers and create at most one meteor
pub fn advance(state: &mut GameState, dt: f32) -> Option<EntityId> {
    let dt_ms = dt * 1000.0;
    ramp_difficulty(&mut state.session, dt_ms);

    state.session.since_spawn_ms += dt_ms;
    if state.session.since_spawn_ms <= state.session.spawn_interval_ms {
        return None;
    }
    // Backpressure: hold the timer until a slot frees up
    if state.entities.count_of_kind(EntityKind::Meteor) >= MAX_METEORS {
        return None;
    }

    state.session.since_spawn_ms = 0.0;
    Some(spawn_meteor(state))
}

/// Drop the spawn interval by one step for every full ramp period elapsed
pub fn ramp_difficulty(session: &mut SessionState, dt_ms: f32) {
    session.since_ramp_ms += dt_ms;
    while session.since_ramp_ms > RAMP_PERIOD_MS {
        session.since_ramp_ms -= RAMP_PERIOD_MS;
        session.spawn_interval_ms =
            (session.spawn_interval_ms - SPAWN_INTERVAL_STEP_MS).max(MIN_SPAWN_INTERVAL_MS);
        log::debug!("Spawn interval now {} ms", session.spawn_interval_ms);
    }
}

/// Create one meteor above the top edge with randomized drift, speed and spin
pub fn spawn_meteor(state: &mut GameState) -> EntityId {
    let width = state.playfield.width;
    let (lo, hi) = (METEOR_EDGE_MARGIN, width - METEOR_EDGE_MARGIN);
    let rng = &mut state.rng;

    let x = if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        width / 2.0
    };
    let y = rng.random_range(METEOR_SPAWN_Y_MIN..=METEOR_SPAWN_Y_MAX);
    let direction =
        Vec2::new(rng.random_range(-METEOR_DRIFT..=METEOR_DRIFT), 1.0).normalize_or(Vec2::Y);
    let speed = rng.random_range(METEOR_SPEED_MIN..=METEOR_SPEED_MAX);
    let spin = rng.random_range(METEOR_SPIN_MIN..=METEOR_SPIN_MAX);

    let meteor = Meteor::new(Vec2::new(x, y), direction, speed, spin, state.shapes.meteor.size);
    state.session.meteors_spawned += 1;
    log::trace!("Meteor spawned at ({x:.0}, {y:.0})");
    state.entities.add(Entity::Meteor(meteor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Playfield;
    use crate::sim::state::Shapes;
    use proptest::prelude::*;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Playfield::default(), Shapes::default());
        state.start_session();
        state
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let mut state = playing_state(3);
        assert!(advance(&mut state, 0.5).is_none());
        assert!(advance(&mut state, 0.5).is_none(), "exactly 1000 ms does not exceed");
        assert!(advance(&mut state, 0.01).is_some());
        assert_eq!(state.session.since_spawn_ms, 0.0);
        assert_eq!(state.session.meteors_spawned, 1);
    }

    #[test]
    fn test_spawned_meteor_parameters() {
        let mut state = playing_state(11);
        for _ in 0..200 {
            let id = spawn_meteor(&mut state);
            let Some(Entity::Meteor(m)) = state.entities.get(id) else {
                panic!("missing meteor");
            };
            assert!((50.0..=1230.0).contains(&m.pos.x));
            assert!((-150.0..=-50.0).contains(&m.pos.y));
            assert!((m.direction.length() - 1.0).abs() < 1e-5);
            assert!(m.direction.y > 0.99);
            assert!((160.0..=200.0).contains(&m.speed));
            assert!((40.0..=80.0).contains(&m.rotation_rate));
            state.entities.remove(id);
            state.entities.sweep();
        }
    }

    #[test]
    fn test_narrow_playfield_spawns_centered() {
        let mut state = GameState::new(5, Playfield::new(80.0, 600.0), Shapes::default());
        state.start_session();
        let id = spawn_meteor(&mut state);
        let Some(Entity::Meteor(m)) = state.entities.get(id) else {
            panic!("missing meteor");
        };
        assert_eq!(m.pos.x, 40.0);
    }

    #[test]
    fn test_ramp_steps_and_floor() {
        let mut session = SessionState::default();
        ramp_difficulty(&mut session, 5000.0);
        assert_eq!(session.spawn_interval_ms, 1000.0);
        ramp_difficulty(&mut session, 1.0);
        assert_eq!(session.spawn_interval_ms, 900.0);

        // A stall covering many periods catches up in one call
        ramp_difficulty(&mut session, 5000.0 * 20.0);
        assert_eq!(session.spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_full_field_holds_spawn() {
        let mut state = playing_state(8);
        for _ in 0..MAX_METEORS {
            spawn_meteor(&mut state);
        }
        assert!(advance(&mut state, 2.0).is_none());
        assert!(state.session.since_spawn_ms > state.session.spawn_interval_ms);

        let first = state.entities.ids_of_kind(EntityKind::Meteor)[0];
        state.entities.remove(first);
        assert!(advance(&mut state, 0.0).is_some());
    }

    proptest! {
        #[test]
        fn prop_meteor_cap_holds(seed in any::<u64>(), dts in prop::collection::vec(0.0f32..3.0, 1..200)) {
            let mut state = playing_state(seed);
            for dt in dts {
                advance(&mut state, dt);
                prop_assert!(state.entities.count_of_kind(EntityKind::Meteor) <= MAX_METEORS);
            }
        }

        #[test]
        fn prop_interval_monotonic_with_floor(dts in prop::collection::vec(0u32..20_000, 1..100)) {
            let mut session = SessionState::default();
            let mut elapsed = 0u64;
            let mut previous = session.spawn_interval_ms;
            for dt in dts {
                // Whole milliseconds keep the f32 accumulator exact
                ramp_difficulty(&mut session, dt as f32);
                elapsed += dt as u64;
                prop_assert!(session.spawn_interval_ms <= previous);
                prop_assert!(session.spawn_interval_ms >= MIN_SPAWN_INTERVAL_MS);
                previous = session.spawn_interval_ms;

                let steps = elapsed.saturating_sub(1) / RAMP_PERIOD_MS as u64;
                let expected = 1000.0f32 - 100.0 * steps.min(8) as f32;
                prop_assert_eq!(session.spawn_interval_ms, expected);
            }
        }
    }
}
