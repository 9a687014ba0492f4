//! Movement for every entity kind
//!
//! All rates are per second and scaled by the tick's `dt`; there is no
//! upper bound on `dt`, so a long stall moves things a long way in one step.

use glam::Vec2;

use super::state::{Entity, EntityKind, GameEvent, GameState, Laser};
use super::tick::TickInput;
use crate::consts::{EXPLOSION_FPS, FIRE_COOLDOWN_MS};

/// Advance every movable entity by `dt` seconds
pub fn advance(state: &mut GameState, input: &TickInput, dt: f32) {
    state
        .entities
        .for_each_of_kind_mut(EntityKind::Laser, |_, entity| {
            if let Entity::Laser(laser) = entity {
                laser.pos.y -= laser.speed * dt;
            }
        });

    state
        .entities
        .for_each_of_kind_mut(EntityKind::Meteor, |_, entity| {
            if let Entity::Meteor(meteor) = entity {
                meteor.pos += meteor.direction * meteor.speed * dt;
                meteor.spin(meteor.rotation_rate * dt);
            }
        });

    state
        .entities
        .for_each_of_kind_mut(EntityKind::Explosion, |_, entity| {
            if let Entity::Explosion(explosion) = entity {
                explosion.frame += EXPLOSION_FPS * dt;
            }
        });

    // Last, so a laser fired this tick starts moving next tick
    steer_player(state, input, dt);
}

/// Move the ship from the arrow keys, keep it on screen, and fire when ready
fn steer_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let size = state.shapes.player.size;
    let width = state.playfield.width;
    let Some(player) = state.player_mut() else {
        return;
    };

    let axis = (input.right as i8 - input.left as i8) as f32;
    player.direction = Vec2::new(axis, 0.0).normalize_or_zero();
    player.pos.x += player.direction.x * player.speed * dt;
    player.pos.x = clamp_to_playfield(player.pos.x, size.x, width);

    player.fire_cooldown_ms = (player.fire_cooldown_ms - dt * 1000.0).max(0.0);
    if !(input.fire && player.can_fire()) {
        return;
    }
    player.fire_cooldown_ms = FIRE_COOLDOWN_MS;
    let muzzle = player.rect(size).midtop();

    state.entities.add(Entity::Laser(Laser::new(muzzle)));
    state.events.push(GameEvent::LaserFired);
}

/// Keep a sprite of `sprite_width` centered at `x` fully inside `[0, width]`
pub fn clamp_to_playfield(x: f32, sprite_width: f32, width: f32) -> f32 {
    let half = sprite_width / 2.0;
    if width >= sprite_width {
        x.clamp(half, width - half)
    } else {
        width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Playfield;
    use crate::consts::*;
    use crate::sim::state::{Explosion, Meteor, Shapes};
    use proptest::prelude::*;

    fn playing_state() -> GameState {
        let mut state = GameState::new(21, Playfield::default(), Shapes::default());
        state.start_session();
        state.events.clear();
        state
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut state = playing_state();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        advance(&mut state, &right, 0.5);
        assert_eq!(state.player().unwrap().pos.x, 640.0 + 150.0);
        assert_eq!(state.player().unwrap().direction, Vec2::X);

        advance(&mut state, &right, 10.0);
        assert_eq!(state.player().unwrap().pos.x, 1280.0 - PLAYER_SIZE.0 / 2.0);

        // Both keys cancel out
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        advance(&mut state, &both, 1.0);
        assert_eq!(state.player().unwrap().direction, Vec2::ZERO);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = playing_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        advance(&mut state, &fire, 0.016);
        assert_eq!(state.entities.count_of_kind(EntityKind::Laser), 1);
        assert_eq!(state.events, vec![GameEvent::LaserFired]);

        // 0.3 s later still cooling down
        for _ in 0..3 {
            advance(&mut state, &fire, 0.1);
        }
        assert_eq!(state.entities.count_of_kind(EntityKind::Laser), 1);

        advance(&mut state, &fire, 0.1);
        assert_eq!(state.entities.count_of_kind(EntityKind::Laser), 2);
    }

    #[test]
    fn test_laser_spawns_at_ship_nose_and_rises() {
        let mut state = playing_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        advance(&mut state, &fire, 0.0);
        let id = state.entities.ids_of_kind(EntityKind::Laser)[0];
        let nose = Vec2::new(640.0, 690.0 - PLAYER_SIZE.1);
        match state.entities.get(id) {
            Some(Entity::Laser(l)) => assert_eq!(l.pos, nose),
            other => panic!("unexpected {other:?}"),
        }

        advance(&mut state, &TickInput::default(), 0.25);
        match state.entities.get(id) {
            Some(Entity::Laser(l)) => assert_eq!(l.pos.y, nose.y - 100.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_meteor_and_explosion_advance() {
        let mut state = playing_state();
        let meteor = state.entities.add(Entity::Meteor(Meteor::new(
            Vec2::new(100.0, 0.0),
            Vec2::Y,
            200.0,
            60.0,
            Vec2::new(100.0, 80.0),
        )));
        let explosion = state
            .entities
            .add(Entity::Explosion(Explosion::new(Vec2::ZERO)));

        advance(&mut state, &TickInput::default(), 0.5);
        match state.entities.get(meteor) {
            Some(Entity::Meteor(m)) => {
                assert_eq!(m.pos, Vec2::new(100.0, 100.0));
                assert!((m.rotation - 30.0).abs() < 1e-4);
                assert!(m.footprint.x > 100.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        match state.entities.get(explosion) {
            Some(Entity::Explosion(e)) => assert_eq!(e.frame, 10.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_clamp_when_sprite_wider_than_field() {
        assert_eq!(clamp_to_playfield(10.0, 200.0, 100.0), 50.0);
    }

    proptest! {
        #[test]
        fn prop_player_stays_inside(
            moves in prop::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..5.0), 1..50),
            width in 200.0f32..2000.0,
        ) {
            let mut state = GameState::new(1, Playfield::new(width, 720.0), Shapes::default());
            state.start_session();
            let half = PLAYER_SIZE.0 / 2.0;
            for (left, right, dt) in moves {
                let input = TickInput { left, right, ..Default::default() };
                advance(&mut state, &input, dt);
                let x = state.player().unwrap().pos.x;
                prop_assert!(x >= half - 1e-3);
                prop_assert!(x <= width - half + 1e-3);
            }
        }
    }
}
