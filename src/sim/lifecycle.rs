//! Removal of entities that left the playfield or finished animating

use super::state::{Entity, EntityId, EntityKind, GameState};

/// Remove expired entities. Returns the number of meteors missed this tick.
///
/// A meteor falling past the bottom edge costs a life exactly like a direct
/// hit (unless the player is invincible).
pub fn remove_expired(state: &mut GameState) -> u32 {
    let height = state.playfield.height;
    let laser_size = state.shapes.laser.size;
    let last_frame = state.shapes.explosion_frames as f32;

    let mut missed: Vec<EntityId> = Vec::new();
    state
        .entities
        .for_each_of_kind_mut(EntityKind::Meteor, |id, entity| {
            if let Entity::Meteor(meteor) = entity {
                if meteor.rect().top > height {
                    meteor.missed = true;
                    missed.push(id);
                }
            }
        });

    let mut expired: Vec<EntityId> = Vec::new();
    state.entities.for_each_of_kind(EntityKind::Laser, |id, entity| {
        if let Entity::Laser(laser) = entity {
            if laser.rect(laser_size).bottom() < 0.0 {
                expired.push(id);
            }
        }
    });
    state
        .entities
        .for_each_of_kind(EntityKind::Explosion, |id, entity| {
            if let Entity::Explosion(explosion) = entity {
                if explosion.frame >= last_frame {
                    expired.push(id);
                }
            }
        });
    for id in expired {
        state.entities.remove(id);
    }

    for &id in &missed {
        state.entities.remove(id);
        state.session.meteors_missed += 1;
        state.damage_player();
    }
    if !missed.is_empty() {
        log::debug!("{} meteor(s) slipped past", missed.len());
    }
    missed.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Playfield;
    use crate::sim::state::{Explosion, GamePhase, Laser, Meteor, Shapes};
    use glam::Vec2;

    fn playing_state() -> GameState {
        let mut state = GameState::new(4, Playfield::default(), Shapes::default());
        state.start_session();
        state
    }

    fn meteor_at(y: f32) -> Entity {
        Entity::Meteor(Meteor::new(
            Vec2::new(100.0, y),
            Vec2::Y,
            180.0,
            0.0,
            Vec2::new(100.0, 80.0),
        ))
    }

    #[test]
    fn test_meteor_below_bottom_costs_a_life() {
        let mut state = playing_state();
        let inside = state.entities.add(meteor_at(720.0 + 39.0));
        let gone = state.entities.add(meteor_at(720.0 + 41.0));

        assert_eq!(remove_expired(&mut state), 1);
        assert!(state.entities.is_alive(inside));
        assert!(!state.entities.is_alive(gone));
        assert_eq!(state.session.meteors_missed, 1);
        assert_eq!(state.lives(), 2);
        assert!(state.player().unwrap().invincible);
    }

    #[test]
    fn test_several_misses_one_life() {
        let mut state = playing_state();
        for _ in 0..3 {
            state.entities.add(meteor_at(900.0));
        }
        assert_eq!(remove_expired(&mut state), 3);
        assert_eq!(state.session.meteors_missed, 3);
        assert_eq!(state.lives(), 2);
    }

    #[test]
    fn test_miss_on_last_life_ends_game() {
        let mut state = playing_state();
        state.player_mut().unwrap().lives = 1;
        state.entities.add(meteor_at(900.0));
        remove_expired(&mut state);
        assert_eq!(state.lives(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_lasers_and_explosions_expire_silently() {
        let mut state = playing_state();
        let high = state
            .entities
            .add(Entity::Laser(Laser::new(Vec2::new(10.0, -0.5))));
        let edge = state
            .entities
            .add(Entity::Laser(Laser::new(Vec2::new(10.0, 0.0))));
        let done = state.entities.add(Entity::Explosion(Explosion {
            pos: Vec2::ZERO,
            frame: 21.0,
        }));
        let playing = state.entities.add(Entity::Explosion(Explosion {
            pos: Vec2::ZERO,
            frame: 20.9,
        }));

        assert_eq!(remove_expired(&mut state), 0);
        assert!(!state.entities.is_alive(high));
        assert!(state.entities.is_alive(edge));
        assert!(!state.entities.is_alive(done));
        assert!(state.entities.is_alive(playing));
        assert_eq!(state.lives(), 3);
    }
}
