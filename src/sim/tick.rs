//! Variable timestep simulation tick
//!
//! The state machine runs first; only the Playing phase advances the world.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use super::{collision, lifecycle, motion, spawn};

/// Input for a single tick
///
/// `left`, `right` and `fire` are held-key state; the `*_pressed` flags are
/// key-down edges seen since the previous tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Fire key went down (starts a session from the title screen)
    pub fire_pressed: bool,
    pub pause_pressed: bool,
    pub restart_pressed: bool,
    pub quit_pressed: bool,
    /// Window close / OS quit request
    pub close_requested: bool,
}

/// Whether the main loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> LoopControl {
    if input.close_requested {
        log::info!("Close requested");
        return LoopControl::Exit;
    }

    match state.phase {
        GamePhase::Start => {
            if input.fire_pressed {
                state.start_session();
            }
            return LoopControl::Continue;
        }
        GamePhase::GameOver => {
            if input.restart_pressed {
                log::info!("Back to start screen");
                state.phase = GamePhase::Start;
            } else if input.quit_pressed {
                log::info!("Quit from game over screen");
                return LoopControl::Exit;
            }
            return LoopControl::Continue;
        }
        GamePhase::Paused => {
            if input.pause_pressed {
                log::info!("Resumed");
                state.phase = GamePhase::Playing;
            }
            return LoopControl::Continue;
        }
        GamePhase::Playing => {
            if input.pause_pressed {
                log::info!("Paused");
                state.phase = GamePhase::Paused;
                return LoopControl::Continue;
            }
        }
    }

    simulate(state, input, dt);
    LoopControl::Continue
}

/// One Playing step: spawn, move, expire, collide, then sweep the dead
fn simulate(state: &mut GameState, input: &TickInput, dt: f32) {
    // dt is never clamped above; a negative one would mean a broken clock
    debug_assert!(dt >= 0.0, "negative dt {dt}");
    let dt = dt.max(0.0);

    state.clock_ms += dt as f64 * 1000.0;
    let now = state.clock_ms;
    if let Some(player) = state.player_mut() {
        player.refresh_invincibility(now);
    }

    spawn::advance(state, dt);
    motion::advance(state, input, dt);
    lifecycle::remove_expired(state);
    collision::resolve(state);
    state.entities.sweep();

    debug_assert!(
        state.entities.count_of_kind(super::state::EntityKind::Meteor)
            <= crate::consts::MAX_METEORS
    );
}
