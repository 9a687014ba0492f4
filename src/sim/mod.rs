//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform
//! concerns:
//! - Time only arrives as `dt`
//! - Seeded RNG only
//! - Removal is deferred to the end of the tick
//! - No rendering, audio or input-device dependencies

pub mod collision;
pub mod lifecycle;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::{CollisionReport, Mask, PlacedMask, Rect, masks_overlap};
pub use state::{
    Entity, EntityId, EntityKind, Explosion, GameEvent, GamePhase, GameState, Laser, Meteor,
    Player, SessionState, Shape, Shapes, Star,
};
pub use store::EntityStore;
pub use tick::{LoopControl, TickInput, tick};
