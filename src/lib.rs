//! Space Shooter - dodge and destroy falling meteors
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, motion, collisions, game state machine)
//! - `input`: Logical keys and the input provider seam
//! - `assets`: Image/font provider seam and collision masks
//! - `audio`: Sound effects and background music with graceful degradation
//! - `render`: Presenter seam and frame composition
//! - `game`: The main loop tying everything together

pub mod assets;
pub mod audio;
pub mod game;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use game::{Game, LoopControl};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default windowed playfield
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 720.0;

    /// Player ship
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Distance from the playfield bottom to the ship's bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 30.0;
    pub const MAX_LIVES: u8 = 3;
    pub const FIRE_COOLDOWN_MS: f32 = 400.0;
    pub const INVINCIBILITY_MS: f64 = 2000.0;

    /// Lasers travel straight up (pixels/s)
    pub const LASER_SPEED: f32 = 400.0;

    /// Meteor spawning
    pub const INITIAL_SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 200.0;
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 100.0;
    pub const RAMP_PERIOD_MS: f32 = 5000.0;
    pub const MAX_METEORS: usize = 15;
    pub const METEOR_EDGE_MARGIN: f32 = 50.0;
    pub const METEOR_SPAWN_Y_MIN: f32 = -150.0;
    pub const METEOR_SPAWN_Y_MAX: f32 = -50.0;
    pub const METEOR_DRIFT: f32 = 0.1;
    pub const METEOR_SPEED_MIN: f32 = 160.0;
    pub const METEOR_SPEED_MAX: f32 = 200.0;
    /// Degrees per second
    pub const METEOR_SPIN_MIN: f32 = 40.0;
    pub const METEOR_SPIN_MAX: f32 = 80.0;

    /// Explosion animation
    pub const EXPLOSION_FRAMES: usize = 21;
    pub const EXPLOSION_FPS: f32 = 20.0;

    pub const STAR_COUNT: usize = 20;
    pub const POINTS_PER_METEOR: u64 = 10;

    /// Sprite sizes used when an image is missing
    pub const PLAYER_SIZE: (f32, f32) = (112.0, 75.0);
    pub const METEOR_SIZE: (f32, f32) = (101.0, 84.0);
    pub const LASER_SIZE: (f32, f32) = (9.0, 54.0);
    pub const STAR_SIZE: (f32, f32) = (24.0, 24.0);
    pub const HEART_SIZE: (f32, f32) = (40.0, 40.0);
    pub const EXPLOSION_SIZE: (f32, f32) = (96.0, 96.0);
}

/// Playfield dimensions in pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(consts::WINDOW_WIDTH, consts::WINDOW_HEIGHT)
    }
}

/// Axis-aligned size of a `size` box rotated by `degrees` about its center
#[inline]
pub fn rotated_extent(size: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(
        size.x * cos.abs() + size.y * sin.abs(),
        size.x * sin.abs() + size.y * cos.abs(),
    )
}
