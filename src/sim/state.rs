//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there are no
//! globals, so tests can build and drive as many independent games as they like.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Mask, Rect};
use super::store::EntityStore;
use crate::consts::*;
use crate::{Playfield, rotated_extent};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the fire key
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Out of lives, waiting for restart or quit
    GameOver,
}

/// Side effects the simulation asks the outside world to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    LaserFired,
    Explosion,
    MusicStart,
    MusicStop,
}

/// Stable identity of an entity within one [`EntityStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Bottom-center of the sprite
    pub pos: Vec2,
    /// Unit vector or zero
    pub direction: Vec2,
    pub speed: f32,
    /// Milliseconds until the next shot is allowed
    pub fire_cooldown_ms: f32,
    pub lives: u8,
    pub invincible: bool,
    /// Sim clock (ms) when invincibility last started
    pub invincible_since_ms: f64,
    pub invincibility_ms: f64,
}

impl Player {
    pub fn new(playfield: Playfield) -> Self {
        Self {
            pos: Vec2::new(
                playfield.width / 2.0,
                playfield.height - PLAYER_BOTTOM_MARGIN,
            ),
            direction: Vec2::ZERO,
            speed: PLAYER_SPEED,
            fire_cooldown_ms: 0.0,
            lives: MAX_LIVES,
            invincible: false,
            invincible_since_ms: 0.0,
            invincibility_ms: INVINCIBILITY_MS,
        }
    }

    pub fn rect(&self, size: Vec2) -> Rect {
        Rect::from_midbottom(self.pos, size)
    }

    #[inline]
    pub fn can_fire(&self) -> bool {
        self.fire_cooldown_ms <= 0.0
    }

    pub fn start_invincibility(&mut self, now_ms: f64) {
        self.invincible = true;
        self.invincible_since_ms = now_ms;
    }

    /// Drop invincibility once strictly more than its duration has elapsed
    pub fn refresh_invincibility(&mut self, now_ms: f64) {
        if self.invincible && now_ms - self.invincible_since_ms > self.invincibility_ms {
            self.invincible = false;
        }
    }
}

/// Decorative background star
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
}

/// A laser bolt travelling straight up
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Laser {
    /// Bottom-center of the sprite
    pub pos: Vec2,
    pub speed: f32,
}

impl Laser {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            speed: LASER_SPEED,
        }
    }

    pub fn rect(&self, size: Vec2) -> Rect {
        Rect::from_midbottom(self.pos, size)
    }
}

/// A falling, spinning meteor
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    /// Degrees, clockwise on screen
    pub rotation: f32,
    /// Degrees per second
    pub rotation_rate: f32,
    /// Set when it fell past the bottom edge
    pub missed: bool,
    /// Unrotated sprite size
    pub size: Vec2,
    /// Axis-aligned size of the rotated sprite
    pub footprint: Vec2,
}

impl Meteor {
    pub fn new(pos: Vec2, direction: Vec2, speed: f32, rotation_rate: f32, size: Vec2) -> Self {
        Self {
            pos,
            direction,
            speed,
            rotation: 0.0,
            rotation_rate,
            missed: false,
            size,
            footprint: size,
        }
    }

    /// Rotate by `degrees` and re-derive the footprint
    pub fn spin(&mut self, degrees: f32) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
        self.footprint = rotated_extent(self.size, self.rotation);
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.footprint)
    }
}

/// Explosion animation played where a laser hit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    /// Fractional frame index, grows monotonically
    pub frame: f32,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, frame: 0.0 }
    }
}

/// Discriminant of [`Entity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Star,
    Laser,
    Meteor,
    Explosion,
}

/// Any live game object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Player(Player),
    Star(Star),
    Laser(Laser),
    Meteor(Meteor),
    Explosion(Explosion),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::Player,
            Entity::Star(_) => EntityKind::Star,
            Entity::Laser(_) => EntityKind::Laser,
            Entity::Meteor(_) => EntityKind::Meteor,
            Entity::Explosion(_) => EntityKind::Explosion,
        }
    }
}

/// Collision geometry for one sprite
#[derive(Debug, Clone)]
pub struct Shape {
    pub size: Vec2,
    pub mask: Mask,
}

impl Shape {
    /// Solid box of the given size
    pub fn solid(size: (f32, f32)) -> Self {
        Self {
            size: Vec2::new(size.0, size.1),
            mask: Mask::full(size.0 as u32, size.1 as u32),
        }
    }
}

/// Collision geometry for every sprite the simulation cares about
#[derive(Debug, Clone)]
pub struct Shapes {
    pub player: Shape,
    pub meteor: Shape,
    pub laser: Shape,
    pub explosion_frames: usize,
}

impl Default for Shapes {
    fn default() -> Self {
        Self {
            player: Shape::solid(PLAYER_SIZE),
            meteor: Shape::solid(METEOR_SIZE),
            laser: Shape::solid(LASER_SIZE),
            explosion_frames: EXPLOSION_FRAMES,
        }
    }
}

/// Per-session counters and spawn timers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub spawn_interval_ms: f32,
    pub since_ramp_ms: f32,
    pub since_spawn_ms: f32,
    pub meteors_spawned: u32,
    pub meteors_missed: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            since_ramp_ms: 0.0,
            since_spawn_ms: 0.0,
            meteors_spawned: 0,
            meteors_missed: 0,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub playfield: Playfield,
    /// Simulated milliseconds; only advances while Playing
    pub clock_ms: f64,
    pub session: SessionState,
    pub entities: EntityStore,
    pub player_id: Option<EntityId>,
    pub shapes: Shapes,
    /// Pending side effects, drained by the main loop
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New game sitting on the start screen
    pub fn new(seed: u64, playfield: Playfield, shapes: Shapes) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            playfield,
            clock_ms: 0.0,
            session: SessionState::default(),
            entities: EntityStore::default(),
            player_id: None,
            shapes,
            events: Vec::new(),
        }
    }

    /// Reset everything for a fresh run and enter Playing
    pub fn start_session(&mut self) {
        self.session = SessionState::default();
        self.entities.clear();
        self.clock_ms = 0.0;

        for _ in 0..STAR_COUNT {
            let pos = Vec2::new(
                self.rng.random_range(0..=self.playfield.width as u32) as f32,
                self.rng.random_range(0..=self.playfield.height as u32) as f32,
            );
            self.entities.add(Entity::Star(Star { pos }));
        }
        self.player_id = Some(self.entities.add(Entity::Player(Player::new(self.playfield))));

        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::MusicStart);
        log::info!("Session started (seed {})", self.seed);
    }

    pub fn player(&self) -> Option<&Player> {
        match self.entities.get(self.player_id?) {
            Some(Entity::Player(player)) => Some(player),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        match self.entities.get_mut(self.player_id?) {
            Some(Entity::Player(player)) => Some(player),
            _ => None,
        }
    }

    pub fn lives(&self) -> u8 {
        self.player().map_or(0, |p| p.lives)
    }

    /// Take one life unless invincible. Returns true if a life was lost.
    ///
    /// Shared by meteor hits and missed meteors; losing the last life moves
    /// straight to GameOver.
    pub fn damage_player(&mut self) -> bool {
        let now = self.clock_ms;
        let Some(player) = self.player_mut() else {
            return false;
        };
        if player.invincible || player.lives == 0 {
            return false;
        }

        player.lives = player.lives.saturating_sub(1);
        player.start_invincibility(now);
        let lives = player.lives;
        log::debug!("Player lost a life, {lives} left");

        if lives == 0 {
            self.enter_game_over();
        }
        true
    }

    fn enter_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::MusicStop);
        log::info!(
            "Game over: score {}, {} meteors spawned, {} missed",
            self.session.score,
            self.session.meteors_spawned,
            self.session.meteors_missed
        );
    }

    /// Record a new playfield size (fullscreen toggle)
    pub fn set_playfield(&mut self, playfield: Playfield) {
        log::info!("Playfield resized to {}x{}", playfield.width, playfield.height);
        self.playfield = playfield;
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}
