//! Collision detection and response
//!
//! Two tests are used:
//! - player vs meteor: per-pixel mask overlap, so transparent sprite corners
//!   never count as a hit
//! - laser vs meteor: plain bounding-box overlap (lasers are thin and fast)
//!
//! Meteors are sampled through their rotation, so the mask test agrees with
//! what the presenter draws.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityId, EntityKind, Explosion, GameEvent, GameState};
use crate::consts::POINTS_PER_METEOR;

/// Axis-aligned rectangle (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn from_midbottom(midbottom: Vec2, size: Vec2) -> Self {
        Self::new(midbottom.x - size.x / 2.0, midbottom.y - size.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn midtop(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top)
    }

    /// Strict overlap: rectangles that only share an edge do not collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Binary opacity mask, one bit per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<u64>,
}

impl Mask {
    /// Alpha values above this count as opaque
    pub const ALPHA_THRESHOLD: u8 = 127;

    /// Every pixel opaque (used when the image is unavailable)
    pub fn full(width: u32, height: u32) -> Self {
        let len = (width as usize * height as usize).div_ceil(64);
        let mut mask = Self {
            width,
            height,
            bits: vec![u64::MAX; len],
        };
        // Clear the padding bits so count() stays exact
        let used = width as usize * height as usize;
        if used % 64 != 0 {
            if let Some(last) = mask.bits.last_mut() {
                *last = (1u64 << (used % 64)) - 1;
            }
        }
        mask
    }

    /// Build from a row-major alpha channel. Returns `None` if `alpha` has the wrong length.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Option<Self> {
        let pixels = width as usize * height as usize;
        if alpha.len() != pixels {
            return None;
        }
        let mut bits = vec![0u64; pixels.div_ceil(64)];
        for (i, &a) in alpha.iter().enumerate() {
            if a > Self::ALPHA_THRESHOLD {
                bits[i / 64] |= 1u64 << (i % 64);
            }
        }
        Some(Self {
            width,
            height,
            bits,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at pixel (x, y); out of range is transparent
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        let i = y as usize * self.width as usize + x as usize;
        self.bits[i / 64] & (1u64 << (i % 64)) != 0
    }

    /// Number of opaque pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Sample at a world point for a mask drawn centered on `center`,
    /// rotated clockwise by `rotation_deg`
    fn sample_world(&self, point: Vec2, center: Vec2, rotation_deg: f32) -> bool {
        let offset = point - center;
        let local = if rotation_deg == 0.0 {
            offset
        } else {
            Vec2::from_angle(-rotation_deg.to_radians()).rotate(offset)
        };
        let half = Vec2::new(self.width as f32, self.height as f32) / 2.0;
        let p = local + half;
        self.get(p.x.floor() as i64, p.y.floor() as i64)
    }
}

/// A mask placed in the world
#[derive(Debug, Clone, Copy)]
pub struct PlacedMask<'a> {
    pub mask: &'a Mask,
    pub center: Vec2,
    pub rotation_deg: f32,
    /// World-space bounds of the (rotated) sprite
    pub bounds: Rect,
}

/// True if any pixel is opaque in both masks
pub fn masks_overlap(a: PlacedMask<'_>, b: PlacedMask<'_>) -> bool {
    let Some(area) = a.bounds.intersection(&b.bounds) else {
        return false;
    };

    let x0 = area.left.floor() as i64;
    let y0 = area.top.floor() as i64;
    let x1 = area.right().ceil() as i64;
    let y1 = area.bottom().ceil() as i64;

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if a.mask.sample_world(p, a.center, a.rotation_deg)
                && b.mask.sample_world(p, b.center, b.rotation_deg)
            {
                return true;
            }
        }
    }
    false
}

/// What happened during one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Meteors that touched the player (all destroyed)
    pub player_hits: usize,
    /// Meteors destroyed by lasers
    pub laser_kills: usize,
    /// Points awarded this pass
    pub points: u64,
}

/// Run both collision checks and apply their consequences.
///
/// Entities already marked for removal this tick are skipped, so a meteor can
/// only be consumed once.
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport {
        player_hits: player_vs_meteors(state),
        ..Default::default()
    };

    let (kills, points) = lasers_vs_meteors(state);
    report.laser_kills = kills;
    report.points = points;
    report
}

fn player_vs_meteors(state: &mut GameState) -> usize {
    let Some(player) = state.player() else {
        return 0;
    };
    if player.invincible {
        return 0;
    }

    let shape = &state.shapes.player;
    let player_bounds = player.rect(shape.size);
    let player_mask = PlacedMask {
        mask: &shape.mask,
        center: player_bounds.center(),
        rotation_deg: 0.0,
        bounds: player_bounds,
    };
    let meteor_mask = &state.shapes.meteor.mask;

    let mut hits: Vec<EntityId> = Vec::new();
    state
        .entities
        .for_each_of_kind(EntityKind::Meteor, |id, entity| {
            let Entity::Meteor(meteor) = entity else {
                return;
            };
            let placed = PlacedMask {
                mask: meteor_mask,
                center: meteor.pos,
                rotation_deg: meteor.rotation,
                bounds: meteor.rect(),
            };
            if masks_overlap(player_mask, placed) {
                hits.push(id);
            }
        });

    if hits.is_empty() {
        return 0;
    }

    for &id in &hits {
        state.entities.remove(id);
    }
    log::debug!("Player struck by {} meteor(s)", hits.len());
    // One life per tick no matter how many meteors overlapped
    state.damage_player();
    hits.len()
}

fn lasers_vs_meteors(state: &mut GameState) -> (usize, u64) {
    let laser_size = state.shapes.laser.size;
    let mut total_kills = 0;
    let mut total_points = 0;

    for laser_id in state.entities.ids_of_kind(EntityKind::Laser) {
        let Some(Entity::Laser(laser)) = state.entities.get(laser_id) else {
            continue;
        };
        let laser_rect = laser.rect(laser_size);

        let mut struck: Vec<EntityId> = Vec::new();
        state
            .entities
            .for_each_of_kind(EntityKind::Meteor, |id, entity| {
                if let Entity::Meteor(meteor) = entity {
                    if laser_rect.intersects(&meteor.rect()) {
                        struck.push(id);
                    }
                }
            });

        if struck.is_empty() {
            continue;
        }

        state.entities.remove(laser_id);
        for &id in &struck {
            state.entities.remove(id);
        }
        state
            .entities
            .add(Entity::Explosion(Explosion::new(laser_rect.midtop())));
        state.events.push(GameEvent::Explosion);

        let points = POINTS_PER_METEOR * struck.len() as u64;
        state.session.score += points;
        total_kills += struck.len();
        total_points += points;
    }

    if total_kills > 0 {
        log::debug!("Lasers destroyed {total_kills} meteor(s), +{total_points}");
    }
    (total_kills, total_points)
}
