//! Asset loading seam
//!
//! The game never decodes files itself. An [`AssetProvider`] hands back
//! opaque handles plus an alpha channel; the alpha channel becomes the
//! collision mask. Anything that fails to load degrades to a placeholder that
//! draws nothing but still collides as a solid box.

use glam::Vec2;
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Mask, Shape, Shapes};

/// Asset ids the game asks for
pub mod ids {
    pub const PLAYER: &str = "player";
    pub const STAR: &str = "star";
    pub const METEOR: &str = "meteor";
    pub const LASER: &str = "laser";
    pub const HEART: &str = "heart";
    /// Frames are requested as `explosion/0`, `explosion/1`, ...
    pub const EXPLOSION: &str = "explosion";
    pub const FONT: &str = "Oxanium-Bold";
    pub const FONT_SIZE: u32 = 40;
}

/// Asset loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {id}: {reason}")]
    Decode { id: String, reason: String },

    #[error("Invalid dimensions for {id}: {width}x{height} with {len} alpha values")]
    InvalidDimensions {
        id: String,
        width: u32,
        height: u32,
        len: usize,
    },
}

/// Opaque reference to an image owned by the provider/presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Opaque reference to a loaded font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// An image as returned by a provider
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub handle: ImageHandle,
    pub width: u32,
    pub height: u32,
    /// Row-major alpha channel, `width * height` values
    pub alpha: Vec<u8>,
}

/// Source of images and fonts
pub trait AssetProvider {
    fn load_image(&mut self, id: &str) -> Result<LoadedImage, AssetError>;

    fn load_frame_sequence(
        &mut self,
        id: &str,
        count: usize,
    ) -> Vec<Result<LoadedImage, AssetError>> {
        (0..count)
            .map(|i| self.load_image(&format!("{id}/{i}")))
            .collect()
    }

    fn load_font(&mut self, id: &str, size: u32) -> Result<FontHandle, AssetError>;
}

/// Something drawable with matching collision geometry
#[derive(Debug, Clone)]
pub struct Sprite {
    /// `None` when the image failed to load
    pub handle: Option<ImageHandle>,
    pub shape: Shape,
}

impl Sprite {
    /// Null-renderable stand-in with a solid mask
    pub fn placeholder(size: (f32, f32)) -> Self {
        Self {
            handle: None,
            shape: Shape::solid(size),
        }
    }

    pub fn from_image(id: &str, image: LoadedImage) -> Result<Self, AssetError> {
        let mask = Mask::from_alpha(image.width, image.height, &image.alpha).ok_or_else(|| {
            AssetError::InvalidDimensions {
                id: id.to_string(),
                width: image.width,
                height: image.height,
                len: image.alpha.len(),
            }
        })?;
        Ok(Self {
            handle: Some(image.handle),
            shape: Shape {
                size: Vec2::new(image.width as f32, image.height as f32),
                mask,
            },
        })
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.shape.size
    }

    fn resolve(id: &str, loaded: Result<LoadedImage, AssetError>, fallback: (f32, f32)) -> Self {
        match loaded.and_then(|image| Self::from_image(id, image)) {
            Ok(sprite) => sprite,
            Err(e) => {
                log::warn!("{e}; using placeholder for {id}");
                Self::placeholder(fallback)
            }
        }
    }
}

/// Every sprite the game draws
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub player: Sprite,
    pub star: Sprite,
    pub laser: Sprite,
    pub meteor: Sprite,
    pub heart: Sprite,
    pub explosion: Vec<Sprite>,
}

impl SpriteSet {
    /// Load everything, substituting placeholders for failures
    pub fn load(provider: &mut impl AssetProvider) -> Self {
        let mut load = |id: &str, fallback| Sprite::resolve(id, provider.load_image(id), fallback);
        let player = load(ids::PLAYER, PLAYER_SIZE);
        let star = load(ids::STAR, STAR_SIZE);
        let laser = load(ids::LASER, LASER_SIZE);
        let meteor = load(ids::METEOR, METEOR_SIZE);
        let heart = load(ids::HEART, HEART_SIZE);

        let explosion = provider
            .load_frame_sequence(ids::EXPLOSION, EXPLOSION_FRAMES)
            .into_iter()
            .enumerate()
            .map(|(i, frame)| {
                Sprite::resolve(&format!("{}/{i}", ids::EXPLOSION), frame, EXPLOSION_SIZE)
            })
            .collect();

        Self {
            player,
            star,
            laser,
            meteor,
            heart,
            explosion,
        }
    }

    /// All placeholders (headless runs and tests)
    pub fn placeholders() -> Self {
        Self {
            player: Sprite::placeholder(PLAYER_SIZE),
            star: Sprite::placeholder(STAR_SIZE),
            laser: Sprite::placeholder(LASER_SIZE),
            meteor: Sprite::placeholder(METEOR_SIZE),
            heart: Sprite::placeholder(HEART_SIZE),
            explosion: (0..EXPLOSION_FRAMES)
                .map(|_| Sprite::placeholder(EXPLOSION_SIZE))
                .collect(),
        }
    }

    /// Collision geometry for the simulation
    pub fn shapes(&self) -> Shapes {
        Shapes {
            player: self.player.shape.clone(),
            meteor: self.meteor.shape.clone(),
            laser: self.laser.shape.clone(),
            explosion_frames: self.explosion.len().max(1),
        }
    }

    /// Frame for a fractional animation index, `None` once finished
    pub fn explosion_frame(&self, frame: f32) -> Option<&Sprite> {
        if frame < 0.0 {
            return None;
        }
        self.explosion.get(frame as usize)
    }
}

/// Load the HUD font, or `None` if unavailable
pub fn load_font(provider: &mut impl AssetProvider) -> Option<FontHandle> {
    match provider.load_font(ids::FONT, ids::FONT_SIZE) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("{e}; text will use the presenter's default font");
            None
        }
    }
}

/// Generates simple silhouettes in memory - no files needed
#[derive(Debug, Default)]
pub struct ProceduralAssets {
    next_handle: u32,
}

impl ProceduralAssets {
    pub fn new() -> Self {
        Self::default()
    }

    fn image(&mut self, size: (f32, f32), opaque: impl Fn(f32, f32) -> bool) -> LoadedImage {
        let (width, height) = (size.0 as u32, size.1 as u32);
        let alpha = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                // Normalized pixel center in [-1, 1]
                let u = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
                let v = (y as f32 + 0.5) / height as f32 * 2.0 - 1.0;
                if opaque(u, v) { 255 } else { 0 }
            })
            .collect();

        let handle = ImageHandle(self.next_handle);
        self.next_handle += 1;
        LoadedImage {
            handle,
            width,
            height,
            alpha,
        }
    }
}

impl AssetProvider for ProceduralAssets {
    fn load_image(&mut self, id: &str) -> Result<LoadedImage, AssetError> {
        let image = match id {
            // Nose at the top, wings at the bottom corners
            ids::PLAYER => self.image(PLAYER_SIZE, |u, v| u.abs() <= (v + 1.0) / 2.0),
            ids::METEOR => self.image(METEOR_SIZE, |u, v| u * u + v * v <= 1.0),
            ids::LASER | ids::HEART => self.image(
                if id == ids::LASER { LASER_SIZE } else { HEART_SIZE },
                |_, _| true,
            ),
            ids::STAR => self.image(STAR_SIZE, |u, v| u.abs() + v.abs() <= 1.0),
            _ => {
                let frame = id
                    .strip_prefix("explosion/")
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|&n| n < EXPLOSION_FRAMES)
                    .ok_or_else(|| AssetError::NotFound(id.to_string()))?;
                let radius = 0.2 + 0.8 * frame as f32 / EXPLOSION_FRAMES as f32;
                self.image(EXPLOSION_SIZE, move |u, v| u * u + v * v <= radius * radius)
            }
        };
        Ok(image)
    }

    fn load_font(&mut self, id: &str, _size: u32) -> Result<FontHandle, AssetError> {
        if id == ids::FONT {
            Ok(FontHandle(0))
        } else {
            Err(AssetError::NotFound(id.to_string()))
        }
    }
}
