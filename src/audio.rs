//! Audio system
//!
//! Sound effects and music go through an [`AudioBackend`]. A backend that
//! fails to load something leaves that sound silent; the game never stops
//! over audio.

use crate::assets::AssetError;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Laser fired
    Laser,
    /// Meteor destroyed
    Explosion,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 2] = [SoundEffect::Laser, SoundEffect::Explosion];

    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::Laser => "audio/laser.wav",
            SoundEffect::Explosion => "audio/explosion.wav",
        }
    }
}

pub const MUSIC_PATH: &str = "audio/game_music.wav";

/// Backend-specific reference to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Whatever actually makes noise
pub trait AudioBackend {
    fn load_sound(&mut self, path: &str) -> Result<SoundHandle, AssetError>;
    fn play(&mut self, sound: SoundHandle, volume: f32);
    fn load_music(&mut self, path: &str) -> Result<(), AssetError>;
    fn play_music_looped(&mut self, volume: f32);
    fn stop_music(&mut self);
}

/// Backend with no output device
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn load_sound(&mut self, _path: &str) -> Result<SoundHandle, AssetError> {
        Ok(SoundHandle(0))
    }

    fn play(&mut self, _sound: SoundHandle, _volume: f32) {}

    fn load_music(&mut self, _path: &str) -> Result<(), AssetError> {
        Ok(())
    }

    fn play_music_looped(&mut self, _volume: f32) {}

    fn stop_music(&mut self) {}
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    laser: Option<SoundHandle>,
    explosion: Option<SoundHandle>,
    music_loaded: bool,
    music_playing: bool,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(mut backend: B) -> Self {
        let mut load = |effect: SoundEffect| match backend.load_sound(effect.asset_path()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{e} - {effect:?} will be silent");
                None
            }
        };
        let laser = load(SoundEffect::Laser);
        let explosion = load(SoundEffect::Explosion);

        let music_loaded = match backend.load_music(MUSIC_PATH) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e} - no background music");
                false
            }
        };

        Self {
            backend,
            laser,
            explosion,
            music_loaded,
            music_playing: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    pub fn with_settings(backend: B, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        let handle = match effect {
            SoundEffect::Laser => self.laser,
            SoundEffect::Explosion => self.explosion,
        };
        if let Some(handle) = handle {
            self.backend.play(handle, vol);
        }
    }

    pub fn start_music(&mut self) {
        if !self.music_loaded || self.music_playing {
            return;
        }
        let vol = self.effective_volume(self.music_volume);
        self.backend.play_music_looped(vol);
        self.music_playing = true;
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.backend.stop_music();
            self.music_playing = false;
        }
    }

    /// React to what the simulation reported this tick
    pub fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::LaserFired => self.play(SoundEffect::Laser),
            GameEvent::Explosion => self.play(SoundEffect::Explosion),
            GameEvent::MusicStart => self.start_music(),
            GameEvent::MusicStop => self.stop_music(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
