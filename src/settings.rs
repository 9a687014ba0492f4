//! Game settings and preferences
//!
//! Read from `settings.json` next to the executable's working directory.
//! Gameplay rules are not configurable; see `consts`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Playfield;
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub window_width: f32,
    pub window_height: f32,
    /// Used when the display backend cannot report the monitor size
    pub fullscreen_width: f32,
    pub fullscreen_height: f32,
    pub target_fps: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            fullscreen_width: 1920.0,
            fullscreen_height: 1080.0,
            target_fps: 60,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            seed: None,
        }
    }
}

impl Settings {
    const FILE_NAME: &'static str = "settings.json";

    /// Load settings from `settings.json` in the working directory
    pub fn load() -> Self {
        Self::load_from(Self::FILE_NAME)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({e}), using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Clamp out-of-range values instead of rejecting the whole file
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            self.window_width = defaults.window_width;
            self.window_height = defaults.window_height;
        }
        if !(self.fullscreen_width > 0.0 && self.fullscreen_height > 0.0) {
            self.fullscreen_width = defaults.fullscreen_width;
            self.fullscreen_height = defaults.fullscreen_height;
        }
        self.target_fps = self.target_fps.max(1);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.window_width, self.window_height)
    }

    pub fn fullscreen_playfield(&self) -> Playfield {
        Playfield::new(self.fullscreen_width, self.fullscreen_height)
    }

    /// Time budget of one frame at the target rate
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "space-shooter-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.playfield(), Playfield::new(1280.0, 720.0));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = temp_file("partial", r#"{ "seed": 7, "muted": true, "sfx_volume": 3.0 }"#);
        let settings = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.seed, Some(7));
        assert!(settings.muted);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.fullscreen_playfield(), Playfield::new(1920.0, 1080.0));
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let path = temp_file("garbage", "not json at all");
        let settings = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_frame_budget() {
        let settings = Settings {
            target_fps: 0,
            ..Default::default()
        };
        assert_eq!(settings.frame_budget(), Duration::from_secs(1));
        let budget = Settings::default().frame_budget().as_secs_f64();
        assert!((budget - 1.0 / 60.0).abs() < 1e-9);
    }
}
