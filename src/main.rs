//! Space Shooter entry point
//!
//! Native builds run a headless demo: procedural sprites, no sound device,
//! an autopilot at the controls and a presenter that only logs. A windowed
//! front end plugs in by implementing `InputProvider`, `AudioBackend` and
//! `Presenter`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use space_shooter::Playfield;
    use space_shooter::assets::{FontHandle, ImageHandle};
    use space_shooter::input::{InputEvent, InputProvider, Key};
    use space_shooter::render::{Color, Presenter, TextAnchor};
    use space_shooter::sim::Rect;

    /// Plays badly but tirelessly
    pub struct Autopilot {
        frame: u64,
        quit_at: u64,
    }

    impl Autopilot {
        pub fn new(quit_at: u64) -> Self {
            Self { frame: 0, quit_at }
        }
    }

    impl InputProvider for Autopilot {
        fn poll_events(&mut self) -> Vec<InputEvent> {
            self.frame += 1;
            if self.frame >= self.quit_at {
                return vec![InputEvent::QuitRequested];
            }
            // Start, and restart after a game over
            if self.frame % 120 == 30 {
                vec![
                    InputEvent::KeyPressed(Key::Fire),
                    InputEvent::KeyPressed(Key::Restart),
                ]
            } else {
                Vec::new()
            }
        }

        fn is_key_down(&self, key: Key) -> bool {
            let sweeping_left = (self.frame / 90) % 2 == 0;
            match key {
                Key::Fire => true,
                Key::Left => sweeping_left,
                Key::Right => !sweeping_left,
                _ => false,
            }
        }
    }

    /// Presenter that reports what it would draw
    pub struct LogPresenter {
        windowed: Playfield,
        fullscreen_size: Playfield,
        fullscreen: bool,
        frame: u64,
        sprites: usize,
    }

    impl LogPresenter {
        pub fn new(windowed: Playfield, fullscreen_size: Playfield) -> Self {
            Self {
                windowed,
                fullscreen_size,
                fullscreen: false,
                frame: 0,
                sprites: 0,
            }
        }
    }

    impl Presenter for LogPresenter {
        fn begin_frame(&mut self, _clear: Option<Color>) {
            self.sprites = 0;
        }

        fn draw_sprite(&mut self, _image: ImageHandle, _dest: Rect, _rotation_deg: f32) {
            self.sprites += 1;
        }

        fn draw_text(&mut self, _font: Option<FontHandle>, text: &str, _anchor: TextAnchor, _color: Color) {
            log::trace!("text: {text}");
        }

        fn end_frame(&mut self) {
            self.frame += 1;
            if self.frame % 300 == 0 {
                log::debug!("frame {}: {} sprites", self.frame, self.sprites);
            }
        }

        fn toggle_fullscreen(&mut self) -> Playfield {
            self.fullscreen = !self.fullscreen;
            if self.fullscreen {
                self.fullscreen_size
            } else {
                self.windowed
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use space_shooter::assets::ProceduralAssets;
    use space_shooter::audio::SilentAudio;
    use space_shooter::game::SystemClock;
    use space_shooter::{Game, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Shooter (headless) starting...");

    let settings = Settings::load();
    let seconds: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(20);

    let presenter =
        headless::LogPresenter::new(settings.playfield(), settings.fullscreen_playfield());
    let autopilot = headless::Autopilot::new(seconds * settings.target_fps.max(1) as u64);
    let mut game = Game::new(
        &settings,
        &mut ProceduralAssets::new(),
        autopilot,
        SilentAudio,
        presenter,
    );

    game.run(&mut SystemClock::new(settings.frame_budget()));

    match serde_json::to_string_pretty(&game.state().session) {
        Ok(summary) => log::info!("Final session:\n{summary}"),
        Err(e) => log::warn!("Could not serialize session: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No web front end; the library is the product on wasm
}
