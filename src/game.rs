//! Application loop
//!
//! Per frame: poll input, handle fullscreen, tick the simulation, play the
//! sounds it asked for, then draw. Quitting skips the draw.

use std::time::{Duration, Instant};

use crate::assets::{self, AssetProvider, FontHandle, SpriteSet};
use crate::audio::{AudioBackend, AudioManager};
use crate::input::{InputProvider, InputSnapshot, Key};
use crate::render::{self, Presenter};
use crate::settings::Settings;
use crate::sim::{GameState, tick};

pub use crate::sim::LoopControl;

/// Source of frame times
pub trait FrameClock {
    /// Seconds since the previous call, after any frame pacing
    fn next_frame(&mut self) -> f32;
}

/// Wall clock capped to a target frame rate
pub struct SystemClock {
    last: Instant,
    budget: Duration,
}

impl SystemClock {
    pub fn new(budget: Duration) -> Self {
        Self {
            last: Instant::now(),
            budget,
        }
    }
}

impl FrameClock for SystemClock {
    fn next_frame(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.budget {
            std::thread::sleep(self.budget - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f32()
    }
}

/// Game instance holding all state
pub struct Game<I: InputProvider, B: AudioBackend, P: Presenter> {
    state: GameState,
    sprites: SpriteSet,
    font: Option<FontHandle>,
    input: I,
    audio: AudioManager<B>,
    presenter: P,
    fullscreen: bool,
    frames: u64,
}

impl<I: InputProvider, B: AudioBackend, P: Presenter> Game<I, B, P> {
    pub fn new(
        settings: &Settings,
        assets: &mut impl AssetProvider,
        input: I,
        audio_backend: B,
        presenter: P,
    ) -> Self {
        let sprites = SpriteSet::load(assets);
        let font = assets::load_font(assets);
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("New game, seed {seed}");

        Self {
            state: GameState::new(seed, settings.playfield(), sprites.shapes()),
            sprites,
            font,
            input,
            audio: AudioManager::with_settings(audio_backend, settings),
            presenter,
            fullscreen: false,
            frames: 0,
        }
    }

    /// Run one frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) -> LoopControl {
        self.frames += 1;
        let snapshot = InputSnapshot::capture(&mut self.input);

        if snapshot.was_pressed(Key::ToggleFullscreen) {
            self.fullscreen = !self.fullscreen;
            let size = self.presenter.toggle_fullscreen();
            log::info!("Fullscreen {}", if self.fullscreen { "on" } else { "off" });
            self.state.set_playfield(size);
        }

        let control = tick(&mut self.state, &snapshot.to_tick_input(), dt);
        for event in self.state.drain_events() {
            self.audio.handle_event(event);
        }

        if control == LoopControl::Exit {
            self.audio.stop_music();
            return LoopControl::Exit;
        }

        render::draw_frame(&self.state, &self.sprites, self.font, &mut self.presenter);
        LoopControl::Continue
    }

    /// Loop until the game asks to exit
    pub fn run(&mut self, clock: &mut impl FrameClock) {
        while self.frame(clock.next_frame()) == LoopControl::Continue {}
        log::info!("Exiting after {} frames", self.frames);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}
