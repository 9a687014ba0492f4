//! Input abstraction
//!
//! The platform layer reports logical keys; this module turns one frame of
//! that into a [`TickInput`].

use crate::sim::TickInput;

/// Logical keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    ToggleFullscreen,
    Restart,
    Quit,
}

/// Discrete event from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed or the OS asked us to stop
    QuitRequested,
    KeyPressed(Key),
}

/// Source of keyboard state, polled once per frame
pub trait InputProvider {
    /// Events since the last poll
    fn poll_events(&mut self) -> Vec<InputEvent>;
    fn is_key_down(&self, key: Key) -> bool;
}

/// Everything the game needs from the keyboard for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub pressed: Vec<Key>,
    pub quit_requested: bool,
}

impl InputSnapshot {
    pub fn capture(provider: &mut impl InputProvider) -> Self {
        let mut snapshot = Self::default();
        for event in provider.poll_events() {
            match event {
                InputEvent::QuitRequested => snapshot.quit_requested = true,
                InputEvent::KeyPressed(key) => snapshot.pressed.push(key),
            }
        }
        snapshot.left = provider.is_key_down(Key::Left);
        snapshot.right = provider.is_key_down(Key::Right);
        snapshot.fire = provider.is_key_down(Key::Fire);
        snapshot
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            fire: self.fire,
            fire_pressed: self.was_pressed(Key::Fire),
            pause_pressed: self.was_pressed(Key::Pause),
            restart_pressed: self.was_pressed(Key::Restart),
            quit_pressed: self.was_pressed(Key::Quit),
            close_requested: self.quit_requested,
        }
    }
}
