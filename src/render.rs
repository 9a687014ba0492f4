//! Frame composition
//!
//! [`draw_frame`] decides what goes on screen for the current phase and hands
//! draw calls to a [`Presenter`]. It never mutates the game state.

use glam::Vec2;

use crate::Playfield;
use crate::assets::{FontHandle, ImageHandle, Sprite, SpriteSet};
use crate::sim::{Entity, GamePhase, GameState, Rect};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

pub const BACKGROUND: Color = Color::hex(0x3a2e3f);
pub const GAME_OVER_BACKGROUND: Color = Color::hex(0x1e1e1e);
pub const GAME_OVER_TITLE: Color = Color::rgb(255, 60, 60);
pub const TEXT_COLOR: Color = Color::rgb(240, 240, 240);

/// HUD layout
const HUD_MARGIN: f32 = 20.0;
const HEART_SPACING: f32 = 50.0;

/// Where a line of text is pinned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAnchor {
    Center(Vec2),
    TopRight(Vec2),
}

/// Display backend
pub trait Presenter {
    /// `None` keeps whatever was drawn last (used by the pause overlay)
    fn begin_frame(&mut self, clear: Option<Color>);
    /// Draw an image scaled into `dest`, rotated about its center
    fn draw_sprite(&mut self, image: ImageHandle, dest: Rect, rotation_deg: f32);
    fn draw_text(&mut self, font: Option<FontHandle>, text: &str, anchor: TextAnchor, color: Color);
    fn end_frame(&mut self);
    /// Switch between windowed and fullscreen; returns the new display size
    fn toggle_fullscreen(&mut self) -> Playfield;
}

/// Draw one frame for the current phase
pub fn draw_frame(
    state: &GameState,
    sprites: &SpriteSet,
    font: Option<FontHandle>,
    presenter: &mut impl Presenter,
) {
    let center = state.playfield.center();
    match state.phase {
        GamePhase::Start => {
            presenter.begin_frame(Some(BACKGROUND));
            presenter.draw_text(
                font,
                "Press SPACE to Start",
                TextAnchor::Center(center),
                TEXT_COLOR,
            );
        }
        GamePhase::Playing => {
            presenter.begin_frame(Some(BACKGROUND));
            draw_scene(state, sprites, presenter);
            draw_hud(state, sprites, font, presenter);
        }
        GamePhase::Paused => {
            presenter.begin_frame(None);
            presenter.draw_text(
                font,
                "Paused - Press P to Resume",
                TextAnchor::Center(center),
                TEXT_COLOR,
            );
        }
        GamePhase::GameOver => {
            presenter.begin_frame(Some(GAME_OVER_BACKGROUND));
            presenter.draw_text(
                font,
                "Game Over",
                TextAnchor::Center(center - Vec2::new(0.0, 40.0)),
                GAME_OVER_TITLE,
            );
            presenter.draw_text(
                font,
                &format!("Score: {}", state.session.score),
                TextAnchor::Center(center),
                TEXT_COLOR,
            );
            presenter.draw_text(
                font,
                "Press R to Restart or Q to Quit",
                TextAnchor::Center(center + Vec2::new(0.0, 60.0)),
                TEXT_COLOR,
            );
        }
    }
    presenter.end_frame();
}

fn draw(presenter: &mut impl Presenter, sprite: &Sprite, dest: Rect, rotation_deg: f32) {
    if let Some(handle) = sprite.handle {
        presenter.draw_sprite(handle, dest, rotation_deg);
    }
}

/// Entities in insertion order
fn draw_scene(state: &GameState, sprites: &SpriteSet, presenter: &mut impl Presenter) {
    for (_, entity) in state.entities.iter() {
        match entity {
            Entity::Star(star) => {
                draw(presenter, &sprites.star, Rect::from_center(star.pos, sprites.star.size()), 0.0);
            }
            Entity::Player(player) => {
                draw(presenter, &sprites.player, player.rect(sprites.player.size()), 0.0);
            }
            Entity::Laser(laser) => {
                draw(presenter, &sprites.laser, laser.rect(sprites.laser.size()), 0.0);
            }
            Entity::Meteor(meteor) => {
                let dest = Rect::from_center(meteor.pos, meteor.size);
                draw(presenter, &sprites.meteor, dest, meteor.rotation);
            }
            Entity::Explosion(explosion) => {
                if let Some(frame) = sprites.explosion_frame(explosion.frame) {
                    draw(presenter, frame, Rect::from_center(explosion.pos, frame.size()), 0.0);
                }
            }
        }
    }
}

fn draw_hud(
    state: &GameState,
    sprites: &SpriteSet,
    font: Option<FontHandle>,
    presenter: &mut impl Presenter,
) {
    let heart = Vec2::new(crate::consts::HEART_SIZE.0, crate::consts::HEART_SIZE.1);
    for i in 0..state.lives() {
        let left = HUD_MARGIN + i as f32 * HEART_SPACING;
        draw(presenter, &sprites.heart, Rect::new(left, HUD_MARGIN, heart.x, heart.y), 0.0);
    }
    presenter.draw_text(
        font,
        &format!("Score: {}", state.session.score),
        TextAnchor::TopRight(Vec2::new(state.playfield.width - HUD_MARGIN, HUD_MARGIN)),
        Color::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ProceduralAssets, SpriteSet};
    use crate::sim::{Explosion, Meteor, Shapes};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Begin(Option<Color>),
        Sprite(ImageHandle, Rect, f32),
        Text(String, TextAnchor, Color),
        End,
    }

    #[derive(Default)]
    struct RecordingPresenter {
        calls: Vec<Call>,
    }

    impl RecordingPresenter {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Text(text, ..) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn sprite_count(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Sprite(..)))
                .count()
        }
    }

    impl Presenter for RecordingPresenter {
        fn begin_frame(&mut self, clear: Option<Color>) {
            self.calls.push(Call::Begin(clear));
        }

        fn draw_sprite(&mut self, image: ImageHandle, dest: Rect, rotation_deg: f32) {
            self.calls.push(Call::Sprite(image, dest, rotation_deg));
        }

        fn draw_text(&mut self, _font: Option<FontHandle>, text: &str, anchor: TextAnchor, color: Color) {
            self.calls.push(Call::Text(text.to_string(), anchor, color));
        }

        fn end_frame(&mut self) {
            self.calls.push(Call::End);
        }

        fn toggle_fullscreen(&mut self) -> Playfield {
            Playfield::default()
        }
    }

    fn setup() -> (GameState, SpriteSet) {
        let sprites = SpriteSet::load(&mut ProceduralAssets::new());
        let state = GameState::new(1, Playfield::default(), sprites.shapes());
        (state, sprites)
    }

    #[test]
    fn test_start_screen() {
        let (state, sprites) = setup();
        let mut presenter = RecordingPresenter::default();
        draw_frame(&state, &sprites, None, &mut presenter);
        assert_eq!(presenter.calls.first(), Some(&Call::Begin(Some(BACKGROUND))));
        assert_eq!(
            presenter.calls[1],
            Call::Text(
                "Press SPACE to Start".to_string(),
                TextAnchor::Center(Vec2::new(640.0, 360.0)),
                TEXT_COLOR
            )
        );
        assert_eq!(presenter.calls.last(), Some(&Call::End));
    }

    #[test]
    fn test_playing_draws_scene_and_hud() {
        let (mut state, sprites) = setup();
        state.start_session();
        let meteor = Meteor::new(Vec2::new(300.0, 200.0), Vec2::Y, 180.0, 0.0, sprites.meteor.size());
        state.entities.add(Entity::Meteor(meteor));

        let mut presenter = RecordingPresenter::default();
        draw_frame(&state, &sprites, None, &mut presenter);

        // 20 stars, ship, meteor, 3 hearts
        assert_eq!(presenter.sprite_count(), 20 + 1 + 1 + 3);
        assert_eq!(presenter.texts(), vec!["Score: 0"]);
        let hearts: Vec<Rect> = presenter
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Sprite(handle, rect, _) if Some(*handle) == sprites.heart.handle => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(hearts[0], Rect::new(20.0, 20.0, 40.0, 40.0));
        assert_eq!(hearts[2], Rect::new(120.0, 20.0, 40.0, 40.0));
        assert!(presenter.calls.contains(&Call::Text(
            "Score: 0".to_string(),
            TextAnchor::TopRight(Vec2::new(1260.0, 20.0)),
            Color::WHITE
        )));
    }

    #[test]
    fn test_missing_images_are_skipped() {
        let sprites = SpriteSet::placeholders();
        let mut state = GameState::new(1, Playfield::default(), Shapes::default());
        state.start_session();
        state.entities.add(Entity::Explosion(Explosion::new(Vec2::ZERO)));

        let mut presenter = RecordingPresenter::default();
        draw_frame(&state, &sprites, None, &mut presenter);
        assert_eq!(presenter.sprite_count(), 0);
        assert_eq!(presenter.texts(), vec!["Score: 0"]);
    }

    #[test]
    fn test_pause_overlay_keeps_last_frame() {
        let (mut state, sprites) = setup();
        state.start_session();
        state.phase = GamePhase::Paused;
        let mut presenter = RecordingPresenter::default();
        draw_frame(&state, &sprites, None, &mut presenter);
        assert_eq!(presenter.calls[0], Call::Begin(None));
        assert_eq!(presenter.texts(), vec!["Paused - Press P to Resume"]);
    }

    #[test]
    fn test_game_over_screen() {
        let (mut state, sprites) = setup();
        state.start_session();
        state.session.score = 130;
        state.phase = GamePhase::GameOver;
        let mut presenter = RecordingPresenter::default();
        draw_frame(&state, &sprites, None, &mut presenter);
        assert_eq!(presenter.calls[0], Call::Begin(Some(GAME_OVER_BACKGROUND)));
        assert_eq!(
            presenter.texts(),
            vec!["Game Over", "Score: 130", "Press R to Restart or Q to Quit"]
        );
        assert_eq!(
            presenter.calls[1],
            Call::Text(
                "Game Over".to_string(),
                TextAnchor::Center(Vec2::new(640.0, 320.0)),
                GAME_OVER_TITLE
            )
        );
    }
}
