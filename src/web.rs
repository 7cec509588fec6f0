//! Browser bindings
//!
//! The page owns the canvas, touch handling and requestAnimationFrame; it
//! forwards gestures here and draws from the JSON snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::audio::{Channel, WebAudio};
use crate::sim::GameEvent;
use crate::{Bounds, Game, Screen, Settings};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Bubble Dodge starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<WebAudio>,
    /// Events from the last frame, for the page to react to
    events: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        let bounds = Bounds::new(width, height);
        log::info!("Screen {}x{}, seed {seed}", bounds.width, bounds.height);
        WebGame {
            game: Game::new(seed, bounds, Settings::default(), WebAudio::new()),
            events: Vec::new(),
        }
    }

    /// Advance by `dt` seconds of wall-clock time
    pub fn frame(&mut self, dt: f32) {
        self.events = self.game.frame(dt);
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.game.drag(Vec2::new(dx, dy));
    }

    pub fn end_drag(&mut self) {
        self.game.end_drag();
    }

    pub fn tap(&mut self) {
        self.game.tap();
    }

    pub fn toggle_pause(&mut self) {
        self.game.toggle_pause();
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    pub fn start(&mut self) {
        self.game.start_game();
    }

    pub fn open_help(&mut self) {
        self.game.open_help();
    }

    pub fn open_settings(&mut self) {
        self.game.open_settings();
    }

    pub fn back_to_title(&mut self) {
        self.game.back_to_title();
    }

    pub fn exit_to_menu(&mut self) {
        self.game.exit_to_menu();
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.game.set_music_volume(volume);
    }

    pub fn set_fx_volume(&mut self, volume: f32) {
        self.game.set_fx_volume(volume);
    }

    /// `music` selects the music slider, otherwise the effects slider
    pub fn drag_slider(&mut self, music: bool, dx: f32) {
        self.game.drag_slider(slider_channel(music), dx);
    }

    pub fn release_slider(&mut self, music: bool) {
        self.game.release_slider(slider_channel(music));
    }

    pub fn slider_x(&self, music: bool) -> f32 {
        self.game.slider_x(slider_channel(music))
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.game.set_autopilot(enabled);
    }

    /// "title", "help", "settings" or "session"
    pub fn screen(&self) -> String {
        match self.game.screen {
            Screen::Title => "title",
            Screen::Help => "help",
            Screen::Settings => "settings",
            Screen::Session => "session",
        }
        .to_string()
    }

    /// Session state as JSON, or an empty string off the session screen
    pub fn snapshot_json(&self) -> String {
        let Some(snapshot) = self.game.snapshot() else {
            return String::new();
        };
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::error!("Failed to serialize snapshot: {e}");
            String::new()
        })
    }

    /// Title background entities as JSON
    pub fn title_json(&self) -> String {
        let title = &self.game.title;
        let payload = serde_json::json!({
            "bubbles": title.bubble_views(),
            "spikeballs": title.spikeball_views(),
            "logo_offset": title.logo_offset(),
            "button_offsets": (0..3).map(|i| title.button_offset(i)).collect::<Vec<_>>(),
        });
        payload.to_string()
    }

    /// Events raised by the last frame as JSON
    pub fn events_json(&self) -> String {
        serde_json::to_string(&self.events).unwrap_or_default()
    }

    pub fn time_label(&self) -> String {
        self.game.session().map(|s| s.time_label()).unwrap_or_default()
    }

    pub fn bomb_label(&self) -> Option<String> {
        self.game.session().and_then(|s| s.bomb_label())
    }
}

fn slider_channel(music: bool) -> Channel {
    if music { Channel::Music } else { Channel::Effects }
}
