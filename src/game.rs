//! Screens and the frame scheduler
//!
//! [`Game`] owns whatever is on screen and turns variable wall-clock frames
//! into fixed simulation steps. The world tick and the collision tick run on
//! separate 16ms clocks; the bomb countdown consumes wall-clock time while a
//! run is live; the title background runs at 50 Hz.

use glam::Vec2;

use crate::Bounds;
use crate::audio::{AudioSink, Channel, SoundEffect};
use crate::consts::*;
use crate::settings::{Settings, SliderDrag};
use crate::sim::{
    GameEvent, GamePhase, GameState, Snapshot, TitleScene, collision_tick, steer, tick,
};

/// What is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Help,
    Settings,
    Session,
}

pub struct Game<A: AudioSink> {
    pub screen: Screen,
    pub settings: Settings,
    pub title: TitleScene,
    music_slider: SliderDrag,
    fx_slider: SliderDrag,
    session: Option<GameState>,
    audio: A,
    bounds: Bounds,
    /// Seed for the next session; bumped per session so runs differ
    seed: u64,
    world_accumulator: f32,
    collision_accumulator: f32,
    title_accumulator: f32,
    autopilot: bool,
}

impl<A: AudioSink> Game<A> {
    pub fn new(seed: u64, bounds: Bounds, settings: Settings, mut audio: A) -> Self {
        audio.set_volume(Channel::Music, settings.music_volume);
        audio.set_volume(Channel::Effects, settings.fx_volume);
        Self {
            screen: Screen::Title,
            music_slider: SliderDrag::at_volume(settings.music_volume),
            fx_slider: SliderDrag::at_volume(settings.fx_volume),
            settings,
            title: TitleScene::new(seed, bounds),
            session: None,
            audio,
            bounds,
            seed,
            world_accumulator: 0.0,
            collision_accumulator: 0.0,
            title_accumulator: 0.0,
            autopilot: false,
        }
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    // === Navigation ===

    /// Start button on the title screen
    pub fn start_game(&mut self) {
        if self.screen != Screen::Title {
            return;
        }
        self.audio.play(SoundEffect::Button);
        self.title.clear();
        self.seed = self.seed.wrapping_add(1);
        self.session = Some(GameState::new(self.seed, self.bounds));
        self.reset_clocks();
        self.screen = Screen::Session;
        log::info!("Session opened (seed {})", self.seed);
    }

    pub fn open_help(&mut self) {
        if self.screen == Screen::Title {
            self.audio.play(SoundEffect::Button);
            self.title.clear();
            self.screen = Screen::Help;
        }
    }

    pub fn open_settings(&mut self) {
        if self.screen == Screen::Title {
            self.audio.play(SoundEffect::Button);
            self.title.clear();
            self.screen = Screen::Settings;
        }
    }

    /// Back button on help/settings
    pub fn back_to_title(&mut self) {
        if matches!(self.screen, Screen::Help | Screen::Settings) {
            self.audio.play(SoundEffect::Button);
            self.title.reset();
            self.title_accumulator = 0.0;
            self.screen = Screen::Title;
        }
    }

    /// Exit button in the pause / game over overlay
    pub fn exit_to_menu(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.bomb_countdown.cancel();
            log::info!("Session closed at {:.1}s", session.elapsed());
        }
        self.title.reset();
        self.reset_clocks();
        self.screen = Screen::Title;
    }

    fn reset_clocks(&mut self) {
        self.world_accumulator = 0.0;
        self.collision_accumulator = 0.0;
        self.title_accumulator = 0.0;
    }

    // === Session input ===

    pub fn drag(&mut self, translation: Vec2) {
        if let Some(session) = self.session.as_mut() {
            session.drag(translation);
        }
    }

    pub fn end_drag(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.end_drag();
        }
    }

    pub fn tap(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.tap();
        }
    }

    pub fn toggle_pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_pause();
        }
    }

    pub fn restart(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.restart();
            self.world_accumulator = 0.0;
            self.collision_accumulator = 0.0;
        }
    }

    // === Settings ===

    pub fn set_music_volume(&mut self, volume: f32) {
        self.settings.set_music_volume(volume);
        self.music_slider = SliderDrag::at_volume(self.settings.music_volume);
        self.audio.set_volume(Channel::Music, self.settings.music_volume);
    }

    pub fn set_fx_volume(&mut self, volume: f32) {
        self.settings.set_fx_volume(volume);
        self.fx_slider = SliderDrag::at_volume(self.settings.fx_volume);
        self.audio.set_volume(Channel::Effects, self.settings.fx_volume);
    }

    /// Slider knob dragged `dx` px since touch down
    pub fn drag_slider(&mut self, channel: Channel, dx: f32) {
        let volume = match channel {
            Channel::Music => self.music_slider.drag(dx),
            Channel::Effects => self.fx_slider.drag(dx),
        };
        match channel {
            Channel::Music => self.settings.set_music_volume(volume),
            Channel::Effects => self.settings.set_fx_volume(volume),
        }
        self.audio.set_volume(channel, volume);
    }

    pub fn release_slider(&mut self, channel: Channel) {
        match channel {
            Channel::Music => self.music_slider.release(),
            Channel::Effects => self.fx_slider.release(),
        }
    }

    /// Knob position in px along the track
    pub fn slider_x(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Music => self.music_slider.x,
            Channel::Effects => self.fx_slider.x,
        }
    }

    // === Frame ===

    /// Advance by `dt` wall-clock seconds and return the events raised
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        // Clamp to avoid spiral of death
        let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_FRAME_DT) };

        match self.screen {
            Screen::Title => {
                self.title_accumulator += dt;
                let mut substeps = 0;
                while self.title_accumulator >= TITLE_DT && substeps < MAX_SUBSTEPS {
                    self.title.tick();
                    self.title_accumulator -= TITLE_DT;
                    substeps += 1;
                }
                Vec::new()
            }
            Screen::Help | Screen::Settings => Vec::new(),
            Screen::Session => self.session_frame(dt),
        }
    }

    fn session_frame(&mut self, dt: f32) -> Vec<GameEvent> {
        let autopilot = self.autopilot;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        self.world_accumulator += dt;
        self.collision_accumulator += dt;

        let mut world_steps = 0;
        let mut collision_steps = 0;
        loop {
            let world_due = self.world_accumulator >= SIM_DT && world_steps < MAX_SUBSTEPS;
            let collision_due =
                self.collision_accumulator >= SIM_DT && collision_steps < MAX_SUBSTEPS;
            if !world_due && !collision_due {
                break;
            }
            if world_due {
                if autopilot {
                    if session.phase == GamePhase::Idle {
                        session.tap();
                    }
                    let step = steer(session);
                    if step != Vec2::ZERO {
                        session.drag(session.player.drag + step);
                    }
                }
                tick(session);
                self.world_accumulator -= SIM_DT;
                world_steps += 1;
            }
            if collision_due {
                collision_tick(session);
                self.collision_accumulator -= SIM_DT;
                collision_steps += 1;
            }
        }

        // Drop whatever backlog the substep cap left behind
        if world_steps == MAX_SUBSTEPS {
            self.world_accumulator = self.world_accumulator.min(SIM_DT);
        }
        if collision_steps == MAX_SUBSTEPS {
            self.collision_accumulator = self.collision_accumulator.min(SIM_DT);
        }

        if session.phase == GamePhase::Playing {
            session.advance_bomb_countdown(dt);
        }

        let events = session.drain_events();
        for event in &events {
            match event {
                GameEvent::TimerBubbleCollected { .. } => self.audio.play(SoundEffect::Pickup),
                GameEvent::GameOver { .. } => self.audio.play(SoundEffect::Hit),
                _ => {}
            }
        }
        events
    }

    /// Session snapshot for the presentation layer; `None` off the session screen
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.session.as_ref().map(GameState::snapshot)
    }
}
