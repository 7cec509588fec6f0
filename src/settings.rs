//! Player preferences
//!
//! Two volume sliders. The slider knob travels 235 px along a 250 px scale,
//! so a fully dragged knob lands at 0.94.

use serde::{Deserialize, Serialize};

/// Knob travel in px
pub const SLIDER_TRAVEL: f32 = 235.0;
/// Px per full volume
pub const SLIDER_SCALE: f32 = 250.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub fx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.7,
            fx_volume: 0.7,
        }
    }
}

impl Settings {
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = clamp_volume(vol);
    }

    pub fn set_fx_volume(&mut self, vol: f32) {
        self.fx_volume = clamp_volume(vol);
    }
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) }
}

/// Volume for a knob at `x` px from the left of the track
pub fn slider_to_volume(x: f32) -> f32 {
    slider_position(x) / SLIDER_SCALE
}

/// Clamp a knob position onto the track
pub fn slider_position(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, SLIDER_TRAVEL) }
}

/// Knob position showing `volume`
pub fn volume_to_slider(volume: f32) -> f32 {
    slider_position(volume * SLIDER_SCALE)
}

/// In-progress slider drag: knob follows the finger from where the last drag left it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderDrag {
    /// Knob position when the drag began
    anchor: f32,
    /// Current knob position
    pub x: f32,
}

impl SliderDrag {
    /// Slider showing `volume`
    pub fn at_volume(volume: f32) -> Self {
        let x = volume_to_slider(volume);
        Self { anchor: x, x }
    }

    /// Finger moved `dx` px since touching down; returns the new volume
    pub fn drag(&mut self, dx: f32) -> f32 {
        self.x = slider_position(self.anchor + dx);
        slider_to_volume(self.x)
    }

    /// Finger lifted: lock the knob where it is
    pub fn release(&mut self) {
        self.anchor = self.x;
    }
}
