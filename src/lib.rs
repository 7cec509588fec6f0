//! Bubble Dodge - drag a bubble, dodge the spikes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, session state)
//! - `game`: Frame scheduler driving the simulation clocks
//! - `audio`: Sound effect boundary (Web Audio on wasm)
//! - `settings`: Volume preferences

pub mod audio;
pub mod game;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{Game, Screen};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (world and collision clocks)
    pub const SIM_DT: f32 = 0.016;
    /// Title screen animation timestep
    pub const TITLE_DT: f32 = 0.02;
    /// Bomb countdown granularity (seconds)
    pub const COUNTDOWN_INTERVAL: f32 = 1.0;
    /// Maximum substeps per clock per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the scheduler will accept
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default play area (portrait phone)
    pub const DEFAULT_SCREEN_WIDTH: f32 = 402.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 874.0;

    /// Player bubble
    pub const PLAYER_START: Vec2 = Vec2::new(330.0, 500.0);
    pub const PLAYER_SIZE: f32 = 50.0;

    /// Spikes
    pub const SPIKE_SIZE: f32 = 50.0;
    pub const MAX_SPIKES: usize = 50;
    pub const SPIKE_SPAWN_MARGIN: f32 = 50.0;
    pub const SPIKE_MAX_INTERVAL: f32 = 0.5;
    pub const SPIKE_MIN_INTERVAL: f32 = 0.02;
    /// Interval shrink per second of play
    pub const SPIKE_INTERVAL_DECAY: f32 = 0.02;
    pub const SPIKE_BASE_SPEED: f32 = 60.0;
    pub const SPIKE_MAX_SPEED: f32 = 600.0;
    /// Seconds until the speed range is fully open
    pub const DIFFICULTY_RAMP_SECS: f32 = 60.0;

    /// Bomb bubbles
    pub const BOMB_SIZE: f32 = 40.0;
    pub const MAX_BOMBS: usize = 3;
    pub const BOMB_SPAWN_MARGIN: f32 = 40.0;
    /// One in N ticks spawns a bomb bubble
    pub const BOMB_SPAWN_ODDS: u32 = 11;
    pub const BOMB_SPEED: f32 = 80.0;
    pub const BOMB_DURATION: f32 = 5.0;

    /// Hazard wobble (spikes and bombs)
    pub const WOBBLE_FREQ: f32 = 3.0;
    pub const WOBBLE_AMPLITUDE: f32 = 12.0;
    pub const WOBBLE_GAIN: f32 = 0.05;

    /// Timer bubbles
    pub const TIMER_SIZE: f32 = 50.0;
    pub const MAX_TIMERS: usize = 2;
    pub const TIMER_SPAWN_MARGIN: f32 = 40.0;
    /// Spawn window recurs every 2 seconds (125 ticks of 16ms)
    pub const TIMER_SPAWN_PERIOD_TICKS: u64 = 125;
    /// Units per tick
    pub const TIMER_SPEED: f32 = 1.5;
    pub const TIMER_SINE_FREQ: f32 = 2.5;
    pub const TIMER_SINE_AMPLITUDE: f32 = 2.0;
    pub const TIMER_PICKUP_RADIUS: f32 = 50.0;
    pub const SLOW_DURATION: f32 = 5.0;
    pub const SLOW_MULTIPLIER: f32 = 0.4;

    /// Hazards and pickups are culled this far outside the screen
    pub const CULL_MARGIN: f32 = 100.0;
    /// Title screen decorations are culled this far outside the screen
    pub const TITLE_CULL_MARGIN: f32 = 50.0;
}

/// Play area in screen units (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(consts::DEFAULT_SCREEN_WIDTH, consts::DEFAULT_SCREEN_HEIGHT)
    }
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// True if `pos` lies within the screen grown by `margin` on every side
    #[inline]
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Clamp a point onto the visible screen
    #[inline]
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Perpendicular of a direction (rotated +90° in screen space)
#[inline]
pub fn perpendicular(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}

/// Unit vector for an angle in degrees
#[inline]
pub fn unit_from_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}
