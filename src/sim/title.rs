//! Title screen background
//!
//! Bubbles drift in from the edges and pop when they meet a slow spikeball.
//! Purely decorative, ticked at 50 Hz while the title is showing.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::EntityView;
use crate::Bounds;
use crate::consts::TITLE_CULL_MARGIN;

const BUBBLE_SIZE: f32 = 30.0;
const SPIKEBALL_SIZE: f32 = 40.0;
/// Bubbles closer than this to a spikeball pop
const POP_DISTANCE: f32 = 25.0;
/// One initial spikeball per this many square units of screen
const SPIKEBALL_DENSITY: f32 = 60000.0;
/// Wave phase gained per title tick
const WAVE_STEP: f32 = 0.08;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleBubble {
    pub id: u32,
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spikeball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone)]
pub struct TitleScene {
    pub bounds: Bounds,
    pub bubbles: Vec<TitleBubble>,
    pub spikeballs: Vec<Spikeball>,
    /// Drives the logo and button bob
    pub wave: f32,
    rng: Pcg32,
    next_id: u32,
}

impl TitleScene {
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        let mut scene = Self {
            bounds,
            bubbles: Vec::new(),
            spikeballs: Vec::new(),
            wave: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        scene.reset();
        scene
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh background: a sprinkling of spikeballs, no bubbles
    pub fn reset(&mut self) {
        self.bubbles.clear();
        self.spikeballs.clear();
        let (w, h) = (self.bounds.width, self.bounds.height);
        let count = (self.bounds.area() / SPIKEBALL_DENSITY) as usize;
        // Tiny screens have no interior band to scatter into
        let (x_max, y_max) = ((w - 60.0).max(60.0), (h - 60.0).max(60.0));
        for _ in 0..count {
            let pos = Vec2::new(
                self.rng.random_range(60.0..=x_max),
                self.rng.random_range(60.0..=y_max),
            );
            let vel = Vec2::new(
                self.rng.random_range(-0.5..=0.5),
                self.rng.random_range(-0.5..=0.5),
            );
            let id = self.next_entity_id();
            self.spikeballs.push(Spikeball { id, pos, vel });
        }
    }

    /// Leaving the title screen empties it
    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.spikeballs.clear();
    }

    pub fn tick(&mut self) {
        self.wave += WAVE_STEP;
        self.update_bubbles();
        self.update_spikeballs();
    }

    fn update_bubbles(&mut self) {
        let bounds = self.bounds;
        let spikeballs = &self.spikeballs;
        self.bubbles.retain_mut(|b| {
            b.pos += b.vel;
            bounds.contains_with_margin(b.pos, TITLE_CULL_MARGIN)
                && !spikeballs
                    .iter()
                    .any(|s| s.pos.distance(b.pos) < POP_DISTANCE)
        });

        if self.rng.random_range(0..10u32) == 0 {
            let bubble = self.random_bubble();
            self.bubbles.push(bubble);
        }
    }

    fn update_spikeballs(&mut self) {
        let bounds = self.bounds;
        self.spikeballs.retain_mut(|s| {
            s.pos += s.vel;
            bounds.contains_with_margin(s.pos, TITLE_CULL_MARGIN)
        });

        if self.rng.random_range(0..20u32) == 0 {
            let spikeball = self.random_spikeball();
            self.spikeballs.push(spikeball);
        }
    }

    /// Entry point just off a random edge and an inward velocity
    fn edge_entry(&mut self, margin: f32, inward: (f32, f32), cross: f32) -> (Vec2, Vec2) {
        let (w, h) = (self.bounds.width, self.bounds.height);
        let rng = &mut self.rng;
        let speed = rng.random_range(inward.0..=inward.1);
        let side = rng.random_range(-cross..=cross);
        match rng.random_range(0..4u8) {
            0 => (Vec2::new(-margin, rng.random_range(0.0..=h)), Vec2::new(speed, side)),
            1 => (Vec2::new(w + margin, rng.random_range(0.0..=h)), Vec2::new(-speed, side)),
            2 => (Vec2::new(rng.random_range(0.0..=w), -margin), Vec2::new(side, speed)),
            _ => (Vec2::new(rng.random_range(0.0..=w), h + margin), Vec2::new(side, -speed)),
        }
    }

    fn random_bubble(&mut self) -> TitleBubble {
        let (pos, vel) = self.edge_entry(30.0, (0.5, 1.5), 0.5);
        let opacity = self.rng.random_range(0.3..=0.9);
        TitleBubble {
            id: self.next_entity_id(),
            pos,
            vel,
            opacity,
        }
    }

    fn random_spikeball(&mut self) -> Spikeball {
        let (pos, vel) = self.edge_entry(40.0, (0.5, 1.0), 0.3);
        Spikeball {
            id: self.next_entity_id(),
            pos,
            vel,
        }
    }

    /// Logo bob
    pub fn logo_offset(&self) -> f32 {
        self.wave.sin() * 2.0
    }

    /// Bob of the menu button at `index` (start, settings, help)
    pub fn button_offset(&self, index: usize) -> f32 {
        (self.wave + index as f32).sin() * 7.0
    }

    pub fn bubble_views(&self) -> Vec<EntityView> {
        self.bubbles
            .iter()
            .map(|b| EntityView {
                id: b.id,
                x: b.pos.x,
                y: b.pos.y,
                size: BUBBLE_SIZE,
            })
            .collect()
    }

    pub fn spikeball_views(&self) -> Vec<EntityView> {
        self.spikeballs
            .iter()
            .map(|s| EntityView {
                id: s.id,
                x: s.pos.x,
                y: s.pos.y,
                size: SPIKEBALL_SIZE,
            })
            .collect()
    }
}
