//! Collision detection and the collision clock
//!
//! Everything collides as a screen-aligned square centred on its position:
//! player 50, spikes 50, bomb bubbles 40. Timer bubbles are picked up by
//! distance in the world tick instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::SIM_DT;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square of side `size` centred on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test. Boxes that only share an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Advance the collision/visual clock by one step
///
/// Runs on its own 16ms clock, independent of the world tick. Collisions only
/// resolve while the run is live; the decorative sine clock keeps going on
/// the idle and pause screens.
pub fn collision_tick(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.visual_time += SIM_DT;

    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_spikes(state);
    if state.phase == GamePhase::Playing {
        collect_bombs(state);
    }
}

/// Spikes in spawn order. With a bomb every touching spike pops; without one
/// the first touching spike ends the run and the scan stops there.
fn resolve_spikes(state: &mut GameState) {
    let player_box = state.player.hitbox();
    let mut i = 0;
    while i < state.spikes.len() {
        if !state.spikes[i].hitbox().intersects(&player_box) {
            i += 1;
            continue;
        }
        if state.bomb_active {
            let spike = state.spikes.remove(i);
            state.events.push(GameEvent::SpikePopped { id: spike.id });
            log::trace!("Spike {} popped", spike.id);
        } else {
            state.trigger_game_over();
            break;
        }
    }
}

/// Bomb bubbles in reverse so removal keeps earlier indices valid
fn collect_bombs(state: &mut GameState) {
    let player_box = state.player.hitbox();
    for i in (0..state.bombs.len()).rev() {
        if state.bombs[i].hitbox().intersects(&player_box) {
            let bomb = state.bombs.remove(i);
            state.activate_bomb();
            state.events.push(GameEvent::BombCollected { id: bomb.id });
            log::debug!("Bomb bubble {} collected at {:.1}s", bomb.id, state.elapsed());
        }
    }
}
