//! Attract-mode / headless pilot
//!
//! Dodges spikes heading its way, otherwise goes for the nearest pickup.
//! Produces a per-tick step for the player's drag translation.

use glam::Vec2;

use super::state::{GamePhase, GameState};

/// Spikes further than this are ignored
const THREAT_RADIUS: f32 = 180.0;
/// How far ahead (seconds) to predict spike positions
const LOOKAHEAD: f32 = 0.25;
/// Stay this far from the edges
const EDGE_MARGIN: f32 = 60.0;
/// Max movement per tick
const MAX_STEP: f32 = 6.0;

/// Step to apply to the player this tick. Zero unless a run is live.
pub fn steer(state: &GameState) -> Vec2 {
    if state.phase != GamePhase::Playing {
        return Vec2::ZERO;
    }
    let player = state.player.position();
    let mut push = Vec2::ZERO;

    if !state.bomb_active {
        let mult = state.hazard_speed_multiplier();
        for spike in &state.spikes {
            // Lead the spike slightly along its heading
            let future = spike.pos + spike.dir * spike.speed * mult * LOOKAHEAD;
            let away = player - future;
            let dist = away.length();
            if dist < THREAT_RADIUS {
                // Inverse-distance weighting, closest spike dominates
                push += away.normalize_or(Vec2::Y) * (THREAT_RADIUS - dist) / dist.max(1.0);
            }
        }
    }

    if push.length_squared() < 1e-6 {
        // Nothing threatening: go get the nearest pickup
        let target = state
            .bombs
            .iter()
            .map(|b| b.pos)
            .chain(state.timers.iter().map(|t| t.pos))
            .min_by(|a, b| {
                a.distance_squared(player)
                    .partial_cmp(&b.distance_squared(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(target) = target {
            push = (target - player).normalize_or_zero();
        }
    }

    push += edge_repulsion(state, player);

    let step = push.clamp_length_max(MAX_STEP);
    state.bounds.clamp(player + step) - player
}

/// Pull back toward the middle when hugging an edge
fn edge_repulsion(state: &GameState, player: Vec2) -> Vec2 {
    let (w, h) = (state.bounds.width, state.bounds.height);
    let mut push = Vec2::ZERO;
    if player.x < EDGE_MARGIN {
        push.x += (EDGE_MARGIN - player.x) / EDGE_MARGIN;
    }
    if player.x > w - EDGE_MARGIN {
        push.x -= (player.x - (w - EDGE_MARGIN)) / EDGE_MARGIN;
    }
    if player.y < EDGE_MARGIN {
        push.y += (EDGE_MARGIN - player.y) / EDGE_MARGIN;
    }
    if player.y > h - EDGE_MARGIN {
        push.y -= (player.y - (h - EDGE_MARGIN)) / EDGE_MARGIN;
    }
    push
}
