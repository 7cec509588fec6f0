//! Fixed timestep world tick
//!
//! Spawns, moves and culls every entity. Collisions with spikes and bomb
//! bubbles run on their own clock in `collision.rs`.

use glam::Vec2;
use rand::Rng;

use super::spawn::{
    sample_edge_spawn, sample_spike_speed, sample_timer_spawn, spike_spawn_interval,
};
use super::state::{BombBubble, GameEvent, GamePhase, GameState, Spike, TimerBubble};
use crate::consts::*;
use crate::{perpendicular, unit_from_degrees};

/// Advance the world by one fixed timestep
pub fn tick(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    let elapsed = state.elapsed();

    // Bomb bubbles
    maybe_spawn_bomb(state, elapsed);
    for bomb in &mut state.bombs {
        let age = elapsed - bomb.created_at;
        bomb.pos = drift(bomb.pos, bomb.dir, bomb.angle, bomb.speed, age, 1.0);
    }
    let bounds = state.bounds;
    state
        .bombs
        .retain(|b| bounds.contains_with_margin(b.pos, CULL_MARGIN));

    // Timer bubbles
    maybe_spawn_timer(state);
    for timer in &mut state.timers {
        timer.pos = sway(timer, elapsed);
    }
    state
        .timers
        .retain(|t| bounds.contains_with_margin(t.pos, CULL_MARGIN));
    collect_timers(state, elapsed);

    // Spikes
    maybe_spawn_spike(state, elapsed);
    let multiplier = state.hazard_speed_multiplier();
    for spike in &mut state.spikes {
        spike.pos = drift(
            spike.pos,
            spike.dir,
            spike.angle,
            spike.speed,
            elapsed - spike.created_at,
            multiplier,
        );
    }
    state
        .spikes
        .retain(|s| bounds.contains_with_margin(s.pos, CULL_MARGIN));
}

/// One step of straight travel plus a sideways sine wobble
///
/// `age` is seconds since spawn. Only the straight part is scaled by
/// `multiplier`; the wobble keeps its full amplitude.
pub fn drift(pos: Vec2, dir: Vec2, angle: f32, speed: f32, age: f32, multiplier: f32) -> Vec2 {
    let wobble = (age * WOBBLE_FREQ + angle).sin() * WOBBLE_AMPLITUDE;
    pos + dir * speed * SIM_DT * multiplier + perpendicular(dir) * wobble * WOBBLE_GAIN
}

/// Timer bubble step: per-tick travel plus a diagonal sway on both axes
fn sway(timer: &TimerBubble, elapsed: f32) -> Vec2 {
    let step = unit_from_degrees(timer.angle) * timer.speed;
    let s = (timer.sine_offset + elapsed * TIMER_SINE_FREQ).sin() * TIMER_SINE_AMPLITUDE;
    timer.pos + step + Vec2::splat(s)
}

fn maybe_spawn_bomb(state: &mut GameState, elapsed: f32) {
    if state.bombs.len() >= MAX_BOMBS || state.rng.random_range(0..BOMB_SPAWN_ODDS) != 0 {
        return;
    }
    let bounds = state.bounds;
    let (zone, pos, heading) = sample_edge_spawn(&mut state.rng, &bounds, BOMB_SPAWN_MARGIN);
    let id = state.next_entity_id();
    log::trace!("Bomb bubble {id} from {zone:?}");
    state.bombs.push(BombBubble {
        id,
        pos,
        dir: heading.dir,
        angle: heading.angle,
        speed: BOMB_SPEED,
        created_at: elapsed,
    });
}

fn maybe_spawn_timer(state: &mut GameState) {
    if state.timers.len() >= MAX_TIMERS || state.time_ticks % TIMER_SPAWN_PERIOD_TICKS != 0 {
        return;
    }
    let bounds = state.bounds;
    let (pos, angle) = sample_timer_spawn(&mut state.rng, &bounds);
    let sine_offset = state.rng.random_range(0.0..=std::f32::consts::TAU);
    let id = state.next_entity_id();
    log::trace!("Timer bubble {id} at {pos:?}, heading {angle:.0}°");
    state.timers.push(TimerBubble {
        id,
        pos,
        angle,
        speed: TIMER_SPEED,
        sine_offset,
    });
}

/// Pick up timer bubbles near the player; each extends the slow window
fn collect_timers(state: &mut GameState, elapsed: f32) {
    let player = state.player.position();
    for i in (0..state.timers.len()).rev() {
        if state.timers[i].pos.distance(player) < TIMER_PICKUP_RADIUS {
            let timer = state.timers.remove(i);
            state.slow_until = elapsed + SLOW_DURATION;
            state.events.push(GameEvent::TimerBubbleCollected { id: timer.id });
            log::debug!(
                "Timer bubble {} collected, spikes slowed until {:.1}s",
                timer.id,
                state.slow_until
            );
        }
    }
}

fn maybe_spawn_spike(state: &mut GameState, elapsed: f32) {
    if elapsed - state.last_spike_spawn <= spike_spawn_interval(elapsed)
        || state.spikes.len() >= MAX_SPIKES
    {
        return;
    }
    state.last_spike_spawn = elapsed;

    let bounds = state.bounds;
    let (zone, pos, heading) = sample_edge_spawn(&mut state.rng, &bounds, SPIKE_SPAWN_MARGIN);
    let speed = sample_spike_speed(&mut state.rng, elapsed);
    let id = state.next_entity_id();
    log::trace!("Spike {id} from {zone:?} at {speed:.0} u/s");
    state.spikes.push(Spike {
        id,
        pos,
        dir: heading.dir,
        angle: heading.angle,
        speed,
        created_at: elapsed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Bounds::default());
        state.tap();
        state.drain_events();
        state
    }

    fn parked_spike(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.spikes.push(Spike {
            id,
            pos,
            dir: Vec2::X,
            angle: 0.0,
            speed: 0.0,
            created_at: 0.0,
        });
    }

    fn parked_timer(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.timers.push(TimerBubble {
            id,
            pos,
            angle: 0.0,
            speed: 0.0,
            sine_offset: 0.0,
        });
    }

    #[test]
    fn test_first_spike_step_from_left_edge() {
        let next = drift(Vec2::new(-50.0, 300.0), Vec2::X, 0.0, 60.0, 0.0, 1.0);
        assert!((next.x - -49.04).abs() < 1e-4);
        assert!((next.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_timer_sway_adds_same_offset_on_both_axes() {
        let timer = TimerBubble {
            id: 1,
            pos: Vec2::new(100.0, 200.0),
            angle: 90.0,
            speed: TIMER_SPEED,
            sine_offset: 0.5,
        };
        // sin(0.5 + 0.2 * 2.5) * 2 = sin(1) * 2
        let s = 1.0f32.sin() * 2.0;
        let next = sway(&timer, 0.2);
        assert!((next.x - (100.0 + s)).abs() < 1e-4);
        assert!((next.y - (200.0 + 1.5 + s)).abs() < 1e-4);
    }

    #[test]
    fn test_timer_moves_once_per_tick() {
        let mut state = playing(8);
        state.player.base = Vec2::new(-500.0, -500.0);
        let start = Vec2::new(200.0, 400.0);
        parked_timer(&mut state, start);
        state.timers[0].speed = TIMER_SPEED;
        tick(&mut state);

        // First tick runs at elapsed 0.016 with angle 0 and phase 0
        let s = (0.016f32 * TIMER_SINE_FREQ).sin() * TIMER_SINE_AMPLITUDE;
        let step = state.timers[0].pos - start;
        assert!((step.x - (TIMER_SPEED + s)).abs() < 1e-4);
        assert!((step.y - s).abs() < 1e-4);
        assert!((step.x - TIMER_SPEED - step.y).abs() < 1e-4);
    }

    #[test]
    fn test_slow_multiplier_scales_travel_only() {
        let fast = drift(Vec2::ZERO, Vec2::X, 0.0, 100.0, 0.5, 1.0);
        let slow = drift(Vec2::ZERO, Vec2::X, 0.0, 100.0, 0.5, SLOW_MULTIPLIER);
        assert!((fast.x - 1.6).abs() < 1e-5);
        assert!((slow.x - 0.64).abs() < 1e-5);
        // Same wobble either way
        assert_eq!(fast.y, slow.y);
        assert!((fast.y - (1.5f32).sin() * 12.0 * 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_idle_and_paused_do_not_advance() {
        let mut state = GameState::new(1, Bounds::default());
        tick(&mut state);
        assert_eq!(state.time_ticks, 0);

        state.tap();
        state.toggle_pause();
        tick(&mut state);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_first_spike_waits_for_interval() {
        let mut state = playing(9);
        // Interval at 0.48s is 0.4904, at 0.496s it is 0.4901: tick 31 is the first past it
        for _ in 0..30 {
            tick(&mut state);
        }
        assert!(state.spikes.is_empty());
        tick(&mut state);
        assert_eq!(state.spikes.len(), 1);
        assert!((state.last_spike_spawn - 0.496).abs() < 1e-5);
        let spike = &state.spikes[0];
        assert!(spike.speed >= SPIKE_BASE_SPEED);
        assert!(spike.speed <= crate::sim::spike_speed_ceiling(state.elapsed()));
        assert!((spike.dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_spike_cap() {
        let mut state = playing(2);
        let center = Vec2::new(state.bounds.width / 2.0, state.bounds.height / 2.0);
        state.player.base = Vec2::new(-500.0, -500.0);
        for _ in 0..MAX_SPIKES {
            parked_spike(&mut state, center);
        }
        state.last_spike_spawn = -10.0;
        tick(&mut state);
        assert_eq!(state.spikes.len(), MAX_SPIKES);
    }

    #[test]
    fn test_spikes_culled_outside_margin() {
        let mut state = playing(3);
        parked_spike(&mut state, Vec2::new(-101.0, 10.0));
        parked_spike(&mut state, Vec2::new(-99.0, 10.0));
        tick(&mut state);
        assert_eq!(state.spikes.len(), 1);
        assert!(state.spikes[0].pos.x > -100.0);
    }

    #[test]
    fn test_timer_spawns_every_two_seconds() {
        let mut state = playing(4);
        state.player.base = Vec2::new(-500.0, -500.0);
        for _ in 0..124 {
            tick(&mut state);
        }
        assert!(state.timers.is_empty());
        tick(&mut state);
        assert_eq!(state.timers.len(), 1);
        assert_eq!(state.timers[0].speed, TIMER_SPEED);
    }

    #[test]
    fn test_timer_spawn_suppressed_at_cap() {
        let mut state = playing(5);
        state.player.base = Vec2::new(-500.0, -500.0);
        let center = Vec2::new(state.bounds.width / 2.0, state.bounds.height / 2.0);
        parked_timer(&mut state, center);
        parked_timer(&mut state, center + Vec2::new(0.0, 100.0));
        state.time_ticks = TIMER_SPAWN_PERIOD_TICKS - 1;
        tick(&mut state);
        assert_eq!(state.time_ticks % TIMER_SPAWN_PERIOD_TICKS, 0);
        assert_eq!(state.timers.len(), 2);
    }

    #[test]
    fn test_timer_pickup_slows_spikes() {
        let mut state = playing(6);
        let player = state.player.position();
        parked_timer(&mut state, player + Vec2::new(10.0, 0.0));
        tick(&mut state);
        assert!(state.timers.is_empty());
        assert!((state.slow_until - (state.elapsed() + SLOW_DURATION)).abs() < 1e-5);
        assert_eq!(state.hazard_speed_multiplier(), SLOW_MULTIPLIER);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::TimerBubbleCollected { .. }))
        );

        // Slow window closes five seconds later
        state.time_ticks += (SLOW_DURATION / SIM_DT) as u64 + 1;
        assert_eq!(state.hazard_speed_multiplier(), 1.0);
    }

    #[test]
    fn test_bomb_bubbles_capped_and_inbounds() {
        let mut state = playing(11);
        state.player.base = Vec2::new(-500.0, -500.0);
        for _ in 0..2000 {
            tick(&mut state);
            assert!(state.bombs.len() <= MAX_BOMBS);
            for bomb in &state.bombs {
                assert_eq!(bomb.speed, BOMB_SPEED);
                assert!(state.bounds.contains_with_margin(bomb.pos, CULL_MARGIN));
            }
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing(99999);
        let mut state2 = playing(99999);
        for i in 0..600 {
            if i % 50 == 0 {
                let offset = Vec2::new(i as f32 * 0.1, 0.0);
                state1.drag(offset);
                state2.drag(offset);
            }
            tick(&mut state1);
            tick(&mut state2);
        }
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.spikes.len(), state2.spikes.len());
        for (a, b) in state1.spikes.iter().zip(&state2.spikes) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
    }
}
