//! Edge spawning and difficulty curves
//!
//! Hazards and pickups enter from just outside the screen. Spikes and bomb
//! bubbles share an 8-entry zone table (4 edges, 4 corners); timer bubbles use
//! the 4 edges with a launch angle biased back into the screen.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::consts::*;

/// Where an edge-spawned entity enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnZone {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SpawnZone {
    pub const ALL: [SpawnZone; 8] = [
        SpawnZone::Left,
        SpawnZone::Right,
        SpawnZone::Top,
        SpawnZone::Bottom,
        SpawnZone::TopLeft,
        SpawnZone::TopRight,
        SpawnZone::BottomLeft,
        SpawnZone::BottomRight,
    ];

    /// Uniformly pick one of the 8 zones
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Spawn point `margin` units outside the screen
    pub fn origin<R: Rng + ?Sized>(self, rng: &mut R, bounds: &Bounds, margin: f32) -> Vec2 {
        let (w, h) = (bounds.width, bounds.height);
        match self {
            SpawnZone::Left => Vec2::new(-margin, rng.random_range(0.0..=h)),
            SpawnZone::Right => Vec2::new(w + margin, rng.random_range(0.0..=h)),
            SpawnZone::Top => Vec2::new(rng.random_range(0.0..=w), -margin),
            SpawnZone::Bottom => Vec2::new(rng.random_range(0.0..=w), h + margin),
            SpawnZone::TopLeft => Vec2::new(-margin, -margin),
            SpawnZone::TopRight => Vec2::new(w + margin, -margin),
            SpawnZone::BottomLeft => Vec2::new(-margin, h + margin),
            SpawnZone::BottomRight => Vec2::new(w + margin, h + margin),
        }
    }

    /// Unnormalized inward direction. Straight edges get a random sideways
    /// component, corners head along the diagonal.
    pub fn raw_direction<R: Rng + ?Sized>(self, rng: &mut R) -> Vec2 {
        let mut skew = || rng.random_range(-0.5..=0.5);
        match self {
            SpawnZone::Left => Vec2::new(1.0, skew()),
            SpawnZone::Right => Vec2::new(-1.0, skew()),
            SpawnZone::Top => Vec2::new(skew(), 1.0),
            SpawnZone::Bottom => Vec2::new(skew(), -1.0),
            SpawnZone::TopLeft => Vec2::new(1.0, 1.0),
            SpawnZone::TopRight => Vec2::new(-1.0, 1.0),
            SpawnZone::BottomLeft => Vec2::new(1.0, -1.0),
            SpawnZone::BottomRight => Vec2::new(-1.0, -1.0),
        }
    }
}

/// Normalized travel direction plus its angle (radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub dir: Vec2,
    pub angle: f32,
}

impl Heading {
    /// Normalize `raw` and derive the angle from it
    pub fn from_raw(raw: Vec2) -> Self {
        let dir = raw.try_normalize().unwrap_or(Vec2::X);
        Self {
            dir,
            angle: dir.y.atan2(dir.x),
        }
    }
}

/// Sample a zone, its spawn point and heading in one go
pub fn sample_edge_spawn<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: &Bounds,
    margin: f32,
) -> (SpawnZone, Vec2, Heading) {
    let zone = SpawnZone::sample(rng);
    let pos = zone.origin(rng, bounds, margin);
    let heading = Heading::from_raw(zone.raw_direction(rng));
    (zone, pos, heading)
}

/// Seconds between spike spawns at `elapsed` seconds into the run
pub fn spike_spawn_interval(elapsed: f32) -> f32 {
    (SPIKE_MAX_INTERVAL - elapsed * SPIKE_INTERVAL_DECAY).max(SPIKE_MIN_INTERVAL)
}

/// Fraction of the difficulty ramp reached, 0..=1
pub fn difficulty(elapsed: f32) -> f32 {
    (elapsed / DIFFICULTY_RAMP_SECS).clamp(0.0, 1.0)
}

/// Upper bound of the spike speed range at `elapsed`
pub fn spike_speed_ceiling(elapsed: f32) -> f32 {
    SPIKE_BASE_SPEED + (SPIKE_MAX_SPEED - SPIKE_BASE_SPEED) * difficulty(elapsed)
}

pub fn sample_spike_speed<R: Rng + ?Sized>(rng: &mut R, elapsed: f32) -> f32 {
    rng.random_range(SPIKE_BASE_SPEED..=spike_speed_ceiling(elapsed))
}

/// Timer bubble entry point and launch angle in degrees
pub fn sample_timer_spawn<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds) -> (Vec2, f32) {
    let (w, h) = (bounds.width, bounds.height);
    let m = TIMER_SPAWN_MARGIN;
    match rng.random_range(0..4u8) {
        0 => (
            Vec2::new(rng.random_range(0.0..=w), -m),
            rng.random_range(20.0..=160.0),
        ),
        1 => (
            Vec2::new(rng.random_range(0.0..=w), h + m),
            rng.random_range(200.0..=340.0),
        ),
        2 => (
            Vec2::new(-m, rng.random_range(0.0..=h)),
            rng.random_range(-70.0..=70.0),
        ),
        _ => (
            Vec2::new(w + m, rng.random_range(0.0..=h)),
            rng.random_range(110.0..=250.0),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_interval_curve() {
        assert!((spike_spawn_interval(0.0) - 0.5).abs() < 1e-6);
        assert!((spike_spawn_interval(10.0) - 0.3).abs() < 1e-6);
        assert!((spike_spawn_interval(24.0) - 0.02).abs() < 1e-6);
        assert_eq!(spike_spawn_interval(100.0), SPIKE_MIN_INTERVAL);
    }

    #[test]
    fn test_speed_ceiling_ramp() {
        assert_eq!(spike_speed_ceiling(0.0), 60.0);
        assert!((spike_speed_ceiling(30.0) - 330.0).abs() < 1e-3);
        assert_eq!(spike_speed_ceiling(60.0), 600.0);
        assert_eq!(spike_speed_ceiling(500.0), 600.0);
    }

    #[test]
    fn test_speed_at_start_is_base() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(sample_spike_speed(&mut rng, 0.0), SPIKE_BASE_SPEED);
        }
    }

    #[test]
    fn test_heading_normalizes() {
        let h = Heading::from_raw(Vec2::new(1.0, 1.0));
        assert!((h.dir.length() - 1.0).abs() < 1e-6);
        assert!((h.angle - std::f32::consts::FRAC_PI_4).abs() < 1e-6);

        // Degenerate input falls back to +x
        let h = Heading::from_raw(Vec2::ZERO);
        assert_eq!(h.dir, Vec2::X);
        assert_eq!(h.angle, 0.0);
    }

    #[test]
    fn test_edge_spawns_point_inward() {
        let bounds = Bounds::new(400.0, 800.0);
        let center = Vec2::new(200.0, 400.0);
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            let (zone, pos, heading) = sample_edge_spawn(&mut rng, &bounds, 50.0);
            assert!(!bounds.contains_with_margin(pos, 49.0), "{zone:?} spawned on screen");
            // Moving along the heading brings the entity closer to the screen
            let next = pos + heading.dir * 10.0;
            match zone {
                SpawnZone::Left => assert!(next.x > pos.x),
                SpawnZone::Right => assert!(next.x < pos.x),
                SpawnZone::Top => assert!(next.y > pos.y),
                SpawnZone::Bottom => assert!(next.y < pos.y),
                _ => assert!(next.distance(center) < pos.distance(center)),
            }
        }
    }

    #[test]
    fn test_timer_spawn_angles() {
        let bounds = Bounds::new(400.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let (pos, angle) = sample_timer_spawn(&mut rng, &bounds);
            if pos.y < 0.0 {
                assert!((20.0..=160.0).contains(&angle));
            } else if pos.y > bounds.height {
                assert!((200.0..=340.0).contains(&angle));
            } else if pos.x < 0.0 {
                assert!((-70.0..=70.0).contains(&angle));
            } else {
                assert!((110.0..=250.0).contains(&angle));
            }
            // Every edge launches back toward the screen
            let step = crate::unit_from_degrees(angle);
            if pos.y < 0.0 {
                assert!(step.y > 0.0);
            } else if pos.y > bounds.height {
                assert!(step.y < 0.0);
            } else if pos.x < 0.0 {
                assert!(step.x > 0.0);
            } else {
                assert!(step.x < 0.0);
            }
        }
    }
}
