//! Cancellable repeating countdown
//!
//! Replaces a wall-clock repeating timer with an explicit handle owned by the
//! session. The host advances it with elapsed seconds; it reports how many
//! intervals elapsed. At most one countdown is armed at a time: `start`
//! invalidates whatever was running before.

use serde::{Deserialize, Serialize};

/// Identifies one armed run of a [`Countdown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountdownHandle(u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    interval: f32,
    /// Seconds accumulated toward the next fire
    accumulated: f32,
    /// Bumped on every start, so stale handles never match
    generation: u32,
    armed: bool,
}

impl Countdown {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            accumulated: 0.0,
            generation: 0,
            armed: false,
        }
    }

    /// Arm a fresh run, cancelling any previous one
    pub fn start(&mut self) -> CountdownHandle {
        self.generation = self.generation.wrapping_add(1);
        self.accumulated = 0.0;
        self.armed = true;
        CountdownHandle(self.generation)
    }

    /// Disarm. Calling this on an idle countdown does nothing.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.accumulated = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether `handle` refers to the run that is currently armed
    pub fn is_current(&self, handle: CountdownHandle) -> bool {
        self.armed && handle.0 == self.generation
    }

    /// Advance by `dt` seconds, returning the number of whole intervals that fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.armed || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulated += dt;
        if self.accumulated < self.interval {
            return 0;
        }
        let remainder = self.accumulated % self.interval;
        // Saturates for absurd gaps; callers stop consuming after expiry
        let fired = ((self.accumulated - remainder) / self.interval).round() as u32;
        self.accumulated = remainder;
        fired
    }
}
