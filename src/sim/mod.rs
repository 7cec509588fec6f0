//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids never reused)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod countdown;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod title;

pub use autopilot::steer;
pub use collision::{Aabb, collision_tick};
pub use countdown::{Countdown, CountdownHandle};
pub use spawn::{Heading, SpawnZone, spike_spawn_interval, spike_speed_ceiling};
pub use state::{
    BombBubble, EntityView, GameEvent, GamePhase, GameState, Player, Snapshot, Spike,
    TimerBubble,
};
pub use tick::tick;
pub use title::TitleScene;
