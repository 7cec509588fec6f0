//! Game state and core simulation types
//!
//! Everything a session owns lives here. The host only touches it through the
//! input mutators below, the two tick functions and `snapshot()`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::countdown::{Countdown, CountdownHandle};
use crate::Bounds;
use crate::consts::*;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first drag or tap
    Idle,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Hit a spike without a bomb, terminal until restart
    GameOver,
}

/// Things the host reacts to (sound, HUD flashes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    TimerBubbleCollected { id: u32 },
    BombCollected { id: u32 },
    /// Spike destroyed by contact while bomb-active
    SpikePopped { id: u32 },
    BombExpired,
    GameOver { survived: f32 },
    Restarted,
}

/// The player's bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Resting position (committed at the end of each drag)
    pub base: Vec2,
    /// Translation of the drag in progress
    pub drag: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            base: PLAYER_START,
            drag: Vec2::ZERO,
        }
    }
}

impl Player {
    /// Where the bubble is drawn (and collides)
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.base + self.drag
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::centered(self.position(), PLAYER_SIZE)
    }

    /// Fold the drag translation into the base position
    pub fn commit_drag(&mut self) {
        self.base += self.drag;
        self.drag = Vec2::ZERO;
    }
}

/// A lethal hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spike {
    pub id: u32,
    pub pos: Vec2,
    /// Unit travel direction
    pub dir: Vec2,
    /// atan2 of `dir`, also the wobble phase
    pub angle: f32,
    /// Units per second
    pub speed: f32,
    /// Elapsed game time at spawn
    pub created_at: f32,
}

impl Spike {
    pub fn hitbox(&self) -> Aabb {
        Aabb::centered(self.pos, SPIKE_SIZE)
    }
}

/// Pickup granting temporary invulnerability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombBubble {
    pub id: u32,
    pub pos: Vec2,
    pub dir: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub created_at: f32,
}

impl BombBubble {
    pub fn hitbox(&self) -> Aabb {
        Aabb::centered(self.pos, BOMB_SIZE)
    }
}

/// Pickup that slows spikes down for a while
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerBubble {
    pub id: u32,
    pub pos: Vec2,
    /// Travel angle in degrees
    pub angle: f32,
    /// Units per tick
    pub speed: f32,
    /// Personal phase of the sideways sway
    pub sine_offset: f32,
}

/// Read-only view of one entity for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Per-frame snapshot handed to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub elapsed: f32,
    pub bomb_active: bool,
    pub bomb_seconds_left: i32,
    pub slowed: bool,
    pub player: EntityView,
    pub spikes: Vec<EntityView>,
    pub bombs: Vec<EntityView>,
    pub timers: Vec<EntityView>,
    /// Vertical bob of the title and pause overlays
    pub title_offset: f32,
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Full generator state, so a restored run continues the same sequence
    pub(crate) rng: Pcg32,
    pub bounds: Bounds,
    pub phase: GamePhase,
    /// World ticks since the run started
    pub time_ticks: u64,
    /// Elapsed time of the most recent spike spawn
    pub last_spike_spawn: f32,
    /// Spikes are slowed while elapsed < slow_until
    pub slow_until: f32,
    pub bomb_active: bool,
    /// Seconds of bomb left, decremented once per countdown interval
    pub bomb_remaining: f32,
    pub bomb_countdown: Countdown,
    /// Run of `bomb_countdown` granted by the latest bomb
    bomb_handle: Option<CountdownHandle>,
    /// Decorative sine clock, advanced by the collision tick
    pub visual_time: f32,
    pub player: Player,
    pub spikes: Vec<Spike>,
    pub bombs: Vec<BombBubble>,
    pub timers: Vec<TimerBubble>,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds,
            phase: GamePhase::Idle,
            time_ticks: 0,
            last_spike_spawn: 0.0,
            slow_until: 0.0,
            bomb_active: false,
            bomb_remaining: 0.0,
            bomb_countdown: Countdown::new(COUNTDOWN_INTERVAL),
            bomb_handle: None,
            visual_time: 0.0,
            player: Player::default(),
            spikes: Vec::new(),
            bombs: Vec::new(),
            timers: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Game time in seconds
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn is_slowed(&self) -> bool {
        self.elapsed() < self.slow_until
    }

    /// Spike speed multiplier for the current tick
    pub fn hazard_speed_multiplier(&self) -> f32 {
        if self.is_slowed() { SLOW_MULTIPLIER } else { 1.0 }
    }

    // === Input ===

    /// Drag in progress with total `translation` since the drag began.
    /// The first drag starts the run.
    pub fn drag(&mut self, translation: Vec2) {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Paused) {
            return;
        }
        if !translation.is_finite() {
            log::warn!("Ignoring non-finite drag translation {translation:?}");
            return;
        }
        if self.phase == GamePhase::Idle {
            self.start();
        }
        self.player.drag = translation;
    }

    /// Finger lifted: the bubble stays where it was dragged
    pub fn end_drag(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.player.commit_drag();
    }

    /// A tap on the bubble starts the run
    pub fn tap(&mut self) {
        if self.phase == GamePhase::Idle {
            self.start();
        }
    }

    fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Run started (seed {})", self.seed);
    }

    /// Pause button. Only meaningful once the run has started.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
                log::info!("Paused at {:.1}s", self.elapsed());
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
            GamePhase::Idle | GamePhase::GameOver => {}
        }
    }

    /// Throw away the run and wait for the next first input
    pub fn restart(&mut self) {
        self.bomb_countdown.cancel();
        self.bomb_handle = None;
        self.bomb_active = false;
        self.bomb_remaining = 0.0;
        self.spikes.clear();
        self.bombs.clear();
        self.timers.clear();
        self.player = Player::default();
        self.time_ticks = 0;
        self.last_spike_spawn = 0.0;
        self.slow_until = 0.0;
        self.visual_time = 0.0;
        self.phase = GamePhase::Idle;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    // === Effects ===

    /// Grant (or refresh) bomb mode, replacing any running countdown
    pub(crate) fn activate_bomb(&mut self) {
        self.bomb_active = true;
        self.bomb_remaining = BOMB_DURATION;
        self.bomb_handle = Some(self.bomb_countdown.start());
    }

    /// Feed wall-clock seconds to the bomb countdown. Fires only count for
    /// the countdown started by the latest bomb.
    pub fn advance_bomb_countdown(&mut self, dt: f32) {
        let Some(handle) = self.bomb_handle else {
            return;
        };
        if !self.bomb_countdown.is_current(handle) {
            log::debug!("Dropping stale bomb countdown");
            self.bomb_handle = None;
            return;
        }
        let fired = self.bomb_countdown.advance(dt);
        for _ in 0..fired {
            self.bomb_remaining -= COUNTDOWN_INTERVAL;
            if self.bomb_remaining <= 0.0 {
                self.bomb_remaining = 0.0;
                self.bomb_active = false;
                self.bomb_countdown.cancel();
                self.bomb_handle = None;
                self.events.push(GameEvent::BombExpired);
                log::debug!("Bomb expired at {:.1}s", self.elapsed());
                break;
            }
        }
    }

    /// Lethal hit. Returns false if the run was already over.
    pub(crate) fn trigger_game_over(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        let survived = self.elapsed();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { survived });
        log::info!("Game over after {survived:.1}s");
        true
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Presentation ===

    /// Bob offset for title/pause overlays
    pub fn title_offset(&self) -> f32 {
        (self.visual_time * 2.0).sin() * 10.0
    }

    /// Whole seconds of bomb left, as shown on the HUD
    pub fn bomb_seconds_left(&self) -> i32 {
        self.bomb_remaining as i32
    }

    pub fn time_label(&self) -> String {
        format!("Time: {:.1}s", self.elapsed())
    }

    pub fn bomb_label(&self) -> Option<String> {
        self.bomb_active
            .then(|| format!("Bomb: {}s", self.bomb_seconds_left()))
    }

    pub fn snapshot(&self) -> Snapshot {
        let player_pos = self.player.position();
        Snapshot {
            phase: self.phase,
            elapsed: self.elapsed(),
            bomb_active: self.bomb_active,
            bomb_seconds_left: self.bomb_seconds_left(),
            slowed: self.is_slowed(),
            player: EntityView {
                id: 0,
                x: player_pos.x,
                y: player_pos.y,
                size: PLAYER_SIZE,
            },
            spikes: self
                .spikes
                .iter()
                .map(|s| EntityView {
                    id: s.id,
                    x: s.pos.x,
                    y: s.pos.y,
                    size: SPIKE_SIZE,
                })
                .collect(),
            bombs: self
                .bombs
                .iter()
                .map(|b| EntityView {
                    id: b.id,
                    x: b.pos.x,
                    y: b.pos.y,
                    size: BOMB_SIZE,
                })
                .collect(),
            timers: self
                .timers
                .iter()
                .map(|t| EntityView {
                    id: t.id,
                    x: t.pos.x,
                    y: t.pos.y,
                    size: TIMER_SIZE,
                })
                .collect(),
            title_offset: self.title_offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(12345, Bounds::default())
    }

    #[test]
    fn test_first_drag_starts_run() {
        let mut state = state();
        assert_eq!(state.phase, GamePhase::Idle);
        state.drag(Vec2::new(10.0, -5.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.position(), PLAYER_START + Vec2::new(10.0, -5.0));
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_tap_starts_run_once() {
        let mut state = state();
        state.tap();
        state.tap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn test_end_drag_commits_position() {
        let mut state = state();
        state.drag(Vec2::new(20.0, 30.0));
        state.end_drag();
        assert_eq!(state.player.drag, Vec2::ZERO);
        assert_eq!(state.player.base, PLAYER_START + Vec2::new(20.0, 30.0));

        // Next drag is relative to the committed base
        state.drag(Vec2::new(-5.0, 0.0));
        assert_eq!(state.player.position(), PLAYER_START + Vec2::new(15.0, 30.0));
    }

    #[test]
    fn test_non_finite_drag_ignored() {
        let mut state = state();
        state.drag(Vec2::new(f32::NAN, 0.0));
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.player.position(), PLAYER_START);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = state();
        // Nothing to pause before the run starts
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Idle);

        state.tap();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        // Drags are ignored while paused
        state.drag(Vec2::new(100.0, 0.0));
        assert_eq!(state.player.position(), PLAYER_START);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_is_terminal_for_input() {
        let mut state = state();
        state.tap();
        assert!(state.trigger_game_over());
        assert!(!state.trigger_game_over());
        state.drag(Vec2::new(50.0, 50.0));
        state.toggle_pause();
        state.tap();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.position(), PLAYER_START);
    }

    #[test]
    fn test_bomb_countdown_expires_after_five_seconds() {
        let mut state = state();
        state.activate_bomb();
        for _ in 0..4 {
            state.advance_bomb_countdown(1.0);
            assert!(state.bomb_active);
        }
        assert_eq!(state.bomb_seconds_left(), 1);
        state.advance_bomb_countdown(1.0);
        assert!(!state.bomb_active);
        assert!(!state.bomb_countdown.is_armed());
        assert!(state.drain_events().contains(&GameEvent::BombExpired));
    }

    #[test]
    fn test_second_bomb_resets_duration() {
        let mut state = state();
        state.activate_bomb();
        state.advance_bomb_countdown(3.5);
        assert_eq!(state.bomb_remaining, 2.0);
        state.activate_bomb();
        assert_eq!(state.bomb_remaining, BOMB_DURATION);
        // The half second from the old countdown does not carry over
        state.advance_bomb_countdown(0.6);
        assert_eq!(state.bomb_remaining, BOMB_DURATION);
    }

    #[test]
    fn test_restart_clears_session() {
        let mut state = state();
        state.tap();
        state.time_ticks = 500;
        state.slow_until = 12.0;
        state.activate_bomb();
        let id = state.next_entity_id();
        state.spikes.push(Spike {
            id,
            pos: Vec2::ZERO,
            dir: Vec2::X,
            angle: 0.0,
            speed: 60.0,
            created_at: 0.0,
        });
        state.trigger_game_over();

        state.restart();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.elapsed(), 0.0);
        assert!(state.spikes.is_empty() && state.bombs.is_empty() && state.timers.is_empty());
        assert!(!state.bomb_active);
        assert!(!state.bomb_countdown.is_armed());
        assert!(!state.is_slowed());
        assert_eq!(state.player.position(), PLAYER_START);
    }

    #[test]
    fn test_hud_labels() {
        let mut state = state();
        state.time_ticks = 100;
        assert_eq!(state.time_label(), "Time: 1.6s");
        assert_eq!(state.bomb_label(), None);
        state.activate_bomb();
        assert_eq!(state.bomb_label().as_deref(), Some("Bomb: 5s"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = state();
        state.tap();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(json.contains("\"spikes\":[]"));
    }

    #[test]
    fn test_restored_session_continues_same_run() {
        let mut state = state();
        state.tap();
        for _ in 0..300 {
            crate::sim::tick(&mut state);
        }
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        for _ in 0..300 {
            crate::sim::tick(&mut state);
            crate::sim::tick(&mut restored);
        }
        assert!(!state.spikes.is_empty());
        let spikes = |s: &GameState| {
            s.spikes
                .iter()
                .map(|spike| (spike.id, spike.pos))
                .collect::<Vec<_>>()
        };
        assert_eq!(spikes(&state), spikes(&restored));
        assert_eq!(state.next_entity_id(), restored.next_entity_id());
    }

    #[test]
    fn test_foreign_countdown_run_is_ignored() {
        let mut state = state();
        state.activate_bomb();
        // Someone rearms the countdown behind the bomb's back
        state.bomb_countdown.start();
        state.advance_bomb_countdown(2.0);
        assert_eq!(state.bomb_remaining, BOMB_DURATION);
        // A fresh bomb takes ownership again
        state.activate_bomb();
        state.advance_bomb_countdown(2.0);
        assert_eq!(state.bomb_remaining, 3.0);
    }

    #[test]
    fn test_huge_countdown_step_expires_once() {
        let mut state = state();
        state.activate_bomb();
        state.advance_bomb_countdown(1.0e9);
        assert!(!state.bomb_active);
        assert_eq!(state.bomb_remaining, 0.0);
        let expiries = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::BombExpired)
            .count();
        assert_eq!(expiries, 1);
        state.advance_bomb_countdown(f32::INFINITY);
        assert!(state.drain_events().is_empty());
    }
}
