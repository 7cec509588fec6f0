//! Bubble Dodge entry point
//!
//! The browser build starts from `web::wasm_start`. Natively this runs a
//! headless session with the autopilot holding the bubble.
//!
//! Usage:
//!   cargo run -- [seed] [seconds]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bubble_dodge::audio::SilentAudio;
    use bubble_dodge::consts::SIM_DT;
    use bubble_dodge::sim::{GameEvent, GamePhase};
    use bubble_dodge::{Bounds, Game, Settings};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(20240601);
    let limit = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(120.0);
    log::info!("Bubble Dodge (native, headless) seed {seed}, up to {limit:.0}s");

    let mut game = Game::new(seed, Bounds::default(), Settings::default(), SilentAudio::default());
    game.set_autopilot(true);
    game.start_game();

    let (mut pickups, mut bombs, mut popped) = (0u32, 0u32, 0u32);
    let mut wall = 0.0f32;
    while wall < limit {
        for event in game.frame(SIM_DT) {
            match event {
                GameEvent::TimerBubbleCollected { .. } => pickups += 1,
                GameEvent::BombCollected { .. } => bombs += 1,
                GameEvent::SpikePopped { .. } => popped += 1,
                _ => {}
            }
        }
        wall += SIM_DT;
        if game.session().is_some_and(|s| s.phase == GamePhase::GameOver) {
            break;
        }
    }

    let survived = game.session().map(|s| s.elapsed()).unwrap_or(0.0);
    log::info!(
        "Survived {survived:.1}s: {pickups} timer bubbles, {bombs} bombs, {popped} spikes popped"
    );
    println!("{survived:.1}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start, this is just to satisfy the compiler
}
