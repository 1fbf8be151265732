//! Ebi Dash entry point
//!
//! Runs the simulation headless with a simple autopilot and logs the outcome.
//!
//! Usage: `ebi-dash [frames] [difficulty] [seed]`, with `RUST_LOG` controlling
//! log output. Settings JSON can be supplied through `EBI_DASH_SETTINGS`.

use ebi_dash::records::FileStore;
use ebi_dash::sim::{StateTag, TickInput};
use ebi_dash::{Difficulty, Game, Settings, audio::NullSink};

const DEFAULT_FRAMES: u64 = 60 * 60 * 3;

/// Decide this frame's input from the visible state
fn autopilot(game: &Game) -> TickInput {
    let state = game.state();
    match game.state_tag() {
        StateTag::Start | StateTag::Caught => TickInput {
            action: true,
            ..TickInput::default()
        },
        StateTag::Playing => {
            let body = &state.player;
            let ground = state.ground_y(body.pos.x);
            let threat = state
                .enemies
                .iter()
                .any(|e| (e.pos - body.pos).length() < e.radius + body.radius + 60.0 && e.pos.x > body.pos.x);
            let sinking = body.pos.y > ground - body.radius * 3.0 && body.vel.y > 0.0;
            TickInput {
                action: (threat || sinking) && body.ticks_since_jump > 12,
                ..TickInput::default()
            }
        }
        _ => TickInput::default(),
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let frames = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let settings_json = std::env::var("EBI_DASH_SETTINGS").ok();
    let mut settings = Settings::load(settings_json.as_deref());
    if let Some(difficulty) = args.next().as_deref().and_then(Difficulty::from_str) {
        settings.difficulty = difficulty;
    }
    if let Some(seed) = args.next().and_then(|s| s.parse::<u64>().ok()) {
        settings.seed = seed;
    }

    let store = FileStore::new("ebi_dash_records.json");
    let mut game = Game::new(settings, Box::new(store), Box::new(NullSink));

    for frame in 0..frames {
        let input = autopilot(&game);
        game.frame(&input);
        game.pump_audio(frame as f64 * 1000.0 / 60.0);
        if game.state_tag() == StateTag::GameOver {
            break;
        }
    }

    let state = game.state();
    let reason = state.death.map(|d| d.to_string()).unwrap_or_else(|| "Still swimming".to_string());
    log::info!(
        "Finished after {} ticks ({:.1}s)",
        state.tick_count,
        game.elapsed_secs()
    );
    println!(
        "{}m  {}  lives {}  items {}  best {}m\n{}",
        game.score(),
        game.rank(),
        game.lives(),
        state.items_collected,
        game.records().high_score,
        reason
    );
}
