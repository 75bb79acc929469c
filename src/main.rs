//! Fruit Fall entry point
//!
//! Headless native run: plays one autopilot session on the simulated clock,
//! logs what the HUD would show, and prints the final HUD as JSON.
//!
//! Usage: `fruit-fall [TUNING] [SECONDS] [SEED] [--quality low|medium|high]`

use std::path::PathBuf;

use clap::Parser;
use fruit_fall::consts::STEPS_PER_SECOND;
use fruit_fall::sim::{GameEvent, GameSession, TickInput, tick};
use fruit_fall::{QualityPreset, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless autopilot run of Fruit Fall", long_about = None)]
struct Args {
    /// Tuning JSON file; `-` or omitted uses the built-in balance
    tuning: Option<PathBuf>,
    /// Simulated seconds to play
    #[arg(default_value_t = 300)]
    seconds: u32,
    /// RNG seed; defaults to the wall clock
    seed: Option<u64>,
    /// Ambient effect quality
    #[arg(long, env = "FRUIT_FALL_QUALITY", default_value = "medium", value_parser = parse_quality)]
    quality: QualityPreset,
}

fn parse_quality(s: &str) -> Result<QualityPreset, String> {
    QualityPreset::parse(s).ok_or_else(|| format!("unknown quality {s:?} (low, medium, high)"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let tuning = match &args.tuning {
        Some(path) if path.as_os_str() != "-" => Tuning::load_or_default(path),
        _ => Tuning::default(),
    };
    let seconds = args.seconds;
    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let quality = args.quality;
    let settings = Settings::from_preset(quality);

    let mut session = GameSession::new(tuning, &settings, seed);
    log::info!(
        "Fruit Fall (native) starting: seed {}, {}s, quality {}",
        session.seed(),
        seconds,
        quality.as_str()
    );
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    session.start_or_restart();

    let steps = (seconds as f32 * STEPS_PER_SECOND) as u32;
    for _ in 0..steps {
        tick(&mut session, &input);
        for event in session.drain_events() {
            match event {
                GameEvent::LevelChanged(level) => log::info!("Level {}", level),
                GameEvent::PhaseChanged(phase) => log::info!("Weather: {}", phase.as_str()),
                GameEvent::MissesChanged { missed, max } => {
                    log::info!("Missed {}/{}", missed, max)
                }
                GameEvent::GameOver { final_score } => {
                    log::info!("You caught {} fruits!", final_score)
                }
                other => log::trace!("{:?}", other),
            }
        }
        if session.is_over() {
            break;
        }
    }

    match serde_json::to_string_pretty(&session.hud()) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Could not serialize HUD: {}", err),
    }
}
