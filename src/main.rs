//! Type Saber headless runner
//!
//! Plays a match with the autoplay bot and prints a JSON summary.
//!
//! ```text
//! type-saber [letters|lane_rings|words] [SECONDS] [SEED]
//! type-saber --tuning <file.json> [SECONDS] [SEED]
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use type_saber::sim::{Game, MatchStats};
use type_saber::{Autoplay, GameMode, Tuning};

/// Host frame interval
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 60.0;
const DEFAULT_SEED: u64 = 0x7e57_5ab3;

#[derive(Debug, Serialize)]
struct Summary {
    mode: GameMode,
    seed: u64,
    seconds: f32,
    /// Fixed simulation steps actually run
    ticks: u64,
    score: u64,
    stats: MatchStats,
    accuracy: Option<f32>,
}

fn parse_args() -> Result<(Tuning, f32, u64)> {
    let mut args = std::env::args().skip(1).peekable();

    let first = args.peek().cloned();
    let tuning = match first.as_deref() {
        Some("--tuning") => {
            args.next();
            let path = args.next().context("--tuning needs a file path")?;
            Tuning::load(&path).with_context(|| format!("loading tuning from {path}"))?
        }
        Some(name) if !name.starts_with(|c: char| c.is_ascii_digit()) => {
            let mode: GameMode = name.parse()?;
            args.next();
            Tuning::preset(mode)
        }
        _ => Tuning::default(),
    };

    let seconds = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid duration {s:?}"))?,
        None => DEFAULT_SECONDS,
    };
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed {s:?}"))?,
        None => DEFAULT_SEED,
    };
    Ok((tuning, seconds, seed))
}

fn main() -> Result<()> {
    env_logger::init();
    let (tuning, seconds, seed) = parse_args()?;
    let mode = tuning.mode;
    log::info!("Type Saber (headless) starting: {} for {seconds}s, seed {seed}", mode.as_str());

    let mut game = Game::new(tuning, seed).context("building match")?;
    let mut bot = Autoplay::new();
    game.start();

    let frames = (seconds / FRAME_DT).round() as u64;
    let mut frame = 0;
    while game.is_running() && frame < frames {
        if let Some(key) = bot.next_key(&game) {
            game.key(key);
        }
        game.advance(FRAME_DT);

        for event in game.drain_events() {
            log::debug!("{}", serde_json::to_string(&event)?);
        }
        frame += 1;
    }

    let stats = game.stats();
    let summary = Summary {
        mode,
        seed,
        seconds,
        ticks: game.time_ticks(),
        score: game.score(),
        stats,
        accuracy: stats.accuracy(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
