//! Monkey Drop headless runner
//!
//! Plays a session with the built-in aim bot on a fixed timestep and logs
//! what happens. Useful for tuning and soak testing without a renderer.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;

use monkey_drop::audio::{AudioManager, LogBackend};
use monkey_drop::consts::{MAX_SUBSTEPS, SIM_DT};
use monkey_drop::sim::{Autoplayer, GameEvent, GamePhase, GameState, tick};
use monkey_drop::{HighScores, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(about = "Play a headless Monkey Drop session with the aim bot", version)]
struct Args {
    /// Course seed (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many shots
    #[arg(long, default_value_t = 20)]
    shots: u32,
    /// Tuning JSON overriding the built-in constants
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Player settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,
    /// High score file to update when the run ends
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Simulated frame length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,
    /// Give up after this much simulated time
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Outcome of a session
#[derive(Debug, Default)]
struct Summary {
    score: u64,
    landings: u32,
    shots: u32,
    distance: f32,
    game_over: bool,
}

fn run(args: &Args) -> Result<Summary> {
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let mut tuning = match &args.tuning {
        Some(path) => Tuning::try_load(path)?,
        None => Tuning::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    settings.apply_to_tuning(&mut tuning);

    let mut state = GameState::with_tuning(seed, tuning);
    let mut audio = AudioManager::with_settings(LogBackend::default(), &settings);
    let mut bot = Autoplayer::new();
    audio.handle_events(&state.events);
    log::info!("Session start: seed {}, {} pillars ahead", seed, state.pillars.len());

    let frame_dt = args.frame_dt.clamp(1e-4, 0.1);
    let mut accumulator = 0.0;
    let mut elapsed = 0.0;
    let mut summary = Summary::default();

    'session: while elapsed < args.max_seconds {
        accumulator += frame_dt;
        elapsed += frame_dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if bot.shots >= args.shots && state.phase == GamePhase::Idle {
                break 'session;
            }
            let input = bot.next_input(&state);
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            audio.handle_events(&state.events);
            for event in &state.events {
                match event {
                    GameEvent::Landed { pillar_id, .. } => {
                        log::info!("Landing {} on pillar {}", state.landings, pillar_id);
                    }
                    GameEvent::GameOver {
                        score,
                        landings,
                        distance,
                    } => {
                        summary = Summary {
                            score: *score,
                            landings: *landings,
                            shots: state.shots,
                            distance: *distance,
                            game_over: true,
                        };
                        break 'session;
                    }
                    _ => {}
                }
            }
        }
    }

    if !summary.game_over {
        summary = Summary {
            score: state.score,
            landings: state.landings,
            shots: state.shots,
            distance: state.distance(),
            game_over: false,
        };
    }
    if bot.fallbacks > 0 {
        log::warn!("Aim bot found no landing shot {} time(s)", bot.fallbacks);
    }
    audio.stop_all();

    if let Some(path) = &args.scores {
        let mut scores = HighScores::load(path);
        if let Some(rank) = scores.add_run(summary.score, summary.landings, summary.distance, unix_now()) {
            log::info!("New high score, rank {}", rank);
            scores.save(path)?;
        }
    }

    Ok(summary)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Monkey Drop (headless) starting...");

    let summary = run(&args)?;
    println!(
        "{}: score {} | {} landings in {} shots | distance {:.0}",
        if summary.game_over { "Game over" } else { "Stopped" },
        summary.score,
        summary.landings,
        summary.shots,
        summary.distance
    );
    Ok(())
}
