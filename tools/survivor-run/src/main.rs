//! survivor-run: headless run driver.
//!
//! Steps a full run at the nominal tick rate, circling the player around the
//! origin and always taking the first offered upgrade.
//!
//! Usage:
//!   survivor-run --seconds 300 --seed 7
//!   survivor-run --config tuning.json --best-time-file best.json

use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use survivor_core::commands::PlayerCommand;
use survivor_core::constants::DT;
use survivor_core::enums::GamePhase;
use survivor_core::events::PresentationEvent;
use survivor_core::state::RunSnapshot;
use survivor_sim::collaborators::{BestTimeStore, EventLog, MemoryBestTime};
use survivor_sim::config::SimConfig;
use survivor_sim::persistence::JsonFileBestTime;
use survivor_sim::Simulation;

/// Seconds of run time simulated when `--seconds` is not given.
const DEFAULT_RUN_SECS: f64 = 120.0;

/// Radians per second the auto-pilot turns its heading.
const CIRCLE_TURN_RATE: f64 = 0.6;

struct RunArgs {
    config: Option<PathBuf>,
    seconds: f64,
    seed: Option<u64>,
    best_time_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct RunSummary {
    kills: u32,
    waves: u32,
    upgrades: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| matches!(a.as_str(), "help" | "--help" | "-h")) {
        print_usage();
        return;
    }

    let run_args = match parse_args(&args[1..]) {
        Ok(run_args) => run_args,
        Err(msg) => {
            eprintln!("Error: {msg}");
            print_usage();
            process::exit(1);
        }
    };

    let mut config = match &run_args.config {
        Some(path) => load_config(path),
        None => SimConfig::default(),
    };
    if let Some(seed) = run_args.seed {
        config.seed = seed;
    }

    match &run_args.best_time_file {
        Some(path) => run(config, run_args.seconds, JsonFileBestTime::new(path)),
        None => run(config, run_args.seconds, MemoryBestTime::default()),
    }
}

fn print_usage() {
    eprintln!(
        "survivor-run: headless survival run\n\
         \n\
           --config <path>          JSON tuning file (optional, defaults otherwise)\n\
           --seconds <N>            Run time to simulate (default: 120)\n\
           --seed <N>               Override the config seed\n\
           --best-time-file <path>  Persist the best survived time to this JSON file\n"
    );
}

fn parse_args(args: &[String]) -> Result<RunArgs, String> {
    let mut run_args = RunArgs {
        config: None,
        seconds: DEFAULT_RUN_SECS,
        seed: None,
        best_time_file: None,
    };

    let mut i = 0;
    while i < args.len() {
        let value = args
            .get(i + 1)
            .ok_or_else(|| format!("{} needs a value", args[i]))?;
        match args[i].as_str() {
            "--config" => run_args.config = Some(PathBuf::from(value)),
            "--best-time-file" => run_args.best_time_file = Some(PathBuf::from(value)),
            "--seconds" => {
                run_args.seconds = value
                    .parse()
                    .map_err(|e| format!("invalid --seconds {value}: {e}"))?;
            }
            "--seed" => {
                run_args.seed = Some(
                    value
                        .parse()
                        .map_err(|e| format!("invalid --seed {value}: {e}"))?,
                );
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 2;
    }
    Ok(run_args)
}

fn load_config(path: &Path) -> SimConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "cannot read config, using defaults: {e}");
            return SimConfig::default();
        }
    };
    SimConfig::from_json_str(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "{e}, using defaults");
        SimConfig::default()
    })
}

fn run<B: BestTimeStore>(config: SimConfig, seconds: f64, best_time: B) {
    let mut sim = Simulation::new(config, EventLog::default(), best_time);
    let mut summary = RunSummary::default();
    let mut snapshot = sim.snapshot();

    while snapshot.time.elapsed_secs < seconds && snapshot.phase != GamePhase::GameOver {
        let heading = snapshot.time.elapsed_secs * CIRCLE_TURN_RATE;
        sim.queue_command(PlayerCommand::Move {
            x: heading.cos(),
            z: heading.sin(),
        });
        if let Some(option) = first_offered(&snapshot) {
            sim.queue_command(PlayerCommand::ApplyUpgrade { option });
            summary.upgrades += 1;
        }

        snapshot = sim.step(DT);
        for event in sim.presentation_mut().drain() {
            match event {
                PresentationEvent::EnemyKilled { .. } => summary.kills += 1,
                PresentationEvent::WaveStarted { .. } => summary.waves += 1,
                _ => {}
            }
        }
    }

    let weapons: Vec<String> = snapshot
        .weapons
        .iter()
        .map(|w| format!("{}:{}", w.kind.label(), w.level))
        .collect();
    tracing::info!(
        survived_secs = snapshot.time.elapsed_secs,
        phase = ?snapshot.phase,
        level = snapshot.progression.level,
        kills = summary.kills,
        waves = summary.waves,
        upgrades = summary.upgrades,
        hostiles = snapshot.hostiles.len(),
        best_secs = sim.best_time_store().best_time(),
        weapons = %weapons.join(", "),
        "run finished"
    );
}

fn first_offered(snapshot: &RunSnapshot) -> Option<survivor_core::enums::UpgradeOption> {
    if snapshot.phase != GamePhase::LevelUp {
        return None;
    }
    snapshot
        .offer
        .as_ref()
        .and_then(|offer| offer.entries.first())
        .map(|entry| entry.option)
}
