//! Headless duel runner.
//!
//! Plays one AI-vs-AI round at a fixed 16 ms frame and prints the result.
//! Useful for balancing tunables and for producing event logs to replay.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::{info, Level};

use duel_core::{CombatEvent, Duel, DuelConfig, DuelResult, Side, FRAME};

#[derive(Parser)]
#[command(name = "duel-headless", about = "Run a duel without a renderer")]
struct Cli {
    /// JSON duel config; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the duel's random generator
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write every combat event to this path as JSON
    #[arg(long)]
    events: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> DuelResult<()> {
    let mut config = match &cli.config {
        Some(path) => DuelConfig::from_json(&fs::read_to_string(path)?)?,
        None => DuelConfig::default(),
    };
    config.autoplay = true;

    let mut duel = Duel::new(config, cli.seed)?;
    info!(seed = cli.seed, "running headless duel");

    // one spare second past the round clock
    let max_frames = (u64::from(duel.round_secs()) + 1) * 1_000 / FRAME.as_u64();
    let mut events: Vec<CombatEvent> = Vec::new();
    for _ in 0..max_frames {
        if duel.is_over() {
            break;
        }
        duel.step(FRAME, [None, None]);
        events.extend(duel.take_events());
    }

    println!("=== Duel Result ===");
    match duel.phase() {
        duel_core::DuelPhase::Over { outcome, reason } => {
            println!("Outcome:  {outcome:?}");
            println!("Reason:   {reason:?}");
        }
        duel_core::DuelPhase::Running => println!("Outcome:  undecided"),
    }
    println!("Time:     {}", duel.now());
    for side in [Side::Left, Side::Right] {
        let fighter = duel.fighter(side);
        let landed = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::HitLanded { defender, .. } if *defender == side.opposite()))
            .count();
        println!(
            "  {side:<5}  HP={}/{}  hits landed={landed}",
            fighter.current_health(),
            fighter.max_health()
        );
    }

    if let Some(path) = &cli.events {
        fs::write(path, serde_json::to_string_pretty(&events)?)?;
        println!("\nEvents written to {}", path.display());
    }

    Ok(())
}
