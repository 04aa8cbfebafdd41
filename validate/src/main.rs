//! Scenario validation CLI for encounter definitions
//!
//! Replays scripted world states through the avoidance engine and checks the
//! movement it produces:
//! - Realtime mode (1x): watch decisions unfold at game speed
//! - Accelerated mode: fast CI validation with checkpoints

mod output;
mod replay;
mod verification;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use warden_core::EngineConfigExt;
use warden_core::dsl::{load_all_encounters, load_encounters_from_dir};
use warden_types::EngineConfig;

use crate::output::{CliOutput, OutputLevel};
use crate::replay::{Scenario, VirtualClock};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ReplayMode {
    /// 1x speed with actual timing delays
    Realtime,
    /// Fast replay with virtual time (default)
    #[default]
    Accelerated,
}

#[derive(Parser, Debug)]
#[command(name = "warden-validate")]
#[command(about = "Replay scenarios through encounter definitions and verify movement")]
#[command(version)]
struct Args {
    /// Path to scenario TOML file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Path to definitions directory (defaults to bundled plus user definitions)
    #[arg(short, long)]
    definitions: Option<PathBuf>,

    /// Engine config file (defaults to built-in settings)
    #[arg(short, long)]
    config: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Replay Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Replay mode
    #[arg(long, value_enum, default_value_t = ReplayMode::Accelerated)]
    mode: ReplayMode,

    /// Custom speed multiplier (overrides --mode)
    #[arg(long)]
    speed: Option<f32>,

    /// Tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Output Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiet mode: summary only
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode: show every tick and engine debug logs
    #[arg(short, long)]
    verbose: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Logging
// ═══════════════════════════════════════════════════════════════════════════════

/// Engine logs go to stderr so they never interleave with the report.
/// `WARDEN_LOG` (or `RUST_LOG`) overrides the level picked from the flags.
fn init_logging(level: OutputLevel) {
    let default_directive = match level {
        OutputLevel::Quiet => "error",
        OutputLevel::Normal => "warn",
        OutputLevel::Verbose => "info,warden_core=debug",
    };

    let filter = EnvFilter::try_from_env("WARDEN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════════

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let output_level = if args.quiet {
        OutputLevel::Quiet
    } else if args.verbose {
        OutputLevel::Verbose
    } else {
        OutputLevel::Normal
    };
    init_logging(output_level);
    let mut cli = CliOutput::new(output_level);

    let scenario = Scenario::load(&args.scenario)?;
    tracing::info!(
        scenario = %scenario.meta.name,
        frames = scenario.frames.len(),
        checkpoints = scenario.expectations.len(),
        "Scenario loaded"
    );

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::default(),
    };
    if let Some(tick_ms) = args.tick_ms {
        config.tick_interval_ms = tick_ms.max(1);
    }

    let (source, encounters) = match &args.definitions {
        Some(dir) => (dir.display().to_string(), load_encounters_from_dir(dir)?),
        None => ("bundled + user".to_string(), load_all_encounters(&config)),
    };
    if encounters.is_empty() {
        return Err(format!("no encounter definitions found in {source}").into());
    }

    eprintln!("Scenario: {}", scenario.meta.name);
    if let Some(description) = &scenario.meta.description {
        eprintln!("  {}", description);
    }
    eprintln!("Definitions: {} ({} encounters)", source, encounters.len());

    let start = NaiveDateTime::default();
    let mut clock = match (args.speed, args.mode) {
        (Some(speed), _) => VirtualClock::new(start, speed),
        (None, ReplayMode::Realtime) => VirtualClock::realtime(start),
        (None, ReplayMode::Accelerated) => VirtualClock::instant(start),
    };
    eprintln!(
        "Mode: {} (speed: {}x, tick: {}ms)",
        if clock.is_instant_mode() { "accelerated" } else { "realtime" },
        clock.speed(),
        config.tick_interval_ms
    );
    let (result, engine) = replay::replay(&scenario, encounters, config, &mut clock, &mut cli);

    cli.print_summary(&result);
    if output_level >= OutputLevel::Verbose {
        eprintln!("Replayed {} of scenario time", clock.format_elapsed());
        for command in &engine.mover().commands {
            eprintln!("  mover: {}", command);
        }
        for (reason, until) in &engine.gate().suppressions {
            eprintln!("  gate: suppressed \"{}\" until {}", reason, until.format("%H:%M:%S%.3f"));
        }
        eprintln!("  gate: {} releases", engine.gate().releases);
    }
    cli.flush();

    Ok(if result.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
