use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rockfield_core::EngineConfig;
use rockfield_harness::runner::{
    demo_report, replay_report, run_sweep, snapshot_after, SweepConfig,
};
use rockfield_harness::util::{
    emit_json, load_config, parse_seed, parse_seed_csv, read_tape, seed_range,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rockfield")]
#[command(about = "Headless driver for the deterministic rockfield engine")]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Engine settings shared by every subcommand. Flags win over the file.
#[derive(Args, Debug)]
struct EngineArgs {
    /// JSON file with engine settings; missing fields keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    width: Option<i32>,
    #[arg(long, global = true)]
    height: Option<i32>,
    /// Difficulty level in (0, 1]
    #[arg(long, global = true)]
    difficulty: Option<f64>,
    /// Big rocks seeded at the start of a game or demo
    #[arg(long, global = true)]
    rocks: Option<usize>,
}

impl EngineArgs {
    fn resolve(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => EngineConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(rocks) = self.rocks {
            config.initial_rocks = rocks;
        }
        config.validate().context("invalid engine settings")?;
        Ok(config)
    }
}

/// The demo length a subcommand runs: its own `--seconds`, else the config's.
fn demo_seconds(config: &EngineConfig, seconds: Option<u64>) -> Result<u64> {
    let Some(seconds) = seconds else {
        return Ok(config.demo_seconds);
    };
    EngineConfig {
        demo_seconds: seconds,
        ..config.clone()
    }
    .validate()
    .context("invalid --seconds")?;
    Ok(seconds)
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one self-driving demo to game over
    Demo {
        #[arg(long)]
        seed: String,
        /// Demo length; defaults to the config's demo_seconds
        #[arg(long)]
        seconds: Option<u64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replay a raw input tape (one byte per tick) with rule checks
    Replay {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        tape: PathBuf,
        #[arg(long, default_value_t = 60)]
        sample_every: u32,
        /// Include every sampled checkpoint in the report
        #[arg(long, default_value_t = false)]
        checkpoints: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run demos over many seeds in parallel
    Sweep {
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long, default_value = "1")]
        seed_start: String,
        #[arg(long, default_value_t = 16)]
        seed_count: u32,
        #[arg(long)]
        seconds: Option<u64>,
        #[arg(long)]
        jobs: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Dump the world as JSON after an optional tape
    Snapshot {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        tape: Option<PathBuf>,
        /// Idle ticks to run when no tape is given
        #[arg(long, default_value_t = 0)]
        ticks: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let Cli { engine, command } = Cli::parse();
    let config = engine.resolve()?;

    match command {
        Commands::Demo {
            seed,
            seconds,
            output,
        } => {
            let seed = parse_seed(&seed)?;
            let report = demo_report(seed, &config, demo_seconds(&config, seconds)?);
            emit_json(&report, output.as_deref())?;
        }
        Commands::Replay {
            seed,
            tape,
            sample_every,
            checkpoints,
            output,
        } => {
            let seed = parse_seed(&seed)?;
            let inputs = read_tape(&tape)?;
            let report = replay_report(seed, &config, &inputs, sample_every, checkpoints)?;
            emit_json(&report, output.as_deref())?;
        }
        Commands::Sweep {
            seeds,
            seed_start,
            seed_count,
            seconds,
            jobs,
            output,
        } => {
            let seeds = match seeds {
                Some(csv) => parse_seed_csv(&csv)?,
                None => seed_range(parse_seed(&seed_start)?, seed_count),
            };
            let report = run_sweep(&SweepConfig {
                seeds,
                seconds: demo_seconds(&config, seconds)?,
                engine: config,
                jobs,
            })?;
            emit_json(&report, output.as_deref())?;
        }
        Commands::Snapshot {
            seed,
            tape,
            ticks,
            output,
        } => {
            let seed = parse_seed(&seed)?;
            let inputs = match tape {
                Some(path) => read_tape(&path)?,
                None => vec![0; ticks],
            };
            let snapshot = snapshot_after(seed, &config, &inputs);
            emit_json(&snapshot, output.as_deref())?;
        }
    }

    Ok(())
}
