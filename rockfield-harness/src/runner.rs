use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use rockfield_core::sim::{fingerprint, replay_strict, replay_with_checkpoints, run_demo};
use rockfield_core::{Checkpoint, EngineConfig, ReplayResult, ReplayRun, Snapshot};
use serde::{Deserialize, Serialize};

use crate::util::seed_to_hex;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DemoReport {
    pub seed: String,
    pub seconds: u64,
    pub result: ReplayResult,
}

pub fn demo_report(seed: u32, config: &EngineConfig, seconds: u64) -> DemoReport {
    let result = run_demo(seed, config, seconds);
    tracing::info!(
        seed = %seed_to_hex(seed),
        ticks = result.ticks,
        score = result.final_score,
        "demo finished"
    );
    DemoReport {
        seed: seed_to_hex(seed),
        seconds,
        result,
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayReport {
    pub seed: String,
    pub tape_len: usize,
    pub result: ReplayResult,
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checkpoints: Vec<Checkpoint>,
}

/// Strict replay of `tape`, plus a checkpoint fingerprint sampled every
/// `sample_every` ticks. Checkpoints are only kept in the report when
/// `keep_checkpoints` is set.
pub fn replay_report(
    seed: u32,
    config: &EngineConfig,
    tape: &[u8],
    sample_every: u32,
    keep_checkpoints: bool,
) -> Result<ReplayReport> {
    let result = replay_strict(seed, config, tape)
        .with_context(|| format!("replay failed for seed={}", seed_to_hex(seed)))?;
    let checkpoints = replay_with_checkpoints(seed, config, tape, sample_every);
    let digest = fingerprint(&checkpoints);
    tracing::info!(
        seed = %seed_to_hex(seed),
        ticks = result.ticks,
        score = result.final_score,
        fingerprint = %format!("{digest:#010x}"),
        "replay finished"
    );

    Ok(ReplayReport {
        seed: seed_to_hex(seed),
        tape_len: tape.len(),
        result,
        fingerprint: format!("{digest:#010x}"),
        checkpoints: if keep_checkpoints {
            checkpoints
        } else {
            Vec::new()
        },
    })
}

/// World state after feeding `tape` into a fresh game.
pub fn snapshot_after(seed: u32, config: &EngineConfig, tape: &[u8]) -> Snapshot {
    let mut run = ReplayRun::new(seed, config);
    for input in tape {
        run.step(*input);
    }
    run.engine().snapshot()
}

#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub seeds: Vec<u32>,
    pub seconds: u64,
    pub engine: EngineConfig,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepRecord {
    pub seed: String,
    pub result: ReplayResult,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepReport {
    pub seconds: u64,
    pub runs: usize,
    pub mean_score: f64,
    pub max_score: u32,
    pub best_seed: String,
    pub mean_ticks: f64,
    pub unfinished: usize,
    pub records: Vec<SweepRecord>,
}

/// Runs one demo per seed in parallel. Every worker builds its own engine;
/// records come back in seed order.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("sweep requires at least one seed"));
    }
    if config.jobs == Some(0) {
        return Err(anyhow!("sweep --jobs must be >= 1 when provided"));
    }
    EngineConfig {
        demo_seconds: config.seconds,
        ..config.engine.clone()
    }
    .validate()
    .context("invalid sweep settings")?;

    let run_one = |seed: &u32| SweepRecord {
        seed: seed_to_hex(*seed),
        result: run_demo(*seed, &config.engine, config.seconds),
    };

    let records: Vec<SweepRecord> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.seeds.par_iter().map(run_one).collect())
    } else {
        config.seeds.par_iter().map(run_one).collect()
    };

    let runs = records.len();
    let sum_score: u64 = records.iter().map(|r| u64::from(r.result.final_score)).sum();
    let sum_ticks: u64 = records.iter().map(|r| u64::from(r.result.ticks)).sum();
    let best = records
        .iter()
        .max_by_key(|r| r.result.final_score)
        .ok_or_else(|| anyhow!("sweep produced no runs"))?;
    let unfinished = records.iter().filter(|r| !r.result.game_over).count();

    if unfinished > 0 {
        tracing::warn!(unfinished, "some demos hit the tick budget before game over");
    }
    tracing::info!(runs, max_score = best.result.final_score, "sweep finished");

    Ok(SweepReport {
        seconds: config.seconds,
        runs,
        mean_score: sum_score as f64 / runs as f64,
        max_score: best.result.final_score,
        best_seed: best.seed.clone(),
        mean_ticks: sum_ticks as f64 / runs as f64,
        unfinished,
        records,
    })
}
