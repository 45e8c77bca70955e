//! Deterministic runs of the engine: scripted input tapes, demo sessions,
//! checkpoints and serializable snapshots.
//!
//! Every run here drives the engine with a [`ManualClock`] that advances by
//! [`TICK_INTERVAL`] per tick, so a seed plus an input tape fully determines
//! the outcome.

use serde::{Deserialize, Serialize};

use crate::clock::ManualClock;
use crate::config::EngineConfig;
use crate::constants::{END_GAME_PAUSE, REVIVE_PAUSE, TICK_INTERVAL};
use crate::context::PlayArea;
use crate::engine::Engine;
use crate::entity::{Entity, EntityKind, FontSize};
use crate::error::ReplayViolation;
use crate::input::{decode_input_byte, InputLatch};
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub ticks: u32,
    pub final_score: u32,
    pub final_rng_state: u32,
    pub lives: i32,
    pub high_score: u32,
    pub game_over: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub tick: u32,
    pub rng_state: u32,
    pub score: u32,
    pub lives: i32,
    pub entities: usize,
    pub ship_pos: Option<Vec2>,
    pub ship_dir: Option<Vec2>,
    pub fire_charge: i32,
}

impl Checkpoint {
    pub fn capture(engine: &Engine) -> Self {
        let ship = engine.ship();
        Self {
            tick: engine.tick_count(),
            rng_state: engine.rng_state(),
            score: engine.score(),
            lives: engine.lives(),
            entities: engine.len(),
            ship_pos: ship.map(|ship| ship.pos),
            ship_dir: ship.map(|ship| ship.dir),
            fire_charge: engine.fire_charge(),
        }
    }
}

/// One entity as a renderer sees it. `points` are absolute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u64,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub dir: Vec2,
    pub radius: f64,
    pub dead: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub caption: String,
    pub font_size: FontSize,
    pub points: Vec<Vec2>,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            kind: entity.kind(),
            pos: entity.pos,
            dir: entity.dir,
            radius: entity.radius(),
            dead: entity.is_dead(),
            caption: entity.caption().to_owned(),
            font_size: entity.font_size(),
            points: (0..entity.point_count())
                .map(|index| entity.point_at(index))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u32,
    pub score: u32,
    pub last_score: u32,
    pub high_score: u32,
    pub lives: i32,
    pub difficulty: f64,
    pub fire_charge: i32,
    pub active: bool,
    pub demo: bool,
    pub game_over: bool,
    pub area: PlayArea,
    pub entities: Vec<EntityView>,
}

impl Snapshot {
    pub fn capture(engine: &Engine) -> Self {
        Self {
            tick: engine.tick_count(),
            score: engine.score(),
            last_score: engine.last_score(),
            high_score: engine.high_score(),
            lives: engine.lives(),
            difficulty: engine.difficulty(),
            fire_charge: engine.fire_charge(),
            active: engine.is_active(),
            demo: engine.is_in_demo(),
            game_over: engine.is_game_over(),
            area: engine.play_area(),
            entities: engine.entities().iter().map(EntityView::from).collect(),
        }
    }
}

/// An engine in a fresh game, stepped one input byte at a time.
pub struct ReplayRun {
    engine: Engine,
    clock: ManualClock,
    latch: InputLatch,
    ticks: u32,
}

impl ReplayRun {
    pub fn new(seed: u32, config: &EngineConfig) -> Self {
        let clock = ManualClock::new();
        let mut engine = Engine::from_config(seed, config, Box::new(clock.clone()));
        engine.start_game(config.initial_rocks);
        Self {
            engine,
            clock,
            latch: InputLatch::new(),
            ticks: 0,
        }
    }

    #[inline]
    pub fn step(&mut self, input_byte: u8) {
        self.latch.apply(&mut self.engine, decode_input_byte(input_byte));
        self.clock.advance(TICK_INTERVAL);
        self.engine.tick();
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn result(&self) -> ReplayResult {
        result_of(&self.engine, self.ticks)
    }
}

fn result_of(engine: &Engine, ticks: u32) -> ReplayResult {
    ReplayResult {
        ticks,
        final_score: engine.score(),
        final_rng_state: engine.rng_state(),
        lives: engine.lives(),
        high_score: engine.high_score(),
        game_over: engine.is_game_over(),
    }
}

pub fn replay(seed: u32, config: &EngineConfig, inputs: &[u8]) -> ReplayResult {
    let mut run = ReplayRun::new(seed, config);
    for input in inputs {
        run.step(*input);
    }
    run.result()
}

/// Like [`replay`], but validates the engine before the first tick and after
/// every tick, stopping at the first broken rule.
pub fn replay_strict(
    seed: u32,
    config: &EngineConfig,
    inputs: &[u8],
) -> Result<ReplayResult, ReplayViolation> {
    let mut run = ReplayRun::new(seed, config);
    run.engine
        .validate()
        .map_err(|rule| ReplayViolation { tick: 0, rule })?;

    for input in inputs {
        run.step(*input);
        run.engine.validate().map_err(|rule| ReplayViolation {
            tick: run.ticks,
            rule,
        })?;
    }

    Ok(run.result())
}

/// Checkpoints at the start, every `sample_every` ticks (0 means every tick),
/// and after the last input.
pub fn replay_with_checkpoints(
    seed: u32,
    config: &EngineConfig,
    inputs: &[u8],
    sample_every: u32,
) -> Vec<Checkpoint> {
    let mut run = ReplayRun::new(seed, config);
    let stride = if sample_every == 0 { 1 } else { sample_every };
    let total = inputs.len() as u32;
    let mut checkpoints = vec![run.engine.checkpoint()];

    for input in inputs {
        run.step(*input);
        if run.ticks % stride == 0 || run.ticks == total {
            checkpoints.push(run.engine.checkpoint());
        }
    }

    checkpoints
}

/// Upper bound on ticks for a demo of `seconds`: the demo itself, the opening
/// pause, the game-over banner, and one second of slack.
/// Saturates at `u32::MAX`.
pub fn demo_tick_budget(seconds: u64) -> u32 {
    let total = seconds
        .saturating_mul(1_000)
        .saturating_add((REVIVE_PAUSE + END_GAME_PAUSE).as_millis() as u64)
        .saturating_add(1_000);
    let ticks = total / TICK_INTERVAL.as_millis() as u64 + 1;
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Plays a full demo session of `seconds` and reports how it ended.
pub fn run_demo(seed: u32, config: &EngineConfig, seconds: u64) -> ReplayResult {
    let clock = ManualClock::new();
    let mut engine = Engine::from_config(seed, config, Box::new(clock.clone()));
    engine.start_demo(seconds, config.initial_rocks);

    let budget = demo_tick_budget(seconds);
    let mut ticks = 0;
    while !engine.is_game_over() && ticks < budget {
        clock.advance(TICK_INTERVAL);
        engine.tick();
        ticks += 1;
    }

    result_of(&engine, ticks)
}

const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

fn fnv_mix(mut hash: u32, bytes: &[u8]) -> u32 {
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// FNV-1a digest of a checkpoint series, for comparing runs.
pub fn fingerprint(checkpoints: &[Checkpoint]) -> u32 {
    let mut hash = FNV_OFFSET;
    for checkpoint in checkpoints {
        hash = fnv_mix(hash, &checkpoint.tick.to_le_bytes());
        hash = fnv_mix(hash, &checkpoint.rng_state.to_le_bytes());
        hash = fnv_mix(hash, &checkpoint.score.to_le_bytes());
        hash = fnv_mix(hash, &checkpoint.lives.to_le_bytes());
        hash = fnv_mix(hash, &(checkpoint.entities as u64).to_le_bytes());
        hash = fnv_mix(hash, &checkpoint.fire_charge.to_le_bytes());
        for v in [checkpoint.ship_pos, checkpoint.ship_dir].into_iter().flatten() {
            hash = fnv_mix(hash, &v.x.to_bits().to_le_bytes());
            hash = fnv_mix(hash, &v.y.to_bits().to_le_bytes());
        }
    }
    hash
}
