//! A deterministic space-rocks arcade engine.
//!
//! The [`Engine`] owns every entity on screen and advances them one tick at a
//! time; a [`Session`] wraps it with intro pages, demo mode and pause. All
//! randomness comes from a seeded [`SeededRng`] and all deadlines from an
//! injectable [`Clock`], so a seed and an input tape replay exactly (see
//! [`sim`]).

pub mod clock;
pub mod config;
pub mod constants;
pub mod context;
pub mod engine;
pub mod entity;
pub mod error;
pub mod input;
pub mod rng;
pub mod session;
pub mod sim;
pub mod vector;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Difficulty, EngineConfig, SessionSettings};
pub use context::{PlayArea, TickContext};
pub use engine::Engine;
pub use entity::{Entity, EntityKind, FontSize, ShipState, Turn};
pub use error::{ReplayViolation, RuleCode, SettingsError};
pub use input::{decode_input_byte, encode_input_byte, Command, FrameInput, InputLatch};
pub use rng::SeededRng;
pub use session::{GameState, Session, SoundEvents};
pub use sim::{
    fingerprint, replay, replay_strict, replay_with_checkpoints, run_demo, Checkpoint,
    EntityView, ReplayResult, ReplayRun, Snapshot,
};
pub use vector::Vec2;
