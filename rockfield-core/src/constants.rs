//! Gameplay tuning shared by the engine and the entity behaviors.
//!
//! Speeds are in play-area units per tick, angles in radians unless the name
//! says degrees, and wall-clock waits in whole seconds.

use core::f64::consts::TAU;
use core::time::Duration;

// Play area
pub const DEFAULT_PLAY_WIDTH: i32 = 535;
pub const DEFAULT_PLAY_HEIGHT: i32 = 400;
/// The Kuiper buffer around the play area is `1/KUIPER_DIVISOR` of each dimension.
pub const KUIPER_DIVISOR: i32 = 6;

// Session
pub const STARTING_LIVES: i32 = 3;
pub const DEMO_LIVES: i32 = 1;
pub const DEFAULT_INITIAL_ROCKS: usize = 10;
pub const DEFAULT_DEMO_SECONDS: u64 = 20;
pub const DEFAULT_DIFFICULTY: f64 = 0.5;
pub const ALIEN_CHEAT_CAP: usize = 15;

// Wall-clock waits
pub const REVIVE_PAUSE: Duration = Duration::from_secs(2);
pub const DEFAULT_LABEL_SECONDS: u64 = 2;
pub const END_GAME_PAUSE: Duration = Duration::from_secs(3);
pub const DEBRIS_MIN_AGE: Duration = Duration::from_secs(2);
pub const SPARK_MAX_AGE: Duration = Duration::from_secs(1);

// Poller cadence (~22 Hz)
pub const TICK_INTERVAL: Duration = Duration::from_millis(45);
pub const INTRO_PAGE_TIME: Duration = Duration::from_secs(8);

// Maxima
pub const MAX_CHARGE: i32 = 6;
pub const MAX_SHIP_SPEED: f64 = 14.0;
pub const MAX_ALIEN_SPEED: f64 = 8.0;

// Tick counts
pub const HALF_MAX_TICKS: f64 = 1500.0;
pub const ROCK_LIFE_TICKS: u32 = 25;
pub const RECHARGE_TICKS: u32 = 12;
/// Wrap point for the global and per-entity tick counters.
pub const TICK_WRAP: u32 = 0x7FFF_FFFF;
pub const TICK_WRAP_RESET: u32 = 1000;

// Rotation rates
pub const SHIP_ROTATE_DEGREES: f64 = 9.0;
pub const BIG_ROCK_SPIN_DEGREES: f64 = 1.0;
pub const MED_ROCK_SPIN_DEGREES: f64 = 2.0;
pub const SMALL_ROCK_SPIN_DEGREES: f64 = 4.0;
pub const DEBRIS_SPIN_DEGREES: f64 = 8.0;
pub const SHIP_START_ANGLE: f64 = TAU / 8.0;

// Probabilities (rock and alien creation are scaled by the half-max ramp)
pub const ROCK_MAKE_PROB: f64 = 0.02;
pub const ALIEN_PROB: f64 = 0.005;
pub const ROCK_BREAK_PROB: f64 = 0.001;
pub const DEBRIS_DEATH_PROB: f64 = 0.1;
pub const SPARK_DEATH_PROB: f64 = 0.1;
pub const EXTRA_LIFE_PROB: f64 = 0.5;

// Motion multipliers
pub const SHIP_PUSH_MULT: f64 = 0.25;
pub const FIRE_RECOIL_MULT: f64 = 0.01;
pub const ALIEN_PUSH_MULT: f64 = 1.0;
pub const ALIEN_PUSH_RADII: f64 = 20.0;
pub const ROCK_SPEED_MULT: f64 = 0.735;
pub const PROJECTILE_RANGE_FRACTION: f64 = 0.75;
/// Lookahead used by the rebound test: only objects still closing get bounced.
pub const REBOUND_LOOKAHEAD: f64 = 0.1;

// Rock geometry
pub const ROCK_POINTS: usize = 21;
pub const ROCK_BASE_RADIUS: f64 = 20.0;
pub const ROCK_JITTER: f64 = 0.25;
pub const BIG_ROCK_SCALE: f64 = 1.0;
pub const MED_ROCK_SCALE: f64 = 0.71;
pub const SMALL_ROCK_SCALE: f64 = 0.4;
pub const DEBRIS_JITTER: f64 = 0.2;

// Scores
pub const SCORE_BIG_ROCK: u32 = 100;
pub const SCORE_MED_ROCK: u32 = 50;
pub const SCORE_SMALL_ROCK: u32 = 25;
pub const SCORE_ALIEN: u32 = 500;

// Masses
pub const MASS_BIG_ROCK: f64 = 300.0;
pub const MASS_MED_ROCK: f64 = 200.0;
pub const MASS_SMALL_ROCK: f64 = 125.0;
pub const MASS_SHIP: f64 = 10.0;
pub const MASS_ALIEN: f64 = 15.0;
pub const MASS_PROJECTILE: f64 = 1.0;
pub const MASS_DEBRIS: f64 = 2.0;

#[inline]
pub fn degrees(deg: f64) -> f64 {
    TAU * deg / 360.0
}

/// Grows from 0 toward 1, reaching one half at [`HALF_MAX_TICKS`].
#[inline]
pub fn half_max_ramp(tick: u32) -> f64 {
    1.0 - 1.0 / (1.0 + f64::from(tick) / HALF_MAX_TICKS)
}
