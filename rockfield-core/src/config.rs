use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DEMO_SECONDS, DEFAULT_DIFFICULTY, DEFAULT_INITIAL_ROCKS, DEFAULT_PLAY_HEIGHT,
    DEFAULT_PLAY_WIDTH, TICK_INTERVAL,
};
use crate::context::PlayArea;
use crate::error::SettingsError;

pub const MAX_POLL_INTERVAL_MS: u64 = 1_000;

/// Longest demo a config may ask for: one day.
pub const MAX_DEMO_SECONDS: u64 = 86_400;

/// Smallest play area the Kuiper margins and spawn formulas still make sense
/// for (both margins at least one unit).
pub const MIN_PLAY_DIMENSION: i32 = 60;

/// Knobs for a single engine run. Every field has a default, so a JSON file
/// only needs the fields it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: i32,
    pub height: i32,
    pub difficulty: f64,
    pub initial_rocks: usize,
    pub demo_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAY_WIDTH,
            height: DEFAULT_PLAY_HEIGHT,
            difficulty: DEFAULT_DIFFICULTY,
            initial_rocks: DEFAULT_INITIAL_ROCKS,
            demo_seconds: DEFAULT_DEMO_SECONDS,
        }
    }
}

impl EngineConfig {
    pub fn play_area(&self) -> PlayArea {
        PlayArea::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !difficulty_in_range(self.difficulty) {
            return Err(SettingsError::DifficultyOutOfRange {
                value: self.difficulty,
            });
        }
        if self.width < MIN_PLAY_DIMENSION || self.height < MIN_PLAY_DIMENSION {
            return Err(SettingsError::PlayAreaTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.demo_seconds == 0 || self.demo_seconds > MAX_DEMO_SECONDS {
            return Err(SettingsError::DemoLengthOutOfRange {
                seconds: self.demo_seconds,
                max: MAX_DEMO_SECONDS,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn level(self) -> f64 {
        match self {
            Self::Easy => 0.25,
            Self::Normal => 0.5,
            Self::Hard => 0.75,
        }
    }

    /// Nearest preset for an engine level. Levels between presets round to
    /// the closer one; ties go to the easier preset.
    pub fn from_level(level: f64) -> Self {
        if level <= 0.375 {
            Self::Easy
        } else if level <= 0.625 {
            Self::Normal
        } else {
            Self::Hard
        }
    }
}

/// Player-facing preferences persisted by whatever shell hosts the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub difficulty: Difficulty,
    pub poll_interval_ms: u64,
    pub high_score: u32,
    pub sounds: bool,
    pub music: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            poll_interval_ms: TICK_INTERVAL.as_millis() as u64,
            high_score: 0,
            sounds: true,
            music: true,
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.poll_interval_ms == 0 || self.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(SettingsError::PollIntervalOutOfRange {
                millis: self.poll_interval_ms,
                max: MAX_POLL_INTERVAL_MS,
            });
        }
        Ok(())
    }
}

pub(crate) fn difficulty_in_range(level: f64) -> bool {
    level > 0.0 && level <= 1.0
}
