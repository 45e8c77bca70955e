use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    LivesNonNegative,
    DifficultyRange,
    ShipCount,
    FireChargeRange,
    EntityRadius,
    EntityBounds,
    InactiveRoster,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LivesNonNegative => write!(f, "LIVES_NON_NEGATIVE"),
            Self::DifficultyRange => write!(f, "DIFFICULTY_RANGE"),
            Self::ShipCount => write!(f, "SHIP_COUNT"),
            Self::FireChargeRange => write!(f, "FIRE_CHARGE_RANGE"),
            Self::EntityRadius => write!(f, "ENTITY_RADIUS"),
            Self::EntityBounds => write!(f, "ENTITY_BOUNDS"),
            Self::InactiveRoster => write!(f, "INACTIVE_ROSTER"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayViolation {
    pub tick: u32,
    pub rule: RuleCode,
}

impl fmt::Display for ReplayViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule violation at tick {}: {}", self.tick, self.rule)
    }
}

impl std::error::Error for ReplayViolation {}

#[derive(Clone, Debug, PartialEq)]
pub enum SettingsError {
    DifficultyOutOfRange { value: f64 },
    PollIntervalOutOfRange { millis: u64, max: u64 },
    PlayAreaTooSmall { width: i32, height: i32 },
    DemoLengthOutOfRange { seconds: u64, max: u64 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DifficultyOutOfRange { value } => {
                write!(f, "difficulty out of range: {value} (allowed (0, 1])")
            }
            Self::PollIntervalOutOfRange { millis, max } => write!(
                f,
                "poll interval out of range: {millis} ms (allowed 1..={max})"
            ),
            Self::PlayAreaTooSmall { width, height } => {
                write!(f, "play area too small: {width}x{height}")
            }
            Self::DemoLengthOutOfRange { seconds, max } => write!(
                f,
                "demo length out of range: {seconds} s (allowed 1..={max})"
            ),
        }
    }
}

impl std::error::Error for SettingsError {}
