use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{Difficulty, EngineConfig, SessionSettings};
use crate::constants::INTRO_PAGE_TIME;
use crate::engine::Engine;
use crate::entity::EntityKind;
use crate::error::SettingsError;
use crate::input::Command;

/// Which page the host is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Intro0,
    Intro1,
    Intro2,
    Play,
    Demo,
}

/// What the audio layer should play after one poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundEvents {
    pub explosion: Option<EntityKind>,
    pub fired: bool,
    pub thrusting: bool,
    pub alien: bool,
    pub died: bool,
}

impl SoundEvents {
    pub fn is_silent(&self) -> bool {
        *self == Self::default()
    }
}

/// The page state machine around an [`Engine`]: intro pages rotate into a
/// demo, `Play` runs a game, and a finished game falls back to the first
/// intro page.
pub struct Session {
    engine: Engine,
    config: EngineConfig,
    settings: SessionSettings,
    state: GameState,
    state_mark: Duration,
    paused: bool,
}

impl Session {
    pub fn new(
        mut engine: Engine,
        config: EngineConfig,
        settings: SessionSettings,
    ) -> Result<Self, SettingsError> {
        config.validate()?;
        settings.validate()?;

        engine.set_play_area(config.play_area());
        engine.set_difficulty(settings.difficulty.level());
        engine.set_high_score(settings.high_score);
        let state_mark = engine.now();

        Ok(Self {
            engine,
            config,
            settings,
            state: GameState::Intro0,
            state_mark,
            paused: false,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn set_state(&mut self, state: GameState) {
        if state == self.state {
            return;
        }

        match state {
            GameState::Play => {
                self.paused = false;
                self.engine.start_game(self.config.initial_rocks);
            }
            GameState::Demo => {
                self.engine
                    .start_demo(self.config.demo_seconds, self.config.initial_rocks);
            }
            GameState::Intro0 | GameState::Intro1 | GameState::Intro2 => {
                self.paused = false;
                self.engine.stop();
            }
        }

        tracing::debug!(from = ?self.state, to = ?state, "page changed");
        self.state = state;
        self.state_mark = self.engine.now();
    }

    /// One poller step: tick the engine, or rotate the intro pages once the
    /// current page has been up long enough.
    pub fn poll(&mut self) -> SoundEvents {
        let mut events = SoundEvents::default();

        if self.engine.is_active() {
            if !self.paused {
                self.engine.tick();
            }

            if self.engine.is_game_over() {
                if self.is_playing() {
                    self.settings.high_score = self.engine.high_score();
                }
                self.set_state(GameState::Intro0);
            } else if self.settings.sounds && self.engine.is_playing() {
                events = SoundEvents {
                    explosion: self.engine.take_explosion_sound(),
                    fired: self.engine.fire_sound(),
                    thrusting: self.engine.thrust_sound(),
                    alien: self.engine.alien_sound(),
                    died: self.engine.died_sound(),
                };
            }
        } else if self.engine.now() >= self.state_mark + INTRO_PAGE_TIME {
            let next = match self.state {
                GameState::Intro0 => GameState::Intro1,
                GameState::Intro1 => GameState::Intro2,
                GameState::Intro2 => GameState::Demo,
                GameState::Play | GameState::Demo => GameState::Intro0,
            };
            self.set_state(next);
        }

        events
    }

    pub fn play(&mut self, on: bool) {
        if on != self.is_playing() {
            self.set_state(if on { GameState::Play } else { GameState::Intro0 });
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Play
    }

    /// Pausing only sticks while a game is being played.
    pub fn pause(&mut self, on: bool) {
        self.paused = on && self.is_playing();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn command(&mut self, command: Command) {
        match command {
            Command::Stop => self.play(false),
            other => other.apply(&mut self.engine),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        self.engine.set_difficulty(difficulty.level());
    }

    pub fn high_score(&self) -> u32 {
        self.engine.high_score()
    }

    pub fn set_high_score(&mut self, score: u32) {
        self.settings.high_score = score;
        self.engine.set_high_score(score);
    }

    pub fn set_sounds(&mut self, on: bool) {
        self.settings.sounds = on;
    }

    pub fn set_music(&mut self, on: bool) {
        self.settings.music = on;
    }

    /// Current preferences, with the high score as the engine last saw it.
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            high_score: self.engine.high_score(),
            ..self.settings.clone()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.settings.poll_interval_ms)
    }
}
