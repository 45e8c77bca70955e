use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::entity::Turn;

/// Buttons held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub fire: bool,
}

impl FrameInput {
    /// Requested rotation; both or neither turn buttons means no turn.
    pub fn turn(self) -> Turn {
        match (self.left, self.right) {
            (true, false) => Turn::Left,
            (false, true) => Turn::Right,
            _ => Turn::Stop,
        }
    }
}

#[inline]
pub fn encode_input_byte(input: FrameInput) -> u8 {
    (if input.left { 0x01 } else { 0 })
        | (if input.right { 0x02 } else { 0 })
        | (if input.thrust { 0x04 } else { 0 })
        | (if input.fire { 0x08 } else { 0 })
}

/// Upper four bits are ignored.
#[inline]
pub fn decode_input_byte(byte: u8) -> FrameInput {
    FrameInput {
        left: (byte & 0x01) != 0,
        right: (byte & 0x02) != 0,
        thrust: (byte & 0x04) != 0,
        fire: (byte & 0x08) != 0,
    }
}

/// Discrete input signals, one per key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    RotateLeft,
    RotateRight,
    RotateStop,
    ThrustOn,
    ThrustOff,
    Fire,
    ReleaseFire,
    Stop,
}

impl Command {
    pub fn apply(self, engine: &mut Engine) {
        match self {
            Self::RotateLeft => engine.turn(Turn::Left),
            Self::RotateRight => engine.turn(Turn::Right),
            Self::RotateStop => engine.turn(Turn::Stop),
            Self::ThrustOn => engine.set_thrust(true),
            Self::ThrustOff => engine.set_thrust(false),
            Self::Fire => engine.fire(),
            Self::ReleaseFire => engine.release_fire(),
            Self::Stop => engine.stop(),
        }
    }
}

/// Turns per-tick held-button states into the commands a keyboard shell
/// would send: rotation and thrust on change, `Fire` for every tick the
/// button is held (like key repeat) and `ReleaseFire` when it is let go.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputLatch {
    held: FrameInput,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> FrameInput {
        self.held
    }

    pub fn commands(&mut self, input: FrameInput) -> Vec<Command> {
        let mut commands = Vec::with_capacity(3);
        let previous = self.held;

        if input.turn() != previous.turn() {
            commands.push(match input.turn() {
                Turn::Left => Command::RotateLeft,
                Turn::Right => Command::RotateRight,
                Turn::Stop => Command::RotateStop,
            });
        }
        if input.thrust != previous.thrust {
            commands.push(if input.thrust {
                Command::ThrustOn
            } else {
                Command::ThrustOff
            });
        }
        if input.fire {
            commands.push(Command::Fire);
        } else if previous.fire {
            commands.push(Command::ReleaseFire);
        }

        self.held = input;
        commands
    }

    /// Feeds one tick of held buttons to `engine`.
    pub fn apply(&mut self, engine: &mut Engine, input: FrameInput) {
        for command in self.commands(input) {
            command.apply(engine);
        }
    }
}
