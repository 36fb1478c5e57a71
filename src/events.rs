use bevy_ecs::prelude::*;

use crate::catalog::{CollectibleKind, ObstacleKind};

/// Discrete actions fed into the simulation, drained once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Jump,
    StartRun,
    TogglePause,
    /// Advance exactly one frame while paused.
    StepFrame,
    Reset,
    MuteAudio,
    /// The host surface changed size; re-derive the viewport geometry.
    Resize { width: u32, height: u32 },
    Exit,
}

#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Command(GameCommand),
    /// The player clipped an obstacle and entered the stumble window.
    Stumbled(ObstacleKind),
    /// A collectible was picked up, worth this many points.
    Collected { kind: CollectibleKind, points: u32 },
    /// The point goal was reached this frame.
    Won,
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}
