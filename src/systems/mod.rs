//! The Entity-Component-System (ECS) module.
//!
//! Components, resources, and the systems that advance one simulation frame.

use bevy_ecs::schedule::SystemSet;

pub mod audio;
pub mod collision;
pub mod components;
pub mod hud;
pub mod input;
pub mod parallax;
pub mod physics;
pub mod profiling;
pub mod ramp;
pub mod render;
pub mod scroll;
pub mod spawn;
pub mod state;

/// Gameplay phases within one frame. `Update` is gated on an active,
/// unpaused run; `Input` and `Respond` always execute so commands keep
/// flowing while paused or idle.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Update,
    Respond,
}

/// Presentation phase, after all gameplay for the frame has settled.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderSet {
    Draw,
}
