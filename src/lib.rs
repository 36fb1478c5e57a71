//! Campus Run simulation core library crate.

pub mod app;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod persistence;
pub mod systems;
