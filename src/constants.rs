//! Game-wide tuning values.
//!
//! Everything time-based is expressed in milliseconds of *game time* (the
//! clock that freezes while the game is paused), and everything spatial in
//! canvas pixels.

use std::time::Duration;

use glam::{UVec2, Vec2};

/// Logical canvas size in pixels. The renderer consumes draw commands in this
/// coordinate space; a real backend may scale it up however it likes.
pub const CANVAS_SIZE: UVec2 = UVec2::new(960, 540);

/// Target duration of a single frame (60 FPS).
pub const LOOP_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Number of collectible points needed to win a run.
pub const ITEMS_TO_WIN: u32 = 15;

/// Core movement and timing mechanics.
pub mod mechanics {
    /// Base horizontal scroll speed in pixels per frame.
    pub const INITIAL_SPEED: f32 = 5.0;
    /// Downward acceleration applied per frame while airborne.
    pub const GRAVITY: f32 = 0.65;
    /// Vertical velocity applied on jump (negative is up).
    pub const JUMP_FORCE: f32 = -15.0;
    /// Distance from the bottom of the canvas to the ground line.
    pub const GROUND_OFFSET: f32 = 100.0;

    /// Game time between speed multiplier increases.
    pub const SPEED_INCREASE_INTERVAL_MS: f64 = 25_000.0;
    pub const SPEED_INCREASE_MULTIPLIER: f32 = 1.12;
    pub const MAX_SPEED_MULTIPLIER: f32 = 2.2;

    /// How long a stumble lasts, in game time.
    pub const STUMBLE_DURATION_MS: f64 = 400.0;
    /// Scroll speed factor while stumbling.
    pub const STUMBLE_SPEED_MULTIPLIER: f32 = 0.5;

    /// Metres of distance credited per unit of scroll speed per frame.
    pub const DISTANCE_PER_SPEED: f32 = 0.1;
}

/// Player dimensions, hitbox and animation.
pub mod player {
    use glam::Vec2;

    pub const SIZE: Vec2 = Vec2::new(48.0, 64.0);
    /// Fixed horizontal position of the player on screen.
    pub const START_X: f32 = 100.0;
    /// The collision box is inset from the sprite on each axis.
    pub const HITBOX_INSET: Vec2 = Vec2::new(8.0, 4.0);
    /// Game time between run-cycle frame flips while grounded.
    pub const ANIMATION_INTERVAL_MS: f64 = 80.0;
    /// Sprite alpha while stumbling.
    pub const STUMBLE_ALPHA: f32 = 0.6;
    /// Lateral stumble shake: amplitude in pixels, phase advance per
    /// millisecond of game time.
    pub const STUMBLE_SHAKE_AMPLITUDE: f32 = 2.0;
    pub const STUMBLE_SHAKE_RATE: f32 = 0.05;
}

/// Spawn cadence for obstacles and collectibles.
pub mod spawn {
    /// Per-frame probability of an obstacle spawn once the gap allows it.
    pub const OBSTACLE_CHANCE: f64 = 0.015;
    /// Minimum scrolled distance between consecutive obstacle spawns.
    pub const MIN_OBSTACLE_GAP: f32 = 250.0;

    /// Per-frame probability of a collectible spawn once the gap allows it.
    pub const COLLECTIBLE_CHANCE: f64 = 0.025;
    /// Minimum scrolled distance between consecutive collectible spawns.
    pub const MIN_COLLECTIBLE_GAP: f32 = 200.0;

    /// A collectible is forced at this interval while few are in flight.
    pub const GUARANTEED_INTERVAL_MS: f64 = 1_500.0;
    /// The guaranteed spawn only fires below this many in-flight collectibles.
    pub const GUARANTEED_MAX_IN_FLIGHT: usize = 3;

    /// Horizontal lead past the right edge where entities appear.
    pub const SPAWN_LEAD: f32 = 50.0;
    /// Extra random horizontal jitter applied to collectibles.
    pub const COLLECTIBLE_X_JITTER: f32 = 100.0;
    /// Collectibles float between these heights above the ground line.
    pub const COLLECTIBLE_MIN_LIFT: f32 = 20.0;
    pub const COLLECTIBLE_LIFT_RANGE: f32 = 80.0;
    /// Offset of the second collectible in an empty-screen double spawn.
    pub const EMPTY_SCREEN_SECOND_OFFSET: f32 = 200.0;

    /// Obstacles sink slightly into the ground strip.
    pub const OBSTACLE_GROUND_SINK: f32 = 5.0;

    /// Entities are removed once fully past the left edge by this margin.
    pub const DESPAWN_MARGIN: f32 = 100.0;

    /// Seed collectibles scheduled at the start of a run.
    pub const SEED_SPAWN_COUNT: usize = 5;
    pub const SEED_SPAWN_BASE_MS: f64 = 500.0;
    pub const SEED_SPAWN_STEP_MS: f64 = 800.0;
}

/// Collision box adjustments.
pub mod collision {
    /// Collectible boxes are grown on every side to be forgiving.
    pub const COLLECTIBLE_OUTSET: f32 = 18.0;
    /// Vertical bob amplitude in pixels.
    pub const BOB_AMPLITUDE: f32 = 6.0;
    /// Bob phase advance per millisecond of game time.
    pub const BOB_RATE: f32 = 0.005;
}

/// Background scroll layers.
pub mod parallax {
    pub const FAR: f32 = 0.15;
    pub const MID: f32 = 0.4;
    /// Used by the ground strip decoration, not by background elements.
    pub const NEAR: f32 = 0.7;

    /// Elements taller than this land on the far layer.
    pub const FAR_LAYER_MIN_HEIGHT: f32 = 100.0;
    /// Elements spawned per replenish batch.
    pub const BATCH_SIZE: usize = 8;
    /// Horizontal stride between batch elements: width + jitter + base.
    pub const STRIDE_BASE: f32 = 80.0;
    pub const STRIDE_JITTER: f32 = 150.0;
    /// Elements sit slightly below the ground line.
    pub const BASELINE_SINK: f32 = 10.0;
    /// Replenish whenever the rightmost edge drops under this many viewports.
    pub const COVERAGE_FACTOR: f32 = 2.0;
}

/// City rotation.
pub mod city {
    /// Metres of distance between city changes.
    pub const CHANGE_INTERVAL_M: f64 = 2_000.0;
}

/// Computed ground line for the logical canvas.
pub fn ground_y() -> f32 {
    CANVAS_SIZE.y as f32 - mechanics::GROUND_OFFSET
}

/// Player position/extent helpers shared by spawning and tests.
pub fn player_spawn_position() -> Vec2 {
    Vec2::new(player::START_X, ground_y() - player::SIZE.y)
}
