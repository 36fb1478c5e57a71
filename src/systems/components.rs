use std::collections::VecDeque;

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use rand::rngs::SmallRng;

use crate::catalog::{BackgroundKind, City, CollectibleKind, ObstacleKind};
use crate::constants;

/// A tag component for the player entity.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A tag component for everything spawned during a run, so a reset can
/// despawn the whole lot in one query.
#[derive(Default, Component)]
pub struct RunEntity;

/// Top-left corner of an entity in canvas space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Width and height of an entity's sprite box.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Extent(pub Vec2);

/// Vertical physics state for the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct VerticalMotion {
    /// Pixels per frame, positive is down.
    pub velocity: f32,
    pub airborne: bool,
}

/// Stumble timebox. While active, scroll speed is halved and further
/// obstacle contact is ignored.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StumbleState {
    pub active: bool,
    /// Game time at which the stumble ends.
    pub until_ms: f64,
}

/// Two-frame run cycle, advanced only while grounded.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct RunAnimation {
    pub frame: u8,
    pub timer_ms: f64,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Obstacle {
    pub kind: ObstacleKind,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub points: u32,
    /// Phase of the vertical bob, advanced with game time.
    pub bob_offset: f32,
}

impl Collectible {
    /// Current vertical offset of the drawn (and collidable) box.
    pub fn bob_y(&self) -> f32 {
        self.bob_offset.sin() * constants::collision::BOB_AMPLITUDE
    }
}

/// Which scroll layer a background element belongs to.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallaxLayer {
    Far,
    Mid,
}

impl ParallaxLayer {
    pub fn factor(&self) -> f32 {
        match self {
            ParallaxLayer::Far => constants::parallax::FAR,
            ParallaxLayer::Mid => constants::parallax::MID,
        }
    }

    /// Tall elements read as skyline and go to the far layer.
    pub fn for_height(height: f32) -> Self {
        if height > constants::parallax::FAR_LAYER_MIN_HEIGHT {
            ParallaxLayer::Far
        } else {
            ParallaxLayer::Mid
        }
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct BackgroundElement {
    pub kind: BackgroundKind,
}

/// Marker components for collision filtering.
#[derive(Component)]
pub struct ObstacleCollider;

#[derive(Component)]
pub struct CollectibleCollider;

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub run_entity: RunEntity,
    pub position: Position,
    pub extent: Extent,
    pub motion: VerticalMotion,
    pub stumble: StumbleState,
    pub animation: RunAnimation,
}

impl Default for PlayerBundle {
    fn default() -> Self {
        Self {
            player: PlayerControlled,
            run_entity: RunEntity,
            position: Position(constants::player_spawn_position()),
            extent: Extent(constants::player::SIZE),
            motion: VerticalMotion::default(),
            stumble: StumbleState::default(),
            animation: RunAnimation::default(),
        }
    }
}

#[derive(Bundle)]
pub struct ObstacleBundle {
    pub obstacle: Obstacle,
    pub run_entity: RunEntity,
    pub position: Position,
    pub extent: Extent,
    pub collider: ObstacleCollider,
}

#[derive(Bundle)]
pub struct CollectibleBundle {
    pub collectible: Collectible,
    pub run_entity: RunEntity,
    pub position: Position,
    pub extent: Extent,
    pub collider: CollectibleCollider,
}

#[derive(Bundle)]
pub struct BackgroundBundle {
    pub element: BackgroundElement,
    pub run_entity: RunEntity,
    pub position: Position,
    pub extent: Extent,
    pub layer: ParallaxLayer,
}

#[derive(Resource)]
pub struct GlobalState {
    pub exit: bool,
}

/// Real time elapsed since the previous frame.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DeltaTime {
    pub seconds: f32,
    pub millis: f64,
}

/// Game time: advances only while the game is running and unpaused.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct GameClock {
    pub elapsed_ms: f64,
}

/// Metres travelled this run.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Distance(pub f64);

/// Collectible points banked this run.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ItemsCollected(pub u32);

/// Difficulty ramp state.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpeedState {
    pub multiplier: f32,
    /// Pixels per frame, recomputed every running frame.
    pub current: f32,
    /// Game time of the last multiplier increase.
    pub last_increase_ms: f64,
}

impl Default for SpeedState {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            current: constants::mechanics::INITIAL_SPEED,
            last_increase_ms: 0.0,
        }
    }
}

impl SpeedState {
    /// Scroll speed after the stumble penalty.
    pub fn effective(&self, stumbling: bool) -> f32 {
        if stumbling {
            self.current * constants::mechanics::STUMBLE_SPEED_MULTIPLIER
        } else {
            self.current
        }
    }
}

/// Spawn bookkeeping. The markers record where the previous spawn's trigger
/// point has scrolled to; the gap to the right edge is the distance the
/// world has moved since then.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SpawnState {
    pub obstacle_marker: f32,
    pub collectible_marker: f32,
    /// Game time of the last guaranteed collectible spawn.
    pub last_guaranteed_ms: f64,
}

/// Spawn probabilities, separated from the constants so tests can pin them.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnTuning {
    pub obstacle_chance: f64,
    pub collectible_chance: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            obstacle_chance: constants::spawn::OBSTACLE_CHANCE,
            collectible_chance: constants::spawn::COLLECTIBLE_CHANCE,
        }
    }
}

/// What a scheduled one-shot spawn should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnClass {
    Collectible,
    Obstacle,
}

/// A spawn that fires once its game time arrives. Frozen under pause along
/// with the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledSpawn {
    pub at_ms: f64,
    pub class: SpawnClass,
}

#[derive(Resource, Debug, Default)]
pub struct ScheduledSpawns(pub Vec<ScheduledSpawn>);

/// City rotation state.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CityState {
    pub rotation: usize,
    /// Distance at which the next city change happens.
    pub next_change_m: f64,
}

impl Default for CityState {
    fn default() -> Self {
        Self {
            rotation: 0,
            next_change_m: crate::constants::city::CHANGE_INTERVAL_M,
        }
    }
}

impl CityState {
    pub fn city(&self) -> City {
        City::from_rotation(self.rotation)
    }
}

/// Decorative scroll offsets for the three parallax planes. Only the near
/// plane is consumed directly (by the ground strip); the far and mid planes
/// are carried by the background elements themselves.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ParallaxOffsets {
    pub far: f32,
    pub mid: f32,
    pub near: f32,
}

/// The run RNG. Seeded once per process (or from `CAMPUS_RUN_SEED`) so a
/// run can be replayed exactly.
#[derive(Resource)]
pub struct GameRng(pub SmallRng);

/// Viewport geometry shared by spawning, parallax and collision.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport {
    pub size: Vec2,
    pub ground_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Vec2::new(constants::CANVAS_SIZE.x as f32, constants::CANVAS_SIZE.y as f32),
            ground_y: constants::ground_y(),
        }
    }
}

/// Pending commands, drained once per frame by the input system.
#[derive(Resource, Debug, Default)]
pub struct CommandQueue(pub VecDeque<crate::events::GameCommand>);
