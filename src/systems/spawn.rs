use bevy_ecs::{
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use rand::{rngs::SmallRng, Rng};
use tracing::{debug, trace};

use crate::catalog::{CollectibleKind, ObstacleKind};
use crate::constants::{self, spawn};
use crate::systems::components::{
    Collectible, CollectibleBundle, CollectibleCollider, Extent, GameClock, GameRng, ItemsCollected, Obstacle, ObstacleBundle,
    ObstacleCollider, Position, RunEntity, ScheduledSpawns, SpawnClass, SpawnState, SpawnTuning, Viewport,
};

/// Entity spawner. Runs after the world has scrolled for the frame, so gap
/// measurements include this frame's movement.
///
/// Collectibles have three triggers, checked in order: a gap-gated chance
/// roll, a guaranteed spawn when the screen has been sparse for too long,
/// and an empty-screen double spawn that skips the gap check entirely so
/// the player always has something to chase.
pub fn spawn_system(
    mut commands: Commands,
    clock: Res<GameClock>,
    viewport: Res<Viewport>,
    tuning: Res<SpawnTuning>,
    items: Res<ItemsCollected>,
    mut rng: ResMut<GameRng>,
    mut spawn_state: ResMut<SpawnState>,
    mut scheduled: ResMut<ScheduledSpawns>,
    collectibles: Query<(), With<CollectibleCollider>>,
) {
    let mut in_flight = collectibles.iter().count();
    let goal_reached = items.0 >= constants::ITEMS_TO_WIN;

    // Scheduled one-shots fire once their game time arrives. Keyed to the
    // game clock, they hold through a pause and are dropped on reset.
    let mut due: Vec<SpawnClass> = Vec::new();
    scheduled.0.retain(|entry| {
        if entry.at_ms <= clock.elapsed_ms {
            due.push(entry.class);
            false
        } else {
            true
        }
    });
    for class in due {
        match class {
            SpawnClass::Collectible => {
                if !goal_reached {
                    spawn_collectible(&mut commands, &mut rng.0, &viewport, &mut spawn_state, 0.0);
                    in_flight += 1;
                }
            }
            SpawnClass::Obstacle => {
                spawn_obstacle(&mut commands, &mut rng.0, &viewport, &mut spawn_state);
            }
        }
    }

    // Obstacles: one chance roll per frame once the gap has opened up.
    if viewport.size.x - spawn_state.obstacle_marker > spawn::MIN_OBSTACLE_GAP && rng.0.random_bool(tuning.obstacle_chance) {
        spawn_obstacle(&mut commands, &mut rng.0, &viewport, &mut spawn_state);
    }

    // Collectible trigger 1: gap-gated chance roll.
    if viewport.size.x - spawn_state.collectible_marker > spawn::MIN_COLLECTIBLE_GAP
        && rng.0.random_bool(tuning.collectible_chance)
        && !goal_reached
    {
        spawn_collectible(&mut commands, &mut rng.0, &viewport, &mut spawn_state, 0.0);
        in_flight += 1;
    }

    // Trigger 2: guaranteed spawn while the screen is sparse.
    if clock.elapsed_ms - spawn_state.last_guaranteed_ms > spawn::GUARANTEED_INTERVAL_MS
        && in_flight < spawn::GUARANTEED_MAX_IN_FLIGHT
        && !goal_reached
    {
        spawn_collectible(&mut commands, &mut rng.0, &viewport, &mut spawn_state, 0.0);
        in_flight += 1;
        spawn_state.last_guaranteed_ms = clock.elapsed_ms;
        debug!(elapsed_ms = clock.elapsed_ms as u64, "Guaranteed collectible spawn");
    }

    // Trigger 3: the screen went empty, put two up immediately.
    if in_flight == 0 && !goal_reached {
        spawn_collectible(&mut commands, &mut rng.0, &viewport, &mut spawn_state, 0.0);
        spawn_collectible(
            &mut commands,
            &mut rng.0,
            &viewport,
            &mut spawn_state,
            spawn::EMPTY_SCREEN_SECOND_OFFSET,
        );
        spawn_state.last_guaranteed_ms = clock.elapsed_ms;
        debug!(elapsed_ms = clock.elapsed_ms as u64, "Empty-screen double spawn");
    }
}

fn spawn_obstacle(commands: &mut Commands, rng: &mut SmallRng, viewport: &Viewport, spawn_state: &mut SpawnState) {
    let kind = ObstacleKind::random(rng);
    let size = kind.size();
    let position = glam::Vec2::new(
        viewport.size.x + spawn::SPAWN_LEAD,
        viewport.ground_y - size.y + spawn::OBSTACLE_GROUND_SINK,
    );

    trace!(?kind, x = position.x, "Spawning obstacle");
    commands.spawn(ObstacleBundle {
        obstacle: Obstacle { kind },
        run_entity: RunEntity,
        position: Position(position),
        extent: Extent(size),
        collider: ObstacleCollider,
    });

    spawn_state.obstacle_marker = viewport.size.x;
}

fn spawn_collectible(
    commands: &mut Commands,
    rng: &mut SmallRng,
    viewport: &Viewport,
    spawn_state: &mut SpawnState,
    extra_x: f32,
) {
    let kind = CollectibleKind::random(rng);
    let size = kind.size();
    let lift = rng.random_range(0.0..spawn::COLLECTIBLE_LIFT_RANGE) + spawn::COLLECTIBLE_MIN_LIFT;
    let position = glam::Vec2::new(
        viewport.size.x + spawn::SPAWN_LEAD + rng.random_range(0.0..spawn::COLLECTIBLE_X_JITTER) + extra_x,
        viewport.ground_y - size.y - lift,
    );

    trace!(?kind, x = position.x, "Spawning collectible");
    commands.spawn(CollectibleBundle {
        collectible: Collectible {
            kind,
            points: kind.points(),
            bob_offset: rng.random_range(0.0..std::f32::consts::TAU),
        },
        run_entity: RunEntity,
        position: Position(position),
        extent: Extent(size),
        collider: CollectibleCollider,
    });

    spawn_state.collectible_marker = viewport.size.x;
}
