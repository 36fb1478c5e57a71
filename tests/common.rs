#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use campus_run::catalog::{CollectibleKind, ObstacleKind};
use campus_run::events::GameCommand;
use campus_run::game::Game;
use campus_run::persistence::{CompletionRecord, SaveLocation};
use campus_run::systems::components::{
    Collectible, CollectibleBundle, CollectibleCollider, Extent, GameRng, Obstacle, ObstacleBundle, ObstacleCollider,
    PlayerControlled, Position, RunEntity, SpawnTuning, StumbleState, VerticalMotion,
};
use campus_run::systems::state::GamePhase;

/// Fixed 60 FPS timestep used throughout the tests.
pub const FRAME_SECONDS: f32 = 1.0 / 60.0;
pub const FRAME_MS: f64 = 1000.0 / 60.0;

static SAVE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A throwaway save path unique to this test, so tests never touch the real
/// completion record and never race each other.
pub fn scratch_save_path() -> std::path::PathBuf {
    let n = SAVE_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("campus-run-test-{}-{}.json", std::process::id(), n))
}

/// Creates a headless game with a pinned RNG and a scratch save location.
pub fn new_game() -> Game {
    let mut game = Game::new().expect("Game setup failed");

    game.world.insert_resource(SaveLocation(scratch_save_path()));
    game.world.insert_resource(CompletionRecord::default());
    game.world.insert_resource(GameRng(SmallRng::seed_from_u64(0x5EED)));

    game
}

/// Runs one fixed-rate frame.
pub fn tick(game: &mut Game) {
    game.tick(FRAME_SECONDS);
}

pub fn tick_n(game: &mut Game, frames: usize) {
    for _ in 0..frames {
        tick(game);
    }
}

/// Queues a start command and runs the frame that processes it. Gameplay
/// systems first run on the frame after this returns.
pub fn start_run(game: &mut Game) {
    game.queue_command(GameCommand::StartRun);
    tick(game);
    assert_eq!(*game.world.resource::<GamePhase>(), GamePhase::Running);
}

/// Zeroes the random spawn chances so only deterministic triggers fire.
pub fn disable_chance_spawns(game: &mut Game) {
    game.world.insert_resource(SpawnTuning {
        obstacle_chance: 0.0,
        collectible_chance: 0.0,
    });
}

pub fn player_position(game: &mut Game) -> Vec2 {
    let mut query = game.world.query_filtered::<&Position, With<PlayerControlled>>();
    query.single(&game.world).expect("No player entity").0
}

pub fn player_motion(game: &mut Game) -> VerticalMotion {
    let mut query = game.world.query_filtered::<&VerticalMotion, With<PlayerControlled>>();
    *query.single(&game.world).expect("No player entity")
}

pub fn player_stumble(game: &mut Game) -> StumbleState {
    let mut query = game.world.query_filtered::<&StumbleState, With<PlayerControlled>>();
    *query.single(&game.world).expect("No player entity")
}

pub fn count_collectibles(game: &mut Game) -> usize {
    let mut query = game.world.query_filtered::<(), With<CollectibleCollider>>();
    query.iter(&game.world).count()
}

pub fn count_obstacles(game: &mut Game) -> usize {
    let mut query = game.world.query_filtered::<(), With<ObstacleCollider>>();
    query.iter(&game.world).count()
}

/// Removes every obstacle and collectible, leaving the player and scenery.
pub fn clear_hazards(game: &mut Game) {
    let mut query = game
        .world
        .query_filtered::<Entity, bevy_ecs::query::Or<(With<ObstacleCollider>, With<CollectibleCollider>)>>();
    let entities: Vec<Entity> = query.iter(&game.world).collect();
    for entity in entities {
        game.world.despawn(entity);
    }
}

/// Removes every collectible, leaving obstacles in place.
pub fn clear_collectibles(game: &mut Game) {
    let mut query = game.world.query_filtered::<Entity, With<CollectibleCollider>>();
    let entities: Vec<Entity> = query.iter(&game.world).collect();
    for entity in entities {
        game.world.despawn(entity);
    }
}

/// Spawns an obstacle directly, bypassing the spawn system.
pub fn spawn_obstacle_at(game: &mut Game, kind: ObstacleKind, position: Vec2) -> Entity {
    game.world
        .spawn(ObstacleBundle {
            obstacle: Obstacle { kind },
            run_entity: RunEntity,
            position: Position(position),
            extent: Extent(kind.size()),
            collider: ObstacleCollider,
        })
        .id()
}

/// Spawns a collectible directly with a zero bob phase, so its drawn box
/// matches its stored position exactly.
pub fn spawn_collectible_at(game: &mut Game, kind: CollectibleKind, position: Vec2) -> Entity {
    game.world
        .spawn(CollectibleBundle {
            collectible: Collectible {
                kind,
                points: kind.points(),
                bob_offset: 0.0,
            },
            run_entity: RunEntity,
            position: Position(position),
            extent: Extent(kind.size()),
            collider: CollectibleCollider,
        })
        .id()
}
