use bevy_ecs::query::With;
use glam::Vec2;
use speculoos::prelude::*;

use campus_run::catalog::{CollectibleKind, ObstacleKind};
use campus_run::constants::spawn;
use campus_run::systems::components::{
    Extent, ItemsCollected, ObstacleCollider, Position, ScheduledSpawns, SpawnClass, SpawnState, SpawnTuning,
};

mod common;

#[test]
fn a_run_starts_with_five_seeded_collectible_spawns() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);

    let scheduled = game.world.resource::<ScheduledSpawns>();
    assert_that(&scheduled.0.len()).is_equal_to(5);

    for (index, entry) in scheduled.0.iter().enumerate() {
        assert_that(&entry.class).is_equal_to(SpawnClass::Collectible);
        assert_that(&entry.at_ms).is_equal_to(spawn::SEED_SPAWN_BASE_MS + index as f64 * spawn::SEED_SPAWN_STEP_MS);
    }
}

#[test]
fn seeded_spawns_fire_on_the_game_clock() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);

    // Frame 1 is the empty-screen double spawn; the first seed lands at
    // 500ms, which is frame 30.
    common::tick_n(&mut game, 32);

    assert_that(&game.world.resource::<ScheduledSpawns>().0.len()).is_equal_to(4);
    assert_that(&common::count_collectibles(&mut game)).is_equal_to(3);
}

#[test]
fn empty_screen_gets_a_double_spawn() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();

    common::tick(&mut game);

    assert_that(&common::count_collectibles(&mut game)).is_equal_to(2);

    // The double spawn counts as the guaranteed spawn for interval purposes.
    let state = *game.world.resource::<SpawnState>();
    let clock = game.world.resource::<campus_run::systems::components::GameClock>().elapsed_ms;
    assert_that(&state.last_guaranteed_ms).is_equal_to(clock);
}

#[test]
fn sparse_screen_gets_a_guaranteed_spawn() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();

    common::tick(&mut game);
    assert_that(&common::count_collectibles(&mut game)).is_equal_to(2);

    // The guaranteed interval elapses about 90 frames later and tops the
    // screen up to three. Three in flight then blocks further spawns.
    common::tick_n(&mut game, 95);
    assert_that(&common::count_collectibles(&mut game)).is_equal_to(3);

    common::tick_n(&mut game, 50);
    assert_that(&common::count_collectibles(&mut game)).is_equal_to(3);
}

#[test]
fn obstacles_keep_their_minimum_gap() {
    let mut game = common::new_game();
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();
    game.world.insert_resource(SpawnTuning {
        obstacle_chance: 1.0,
        collectible_chance: 0.0,
    });

    let mut total_seen = 0usize;
    for _ in 0..1200 {
        common::tick(&mut game);
        common::clear_collectibles(&mut game);

        let mut query = game
            .world
            .query_filtered::<(&Position, &Extent), With<ObstacleCollider>>();
        let mut xs: Vec<f32> = query.iter(&game.world).map(|(position, _)| position.0.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        total_seen = total_seen.max(xs.len());

        for pair in xs.windows(2) {
            assert!(
                pair[1] - pair[0] >= spawn::MIN_OBSTACLE_GAP - 1e-3,
                "Obstacles too close: {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    assert_that(&total_seen).is_greater_than(2);
}

#[test]
fn collectible_spawning_stops_at_the_goal() {
    let mut game = common::new_game();
    common::start_run(&mut game);
    game.world.insert_resource(SpawnTuning {
        obstacle_chance: 1.0,
        collectible_chance: 1.0,
    });
    game.world.insert_resource(ItemsCollected(campus_run::constants::ITEMS_TO_WIN));

    common::tick_n(&mut game, 40);

    // Every collectible path is suppressed, including the seeds and the
    // empty-screen trigger; obstacles are unaffected.
    assert_that(&common::count_collectibles(&mut game)).is_equal_to(0);
    assert_that(&common::count_obstacles(&mut game)).is_greater_than(0);
}

#[test]
fn fresh_obstacles_spawn_just_past_the_right_edge() {
    let mut game = common::new_game();
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();
    game.world.insert_resource(SpawnTuning {
        obstacle_chance: 1.0,
        collectible_chance: 0.0,
    });

    common::tick(&mut game);
    common::clear_collectibles(&mut game);

    let mut query = game
        .world
        .query_filtered::<(&Position, &Extent), With<ObstacleCollider>>();
    let (position, extent) = query.single(&game.world).expect("Expected one obstacle");

    assert_that(&position.0.x).is_equal_to(960.0 + spawn::SPAWN_LEAD);
    // Obstacles sink slightly into the ground line.
    assert_that(&position.0.y).is_equal_to(440.0 - extent.0.y + spawn::OBSTACLE_GROUND_SINK);
}

#[test]
fn entities_past_the_left_margin_are_retired() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();

    let obstacle = common::spawn_obstacle_at(&mut game, ObstacleKind::Cone, Vec2::new(-160.0, 405.0));
    let collectible = common::spawn_collectible_at(&mut game, CollectibleKind::Bottle, Vec2::new(-160.0, 200.0));

    common::tick(&mut game);

    assert_that(&game.world.get_entity(obstacle).is_err()).is_true();
    assert_that(&game.world.get_entity(collectible).is_err()).is_true();
}
