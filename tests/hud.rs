use speculoos::prelude::*;

use campus_run::catalog::City;
use campus_run::events::GameCommand;
use campus_run::systems::components::{Distance, ItemsCollected, ScheduledSpawns};
use campus_run::systems::hud::HudState;
use campus_run::systems::state::GamePhase;

mod common;

#[test]
fn the_boot_screen_asks_for_a_start() {
    let mut game = common::new_game();
    common::tick(&mut game);

    let hud = game.world.resource::<HudState>();
    assert_that(&hud.phase).is_equal_to(GamePhase::Idle);
    assert_that(&hud.status_label()).is_equal_to("PRESS START");
    assert_that(&hud.completed_before).is_false();
}

#[test]
fn the_snapshot_mirrors_the_run_resources() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);

    game.world.insert_resource(Distance(1234.7));
    game.world.insert_resource(ItemsCollected(4));
    common::tick(&mut game);

    let hud = game.world.resource::<HudState>();
    // Distance is truncated to whole meters, plus the half meter this frame
    // added before the snapshot was taken.
    assert_that(&hud.distance_m).is_equal_to(1235);
    assert_that(&hud.items).is_equal_to(4);
    assert_that(&hud.goal).is_equal_to(15);
    assert_that(&hud.city).is_equal_to(City::Chicago);
    assert_that(&hud.status_label()).is_equal_to("RUNNING");
}

#[test]
fn the_pause_label_wins_over_running() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);

    game.queue_command(GameCommand::TogglePause);
    common::tick(&mut game);

    assert_that(&game.world.resource::<HudState>().status_label()).is_equal_to("PAUSED");
}

#[test]
fn the_victory_label_sticks() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();

    game.world.insert_resource(ItemsCollected(14));
    common::spawn_collectible_at(
        &mut game,
        campus_run::catalog::CollectibleKind::Football,
        glam::Vec2::new(120.0, 390.0),
    );
    common::tick_n(&mut game, 2);

    assert_that(&game.world.resource::<HudState>().status_label()).is_equal_to("YOU MADE IT!");

    let path = game.world.resource::<campus_run::persistence::SaveLocation>().0.clone();
    std::fs::remove_file(path).ok();
}
