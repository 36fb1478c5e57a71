use glam::Vec2;
use speculoos::prelude::*;

use campus_run::catalog::ObstacleKind;
use campus_run::constants::player;
use campus_run::systems::components::ScheduledSpawns;
use campus_run::systems::render::{DrawCommand, DrawList, RenderLayers, RenderOptions};

mod common;

fn commands(game: &campus_run::game::Game) -> &Vec<DrawCommand> {
    &game.world.resource::<DrawList>().0
}

fn player_sprite(game: &campus_run::game::Game) -> Option<(&'static str, Vec2, f32)> {
    commands(game).iter().find_map(|command| match command {
        DrawCommand::Sprite { key, pos, alpha, .. } if key.starts_with("player/") => Some((*key, *pos, *alpha)),
        _ => None,
    })
}

#[test]
fn the_idle_frame_paints_sky_ground_and_hud_only() {
    let mut game = common::new_game();
    common::tick(&mut game);

    let list = commands(&game);
    assert_that(&matches!(list.first(), Some(DrawCommand::Gradient { .. }))).is_true();
    assert_that(&matches!(list.last(), Some(DrawCommand::Text { .. }))).is_true();

    // No run entities exist yet, so nothing sprite-like is drawn.
    let sprites = list.iter().filter(|command| matches!(command, DrawCommand::Sprite { .. })).count();
    assert_that(&sprites).is_equal_to(0);
}

#[test]
fn the_running_frame_draws_the_player_over_the_scene() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    common::tick(&mut game);

    let (key, pos, alpha) = player_sprite(&game).expect("Player sprite missing");
    assert_that(&key).is_equal_to("player/run_0");
    assert_that(&pos.x).is_equal_to(player::START_X);
    assert_that(&alpha).is_equal_to(1.0);

    // The player paints after the ground, which paints after the sky.
    let list = commands(&game);
    let ground_index = list
        .iter()
        .position(|command| matches!(command, DrawCommand::Rect { .. }))
        .unwrap();
    let player_index = list
        .iter()
        .position(|command| matches!(command, DrawCommand::Sprite { key, .. } if key.starts_with("player/")))
        .unwrap();
    assert_that(&(player_index > ground_index)).is_true();
}

#[test]
fn an_airborne_player_uses_the_jump_sprite() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);

    game.queue_command(campus_run::events::GameCommand::Jump);
    common::tick(&mut game);

    let (key, _, _) = player_sprite(&game).expect("Player sprite missing");
    assert_that(&key).is_equal_to("player/jump");
}

#[test]
fn a_stumbling_player_is_drawn_translucent() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();

    common::spawn_obstacle_at(&mut game, ObstacleKind::Cone, Vec2::new(120.0, 405.0));
    common::tick(&mut game);

    assert_that(&common::player_stumble(&mut game).active).is_true();
    let (_, _, alpha) = player_sprite(&game).expect("Player sprite missing");
    assert_that(&alpha).is_equal_to(player::STUMBLE_ALPHA);
}

#[test]
fn a_stumbling_player_shakes_sideways() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    game.world.resource_mut::<ScheduledSpawns>().0.clear();

    common::spawn_obstacle_at(&mut game, ObstacleKind::Cone, Vec2::new(120.0, 405.0));
    common::tick(&mut game);
    assert_that(&common::player_stumble(&mut game).active).is_true();

    let mut xs = Vec::new();
    for _ in 0..5 {
        let (_, pos, _) = player_sprite(&game).expect("Player sprite missing");
        xs.push(pos.x);
        common::tick(&mut game);
    }

    // The jitter stays within its amplitude around the true position and
    // actually moves from frame to frame.
    for x in &xs {
        assert!((x - player::START_X).abs() <= player::STUMBLE_SHAKE_AMPLITUDE, "Shake out of range: {x}");
    }
    let min = xs.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    assert_that(&(max > min)).is_true();
}

#[test]
fn the_layer_mask_narrows_the_scene() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);

    game.world.insert_resource(RenderOptions {
        layers: RenderLayers::HUD,
    });
    common::tick(&mut game);

    let list = commands(&game);
    assert_that(&list.is_empty()).is_false();
    for command in list {
        assert_that(&matches!(command, DrawCommand::Text { .. })).is_true();
    }
}

#[test]
fn the_hud_text_reports_distance_items_and_city() {
    let mut game = common::new_game();
    common::disable_chance_spawns(&mut game);
    common::start_run(&mut game);
    common::tick(&mut game);

    let texts: Vec<&str> = commands(&game)
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    assert_that(&texts[0]).is_equal_to("Distance: 0m");
    assert_that(&texts[1]).is_equal_to("Items: 0/15");
    assert_that(&texts[2]).is_equal_to("Chicago - RUNNING");
}
