use bevy_ecs::{
    entity::Entity,
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use rand::{rngs::SmallRng, Rng};
use tracing::info;

use crate::catalog::{BackgroundKind, City};
use crate::constants::{city as city_constants, parallax, spawn};
use crate::systems::components::{
    BackgroundBundle, BackgroundElement, CityState, Distance, Extent, GameRng, ParallaxLayer, ParallaxOffsets, Position,
    RunEntity, SpeedState, Viewport,
};

/// Spawns one batch of scenery for `city`, marching right from `start_x`
/// with a randomized stride. Returns the frontier x past the last element.
pub fn spawn_city_batch(commands: &mut Commands, rng: &mut SmallRng, viewport: &Viewport, city: City, start_x: f32) -> f32 {
    let mut frontier = start_x;

    for _ in 0..parallax::BATCH_SIZE {
        let kind = BackgroundKind::random_for_city(city, rng);
        let size = kind.size();

        commands.spawn(BackgroundBundle {
            element: BackgroundElement { kind },
            run_entity: RunEntity,
            position: Position(Vec2::new(frontier, viewport.ground_y - size.y + parallax::BASELINE_SINK)),
            extent: Extent(size),
            layer: ParallaxLayer::for_height(size.y),
        });

        frontier += size.x + rng.random_range(0.0..parallax::STRIDE_JITTER) + parallax::STRIDE_BASE;
    }

    frontier
}

/// Background scroller: rotates the city on distance milestones, scrolls
/// the far and mid layers at their own rates, retires elements past the
/// left edge, and keeps at least two viewports of scenery queued up ahead.
///
/// The stumble penalty does not apply here; backgrounds move at the full
/// ramp speed, which reads as the player losing ground rather than the
/// world slowing down.
pub fn parallax_system(
    mut commands: Commands,
    speed: Res<SpeedState>,
    distance: Res<Distance>,
    viewport: Res<Viewport>,
    mut city: ResMut<CityState>,
    mut offsets: ResMut<ParallaxOffsets>,
    mut rng: ResMut<GameRng>,
    mut elements: Query<(Entity, &mut Position, &Extent, &ParallaxLayer), With<BackgroundElement>>,
) {
    offsets.far += speed.current * parallax::FAR;
    offsets.mid += speed.current * parallax::MID;
    offsets.near += speed.current * parallax::NEAR;

    // City rotation. Elements already on screen keep their art; the fresh
    // batch ahead introduces the new city.
    if distance.0 > city.next_change_m {
        city.rotation += 1;
        city.next_change_m += city_constants::CHANGE_INTERVAL_M;
        spawn_city_batch(&mut commands, &mut rng.0, &viewport, city.city(), viewport.size.x);
        info!(city = city.city().display_name(), distance_m = distance.0 as u64, "Entering a new city");
    }

    let mut rightmost = 0.0f32;
    for (entity, mut position, extent, layer) in elements.iter_mut() {
        position.0.x -= speed.current * layer.factor();

        if position.0.x + extent.0.x < -spawn::DESPAWN_MARGIN {
            commands.entity(entity).despawn();
        } else {
            rightmost = rightmost.max(position.0.x + extent.0.x);
        }
    }

    // Replenish until coverage is provably restored. The frontier overshoots
    // the rightmost edge by at most one stride, hence the margin.
    let threshold = viewport.size.x * parallax::COVERAGE_FACTOR;
    if rightmost < threshold {
        let mut frontier = viewport.size.x;
        while frontier < threshold + parallax::STRIDE_BASE + parallax::STRIDE_JITTER {
            frontier = spawn_city_batch(&mut commands, &mut rng.0, &viewport, city.city(), frontier);
        }
    }
}
