use bevy_ecs::{
    entity::Entity,
    query::With,
    system::{Commands, Query, Res, ResMut, Single},
};

use crate::constants::{collision, mechanics, spawn};
use crate::systems::components::{
    Collectible, Distance, DeltaTime, Extent, Obstacle, PlayerControlled, Position, SpawnState, SpeedState, StumbleState,
};

/// Moves obstacles and collectibles left with the world and retires them
/// once they are fully past the left edge.
///
/// The spawn gap markers scroll along with the entities they track, so the
/// gap to the right edge measures how far the world has moved since the
/// last spawn. A stumble halves the scroll for everything here; the
/// background layers are not slowed.
pub fn scroll_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    speed: Res<SpeedState>,
    stumble: Single<&StumbleState, With<PlayerControlled>>,
    mut spawn_state: ResMut<SpawnState>,
    mut obstacles: Query<(Entity, &mut Position, &Extent), (With<Obstacle>, bevy_ecs::query::Without<Collectible>)>,
    mut collectibles: Query<(Entity, &mut Position, &Extent, &mut Collectible)>,
) {
    let effective = speed.effective(stumble.active);

    spawn_state.obstacle_marker -= effective;
    spawn_state.collectible_marker -= effective;

    for (entity, mut position, extent) in obstacles.iter_mut() {
        position.0.x -= effective;
        if position.0.x + extent.0.x < -spawn::DESPAWN_MARGIN {
            commands.entity(entity).despawn();
        }
    }

    for (entity, mut position, extent, mut collectible) in collectibles.iter_mut() {
        position.0.x -= effective;
        collectible.bob_offset += collision::BOB_RATE * dt.millis as f32;
        if position.0.x + extent.0.x < -spawn::DESPAWN_MARGIN {
            commands.entity(entity).despawn();
        }
    }
}

/// Credits distance for the frame. Distance accrues at the full ramp speed
/// even while stumbling; only the visible scroll slows down.
pub fn distance_system(speed: Res<SpeedState>, mut distance: ResMut<Distance>) {
    distance.0 += (speed.current * mechanics::DISTANCE_PER_SPEED) as f64;
}
