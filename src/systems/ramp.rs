use bevy_ecs::system::{Res, ResMut};
use tracing::debug;

use crate::constants::mechanics;
use crate::systems::components::{GameClock, SpeedState};

/// Difficulty ramp. Every interval of game time the speed multiplier grows
/// by a fixed factor, saturating at the ceiling; the working scroll speed is
/// recomputed from it every running frame.
///
/// The accumulator compares against game time, so pausing stretches the
/// interval rather than consuming it.
pub fn ramp_system(clock: Res<GameClock>, mut speed: ResMut<SpeedState>) {
    if clock.elapsed_ms - speed.last_increase_ms > mechanics::SPEED_INCREASE_INTERVAL_MS {
        let previous = speed.multiplier;
        speed.multiplier = (speed.multiplier * mechanics::SPEED_INCREASE_MULTIPLIER).min(mechanics::MAX_SPEED_MULTIPLIER);
        speed.last_increase_ms = clock.elapsed_ms;

        if speed.multiplier > previous {
            debug!(
                multiplier = speed.multiplier,
                elapsed_ms = clock.elapsed_ms as u64,
                "Speed increased"
            );
        }
    }

    speed.current = mechanics::INITIAL_SPEED * speed.multiplier;
}
