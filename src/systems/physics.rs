use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Res, Single},
};
use tracing::debug;

use crate::constants::{mechanics, player};
use crate::events::{GameCommand, GameEvent};
use crate::systems::audio::AudioEvent;
use crate::systems::components::{DeltaTime, GameClock, PlayerControlled, Position, RunAnimation, StumbleState, VerticalMotion};

/// Starts a jump when the command arrives and the player is grounded.
/// Airborne jump presses are dropped rather than buffered.
pub fn player_control_system(
    mut events: EventReader<GameEvent>,
    mut motion: Single<&mut VerticalMotion, With<PlayerControlled>>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    for event in events.read() {
        if let GameEvent::Command(GameCommand::Jump) = event {
            if !motion.airborne {
                motion.airborne = true;
                motion.velocity = mechanics::JUMP_FORCE;
                audio_events.write(AudioEvent::Jump);
            }
        }
    }
}

/// Integrates the player's vertical motion and advances the stumble timebox
/// and run cycle.
///
/// Gravity only acts while airborne; on the ground the player sits exactly
/// on the ground line. Landing clamps position and zeroes velocity in the
/// same frame the ground is crossed.
pub fn player_physics_system(
    clock: Res<GameClock>,
    dt: Res<DeltaTime>,
    viewport: Res<crate::systems::components::Viewport>,
    player: Single<(&mut Position, &mut VerticalMotion, &mut StumbleState, &mut RunAnimation), With<PlayerControlled>>,
) {
    let (mut position, mut motion, mut stumble, mut animation) = player.into_inner();
    let ground = viewport.ground_y - player::SIZE.y;

    if motion.airborne {
        motion.velocity += mechanics::GRAVITY;
        position.0.y += motion.velocity;

        if position.0.y >= ground {
            position.0.y = ground;
            motion.velocity = 0.0;
            motion.airborne = false;
        }
    }

    if stumble.active && clock.elapsed_ms >= stumble.until_ms {
        stumble.active = false;
        debug!(elapsed_ms = clock.elapsed_ms as u64, "Stumble recovered");
    }

    // The run cycle holds its frame mid-air.
    if !motion.airborne {
        animation.timer_ms += dt.millis;
        if animation.timer_ms > player::ANIMATION_INTERVAL_MS {
            animation.frame ^= 1;
            animation.timer_ms = 0.0;
        }
    }
}
