use bevy_ecs::{
    event::EventWriter,
    system::{Commands, Res, ResMut},
};
use tracing::trace;

use crate::events::{GameCommand, GameEvent};
use crate::systems::components::CommandQueue;
use crate::systems::state::{GamePhase, PauseState};

/// Drains the pending command queue into game events, exactly once per
/// frame. Commands arriving mid-frame wait for the next drain, so a frame
/// observes a consistent input snapshot.
///
/// A jump only means something in live gameplay; pressed while paused or
/// outside a run it is dropped at drain time, never buffered for the next
/// running frame.
///
/// Events are both buffered for the frame's readers and triggered for
/// observers that act immediately, like the exit handler.
pub fn input_system(
    mut commands: Commands,
    mut queue: ResMut<CommandQueue>,
    phase: Res<GamePhase>,
    paused: Res<PauseState>,
    mut writer: EventWriter<GameEvent>,
) {
    while let Some(command) = queue.0.pop_front() {
        if command == GameCommand::Jump && (*phase != GamePhase::Running || paused.active()) {
            trace!("Dropped a jump outside live gameplay");
            continue;
        }

        trace!(?command, "Input command");
        let event = GameEvent::Command(command);
        writer.write(event);
        commands.trigger(event);
    }
}
