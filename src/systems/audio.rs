use bevy_ecs::{
    event::{Event, EventReader},
    resource::Resource,
    system::ResMut,
};
use tracing::{debug, trace};

use crate::events::{GameCommand, GameEvent};

/// Sound cues raised by gameplay systems. The audio pass turns these into
/// queued cue keys; a backend plays whatever lands in the queue.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Jump,
    Collect,
    BigCollect,
    Stumble,
    Victory,
    Pause,
    Resume,
}

impl AudioEvent {
    pub fn cue_key(self) -> &'static str {
        match self {
            AudioEvent::Jump => "sfx/jump",
            AudioEvent::Collect => "sfx/collect",
            AudioEvent::BigCollect => "sfx/collect_big",
            AudioEvent::Stumble => "sfx/stumble",
            AudioEvent::Victory => "sfx/victory",
            AudioEvent::Pause => "sfx/pause",
            AudioEvent::Resume => "sfx/resume",
        }
    }
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct AudioState {
    pub muted: bool,
}

/// Cue keys to play this frame, rebuilt every frame like the draw list.
#[derive(Resource, Debug, Default)]
pub struct AudioQueue(pub Vec<&'static str>);

/// Drains the frame's sound cues into the queue, honoring the mute toggle.
/// Runs unconditionally so cues never pile up across pauses.
pub fn audio_system(
    mut game_events: EventReader<GameEvent>,
    mut audio_events: EventReader<AudioEvent>,
    mut state: ResMut<AudioState>,
    mut queue: ResMut<AudioQueue>,
) {
    queue.0.clear();

    for event in game_events.read() {
        if matches!(event, GameEvent::Command(GameCommand::MuteAudio)) {
            state.muted = !state.muted;
            debug!(muted = state.muted, "Audio mute toggled");
        }
    }

    for event in audio_events.read() {
        if state.muted {
            continue;
        }

        trace!(cue = event.cue_key(), "Queueing sound cue");
        queue.0.push(event.cue_key());
    }
}
