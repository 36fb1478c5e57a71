use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use tracing::{info, warn};

use crate::constants;
use crate::events::{GameCommand, GameEvent};
use crate::persistence::{self, CompletionRecord, SaveLocation};
use crate::systems::audio::AudioEvent;
use crate::systems::components::{
    CityState, Distance, GameClock, GameRng, ItemsCollected, ParallaxOffsets, PlayerBundle, PlayerControlled, Position,
    RunEntity, ScheduledSpawn, ScheduledSpawns, SpawnClass, SpawnState, SpeedState, VerticalMotion, Viewport,
};
use crate::systems::parallax::spawn_city_batch;

/// High-level stage of the game. Pausing is layered on top via [`PauseState`]
/// rather than being a phase of its own.
#[derive(Resource, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum GamePhase {
    /// No run in progress; waiting on the start command.
    #[default]
    Idle,
    /// The main gameplay loop is active.
    Running,
    /// The point goal was reached; the final frame stays up.
    Won,
}

#[derive(Resource, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum PauseState {
    #[default]
    Inactive,
    Active {
        remaining_ticks: Option<u32>,
    },
}

impl PauseState {
    /// True when gameplay is blocked this frame. A counted state is a step
    /// allowance, so it does not block.
    pub fn active(&self) -> bool {
        matches!(self, PauseState::Active { remaining_ticks: None })
    }

    /// Ticks the pause state.
    ///
    /// # Returns
    ///
    /// `true` if the state changed (a counted single-step just ran out).
    pub fn tick(&mut self) -> bool {
        match self {
            // Permanent states
            PauseState::Active { remaining_ticks: None } | PauseState::Inactive => false,
            // Last tick of the active state
            PauseState::Active {
                remaining_ticks: Some(1),
            } => {
                *self = PauseState::Inactive;
                true
            }
            PauseState::Active {
                remaining_ticks: Some(ticks),
            } => {
                *self = PauseState::Active {
                    remaining_ticks: Some(*ticks - 1),
                };
                false
            }
        }
    }
}

/// Handles pause toggling and single-step while a run is active.
pub fn handle_pause_command(
    mut events: EventReader<GameEvent>,
    phase: Res<GamePhase>,
    mut pause_state: ResMut<PauseState>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    for event in events.read() {
        match event {
            GameEvent::Command(GameCommand::TogglePause) => {
                if *phase != GamePhase::Running {
                    continue;
                }

                *pause_state = match *pause_state {
                    PauseState::Active { .. } => {
                        info!("Game resumed");
                        audio_events.write(AudioEvent::Resume);
                        PauseState::Inactive
                    }
                    PauseState::Inactive => {
                        info!("Game paused");
                        audio_events.write(AudioEvent::Pause);
                        PauseState::Active { remaining_ticks: None }
                    }
                }
            }
            GameEvent::Command(GameCommand::StepFrame) => {
                // Single-step only makes sense from a hard pause.
                if !matches!(*pause_state, PauseState::Active { remaining_ticks: None }) {
                    continue;
                }

                *pause_state = PauseState::Active {
                    remaining_ticks: Some(1),
                };
            }
            _ => {}
        }
    }
}

/// Applies viewport resizes from the host. The ground line tracks the new
/// bottom edge in the same frame; a grounded player snaps onto it, while an
/// airborne player is left alone and falls toward wherever it now is.
pub fn handle_resize_command(
    mut events: EventReader<GameEvent>,
    mut viewport: ResMut<Viewport>,
    mut players: Query<(&mut Position, &VerticalMotion), With<PlayerControlled>>,
) {
    for event in events.read() {
        if let GameEvent::Command(GameCommand::Resize { width, height }) = event {
            viewport.size = glam::Vec2::new(*width as f32, *height as f32);
            viewport.ground_y = viewport.size.y - constants::mechanics::GROUND_OFFSET;

            for (mut position, motion) in players.iter_mut() {
                if !motion.airborne {
                    position.0.y = viewport.ground_y - constants::player::SIZE.y;
                }
            }

            info!(width, height, ground_y = viewport.ground_y, "Viewport resized");
        }
    }
}

pub fn manage_pause_state_system(mut pause_state: ResMut<PauseState>, mut audio_events: EventWriter<AudioEvent>) {
    // A counted single-step that runs out drops back into the hard pause.
    if pause_state.tick() {
        *pause_state = PauseState::Active { remaining_ticks: None };
        audio_events.write(AudioEvent::Pause);
    }
}

/// Drives phase transitions: starting a run, resetting to idle, and locking
/// in a win the same frame the goal is reached.
///
/// The run-state resources travel as one tuple parameter; they reset as a
/// unit when a run starts.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn stage_system(
    mut commands: Commands,
    mut events: EventReader<GameEvent>,
    mut phase: ResMut<GamePhase>,
    mut pause: ResMut<PauseState>,
    run_state: (
        ResMut<GameClock>,
        ResMut<Distance>,
        ResMut<ItemsCollected>,
        ResMut<SpeedState>,
        ResMut<SpawnState>,
        ResMut<ScheduledSpawns>,
        ResMut<CityState>,
        ResMut<ParallaxOffsets>,
    ),
    mut rng: ResMut<GameRng>,
    viewport: Res<Viewport>,
    run_entities: Query<Entity, With<RunEntity>>,
    mut record: ResMut<CompletionRecord>,
    save: Res<SaveLocation>,
    mut audio_events: EventWriter<AudioEvent>,
) {
    let (mut clock, mut distance, mut items, mut speed, mut spawn_state, mut scheduled, mut city, mut offsets) = run_state;

    for event in events.read() {
        match event {
            GameEvent::Command(GameCommand::StartRun) => {
                if *phase == GamePhase::Running {
                    continue;
                }

                for entity in run_entities.iter() {
                    commands.entity(entity).despawn();
                }

                *clock = GameClock::default();
                *distance = Distance::default();
                *items = ItemsCollected::default();
                *speed = SpeedState::default();
                *spawn_state = SpawnState::default();
                *city = CityState::default();
                *offsets = ParallaxOffsets::default();

                scheduled.0.clear();
                for i in 0..constants::spawn::SEED_SPAWN_COUNT {
                    scheduled.0.push(ScheduledSpawn {
                        at_ms: constants::spawn::SEED_SPAWN_BASE_MS + i as f64 * constants::spawn::SEED_SPAWN_STEP_MS,
                        class: SpawnClass::Collectible,
                    });
                }

                commands.spawn(PlayerBundle::default());
                // The opening scenery fills from the left edge; the first
                // parallax pass tops coverage up ahead of the viewport.
                spawn_city_batch(&mut commands, &mut rng.0, &viewport, city.city(), 0.0);

                *pause = PauseState::Inactive;
                *phase = GamePhase::Running;
                info!(
                    seed_spawns = constants::spawn::SEED_SPAWN_COUNT,
                    city = city.city().display_name(),
                    "Run started"
                );
            }
            GameEvent::Command(GameCommand::Reset) => {
                for entity in run_entities.iter() {
                    commands.entity(entity).despawn();
                }
                scheduled.0.clear();
                *pause = PauseState::Inactive;
                *phase = GamePhase::Idle;
                info!("Returned to idle");
            }
            GameEvent::Won => {
                if *phase != GamePhase::Running {
                    continue;
                }

                *phase = GamePhase::Won;
                record.mark_completed();
                if let Err(e) = persistence::save(&save.0, &record) {
                    warn!(error = %e, "Could not persist completion record");
                }
                audio_events.write(AudioEvent::Victory);

                info!(
                    items = items.0,
                    distance_m = distance.0 as u64,
                    elapsed_ms = clock.elapsed_ms as u64,
                    "Run complete"
                );
            }
            _ => {}
        }
    }
}

/// Advances game time. First system of the running update chain, so every
/// consumer in the same frame sees the post-advance clock.
pub fn clock_system(mut clock: ResMut<GameClock>, dt: Res<crate::systems::components::DeltaTime>) {
    clock.elapsed_ms += dt.millis;
}
