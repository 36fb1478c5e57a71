//! This module contains the main game state and the per-frame schedule.

use tracing::{debug, info, warn};

use bevy_ecs::event::EventRegistry;
use bevy_ecs::observer::Trigger;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule};
use bevy_ecs::system::{Res, ResMut};
use bevy_ecs::world::World;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent};
use crate::formatter;
use crate::persistence::{self, CompletionRecord, SaveLocation};
use crate::systems::audio::{audio_system, AudioEvent, AudioQueue, AudioState};
use crate::systems::collision::collision_system;
use crate::systems::components::{
    CityState, CommandQueue, DeltaTime, Distance, GameClock, GameRng, GlobalState, ItemsCollected, ParallaxOffsets,
    ScheduledSpawns, SpawnState, SpawnTuning, SpeedState, Viewport,
};
use crate::systems::hud::{hud_system, HudState};
use crate::systems::input::input_system;
use crate::systems::parallax::parallax_system;
use crate::systems::physics::{player_control_system, player_physics_system};
use crate::systems::profiling::{profile, SystemId, SystemTimings, Timing};
use crate::systems::ramp::ramp_system;
use crate::systems::render::{render_system, DrawList, RenderOptions};
use crate::systems::scroll::{distance_system, scroll_system};
use crate::systems::spawn::spawn_system;
use crate::systems::state::{
    clock_system, handle_pause_command, handle_resize_command, manage_pause_state_system, stage_system, GamePhase,
    PauseState,
};
use crate::systems::{GameplaySet, RenderSet};

/// Environment variable that pins the run RNG for replayable runs.
pub const SEED_ENV: &str = "CAMPUS_RUN_SEED";

/// Core game state built on the Bevy ECS architecture.
///
/// A `World` holds all entities and resources; a `Schedule` defines system
/// execution order. The simulation is headless, so initialization is just
/// event registration, resource insertion, and schedule wiring. Entities are
/// not spawned here; the stage system spawns them when a run starts.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Initializes the ECS world, event registry, and system schedule.
    ///
    /// # Errors
    ///
    /// Returns `GameError` when no save location can be resolved.
    pub fn new() -> GameResult<Game> {
        info!("Starting game initialization");

        let mut world = World::default();
        let mut schedule = Schedule::default();

        debug!("Setting up ECS event registry and observers");
        Self::setup_ecs(&mut world);

        debug!("Inserting resources into ECS world");
        Self::insert_resources(&mut world)?;

        debug!("Configuring system execution schedule");
        Self::configure_schedule(&mut schedule);

        info!("Game initialization completed successfully");
        Ok(Game { world, schedule })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<AudioEvent>(world);

        world.add_observer(|event: Trigger<GameEvent>, mut state: ResMut<GlobalState>| {
            if matches!(*event, GameEvent::Command(GameCommand::Exit)) {
                state.exit = true;
            }
        });
    }

    fn insert_resources(world: &mut World) -> GameResult<()> {
        let save = SaveLocation::from_env()?;
        let record = persistence::load(&save.0);
        if record.completed {
            info!("A previous completion is on record");
        }

        let rng = match std::env::var(SEED_ENV).ok().and_then(|s| s.parse::<u64>().ok()) {
            Some(seed) => {
                info!(seed, "Seeding run RNG from environment");
                SmallRng::seed_from_u64(seed)
            }
            None => SmallRng::from_os_rng(),
        };

        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(DeltaTime { seconds: 0.0, millis: 0.0 });
        world.insert_resource(GameClock::default());
        world.insert_resource(Distance::default());
        world.insert_resource(ItemsCollected::default());
        world.insert_resource(SpeedState::default());
        world.insert_resource(SpawnState::default());
        world.insert_resource(SpawnTuning::default());
        world.insert_resource(ScheduledSpawns::default());
        world.insert_resource(CityState::default());
        world.insert_resource(ParallaxOffsets::default());
        world.insert_resource(Viewport::default());
        world.insert_resource(CommandQueue::default());
        world.insert_resource(GameRng(rng));

        world.insert_resource(GamePhase::default());
        world.insert_resource(PauseState::default());
        world.insert_resource(HudState::default());
        world.insert_resource(RenderOptions::default());
        world.insert_resource(DrawList::default());
        world.insert_resource(AudioState::default());
        world.insert_resource(AudioQueue::default());

        world.insert_resource(record);
        world.insert_resource(save);

        world.insert_resource(SystemTimings::default());
        world.insert_resource(Timing::default());

        Ok(())
    }

    fn configure_schedule(schedule: &mut Schedule) {
        let input_system = profile(SystemId::Input, input_system);
        let pause_system = profile(SystemId::Input, handle_pause_command);
        let resize_system = profile(SystemId::Input, handle_resize_command);
        let clock_system = profile(SystemId::Clock, clock_system);
        let ramp_system = profile(SystemId::Ramp, ramp_system);
        let parallax_system = profile(SystemId::Parallax, parallax_system);
        let player_control_system = profile(SystemId::PlayerControl, player_control_system);
        let player_physics_system = profile(SystemId::Physics, player_physics_system);
        let scroll_system = profile(SystemId::Scroll, scroll_system);
        let spawn_system = profile(SystemId::Spawn, spawn_system);
        let collision_system = profile(SystemId::Collision, collision_system);
        let distance_system = profile(SystemId::Distance, distance_system);
        let stage_system = profile(SystemId::Stage, stage_system);
        let hud_system = profile(SystemId::Hud, hud_system);
        let render_system = profile(SystemId::Render, render_system);
        let audio_system = profile(SystemId::Audio, audio_system);
        let manage_pause_state_system = profile(SystemId::PauseManager, manage_pause_state_system);

        schedule
            .add_systems((
                (input_system, pause_system, resize_system).chain().in_set(GameplaySet::Input),
                // Strict order within the frame: time advances first, then
                // movement, then spawning against post-scroll gaps, then
                // collision against final positions.
                (
                    clock_system,
                    ramp_system,
                    parallax_system,
                    player_control_system,
                    player_physics_system,
                    scroll_system,
                    spawn_system,
                    collision_system,
                    distance_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                stage_system.in_set(GameplaySet::Respond),
                (hud_system, render_system, audio_system).chain().in_set(RenderSet::Draw),
                manage_pause_state_system.after(GameplaySet::Update).before(RenderSet::Draw),
            ))
            .configure_sets((
                GameplaySet::Input,
                GameplaySet::Update.run_if(|phase: Res<GamePhase>, paused: Res<PauseState>| {
                    *phase == GamePhase::Running && !paused.active()
                }),
                // Respond and Draw always run so start/reset work from any
                // phase and the paused frame keeps rendering.
                GameplaySet::Respond,
                RenderSet::Draw,
            ).chain());
    }

    /// Queues a command for the next frame's input pass.
    pub fn queue_command(&mut self, command: GameCommand) {
        self.world.resource_mut::<CommandQueue>().0.push_back(command);
    }

    /// Executes one frame of game logic by running all scheduled ECS systems.
    ///
    /// # Arguments
    ///
    /// * `dt` - Frame delta time in seconds
    ///
    /// # Returns
    ///
    /// `true` if the game should terminate (exit command received).
    pub fn tick(&mut self, dt: f32) -> bool {
        self.world.insert_resource(DeltaTime {
            seconds: dt,
            millis: dt as f64 * 1000.0,
        });

        // Measure total frame time including schedule overhead.
        let start = std::time::Instant::now();
        self.schedule.run(&mut self.world);
        let total_duration = start.elapsed();

        formatter::increment_frame();

        if let (Some(timings), Some(timing)) = (
            self.world.get_resource::<SystemTimings>(),
            self.world.get_resource::<Timing>(),
        ) {
            let new_tick = timing.increment_tick();
            timings.add_total_timing(total_duration, new_tick);

            // 120% of the frame budget before a frame counts as slow.
            let frame_budget_ms = (dt * 1000.0 * 1.2) as u128;
            if total_duration.as_millis() > frame_budget_ms {
                let slowest_systems = timings.get_slowest_systems();
                let systems_context = if slowest_systems.is_empty() {
                    "No specific systems identified".to_string()
                } else {
                    slowest_systems
                        .iter()
                        .map(|(id, duration)| format!("{} ({:.2?})", id, duration))
                        .collect::<Vec<String>>()
                        .join(", ")
                };

                warn!(
                    total = format!("{:.3?}", total_duration),
                    tick = new_tick,
                    systems = systems_context,
                    budget = format!("{:.1}ms", frame_budget_ms),
                    "Frame took longer than expected"
                );
            }
        }

        let state = self
            .world
            .get_resource::<GlobalState>()
            .expect("GlobalState could not be acquired");

        state.exit
    }
}
