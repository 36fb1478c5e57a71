use std::time::{Duration, Instant};

use bevy_ecs::query::With;
use tracing::{debug, info};

use crate::constants::LOOP_TIME;
use crate::error::GameResult;
use crate::events::GameCommand;
use crate::game::Game;
use crate::systems::components::{ObstacleCollider, PlayerControlled, Position, SpeedState, VerticalMotion};
use crate::systems::state::GamePhase;

/// How many frames ahead of the player the autopilot looks for obstacles,
/// scaled by current speed.
const JUMP_LOOKAHEAD_FRAMES: f32 = 18.0;
/// Frames the won screen stays up before the demo exits.
const WIN_LINGER_FRAMES: u32 = 180;

/// Main application wrapper that manages the fixed-rate game loop.
///
/// The simulation is headless, so the binary runs as a self-playing demo:
/// an autopilot starts a run, jumps over incoming obstacles, and exits a
/// few seconds after the goal is reached.
pub struct App {
    pub game: Game,
    last_tick: Instant,
    win_linger: u32,
}

impl App {
    /// Sets up the game state and the demo driver.
    ///
    /// # Errors
    ///
    /// Propagates errors from `Game::new()` during game state setup.
    pub fn new() -> GameResult<Self> {
        let game = Game::new()?;

        info!("Application initialization completed successfully");
        Ok(App {
            game,
            last_tick: Instant::now(),
            win_linger: WIN_LINGER_FRAMES,
        })
    }

    /// Executes a single frame of the game loop with consistent timing.
    ///
    /// Calculates delta time since the last frame, lets the autopilot queue
    /// its commands, runs game logic via `game.tick()`, and sleeps off any
    /// remaining frame budget.
    ///
    /// # Returns
    ///
    /// `true` if the game should continue running, `false` on exit.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        let dt = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = start;

        self.drive_autopilot();

        let exit = self.game.tick(dt);
        if exit {
            return false;
        }

        // Sleep if we still have time left
        if start.elapsed() < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                spin_sleep::sleep(time);
            }
        }

        true
    }

    /// Queues commands for the upcoming frame based on the world state.
    fn drive_autopilot(&mut self) {
        match *self.game.world.resource::<GamePhase>() {
            GamePhase::Idle => {
                debug!("Autopilot starting a run");
                self.game.queue_command(GameCommand::StartRun);
            }
            GamePhase::Running => {
                if self.obstacle_ahead() {
                    self.game.queue_command(GameCommand::Jump);
                }
            }
            GamePhase::Won => {
                self.win_linger = self.win_linger.saturating_sub(1);
                if self.win_linger == 0 {
                    info!("Demo run complete, exiting");
                    self.game.queue_command(GameCommand::Exit);
                }
            }
        }
    }

    /// True when a grounded player has an obstacle inside the jump window.
    fn obstacle_ahead(&mut self) -> bool {
        let world = &mut self.game.world;
        let lookahead = world.resource::<SpeedState>().current * JUMP_LOOKAHEAD_FRAMES;

        let mut players = world.query_filtered::<(&Position, &VerticalMotion), With<PlayerControlled>>();
        let Ok((player_position, motion)) = players.single(world) else {
            return false;
        };
        if motion.airborne {
            return false;
        }
        let (player_x, window_end) = (player_position.0.x, player_position.0.x + lookahead);

        let mut obstacles = world.query_filtered::<&Position, With<ObstacleCollider>>();
        obstacles
            .iter(world)
            .any(|position| position.0.x > player_x && position.0.x < window_end)
    }
}
