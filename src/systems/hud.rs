use bevy_ecs::{
    resource::Resource,
    system::{Res, ResMut},
};

use crate::catalog::City;
use crate::constants;
use crate::persistence::CompletionRecord;
use crate::systems::components::{CityState, Distance, ItemsCollected, SpeedState};
use crate::systems::state::{GamePhase, PauseState};

/// Per-frame HUD snapshot. The renderer reads this instead of poking at the
/// gameplay resources directly.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct HudState {
    pub distance_m: u64,
    pub items: u32,
    pub goal: u32,
    pub city: City,
    pub phase: GamePhase,
    pub paused: bool,
    pub speed_multiplier: f32,
    /// A run was completed in an earlier session; shows the badge.
    pub completed_before: bool,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            distance_m: 0,
            items: 0,
            goal: constants::ITEMS_TO_WIN,
            city: City::default(),
            phase: GamePhase::Idle,
            paused: false,
            speed_multiplier: 1.0,
            completed_before: false,
        }
    }
}

impl HudState {
    pub fn status_label(&self) -> &'static str {
        match (self.phase, self.paused) {
            (GamePhase::Won, _) => "YOU MADE IT!",
            (GamePhase::Running, true) => "PAUSED",
            (GamePhase::Running, false) => "RUNNING",
            (GamePhase::Idle, _) => "PRESS START",
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn hud_system(
    phase: Res<GamePhase>,
    pause: Res<PauseState>,
    distance: Res<Distance>,
    items: Res<ItemsCollected>,
    city: Res<CityState>,
    speed: Res<SpeedState>,
    record: Res<CompletionRecord>,
    mut hud: ResMut<HudState>,
) {
    *hud = HudState {
        distance_m: distance.0 as u64,
        items: items.0,
        goal: constants::ITEMS_TO_WIN,
        city: city.city(),
        phase: *phase,
        paused: pause.active(),
        speed_multiplier: speed.multiplier,
        completed_before: record.completed,
    };
}
