use bevy_ecs::{
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut, Single},
};
use bitflags::bitflags;
use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::player;
use crate::systems::components::{
    BackgroundElement, Collectible, Extent, GameClock, Obstacle, ParallaxLayer, ParallaxOffsets, PlayerControlled, Position,
    RunAnimation, StumbleState, VerticalMotion, Viewport,
};
use crate::systems::hud::HudState;

/// A flat RGB color.
pub type Rgb = (u8, u8, u8);

const SKY_TOP: Rgb = (0x87, 0xCE, 0xEB);
const SKY_HORIZON: Rgb = (0xFF, 0x8C, 0x69);
const GROUND: Rgb = (0x8A, 0x7A, 0x5A);
const GROUND_STRIPE: Rgb = (0x6E, 0x60, 0x45);
const GROUND_STRIPE_SPACING: f32 = 100.0;

bitflags! {
    /// Which parts of the scene get drawn. All on by default; toggling
    /// layers off is a debugging aid.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RenderLayers: u8 {
        const SKY = 1 << 0;
        const FAR = 1 << 1;
        const MID = 1 << 2;
        const GROUND = 1 << 3;
        const ENTITIES = 1 << 4;
        const PLAYER = 1 << 5;
        const HUD = 1 << 6;
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct RenderOptions {
    pub layers: RenderLayers,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layers: RenderLayers::all(),
        }
    }
}

/// One drawing instruction in canvas space. A backend replays the list in
/// order; the simulation core never touches a real canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Vertical gradient between two colors.
    Gradient { pos: Vec2, size: Vec2, top: Rgb, bottom: Rgb },
    Rect { pos: Vec2, size: Vec2, color: Rgb },
    Sprite { key: &'static str, pos: Vec2, size: Vec2, alpha: f32 },
    Text { text: String, pos: Vec2 },
}

/// The frame's draw list, rebuilt from scratch every frame.
#[derive(Resource, Debug, Default)]
pub struct DrawList(pub Vec<DrawCommand>);

/// Emits the frame's draw commands in fixed paint order: sky, far layer,
/// mid layer, ground, obstacles, collectibles, player, HUD.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn render_system(
    options: Res<RenderOptions>,
    viewport: Res<Viewport>,
    offsets: Res<ParallaxOffsets>,
    clock: Res<GameClock>,
    hud: Res<HudState>,
    backgrounds: Query<(&Position, &Extent, &BackgroundElement, &ParallaxLayer)>,
    obstacles: Query<(&Position, &Extent, &Obstacle)>,
    collectibles: Query<(&Position, &Extent, &Collectible)>,
    player: Option<Single<(&Position, &VerticalMotion, &StumbleState, &RunAnimation), With<PlayerControlled>>>,
    mut draw_list: ResMut<DrawList>,
) {
    let list = &mut draw_list.0;
    list.clear();
    let layers = options.layers;

    if layers.contains(RenderLayers::SKY) {
        list.push(DrawCommand::Gradient {
            pos: Vec2::ZERO,
            size: Vec2::new(viewport.size.x, viewport.ground_y),
            top: SKY_TOP,
            bottom: SKY_HORIZON,
        });
    }

    for wanted in [ParallaxLayer::Far, ParallaxLayer::Mid] {
        let flag = match wanted {
            ParallaxLayer::Far => RenderLayers::FAR,
            ParallaxLayer::Mid => RenderLayers::MID,
        };
        if !layers.contains(flag) {
            continue;
        }

        for (position, extent, element, layer) in backgrounds.iter() {
            if *layer == wanted {
                list.push(DrawCommand::Sprite {
                    key: element.kind.sprite_key(),
                    pos: position.0.floor(),
                    size: extent.0,
                    alpha: 1.0,
                });
            }
        }
    }

    if layers.contains(RenderLayers::GROUND) {
        list.push(DrawCommand::Rect {
            pos: Vec2::new(0.0, viewport.ground_y),
            size: Vec2::new(viewport.size.x, viewport.size.y - viewport.ground_y),
            color: GROUND,
        });

        // Sidewalk stripes scroll on the near plane.
        let phase = offsets.near % GROUND_STRIPE_SPACING;
        let mut x = -phase;
        while x < viewport.size.x {
            list.push(DrawCommand::Rect {
                pos: Vec2::new(x.floor(), viewport.ground_y + 8.0),
                size: Vec2::new(8.0, 4.0),
                color: GROUND_STRIPE,
            });
            x += GROUND_STRIPE_SPACING;
        }
    }

    if layers.contains(RenderLayers::ENTITIES) {
        for (position, extent, obstacle) in obstacles.iter() {
            list.push(DrawCommand::Sprite {
                key: obstacle.kind.sprite_key(),
                pos: position.0.floor(),
                size: extent.0,
                alpha: 1.0,
            });
        }

        for (position, extent, collectible) in collectibles.iter() {
            let drawn = position.0 + Vec2::new(0.0, collectible.bob_y());
            list.push(DrawCommand::Sprite {
                key: collectible.kind.sprite_key(),
                pos: drawn.floor(),
                size: extent.0,
                alpha: 1.0,
            });
        }
    }

    if layers.contains(RenderLayers::PLAYER) {
        if let Some(player) = player {
            let (position, motion, stumble, animation) = player.into_inner();
            let key = if motion.airborne {
                "player/jump"
            } else if animation.frame == 0 {
                "player/run_0"
            } else {
                "player/run_1"
            };

            let mut pos = position.0;
            if stumble.active {
                // The shake rides on game time, so it freezes under pause.
                pos.x += (clock.elapsed_ms as f32 * player::STUMBLE_SHAKE_RATE).sin() * player::STUMBLE_SHAKE_AMPLITUDE;
            }

            list.push(DrawCommand::Sprite {
                key,
                pos: pos.floor(),
                size: player::SIZE,
                alpha: if stumble.active { player::STUMBLE_ALPHA } else { 1.0 },
            });
        }
    }

    if layers.contains(RenderLayers::HUD) {
        let mut lines: SmallVec<[String; 4]> = SmallVec::new();
        lines.push(format!("Distance: {}m", hud.distance_m));
        lines.push(format!("Items: {}/{}", hud.items, hud.goal));
        lines.push(format!("{} - {}", hud.city.display_name(), hud.status_label()));
        if hud.completed_before {
            lines.push("* COMPLETED *".to_string());
        }

        for (index, text) in lines.into_iter().enumerate() {
            list.push(DrawCommand::Text {
                text,
                pos: Vec2::new(16.0, 16.0 + index as f32 * 20.0),
            });
        }
    }
}
