//! Entity catalog: the fixed tables of obstacle, collectible and background
//! kinds, plus the city rotation.
//!
//! Kinds are enums rather than string keys so that a typo is a compile error
//! and dimension lookups are total. Sprite keys derive from the kind and are
//! what a rendering backend would use to pick art.

use glam::Vec2;
use rand::{rngs::SmallRng, Rng};
use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// Ground-level hazards the player must jump over.
#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Textbooks,
    Bike,
    Cone,
    Squirrel,
    Backpack,
    Planter,
    Blockade,
    JerseyBarrier,
    Hurdle,
}

impl ObstacleKind {
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Textbooks => Vec2::new(40.0, 44.0),
            ObstacleKind::Bike => Vec2::new(56.0, 48.0),
            ObstacleKind::Cone => Vec2::new(28.0, 40.0),
            ObstacleKind::Squirrel => Vec2::new(32.0, 32.0),
            ObstacleKind::Backpack => Vec2::new(32.0, 40.0),
            ObstacleKind::Planter => Vec2::new(48.0, 44.0),
            ObstacleKind::Blockade => Vec2::new(64.0, 48.0),
            ObstacleKind::JerseyBarrier => Vec2::new(56.0, 36.0),
            ObstacleKind::Hurdle => Vec2::new(48.0, 40.0),
        }
    }

    /// The collision box is shrunk by this amount on every side, making the
    /// visual sprite slightly larger than the hazard itself.
    pub fn hitbox_padding(&self) -> f32 {
        match self {
            ObstacleKind::Bike => 6.0,
            ObstacleKind::Cone | ObstacleKind::Hurdle => 3.0,
            _ => 4.0,
        }
    }

    pub fn sprite_key(&self) -> &'static str {
        match self {
            ObstacleKind::Textbooks => "obstacle/textbooks",
            ObstacleKind::Bike => "obstacle/bike",
            ObstacleKind::Cone => "obstacle/cone",
            ObstacleKind::Squirrel => "obstacle/squirrel",
            ObstacleKind::Backpack => "obstacle/backpack",
            ObstacleKind::Planter => "obstacle/planter",
            ObstacleKind::Blockade => "obstacle/blockade",
            ObstacleKind::JerseyBarrier => "obstacle/jersey_barrier",
            ObstacleKind::Hurdle => "obstacle/hurdle",
        }
    }

    pub fn random(rng: &mut SmallRng) -> Self {
        let index = rng.random_range(0..Self::iter().count());
        Self::iter().nth(index).unwrap_or(ObstacleKind::Cone)
    }
}

/// Floating pickups worth one or two points each.
#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectibleKind {
    Bottle,
    Football,
    Trophy,
    MascotBuckeye,
    MascotWolverine,
    MascotLion,
    MascotHoosier,
    MascotBadger,
    MascotHawkeye,
}

impl CollectibleKind {
    pub fn size(&self) -> Vec2 {
        match self {
            CollectibleKind::Bottle => Vec2::new(20.0, 36.0),
            CollectibleKind::Football => Vec2::new(32.0, 20.0),
            CollectibleKind::Trophy => Vec2::new(24.0, 36.0),
            CollectibleKind::MascotBuckeye => Vec2::new(28.0, 28.0),
            CollectibleKind::MascotWolverine => Vec2::new(32.0, 28.0),
            CollectibleKind::MascotLion => Vec2::new(28.0, 32.0),
            CollectibleKind::MascotHoosier => Vec2::new(28.0, 28.0),
            CollectibleKind::MascotBadger => Vec2::new(28.0, 28.0),
            CollectibleKind::MascotHawkeye => Vec2::new(32.0, 28.0),
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            CollectibleKind::Trophy | CollectibleKind::MascotHoosier => 2,
            _ => 1,
        }
    }

    /// Two-point pickups get the louder fanfare.
    pub fn is_special(&self) -> bool {
        self.points() > 1
    }

    pub fn sprite_key(&self) -> &'static str {
        match self {
            CollectibleKind::Bottle => "collectible/bottle",
            CollectibleKind::Football => "collectible/football",
            CollectibleKind::Trophy => "collectible/trophy",
            CollectibleKind::MascotBuckeye => "collectible/mascot_buckeye",
            CollectibleKind::MascotWolverine => "collectible/mascot_wolverine",
            CollectibleKind::MascotLion => "collectible/mascot_lion",
            CollectibleKind::MascotHoosier => "collectible/mascot_hoosier",
            CollectibleKind::MascotBadger => "collectible/mascot_badger",
            CollectibleKind::MascotHawkeye => "collectible/mascot_hawkeye",
        }
    }

    pub fn random(rng: &mut SmallRng) -> Self {
        let index = rng.random_range(0..Self::iter().count());
        Self::iter().nth(index).unwrap_or(CollectibleKind::Bottle)
    }
}

/// The five cities the run rotates through, in order.
#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum City {
    #[default]
    Chicago,
    LosAngeles,
    Atlanta,
    Miami,
    Indianapolis,
}

impl City {
    /// City for a rotation index, wrapping past the end of the list.
    pub fn from_rotation(index: usize) -> Self {
        let count = Self::iter().count();
        Self::iter().nth(index % count).unwrap_or_default()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::LosAngeles => "Los Angeles",
            City::Atlanta => "Atlanta",
            City::Miami => "Miami",
            City::Indianapolis => "Indianapolis",
        }
    }
}

/// Scenery elements drawn behind the track. Landmarks belong to a city;
/// fillers show up everywhere.
#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundKind {
    // Chicago
    SearsTower,
    TheBean,
    SkylineChicago,
    // Los Angeles
    HollywoodSign,
    PalmTree,
    // Atlanta
    CnnTower,
    PeachtreeSign,
    // Miami
    ArtDecoBuilding,
    MiamiPalm,
    // Indianapolis
    MonumentCircle,
    SpeedwayGate,
    // Generic fillers
    Tree,
    LampPost,
    BikeRack,
    Bench,
}

impl BackgroundKind {
    pub fn size(&self) -> Vec2 {
        match self {
            BackgroundKind::SearsTower => Vec2::new(80.0, 200.0),
            BackgroundKind::TheBean => Vec2::new(60.0, 40.0),
            BackgroundKind::SkylineChicago => Vec2::new(300.0, 150.0),
            BackgroundKind::HollywoodSign => Vec2::new(180.0, 50.0),
            BackgroundKind::PalmTree => Vec2::new(40.0, 100.0),
            BackgroundKind::CnnTower => Vec2::new(70.0, 140.0),
            BackgroundKind::PeachtreeSign => Vec2::new(50.0, 80.0),
            BackgroundKind::ArtDecoBuilding => Vec2::new(80.0, 120.0),
            BackgroundKind::MiamiPalm => Vec2::new(36.0, 90.0),
            BackgroundKind::MonumentCircle => Vec2::new(60.0, 160.0),
            BackgroundKind::SpeedwayGate => Vec2::new(100.0, 80.0),
            BackgroundKind::Tree => Vec2::new(48.0, 80.0),
            BackgroundKind::LampPost => Vec2::new(16.0, 70.0),
            BackgroundKind::BikeRack => Vec2::new(40.0, 28.0),
            BackgroundKind::Bench => Vec2::new(50.0, 30.0),
        }
    }

    /// The city this landmark belongs to, or `None` for generic fillers.
    pub fn city(&self) -> Option<City> {
        match self {
            BackgroundKind::SearsTower | BackgroundKind::TheBean | BackgroundKind::SkylineChicago => Some(City::Chicago),
            BackgroundKind::HollywoodSign | BackgroundKind::PalmTree => Some(City::LosAngeles),
            BackgroundKind::CnnTower | BackgroundKind::PeachtreeSign => Some(City::Atlanta),
            BackgroundKind::ArtDecoBuilding | BackgroundKind::MiamiPalm => Some(City::Miami),
            BackgroundKind::MonumentCircle | BackgroundKind::SpeedwayGate => Some(City::Indianapolis),
            _ => None,
        }
    }

    pub fn sprite_key(&self) -> &'static str {
        match self {
            BackgroundKind::SearsTower => "background/sears_tower",
            BackgroundKind::TheBean => "background/the_bean",
            BackgroundKind::SkylineChicago => "background/skyline_chicago",
            BackgroundKind::HollywoodSign => "background/hollywood_sign",
            BackgroundKind::PalmTree => "background/palm_tree",
            BackgroundKind::CnnTower => "background/cnn_tower",
            BackgroundKind::PeachtreeSign => "background/peachtree_sign",
            BackgroundKind::ArtDecoBuilding => "background/art_deco_building",
            BackgroundKind::MiamiPalm => "background/miami_palm",
            BackgroundKind::MonumentCircle => "background/monument_circle",
            BackgroundKind::SpeedwayGate => "background/speedway_gate",
            BackgroundKind::Tree => "background/tree",
            BackgroundKind::LampPost => "background/lamp_post",
            BackgroundKind::BikeRack => "background/bike_rack",
            BackgroundKind::Bench => "background/bench",
        }
    }

    /// Picks one of the given city's landmarks about 60% of the time, and a
    /// generic filler otherwise.
    pub fn random_for_city(city: City, rng: &mut SmallRng) -> Self {
        let pool: Vec<BackgroundKind> = if rng.random_bool(0.6) {
            Self::iter().filter(|kind| kind.city() == Some(city)).collect()
        } else {
            Self::iter().filter(|kind| kind.city().is_none()).collect()
        };
        let index = rng.random_range(0..pool.len());
        pool[index]
    }
}
