//! Static archetype table: what a `spawn <archetype>` line can name.

pub mod flags;

use glam::{IVec2, Vec2};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::sim::{MovementPolicy, PhysicsScale};
use crate::world::Hitbox;

/// Which intent source a freshly spawned body is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrainKind {
    /// Reads the front-end's `InputCmd`.
    Player,
    /// Back-and-forth walker; `range_tiles` from the spawn column.
    Patrol { range_tiles: i32 },
    Wander,
}

#[derive(Debug)]
pub struct ArchetypeInfo {
    pub id: &'static str,
    /// Nominal sprite size, in tiles.
    pub sprite_tiles: Vec2,
    /// Collision box offset and size as fractions of the sprite.
    pub box_offset: Vec2,
    pub box_extent: Vec2,
    pub policy: MovementPolicy,
    pub brain: BrainKind,
    /// Debug fill colour, `0x00RRGGBB`.
    pub color: u32,
}

impl ArchetypeInfo {
    /// Collision shape for a grid of `unit`-sized tiles.
    pub fn hitbox(&self, unit: i32) -> Hitbox {
        let sprite = (self.sprite_tiles * unit as f32).as_ivec2().max(IVec2::ONE);
        Hitbox {
            sprite,
            offset: self.box_offset,
            extent: self.box_extent,
        }
    }

    /// Movement tuning for a grid of `unit`-sized tiles.  The table values
    /// are tuned for the default scale.
    pub fn policy(&self, unit: i32) -> MovementPolicy {
        self.policy.rescaled(PhysicsScale::default().unit(), unit)
    }
}

pub static ARCHETYPES: &[ArchetypeInfo] = &[
    ArchetypeInfo {
        id: "player",
        sprite_tiles: Vec2::new(1.0, 1.5),
        box_offset: Vec2::new(0.2, 0.1),
        box_extent: Vec2::new(0.6, 0.9),
        policy: MovementPolicy::player(),
        brain: BrainKind::Player,
        color: 0x00F0_C040,
    },
    ArchetypeInfo {
        id: "slime",
        sprite_tiles: Vec2::new(1.0, 1.0),
        box_offset: Vec2::new(0.1, 0.5),
        box_extent: Vec2::new(0.8, 0.5),
        policy: MovementPolicy::slime(),
        brain: BrainKind::Patrol { range_tiles: 12 },
        color: 0x0040_D060,
    },
    ArchetypeInfo {
        id: "wanderer",
        sprite_tiles: Vec2::new(1.0, 1.0),
        box_offset: Vec2::new(0.15, 0.25),
        box_extent: Vec2::new(0.7, 0.75),
        policy: MovementPolicy::wanderer(),
        brain: BrainKind::Wander,
        color: 0x00B0_60E0,
    },
];

static BY_ID: Lazy<HashMap<&'static str, &'static ArchetypeInfo>> =
    Lazy::new(|| ARCHETYPES.iter().map(|info| (info.id, info)).collect());

pub fn by_id(id: &str) -> Option<&'static ArchetypeInfo> {
    BY_ID.get(id).copied()
}
