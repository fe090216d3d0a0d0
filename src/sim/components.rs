use glam::IVec2;

use super::intent::{BodyView, InputCmd, IntentSource};
use crate::defs::ArchetypeInfo;
use crate::defs::flags::Contacts;
use crate::world::{Aabb, Hitbox};

/// Kinematic state of one body, in integer physics units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Sprite origin (top-left); the collision box hangs off it.
    pub pos: IVec2,
    pub vel: IVec2,
    pub grounded: bool,
    /// Contacts of the last tick.
    pub contacts: Contacts,
    pub hitbox: Hitbox,
}

impl Body {
    /// Fresh body: zero velocity, not grounded.
    pub fn new(pos: IVec2, hitbox: Hitbox) -> Self {
        Self {
            pos,
            vel: IVec2::ZERO,
            grounded: false,
            contacts: Contacts::empty(),
            hitbox,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.hitbox.resolve(self.pos)
    }

    /// Put the body back at `pos` with all motion cleared.
    pub fn reset(&mut self, pos: IVec2) {
        *self = Self::new(pos, self.hitbox);
    }

    pub fn view(&self, spawn: IVec2, input: InputCmd) -> BodyView {
        BodyView {
            pos: self.pos,
            vel: self.vel,
            grounded: self.grounded,
            contacts: self.contacts,
            spawn,
            input,
        }
    }
}

/// Where the body entered the room; the respawn target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn(pub IVec2);

#[derive(Debug, Copy, Clone)]
pub struct Class(pub &'static ArchetypeInfo);

/// The body's intent source.
pub struct Brain(pub Box<dyn IntentSource>);

impl Brain {
    pub fn new<S: IntentSource + 'static>(source: S) -> Self {
        Self(Box::new(source))
    }
}

impl std::fmt::Debug for Brain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Brain(..)")
    }
}
