use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned box in physics units.  `min` is the top-left corner, `size`
/// is exclusive (a box at x=0 with width 16 occupies units 0‥=15).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aabb {
    pub min: IVec2,
    pub size: IVec2,
}

impl Aabb {
    #[inline]
    pub fn new(min: IVec2, size: IVec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.min.y
    }

    /// Last occupied unit column.
    #[inline]
    pub fn right(&self) -> i32 {
        self.min.x + self.size.x - 1
    }

    /// Last occupied unit row.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.min.y + self.size.y - 1
    }

    /// Inclusive cell range `(first, last)` overlapped by the box, for a grid
    /// whose cells are `unit` physics units wide.  Floors toward −∞ so boxes
    /// left of / above the origin map to negative cells.
    #[inline]
    pub fn cell_span(&self, unit: i32) -> (IVec2, IVec2) {
        let first = IVec2::new(self.left().div_euclid(unit), self.top().div_euclid(unit));
        let last = IVec2::new(
            self.right().div_euclid(unit),
            self.bottom().div_euclid(unit),
        );
        (first, last)
    }
}

/// Collision-box shape relative to a nominal sprite box.
///
/// `sprite` is in physics units; `offset` and `extent` are fractions of the
/// sprite width/height.  Resolution to an absolute [`Aabb`] happens at query
/// time so a re-scaled sprite never leaves a stale box behind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub sprite: IVec2,
    pub offset: Vec2,
    pub extent: Vec2,
}

impl Hitbox {
    /// Box covering the whole sprite.
    pub const fn full(sprite: IVec2) -> Self {
        Self {
            sprite,
            offset: Vec2::ZERO,
            extent: Vec2::ONE,
        }
    }

    /// Offset of the box from the body position, in physics units.
    #[inline]
    pub fn offset_units(&self) -> IVec2 {
        IVec2::new(
            (self.sprite.x as f32 * self.offset.x) as i32,
            (self.sprite.y as f32 * self.offset.y) as i32,
        )
    }

    /// Box size in physics units (never below 1×1).
    #[inline]
    pub fn size_units(&self) -> IVec2 {
        IVec2::new(
            ((self.sprite.x as f32 * self.extent.x) as i32).max(1),
            ((self.sprite.y as f32 * self.extent.y) as i32).max(1),
        )
    }

    /// Absolute box for a body whose sprite origin sits at `pos`.
    #[inline]
    pub fn resolve(&self, pos: IVec2) -> Aabb {
        Aabb::new(pos + self.offset_units(), self.size_units())
    }
}
