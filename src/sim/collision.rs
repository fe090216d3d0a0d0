//! Axis-separated swept collision against a tile grid.
//!
//! A proposed displacement is never applied in one leap.  It is walked in
//! steps of a quarter tile (at least one unit), each step checked against
//! every cell the moved box overlaps.  The first rejected step ends the move;
//! the body is then settled flush inside that step by bisection.

use glam::IVec2;
use thiserror::Error;
use tracing::trace;

use crate::world::{Aabb, Hitbox, TileProvider};

/// Collision steps per tile.
const STEPS_PER_UNIT: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn unit_vec(self) -> IVec2 {
        match self {
            Axis::X => IVec2::X,
            Axis::Y => IVec2::Y,
        }
    }
}

/// What one axis move produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisMove {
    /// Displacement actually committed (same sign as requested, or 0).
    pub moved: i32,
    /// A step was rejected by solid geometry.
    pub blocked: bool,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpawnError {
    #[error("spawn at {pos} overlaps solid geometry")]
    InsideGeometry { pos: IVec2 },
}

/// Stateless resolver bound to one physics unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolver {
    unit: i32,
    step: i32,
}

impl Resolver {
    pub fn new(unit: i32) -> Self {
        let unit = unit.max(1);
        Self {
            unit,
            step: (unit / STEPS_PER_UNIT).max(1),
        }
    }

    #[inline]
    pub fn unit(&self) -> i32 {
        self.unit
    }

    #[inline]
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Does `b` overlap any solid cell?
    pub fn overlaps_solid<G: TileProvider + ?Sized>(&self, grid: &G, b: &Aabb) -> bool {
        let (first, last) = b.cell_span(self.unit);
        let w = grid.width();
        let h = grid.height();

        // Only the in-grid part of the span can be solid.
        let x0 = first.x.max(0);
        let x1 = last.x.min(w - 1);
        let y0 = first.y.max(0);
        let y1 = last.y.min(h - 1);

        for y in y0..=y1 {
            let row = y as usize * w as usize;
            for x in x0..=x1 {
                if grid.is_solid_at_flat_index(row + x as usize) {
                    return true;
                }
            }
        }
        false
    }

    /// Move `pos` by `delta` along `axis`, stopping flush at the first solid
    /// cell.  A box that starts embedded stays where it is.
    pub fn move_axis<G: TileProvider + ?Sized>(
        &self,
        grid: &G,
        hitbox: &Hitbox,
        pos: &mut IVec2,
        axis: Axis,
        delta: i32,
    ) -> AxisMove {
        let dir = axis.unit_vec() * delta.signum();
        let mut remaining = delta.abs();
        let mut out = AxisMove::default();

        while remaining > 0 {
            let stride = remaining.min(self.step);
            let candidate = *pos + dir * stride;

            if !self.overlaps_solid(grid, &hitbox.resolve(candidate)) {
                *pos = candidate;
                remaining -= stride;
                out.moved += stride;
                continue;
            }

            // Rejected: largest free offset in [0, stride).
            let mut free = 0;
            let mut hit = stride;
            while hit - free > 1 {
                let mid = (free + hit) / 2;
                if self.overlaps_solid(grid, &hitbox.resolve(*pos + dir * mid)) {
                    hit = mid;
                } else {
                    free = mid;
                }
            }
            *pos += dir * free;
            out.moved += free;
            out.blocked = true;
            trace!(?axis, delta, moved = out.moved, "axis blocked");
            break;
        }

        out.moved *= delta.signum();
        out
    }

    /// Is there solid ground one unit below the box?
    #[inline]
    pub fn probe_ground<G: TileProvider + ?Sized>(
        &self,
        grid: &G,
        hitbox: &Hitbox,
        pos: IVec2,
    ) -> bool {
        self.overlaps_solid(grid, &hitbox.resolve(pos + IVec2::Y))
    }
}

/// Reject a placement whose box already overlaps solid geometry.  The
/// resolver never ejects embedded bodies, so spawn points are checked here.
pub fn check_spawn<G: TileProvider + ?Sized>(
    grid: &G,
    hitbox: &Hitbox,
    pos: IVec2,
    unit: i32,
) -> Result<(), SpawnError> {
    if Resolver::new(unit).overlaps_solid(grid, &hitbox.resolve(pos)) {
        return Err(SpawnError::InsideGeometry { pos });
    }
    Ok(())
}
