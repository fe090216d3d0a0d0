//! Room and bodies → [`DrawCall`]s.

use glam::IVec2;
use hecs::World;

use super::{BodySpan, DrawCall, Rgba, ScreenRect, TileSpan};
use crate::sim::{Body, Class};
use crate::world::{Aabb, EMPTY, TileGrid, TileProvider};

const GROUNDED_EDGE: Rgba = 0x00FF_FFFF;
const AIRBORNE_EDGE: Rgba = 0x0060_6060;

/// Fill colour of a stock tile index.
pub fn tile_color(tile: i32) -> Option<Rgba> {
    Some(match tile {
        EMPTY => return None,
        0 => 0x006B_4A2B,  // dirt
        1 => 0x0070_7080,  // wall
        5 => 0x0050_5868,  // ceiling
        9 => 0x00A0_7840,  // platform
        20 => 0x003C_8C3C, // floor
        _ => 0x00FF_00FF,
    })
}

/// Physics units → screen pixels: `px_per_tile` pixels per tile, shifted by
/// `offset` pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub unit: i32,
    pub px_per_tile: i32,
    pub offset: IVec2,
}

impl Viewport {
    /// Largest whole-pixel tile size that fits the grid on screen, centred.
    pub fn fit<G: TileProvider + ?Sized>(
        grid: &G,
        unit: i32,
        screen_w: usize,
        screen_h: usize,
    ) -> Self {
        let (sw, sh) = (screen_w as i32, screen_h as i32);
        let px_per_tile = (sw / grid.width().max(1))
            .min(sh / grid.height().max(1))
            .max(1);
        let offset = IVec2::new(
            (sw - grid.width() * px_per_tile) / 2,
            (sh - grid.height() * px_per_tile) / 2,
        );
        Self {
            unit: unit.max(1),
            px_per_tile,
            offset,
        }
    }

    #[inline]
    pub fn to_screen(&self, p: IVec2) -> IVec2 {
        self.offset + (p * self.px_per_tile).div_euclid(IVec2::splat(self.unit))
    }

    /// Screen rect covering a box; never thinner than one pixel.
    pub fn rect(&self, b: &Aabb) -> ScreenRect {
        let a = self.to_screen(b.min);
        let z = self.to_screen(b.min + b.size);
        ScreenRect::new(a.x, a.y, (z.x - a.x).max(1), (z.y - a.y).max(1))
    }

    pub fn tile_rect(&self, tx: i32, ty: i32) -> ScreenRect {
        let p = self.px_per_tile;
        ScreenRect::new(self.offset.x + tx * p, self.offset.y + ty * p, p, p)
    }
}

/// Append one call per non-empty cell.
pub fn push_tiles(grid: &TileGrid, vp: &Viewport, out: &mut Vec<DrawCall>) {
    for ty in 0..grid.height() {
        for tx in 0..grid.width() {
            let Some(color) = grid.tile(tx, ty).and_then(tile_color) else {
                continue;
            };
            out.push(DrawCall::Tile(TileSpan {
                rect: vp.tile_rect(tx, ty),
                color,
            }));
        }
    }
}

/// Append one call per body, coloured by archetype.
pub fn push_bodies(world: &World, vp: &Viewport, out: &mut Vec<DrawCall>) {
    for (_, (body, class)) in world.query::<(&Body, &Class)>().iter() {
        out.push(DrawCall::Body(BodySpan {
            rect: vp.rect(&body.aabb()),
            fill: class.0.color,
            outline: if body.grounded {
                GROUNDED_EDGE
            } else {
                AIRBORNE_EDGE
            },
        }));
    }
}

/// Rebuild `out` with the whole frame: tiles first, bodies on top.
pub fn fill_scene(grid: &TileGrid, world: &World, vp: &Viewport, out: &mut Vec<DrawCall>) {
    out.clear();
    push_tiles(grid, vp, out);
    push_bodies(world, vp, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::by_id;
    use crate::sim::TicRunner;
    use crate::world::SolidityTable;

    fn grid() -> TileGrid {
        let mut g = TileGrid::new(4, 3, SolidityTable::stock());
        g.fill(0, 2, 3, 2, 20);
        g
    }

    #[test]
    fn fit_centres_grid() {
        let vp = Viewport::fit(&grid(), 16, 100, 60);
        assert_eq!(vp.px_per_tile, 20);
        assert_eq!(vp.offset, IVec2::new(10, 0));
        assert_eq!(vp.tile_rect(1, 2), ScreenRect::new(30, 40, 20, 20));
    }

    #[test]
    fn box_maps_through_unit() {
        let vp = Viewport {
            unit: 16,
            px_per_tile: 32,
            offset: IVec2::ZERO,
        };
        let r = vp.rect(&Aabb::new(IVec2::new(16, 8), IVec2::new(8, 16)));
        assert_eq!(r, ScreenRect::new(32, 16, 16, 32));
        // sub-pixel boxes stay visible
        let tiny = Viewport {
            px_per_tile: 1,
            ..vp
        };
        let r = tiny.rect(&Aabb::new(IVec2::ZERO, IVec2::new(3, 3)));
        assert_eq!((r.w, r.h), (1, 1));
    }

    #[test]
    fn scene_has_tiles_then_bodies() {
        let g = grid();
        let mut sim = TicRunner::default();
        sim.spawn(by_id("player").unwrap(), IVec2::new(16, 0));
        let vp = Viewport::fit(&g, sim.unit(), 64, 48);

        let mut calls = vec![DrawCall::Tile(TileSpan {
            rect: ScreenRect::new(0, 0, 1, 1),
            color: 0,
        })];
        fill_scene(&g, sim.world(), &vp, &mut calls);
        assert_eq!(calls.len(), 5);
        assert!(calls[..4].iter().all(|c| matches!(c, DrawCall::Tile(_))));
        let DrawCall::Body(b) = &calls[4] else {
            panic!("last call should be the body");
        };
        assert_eq!(b.fill, by_id("player").unwrap().color);
        assert_eq!(b.outline, AIRBORNE_EDGE);
    }
}
