use super::solidity::{EMPTY, SolidityTable};

/// Anything the collision kernel can query for solid cells.
///
/// Room representations (layout files, editor maps, procedurally generated
/// grids) only need these three methods.
pub trait TileProvider {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Solidity of cell `i = y*width + x`.  Indices outside the grid are open.
    fn is_solid_at_flat_index(&self, i: usize) -> bool;

    /// Cells outside `[0,width) × [0,height)` are **open**, not solid:
    /// bodies may fall out of the world and are caught by the respawn pass.
    #[inline]
    fn is_solid_at(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return false;
        }
        self.is_solid_at_flat_index(y as usize * self.width() as usize + x as usize)
    }
}

/// Row-major grid of tile indices with a cached solid mask.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: i32,
    height: i32,
    cells: Vec<i32>,
    table: SolidityTable,
    solid: Vec<bool>,
}

impl TileGrid {
    /// Number of cells in a `width × height` grid, `None` if it does not fit
    /// in memory indices.  Negative sides count as zero.
    pub fn cell_count(width: i32, height: i32) -> Option<usize> {
        (width.max(0) as usize).checked_mul(height.max(0) as usize)
    }

    /// Empty grid of `width × height` cells.
    ///
    /// # Panics
    /// If the cell count overflows `usize`.
    pub fn new(width: i32, height: i32, table: SolidityTable) -> Self {
        let Some(len) = Self::cell_count(width, height) else {
            panic!("{width}x{height} grid is too large");
        };
        Self::from_cells(width, height, vec![EMPTY; len], table)
    }

    /// Build from an existing cell vector.
    ///
    /// # Panics
    /// If `cells.len() != width * height`.
    pub fn from_cells(width: i32, height: i32, cells: Vec<i32>, table: SolidityTable) -> Self {
        assert_eq!(
            Some(cells.len()),
            Self::cell_count(width, height),
            "cell vector does not match {width}x{height}"
        );
        let solid = cells.iter().map(|&c| table.is_solid(c)).collect();
        Self {
            width,
            height,
            cells,
            table,
            solid,
        }
    }

    #[inline]
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Tile index at `(x, y)`, `None` outside the grid.
    pub fn tile(&self, x: i32, y: i32) -> Option<i32> {
        self.flat(x, y).map(|i| self.cells[i])
    }

    /// Replace one cell.  Only the room owner calls this, and only between
    /// ticks.  Returns `false` when `(x, y)` is outside the grid.
    pub fn set_tile(&mut self, x: i32, y: i32, index: i32) -> bool {
        let Some(i) = self.flat(x, y) else {
            return false;
        };
        self.cells[i] = index;
        self.solid[i] = self.table.is_solid(index);
        true
    }

    /// Fill the rectangle `[x0, x1] × [y0, y1]` (inclusive, clipped).
    pub fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, index: i32) {
        for y in y0.max(0)..=y1.min(self.height - 1) {
            for x in x0.max(0)..=x1.min(self.width - 1) {
                self.set_tile(x, y, index);
            }
        }
    }

    #[inline]
    fn flat(&self, x: i32, y: i32) -> Option<usize> {
        ((0..self.width).contains(&x) && (0..self.height).contains(&y))
            .then(|| y as usize * self.width as usize + x as usize)
    }
}

impl TileProvider for TileGrid {
    #[inline]
    fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn is_solid_at_flat_index(&self, i: usize) -> bool {
        self.solid.get(i).copied().unwrap_or(false)
    }
}

/// First air row directly above solid ground in column `tile_x`, returned as
/// a physics-unit y.  The column is clamped into the grid; a column without
/// any floor yields the second-to-last row.
pub fn find_floor_at_x<G: TileProvider + ?Sized>(grid: &G, tile_x: i32, unit: i32) -> i32 {
    let w = grid.width();
    let h = grid.height();
    if w <= 0 || h <= 0 {
        return 0;
    }
    let x = tile_x.clamp(0, w - 1);

    for y in 0..h - 1 {
        if !grid.is_solid_at(x, y) && grid.is_solid_at(x, y + 1) {
            return y * unit;
        }
    }
    (h - 2).max(0) * unit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_row(w: i32, h: i32) -> TileGrid {
        let mut g = TileGrid::new(w, h, SolidityTable::stock());
        g.fill(0, h - 1, w - 1, h - 1, 0);
        g
    }

    #[test]
    fn out_of_range_is_open() {
        let g = ground_row(10, 8);
        assert!(g.is_solid_at(3, 7));
        assert!(!g.is_solid_at(-1, 7));
        assert!(!g.is_solid_at(10, 7));
        assert!(!g.is_solid_at(3, 8));
        assert!(!g.is_solid_at_flat_index(10 * 8));
    }

    #[test]
    fn flat_index_agrees_with_xy() {
        let mut g = ground_row(10, 8);
        g.set_tile(4, 2, 9);
        for y in 0..8 {
            for x in 0..10 {
                assert_eq!(
                    g.is_solid_at(x, y),
                    g.is_solid_at_flat_index((y * 10 + x) as usize)
                );
            }
        }
        assert!(g.is_solid_at(4, 2));
    }

    #[test]
    fn set_tile_updates_mask_and_rejects_outside() {
        let mut g = ground_row(4, 4);
        assert!(g.set_tile(1, 3, EMPTY));
        assert!(!g.is_solid_at(1, 3));
        assert!(!g.set_tile(9, 9, 0));
        assert_eq!(g.tile(1, 3), Some(EMPTY));
        assert_eq!(g.tile(9, 9), None);
    }

    #[test]
    fn cell_count_does_not_wrap() {
        assert_eq!(TileGrid::cell_count(3, 2), Some(6));
        assert_eq!(TileGrid::cell_count(-3, 2), Some(0));
        // 70000² overflows i32 but is a plain usize product
        assert_eq!(TileGrid::cell_count(70_000, 70_000), Some(4_900_000_000));
    }

    #[test]
    #[should_panic]
    fn mismatched_cells_panic() {
        TileGrid::from_cells(3, 3, vec![EMPTY; 8], SolidityTable::stock());
    }

    #[test]
    fn floor_search_finds_air_above_ground() {
        let mut g = ground_row(10, 8);
        g.set_tile(2, 4, 9);
        assert_eq!(find_floor_at_x(&g, 2, 16), 3 * 16);
        assert_eq!(find_floor_at_x(&g, 5, 16), 6 * 16);
        // clamped column
        assert_eq!(find_floor_at_x(&g, 99, 16), 6 * 16);
    }

    #[test]
    fn floor_search_without_floor_falls_back() {
        let g = TileGrid::new(5, 5, SolidityTable::stock());
        assert_eq!(find_floor_at_x(&g, 0, 10), 30);
    }
}
