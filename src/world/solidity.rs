//! Tile index → solidity lookup.
//!
//! The kernel never asks "is tile 7 a wall?" at a call site; it asks a
//! [`SolidityTable`].  Rooms built from other tile sets bring their own table.

use once_cell::sync::Lazy;

/// Tile index for an empty cell.
pub const EMPTY: i32 = -1;

/// Highest index of the stock tile set that blocks movement.
const STOCK_LAST_SOLID: i32 = 23;

static STOCK: Lazy<SolidityTable> =
    Lazy::new(|| SolidityTable::from_solid_indices(0..=STOCK_LAST_SOLID));

/// Dense table indexed by non-negative tile index.  Negative and
/// out-of-table indices are non-solid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolidityTable {
    solid: Vec<bool>,
}

impl SolidityTable {
    /// Stock tile set: dirt (0), walls/corners/ceilings (1‥8), platforms
    /// (9‥15), inner corners (16‥19), floors (20‥21), extra walls (22‥23).
    pub fn stock() -> Self {
        STOCK.clone()
    }

    pub fn from_solid_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let mut table = Self::default();
        for idx in indices {
            table.set(idx, true);
        }
        table
    }

    pub fn set(&mut self, index: i32, solid: bool) {
        let Ok(i) = usize::try_from(index) else {
            return; // negative indices are always open
        };
        if i >= self.solid.len() {
            if !solid {
                return;
            }
            self.solid.resize(i + 1, false);
        }
        self.solid[i] = solid;
    }

    #[inline]
    pub fn is_solid(&self, index: i32) -> bool {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.solid.get(i).copied())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_table_matches_tile_set() {
        let t = SolidityTable::stock();
        assert!(!t.is_solid(EMPTY));
        for idx in 0..=23 {
            assert!(t.is_solid(idx), "tile {idx} should be solid");
        }
        assert!(!t.is_solid(24));
        assert!(!t.is_solid(1_000));
    }

    #[test]
    fn negative_indices_cannot_be_made_solid() {
        let mut t = SolidityTable::default();
        t.set(-5, true);
        assert!(!t.is_solid(-5));
    }

    #[test]
    fn clearing_shrinks_nothing_and_stays_total() {
        let mut t = SolidityTable::from_solid_indices([3]);
        t.set(3, false);
        t.set(40, false);
        assert!(!t.is_solid(3));
        assert!(!t.is_solid(40));
    }
}
