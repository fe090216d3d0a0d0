mod geometry;
mod grid;
mod solidity;

pub use geometry::{Aabb, Hitbox};
pub use grid::{TileGrid, TileProvider, find_floor_at_x};
pub use solidity::{EMPTY, SolidityTable};
