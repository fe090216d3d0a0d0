//! Rooms: a tile grid plus the bodies that start in it.
//!
//! The room owns its grid and lends it to the simulation for each tick.

mod layout;

pub use layout::{MAX_ROOM_CELLS, RawLayout, SpawnLine, SpawnRow, glyph_tile, tile_glyph};

use glam::IVec2;
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::info;

use crate::defs::{self, ArchetypeInfo};
use crate::sim::{SpawnError, TicRunner};
use crate::world::{Hitbox, SolidityTable, TileGrid, TileProvider, find_floor_at_x};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum RoomError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    #[error("line {line}: row has {got} tiles, expected {expected}")]
    RowWidth {
        line: usize,
        got: usize,
        expected: usize,
    },

    #[error("line {line}: unknown tile glyph `{glyph}`")]
    UnknownTile { line: usize, glyph: char },

    #[error("line {line}: unknown archetype `{name}`")]
    UnknownArchetype { line: usize, name: String },

    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

/// A spawn directive resolved against the archetype table.
#[derive(Clone, Copy, Debug)]
pub struct SpawnPoint {
    pub archetype: &'static ArchetypeInfo,
    pub tile_x: i32,
    pub row: SpawnRow,
}

#[derive(Clone, Debug)]
pub struct Room {
    name: String,
    grid: TileGrid,
    spawns: Vec<SpawnPoint>,
}

impl Room {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RoomError> {
        let src = fs::read_to_string(path.as_ref())?;
        let room = Self::parse(&src)?;
        info!(
            name = %room.name,
            path = %path.as_ref().display(),
            w = room.grid.width(),
            h = room.grid.height(),
            "room loaded"
        );
        Ok(room)
    }

    pub fn parse(src: &str) -> Result<Self, RoomError> {
        let raw = layout::parse(src)?;
        let spawns = raw
            .spawns
            .iter()
            .map(|s| {
                let archetype =
                    defs::by_id(&s.archetype).ok_or_else(|| RoomError::UnknownArchetype {
                        line: s.line,
                        name: s.archetype.clone(),
                    })?;
                Ok(SpawnPoint {
                    archetype,
                    tile_x: s.tile_x,
                    row: s.row,
                })
            })
            .collect::<Result<Vec<_>, RoomError>>()?;

        let grid = TileGrid::from_cells(raw.width, raw.height, raw.cells, SolidityTable::stock());
        Ok(Self {
            name: raw.name,
            grid,
            spawns,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Mutable grid for between-tick edits (crumbling blocks, switches).
    #[inline]
    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    #[inline]
    pub fn spawns(&self) -> &[SpawnPoint] {
        &self.spawns
    }

    /// Body origin for `spawn`: box centred on the tile column, box bottom on
    /// the bottom edge of the spawn row.
    pub fn spawn_position(&self, spawn: &SpawnPoint, unit: i32) -> IVec2 {
        let row = match spawn.row {
            SpawnRow::Tile(ty) => ty,
            SpawnRow::Floor => find_floor_at_x(&self.grid, spawn.tile_x, unit) / unit,
        };
        place_on_tile(&spawn.archetype.hitbox(unit), spawn.tile_x, row, unit)
    }

    /// Spawn every body of the room into `sim`, checking each placement.
    /// On a rejected placement the bodies already spawned are removed again,
    /// so `sim` is left as it was.
    pub fn populate(&self, sim: &mut TicRunner) -> Result<Vec<hecs::Entity>, RoomError> {
        let unit = sim.unit();
        let mut out = Vec::with_capacity(self.spawns.len());
        for sp in &self.spawns {
            let pos = self.spawn_position(sp, unit);
            match sim.try_spawn(&self.grid, sp.archetype, pos) {
                Ok(e) => out.push(e),
                Err(e) => {
                    for ent in out {
                        let _ = sim.world_mut().despawn(ent);
                    }
                    return Err(e.into());
                }
            }
        }
        info!(room = %self.name, bodies = out.len(), "room populated");
        Ok(out)
    }

    /// Text rendition of the grid, one row per line.
    pub fn to_layout_string(&self) -> String {
        let w = self.grid.width();
        let mut s = String::with_capacity(((w + 1) * self.grid.height()) as usize);
        for row in self.grid.cells().chunks(w as usize) {
            s.extend(row.iter().map(|&t| tile_glyph(t)));
            s.push('\n');
        }
        s
    }
}

/// Origin that puts `hitbox` horizontally centred in column `tx` with its
/// bottom resting on the bottom edge of row `ty`.
pub fn place_on_tile(hitbox: &Hitbox, tx: i32, ty: i32, unit: i32) -> IVec2 {
    let off = hitbox.offset_units();
    let size = hitbox.size_units();
    IVec2::new(
        tx * unit + (unit - size.x) / 2 - off.x,
        (ty + 1) * unit - (off.y + size.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rooms_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/rooms")
    }

    #[test]
    fn shipped_rooms_load_and_populate() {
        for name in ["tower_climb", "forest_left", "meadow"] {
            let room = Room::load(rooms_dir().join(format!("{name}.room"))).unwrap();
            assert_eq!(room.name(), name);
            let mut sim = TicRunner::default();
            let ents = room.populate(&mut sim).expect("valid spawns");
            assert_eq!(ents.len(), room.spawns().len());
            assert!(room.spawns().iter().any(|s| s.archetype.id == "player"));
        }
    }

    #[test]
    fn floor_spawn_rests_on_ground() {
        let room = Room::load(rooms_dir().join("tower_climb.room")).unwrap();
        let unit = 16;
        let player = room
            .spawns()
            .iter()
            .find(|s| s.archetype.id == "player")
            .unwrap();
        let pos = room.spawn_position(player, unit);
        let hb = player.archetype.hitbox(unit);
        let b = hb.resolve(pos);
        // One unit lower would touch the ground.
        let r = crate::sim::Resolver::new(unit);
        assert!(!r.overlaps_solid(room.grid(), &b));
        assert!(r.probe_ground(room.grid(), &hb, pos));
    }

    #[test]
    fn place_on_tile_centres_box() {
        let hb = defs::by_id("player").unwrap().hitbox(16);
        let pos = place_on_tile(&hb, 1, 5, 16);
        assert_eq!(pos, IVec2::new(16, 96 - 23));
        let b = hb.resolve(pos);
        assert_eq!(b.left(), 19);
        assert_eq!(b.bottom(), 95);
    }

    #[test]
    fn unknown_archetype_names_its_line() {
        let err = Room::parse("room r 1x1\ntiles\n.\nspawn dragon 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            RoomError::UnknownArchetype { line: 4, ref name } if name == "dragon"
        ));
    }

    #[test]
    fn spawn_inside_wall_fails_populate() {
        let room = Room::parse("room r 3x3\ntiles\n...\n.W.\n###\nspawn slime 1 1\n").unwrap();
        let mut sim = TicRunner::default();
        let err = room.populate(&mut sim).unwrap_err();
        assert!(matches!(err, RoomError::Spawn(SpawnError::InsideGeometry { .. })));
    }

    #[test]
    fn failed_populate_leaves_no_bodies_behind() {
        let room = Room::parse(
            "room r 3x3\ntiles\n...\n.W.\n###\nspawn slime 0 1\nspawn slime 2 1\nspawn slime 1 1\n",
        )
        .unwrap();
        let mut sim = TicRunner::default();
        let keeper = sim.spawn(defs::by_id("player").unwrap(), IVec2::new(16, 0));
        assert!(room.populate(&mut sim).is_err());
        assert_eq!(sim.world().len(), 1);
        assert!(sim.world().contains(keeper));
    }

    #[test]
    fn load_from_temp_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mini.room");
        fs::write(&path, "room mini 2x2\ntiles\n..\n__\nspawn player 0 floor\n").unwrap();
        let room = Room::load(&path).unwrap();
        assert_eq!(room.to_layout_string(), "..\n__\n");

        let err = Room::load(dir.path().join("nope.room")).unwrap_err();
        assert!(matches!(err, RoomError::Io(_)));
    }

    #[test]
    fn grid_edits_between_ticks_are_seen() {
        let mut room = Room::parse("room r 3x3\ntiles\n...\n...\n###\nspawn slime 1 1\n").unwrap();
        let mut sim = TicRunner::default();
        let ents = room.populate(&mut sim).unwrap();
        for _ in 0..10 {
            sim.tick(room.grid());
        }
        assert!(sim.body(ents[0]).unwrap().grounded);
        room.grid_mut().fill(0, 2, 2, 2, crate::world::EMPTY);
        sim.tick(room.grid());
        assert!(!sim.body(ents[0]).unwrap().grounded);
    }
}
