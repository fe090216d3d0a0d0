//! Text room layouts.
//!
//! ```text
//! // comment
//! room tower_climb 10x8
//! tiles
//! ....==....
//! ...
//! spawn player 1 floor
//! spawn slime 6 5
//! ```
//!
//! `tiles` is followed by exactly `H` rows of `W` glyphs.  Blank lines and
//! `//` comments are allowed anywhere outside the tile block.

use once_cell::sync::Lazy;
use regex::Regex;

use super::RoomError;
use crate::world::EMPTY;

/// Glyph → tile index of the stock tile set.
pub fn glyph_tile(c: char) -> Option<i32> {
    Some(match c {
        '.' => EMPTY,
        '#' => 0,  // dirt
        'W' => 1,  // wall
        'C' => 5,  // ceiling
        '=' => 9,  // platform
        '_' => 20, // floor
        _ => return None,
    })
}

/// Inverse of [`glyph_tile`]; unknown indices print as `?`.
pub fn tile_glyph(tile: i32) -> char {
    match tile {
        EMPTY => '.',
        0 => '#',
        1 => 'W',
        5 => 'C',
        9 => '=',
        20 => '_',
        _ => '?',
    }
}

/// Row of a spawn directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnRow {
    Tile(i32),
    /// First air cell above solid ground in the spawn column.
    Floor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnLine {
    pub archetype: String,
    pub tile_x: i32,
    pub row: SpawnRow,
    pub line: usize,
}

/// Parsed but not yet validated against the archetype table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLayout {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub cells: Vec<i32>,
    pub spawns: Vec<SpawnLine>,
}

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^room\s+([A-Za-z0-9_\-]+)\s+(\d+)x(\d+)$").unwrap());
static SPAWN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^spawn\s+([a-z_]+)\s+(-?\d+)\s+(-?\d+|floor)$").unwrap());

/// Largest room a layout file may declare, in cells.
pub const MAX_ROOM_CELLS: i64 = 1 << 20;

fn syntax(line: usize, msg: impl Into<String>) -> RoomError {
    RoomError::Syntax {
        line,
        msg: msg.into(),
    }
}

fn number(line: usize, s: &str) -> Result<i32, RoomError> {
    s.parse()
        .map_err(|_| syntax(line, format!("`{s}` is not a valid number")))
}

pub fn parse(src: &str) -> Result<RawLayout, RoomError> {
    let mut header: Option<(String, i32, i32)> = None;
    let mut cells: Option<Vec<i32>> = None;
    let mut spawns = Vec::new();

    let mut lines = src.lines().enumerate().map(|(i, l)| (i + 1, l));
    while let Some((no, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(c) = HEADER.captures(line) {
            if header.is_some() {
                return Err(syntax(no, "duplicate `room` header"));
            }
            let (w, h) = (number(no, &c[2])?, number(no, &c[3])?);
            if w == 0 || h == 0 {
                return Err(syntax(no, "room must be at least 1x1"));
            }
            if w as i64 * h as i64 > MAX_ROOM_CELLS {
                return Err(syntax(no, format!("room too large ({w}x{h} cells)")));
            }
            header = Some((c[1].to_owned(), w, h));
        } else if line == "tiles" {
            let Some((_, w, h)) = header else {
                return Err(syntax(no, "`tiles` before `room` header"));
            };
            if cells.is_some() {
                return Err(syntax(no, "duplicate `tiles` block"));
            }
            let mut grid = Vec::with_capacity(w as usize * h as usize);
            for _ in 0..h {
                let Some((row_no, row)) = lines.next() else {
                    return Err(syntax(no, format!("expected {h} tile rows")));
                };
                let row = row.trim();
                let got = row.chars().count();
                if got != w as usize {
                    return Err(RoomError::RowWidth {
                        line: row_no,
                        got,
                        expected: w as usize,
                    });
                }
                for glyph in row.chars() {
                    let tile = glyph_tile(glyph).ok_or(RoomError::UnknownTile {
                        line: row_no,
                        glyph,
                    })?;
                    grid.push(tile);
                }
            }
            cells = Some(grid);
        } else if let Some(c) = SPAWN.captures(line) {
            let row = match &c[3] {
                "floor" => SpawnRow::Floor,
                n => SpawnRow::Tile(number(no, n)?),
            };
            spawns.push(SpawnLine {
                archetype: c[1].to_owned(),
                tile_x: number(no, &c[2])?,
                row,
                line: no,
            });
        } else {
            return Err(syntax(no, format!("unrecognised directive `{line}`")));
        }
    }

    let (name, width, height) = header.ok_or_else(|| syntax(0, "missing `room` header"))?;
    let cells = cells.ok_or_else(|| syntax(0, "missing `tiles` block"))?;
    Ok(RawLayout {
        name,
        width,
        height,
        cells,
        spawns,
    })
}
