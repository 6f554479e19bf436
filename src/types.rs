//! Core value types shared by the board and the game flow.
//!
//! Board storage is flat and column-major: `cells[col * rows + row]`, so a
//! single column is one contiguous slice. Row 0 is the top of the board and
//! gravity pulls toward the highest row index.

use serde::{Deserialize, Serialize};

/// Bit-pack (row, col) into a single u32 key for visited sets.
#[inline(always)]
pub fn cell_key(row: usize, col: usize) -> u32 {
    ((row as u32) << 16) | (col as u32)
}

/// A board position. Used both as a coordinate and as a set/map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[inline(always)]
    pub fn key(self) -> u32 {
        cell_key(self.row, self.col)
    }
}

/// The fixed set of tile colors. A board may use only the first N of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileColor {
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
}

impl TileColor {
    pub const ALL: [TileColor; 5] = [
        TileColor::Blue,
        TileColor::Green,
        TileColor::Purple,
        TileColor::Red,
        TileColor::Yellow,
    ];

    /// Numeric code handed to the host renderer (0..=4).
    pub fn code(self) -> i8 {
        match self {
            TileColor::Blue => 0,
            TileColor::Green => 1,
            TileColor::Purple => 2,
            TileColor::Red => 3,
            TileColor::Yellow => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Normal,
    /// Clears its whole row when tapped.
    SuperRow,
    /// Clears its whole column when tapped.
    SuperColumn,
}

impl TileKind {
    #[inline(always)]
    pub fn is_super(self) -> bool {
        self != TileKind::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub color: TileColor,
    pub kind: TileKind,
}

impl Tile {
    pub const fn normal(color: TileColor) -> Self {
        Self {
            color,
            kind: TileKind::Normal,
        }
    }
}

/// One tile's vertical relocation during a collapse.
///
/// `from_row == -1` marks a freshly spawned tile entering at `to_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollapseMove {
    pub from_row: i32,
    pub to_row: usize,
    pub col: usize,
}

impl CollapseMove {
    pub const SPAWN: i32 = -1;

    #[inline(always)]
    pub fn is_spawn(&self) -> bool {
        self.from_row == Self::SPAWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for row in 0..40 {
            for col in 0..40 {
                assert!(seen.insert(Cell::new(row, col).key()));
            }
        }
        assert_eq!(cell_key(1, 0), 1 << 16);
    }

    #[test]
    fn test_color_codes_are_distinct() {
        let codes: Vec<i8> = TileColor::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_spawn_marker() {
        let spawn = CollapseMove { from_row: CollapseMove::SPAWN, to_row: 0, col: 3 };
        let fall = CollapseMove { from_row: 2, to_row: 4, col: 3 };
        assert!(spawn.is_spawn());
        assert!(!fall.is_spawn());
        assert!(TileKind::SuperRow.is_super());
        assert!(!TileKind::default().is_super());
    }
}
