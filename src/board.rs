//! The tile grid: generation, flood-fill grouping, removal, gravity collapse,
//! shuffle, swap and deadlock detection.
//!
//! Every query treats out-of-range coordinates as "no tile", so flood fill and
//! neighbor checks never have to special-case the border.

use std::collections::HashSet;

use log::trace;

use crate::error::ConfigError;
use crate::rng::GameRng;
use crate::types::{Cell, CollapseMove, Tile, TileKind};

pub struct Board {
    rows: usize,
    cols: usize,
    color_count: usize,
    /// Column-major: `cells[col * rows + row]`.
    cells: Vec<Option<Tile>>,
    rng: GameRng,
}

impl Board {
    /// Fill a `rows x cols` board with uniformly random normal tiles.
    ///
    /// No attempt is made to avoid ready-made groups.
    pub fn new(rows: usize, cols: usize, color_count: usize, mut rng: GameRng) -> Self {
        let cells = (0..rows * cols)
            .map(|_| Some(Tile::normal(rng.color(color_count))))
            .collect();
        Self {
            rows,
            cols,
            color_count,
            cells,
            rng,
        }
    }

    /// Build a board from an explicit row-major layout. Refills still draw from `rng`.
    pub fn from_rows(
        layout: Vec<Vec<Option<Tile>>>,
        color_count: usize,
        rng: GameRng,
    ) -> Result<Self, ConfigError> {
        let rows = layout.len();
        let cols = layout.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(ConfigError::Validation("board layout must not be empty".into()));
        }
        if layout.iter().any(|r| r.len() != cols) {
            return Err(ConfigError::Validation(format!(
                "board layout rows must all have {cols} columns"
            )));
        }

        let mut cells = vec![None; rows * cols];
        for (row, line) in layout.into_iter().enumerate() {
            for (col, slot) in line.into_iter().enumerate() {
                cells[col * rows + row] = slot;
            }
        }
        Ok(Self {
            rows,
            cols,
            color_count,
            cells,
            rng,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline(always)]
    fn idx(&self, row: usize, col: usize) -> usize {
        col * self.rows + row
    }

    /// The tile at `(row, col)`, or `None` when empty or out of range.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if !self.in_bounds(row, col) {
            return None;
        }
        self.cells[self.idx(row, col)]
    }

    #[inline(always)]
    pub fn tile_at(&self, cell: Cell) -> Option<Tile> {
        self.get(cell.row, cell.col)
    }

    /// Change the kind of the tile at `(row, col)` in place.
    ///
    /// Returns `false` and leaves the board untouched when the cell is empty.
    pub fn set_kind(&mut self, row: usize, col: usize, kind: TileKind) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }
        let idx = self.idx(row, col);
        match self.cells[idx].as_mut() {
            Some(tile) => {
                tile.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Maximal 4-connected same-color component containing the seed.
    ///
    /// Iterative, with an explicit stack. Returns an empty list for an empty
    /// or out-of-range seed; a lone tile yields a one-cell group.
    pub fn find_group(&self, row: usize, col: usize) -> Vec<Cell> {
        let Some(target) = self.get(row, col) else {
            return Vec::new();
        };

        let mut visited: HashSet<u32> = HashSet::new();
        let mut stack = vec![Cell::new(row, col)];
        let mut group = Vec::new();

        while let Some(cell) = stack.pop() {
            if !visited.insert(cell.key()) {
                continue;
            }
            match self.tile_at(cell) {
                Some(tile) if tile.color == target.color => {}
                _ => continue,
            }
            group.push(cell);

            for next in self.neighbors(cell) {
                if !visited.contains(&next.key()) {
                    stack.push(next);
                }
            }
        }

        group
    }

    /// In-bounds 4-directional neighbors of `cell`.
    fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let Cell { row, col } = cell;
        [
            row.checked_add(1).map(|r| Cell::new(r, col)),
            row.checked_sub(1).map(|r| Cell::new(r, col)),
            col.checked_add(1).map(|c| Cell::new(row, c)),
            col.checked_sub(1).map(|c| Cell::new(row, c)),
        ]
        .into_iter()
        .flatten()
        .filter(move |c| self.in_bounds(c.row, c.col))
    }

    /// Occupied cells in the square of Chebyshev `radius` around `(row, col)`,
    /// clipped to the board.
    pub fn cells_in_radius(&self, row: usize, col: usize, radius: usize) -> Vec<Cell> {
        let mut result = Vec::new();
        if self.rows == 0 || self.cols == 0 {
            return result;
        }
        let r_end = row.saturating_add(radius).min(self.rows - 1);
        let c_end = col.saturating_add(radius).min(self.cols - 1);
        for r in row.saturating_sub(radius)..=r_end {
            for c in col.saturating_sub(radius)..=c_end {
                if self.get(r, c).is_some() {
                    result.push(Cell::new(r, c));
                }
            }
        }
        result
    }

    /// Occupied cells of one row, left to right.
    pub fn row_cells(&self, row: usize) -> Vec<Cell> {
        (0..self.cols)
            .filter(|&c| self.get(row, c).is_some())
            .map(|c| Cell::new(row, c))
            .collect()
    }

    /// Occupied cells of one column, top to bottom.
    pub fn column_cells(&self, col: usize) -> Vec<Cell> {
        (0..self.rows)
            .filter(|&r| self.get(r, col).is_some())
            .map(|r| Cell::new(r, col))
            .collect()
    }

    /// Empty every listed cell. Empty or out-of-range cells are skipped.
    pub fn remove(&mut self, cells: &[Cell]) {
        for &cell in cells {
            if self.in_bounds(cell.row, cell.col) {
                let idx = self.idx(cell.row, cell.col);
                self.cells[idx] = None;
            }
        }
    }

    /// Apply gravity to every column and refill the vacated top cells.
    ///
    /// Moves are grouped by column in ascending order. Within a column the
    /// relocations come bottom-up, followed by the spawns from the gap
    /// boundary up to row 0. Tiles that stay put produce no move.
    pub fn collapse(&mut self) -> Vec<CollapseMove> {
        let rows = self.rows;
        let color_count = self.color_count;
        let mut moves = Vec::new();

        for (col, column) in self.cells.chunks_mut(rows.max(1)).enumerate() {
            // `write` is one past the next settled slot.
            let mut write = rows;
            for row in (0..rows).rev() {
                let Some(tile) = column[row].take() else {
                    continue;
                };
                write -= 1;
                column[write] = Some(tile);
                if write != row {
                    moves.push(CollapseMove {
                        from_row: row as i32,
                        to_row: write,
                        col,
                    });
                }
            }
            for row in (0..write).rev() {
                column[row] = Some(Tile::normal(self.rng.color(color_count)));
                moves.push(CollapseMove {
                    from_row: CollapseMove::SPAWN,
                    to_row: row,
                    col,
                });
            }
        }

        trace!(
            "collapse: {} moves, {} spawned",
            moves.len(),
            moves.iter().filter(|m| m.is_spawn()).count()
        );
        moves
    }

    /// True iff some normal tile has a same-color normal neighbor to its right
    /// or below. Super tiles neither create nor block a move.
    pub fn has_available_moves(&self) -> bool {
        let normal = |row: usize, col: usize| self.get(row, col).filter(|t| !t.kind.is_super());

        for row in 0..self.rows {
            for col in 0..self.cols {
                let Some(tile) = normal(row, col) else {
                    continue;
                };
                if normal(row, col + 1).is_some_and(|t| t.color == tile.color) {
                    return true;
                }
                if normal(row + 1, col).is_some_and(|t| t.color == tile.color) {
                    return true;
                }
            }
        }
        false
    }

    /// Permute the slots in place: every cell, from the last to the first, is
    /// swapped with a uniformly chosen cell. Tiles keep their color and kind.
    pub fn shuffle(&mut self) {
        let len = self.cells.len();
        for i in (0..len).rev() {
            let j = self.rng.gen_range(len);
            self.cells.swap(i, j);
        }
    }

    /// Exchange the contents of two cells. Out-of-range cells make it a no-op.
    pub fn swap(&mut self, a: Cell, b: Cell) {
        if !self.in_bounds(a.row, a.col) || !self.in_bounds(b.row, b.col) {
            return;
        }
        let (ia, ib) = (self.idx(a.row, a.col), self.idx(b.row, b.col));
        self.cells.swap(ia, ib);
    }

    /// Flat column-major color codes for the host: -1 for empty cells.
    pub fn snapshot(&self) -> Vec<i8> {
        self.cells
            .iter()
            .map(|slot| slot.map_or(-1, |t| t.color.code()))
            .collect()
    }

    /// Coin flip between the two super kinds.
    pub(crate) fn roll_super_kind(&mut self) -> TileKind {
        if self.rng.coin() {
            TileKind::SuperRow
        } else {
            TileKind::SuperColumn
        }
    }
}

/// Parse a compact row-major layout: `b g p r y` for colors, `.` for empty.
#[cfg(test)]
pub(crate) fn parse_layout(lines: &[&str]) -> Vec<Vec<Option<Tile>>> {
    use crate::types::TileColor;

    lines
        .iter()
        .map(|line| {
            line.chars()
                .filter(|ch| !ch.is_whitespace())
                .map(|ch| {
                    let color = match ch {
                        'b' => TileColor::Blue,
                        'g' => TileColor::Green,
                        'p' => TileColor::Purple,
                        'r' => TileColor::Red,
                        'y' => TileColor::Yellow,
                        '.' => return None,
                        other => panic!("unknown layout char {other:?}"),
                    };
                    Some(Tile::normal(color))
                })
                .collect()
        })
        .collect()
}
