use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::ops;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// A single cell value: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Lines run down the columns for vertical moves, across the rows otherwise.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Move::Up | Move::Down)
    }

    /// Right and Down lead from the far end of each line.
    #[inline]
    pub fn is_reversed(self) -> bool {
        matches!(self, Move::Right | Move::Down)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            _ => Err(EngineError::UnknownDirection(s.to_string())),
        }
    }
}

/// Square grid of tiles stored row-major, `size * size` cells long.
///
/// The size is fixed at construction. Every cell is 0 or a power of two
/// greater than one; [`Grid::from_cells`] refuses anything else, and the
/// serde representation goes through the same check.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Size used by the game unless the rules say otherwise.
    pub const DEFAULT_SIZE: usize = 4;

    /// An all-empty grid.
    pub fn empty(size: usize) -> Self {
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from explicit row-major cells, checking every invariant.
    ///
    /// ```
    /// use mochi_engine::engine::Grid;
    /// let g = Grid::from_cells(2, vec![2, 0, 0, 4]).unwrap();
    /// assert_eq!(g.count_empty(), 2);
    /// assert!(Grid::from_cells(2, vec![3, 0, 0, 0]).is_err());
    /// ```
    pub fn from_cells(size: usize, cells: Vec<Tile>) -> Result<Self> {
        let grid = Grid { size, cells };
        grid.check()?;
        Ok(grid)
    }

    /// Verify length and cell values.
    pub fn check(&self) -> Result<()> {
        if self.size == 0 {
            return Err(EngineError::InvariantViolation(
                "grid size must be positive".into(),
            ));
        }
        if self.cells.len() != self.size * self.size {
            return Err(EngineError::InvariantViolation(format!(
                "grid of size {} has {} cells, expected {}",
                self.size,
                self.cells.len(),
                self.size * self.size
            )));
        }
        if let Some((idx, &v)) = self
            .cells
            .iter()
            .enumerate()
            .find(|&(_, &v)| !is_valid_tile(v))
        {
            return Err(EngineError::InvariantViolation(format!(
                "cell {idx} holds {v}, which is neither 0 nor a power of two"
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major view of every cell.
    #[inline]
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    /// Return the grid resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use mochi_engine::engine::{Grid, Move};
    /// let g = Grid::from_cells(2, vec![2, 2, 0, 4]).unwrap();
    /// let shifted = g.shift(Move::Left).unwrap();
    /// assert_eq!(shifted.grid.cells(), &[4, 0, 4, 0]);
    /// ```
    #[inline]
    pub fn shift(&self, dir: Move) -> Result<ops::Shifted> {
        ops::shift(self, dir)
    }

    /// Insert a 2 or, with probability `four_probability`, a 4 into a
    /// uniformly chosen empty cell.
    ///
    /// Returns the filled index, or `None` when the grid is full.
    ///
    /// ```
    /// use mochi_engine::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut g = Grid::empty(4);
    /// assert!(g.spawn(&mut rng, 0.1).is_some());
    /// assert_eq!(g.count_empty(), 15);
    /// ```
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, four_probability: f64) -> Option<usize> {
        let empty: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(idx, _)| idx)
            .collect();
        if empty.is_empty() {
            return None;
        }
        let idx = empty[rng.gen_range(0..empty.len())];
        self.cells[idx] = ops::generate_random_tile(rng, four_probability);
        Some(idx)
    }

    /// Count the number of empty cells on the grid.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    #[inline]
    pub fn has_empty_cell(&self) -> bool {
        self.cells.contains(&0)
    }

    /// True if two non-empty neighbours in a row or a column hold the same value.
    pub fn has_adjacent_equal_pair(&self) -> bool {
        let n = self.size;
        for row in 0..n {
            for col in 0..n {
                let v = self.get(row, col);
                if v == 0 {
                    continue;
                }
                if col + 1 < n && self.get(row, col + 1) == v {
                    return true;
                }
                if row + 1 < n && self.get(row + 1, col) == v {
                    return true;
                }
            }
        }
        false
    }

    /// The legality oracle: some direction still changes the grid.
    #[inline]
    pub fn can_move(&self) -> bool {
        self.has_empty_cell() || self.has_adjacent_equal_pair()
    }

    /// Sum of all tile values.
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    /// Highest tile value on the grid, 0 when empty.
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Read line `idx` in grid order: row `idx` for horizontal moves, column `idx` otherwise.
    pub(crate) fn line(&self, idx: usize, vertical: bool) -> Vec<Tile> {
        (0..self.size)
            .map(|j| self.cells[self.line_index(idx, j, vertical)])
            .collect()
    }

    pub(crate) fn set_line(&mut self, idx: usize, vertical: bool, line: &[Tile]) {
        debug_assert_eq!(line.len(), self.size);
        for (j, &v) in line.iter().enumerate() {
            let at = self.line_index(idx, j, vertical);
            self.cells[at] = v;
        }
    }

    #[inline]
    fn line_index(&self, idx: usize, j: usize, vertical: bool) -> usize {
        if vertical {
            j * self.size + idx
        } else {
            idx * self.size + j
        }
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, Tile> {
        self.cells.chunks(self.size.max(1))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::empty(Grid::DEFAULT_SIZE)
    }
}

#[inline]
pub(crate) fn is_valid_tile(v: Tile) -> bool {
    v == 0 || (v >= 2 && v.is_power_of_two())
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({}x{}, {:?})", self.size, self.size, self.cells)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 8);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(ops::format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct GridRepr {
    size: usize,
    cells: Vec<Tile>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = EngineError;

    fn try_from(repr: GridRepr) -> Result<Self> {
        Grid::from_cells(repr.size, repr.cells)
    }
}

impl From<Grid> for GridRepr {
    fn from(g: Grid) -> Self {
        GridRepr {
            size: g.size,
            cells: g.cells,
        }
    }
}
