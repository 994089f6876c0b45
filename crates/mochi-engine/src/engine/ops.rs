use log::debug;
use rand::Rng;

use super::state::{Grid, Move, Tile};
use crate::error::{EngineError, Result};

/// Result of sliding one line toward its leading edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tiles: Vec<Tile>,
    /// Sum of the values produced by merges.
    pub points: u64,
    pub merges: u32,
}

/// Result of sliding the whole grid in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shifted {
    pub grid: Grid,
    pub moved: bool,
    pub points: u64,
    pub merges: u32,
}

impl Shifted {
    /// Sleepiness earned by the merges of this shift alone.
    #[inline]
    pub fn sleepiness(&self, per_merge: u64) -> u64 {
        self.merges as u64 * per_merge
    }
}

/// Compress, merge and pad one line whose index 0 is the leading edge.
///
/// Each pair merges at most once per move: a run of three equal tiles
/// merges the first two and leaves the third alone.
///
/// ```
/// use mochi_engine::engine::transform_line;
/// let line = transform_line(&[2, 2, 2, 0]).unwrap();
/// assert_eq!(line.tiles, vec![4, 2, 0, 0]);
/// assert_eq!(line.points, 4);
/// ```
pub fn transform_line(line: &[Tile]) -> Result<Line> {
    let mut tiles = Vec::with_capacity(line.len());
    let mut points = 0u64;
    let mut merges = 0u32;

    let mut compacted = line.iter().copied().filter(|&t| t != 0).peekable();
    while let Some(tile) = compacted.next() {
        if compacted.peek() == Some(&tile) {
            compacted.next();
            let merged = tile.checked_mul(2).ok_or_else(|| {
                EngineError::InvariantViolation(format!("merging two {tile} tiles overflows"))
            })?;
            points += merged as u64;
            merges += 1;
            tiles.push(merged);
        } else {
            tiles.push(tile);
        }
    }
    tiles.resize(line.len(), 0);

    Ok(Line {
        tiles,
        points,
        merges,
    })
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn shift(grid: &Grid, direction: Move) -> Result<Shifted> {
    let vertical = direction.is_vertical();
    let reversed = direction.is_reversed();
    let mut next = grid.clone();
    let mut points = 0;
    let mut merges = 0;

    for idx in 0..grid.size() {
        let mut line = grid.line(idx, vertical);
        if reversed {
            line.reverse();
        }
        let mut out = transform_line(&line)?;
        if reversed {
            out.tiles.reverse();
        }
        next.set_line(idx, vertical, &out.tiles);
        points += out.points;
        merges += out.merges;
    }

    let moved = next != *grid;
    debug!("shift {direction}: moved={moved} merges={merges} points={points}");
    Ok(Shifted {
        grid: next,
        moved,
        points,
        merges,
    })
}

/// True if no move in any direction changes the grid.
pub fn is_game_over(grid: &Grid) -> bool {
    !grid.can_move()
}

/// Brute-force legality: try every direction.
///
/// Agrees with [`Grid::can_move`]; kept for callers that want the
/// per-direction answer.
pub fn legal_moves(grid: &Grid) -> Result<Vec<Move>> {
    let mut legal = Vec::with_capacity(4);
    for direction in Move::ALL {
        if shift(grid, direction)?.moved {
            legal.push(direction);
        }
    }
    Ok(legal)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R, four_probability: f64) -> Tile {
    if rng.gen_bool(four_probability) { 4 } else { 2 }
}

pub(crate) fn format_val(val: &Tile) -> String {
    match val {
        0 => String::from("       "),
        &x => {
            let mut x = x.to_string();
            while x.len() < 7 {
                match x.len() {
                    6 => x = format!(" {}", x),
                    _ => x = format!(" {} ", x),
                }
            }
            x
        }
    }
}
