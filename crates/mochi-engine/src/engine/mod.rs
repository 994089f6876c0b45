//! Engine module: the square tile grid, the line transform and the
//! four-direction move built on it.
//!
//! - `Grid` is the row-major state with occupancy and legality queries.
//! - `transform_line` is the pure compress/merge/pad step for one line.
//! - `shift` applies it to every row or column and reports what changed.

mod ops;
pub mod state;

pub use state::{Grid, Move, Tile};

pub use ops::{Line, Shifted, is_game_over, legal_moves, shift, transform_line};
