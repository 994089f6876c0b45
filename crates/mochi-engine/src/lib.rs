//! Nemui Mochi: a 2048-style merge board that makes a pet mochi sleepy.
//!
//! Merging tiles earns healing points and fills a sleepiness gauge; the
//! gauge decides whether the mochi is awake, sleepy or asleep, and a board
//! with no legal move leaves it stuck. Healing points buy furniture for the
//! mochi's room. [`Game`] owns one session and is the entry point for
//! front ends.
//!
//! ```
//! use mochi_engine::{Game, Move, Rules};
//! let mut game = Game::seeded(Rules::default(), 7).unwrap();
//! let outcome = game.apply_move(Move::Left).unwrap();
//! if outcome.moved {
//!     assert!(game.can_undo());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod history;
pub mod progress;
pub mod save;
pub mod shop;

pub use config::Rules;
pub use engine::{Grid, Move};
pub use error::{EngineError, Result};
pub use game::{Game, MoveOutcome, RewardClaim};
pub use progress::{PetState, Thresholds, Transition};
pub use save::SaveState;
pub use shop::{FurnitureItem, Placement, Room};
