//! A single game session: the grid, the counters, one-step undo, the idle
//! timer and the furniture room, owned by one value and driven by its callers.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Rules;
use crate::engine::{self, Grid, Move};
use crate::error::{EngineError, Result};
use crate::history::{History, Snapshot};
use crate::progress::{PetState, Progress, Transition};
use crate::save::SaveState;
use crate::shop::{Furniture, Placement};

/// What a call to [`Game::apply_move`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub points_gained: u64,
    /// Sleepiness from merges alone.
    pub sleepiness_delta: u64,
    /// Flat sleepiness added because the grid changed, on top of `sleepiness_delta`.
    pub step_sleepiness: u64,
    pub transition: Transition,
    /// State after the move, stuck overlay included.
    pub pet_state: PetState,
    pub just_fell_asleep: bool,
    pub legal_moves_remain: bool,
    /// Cell that received the new tile.
    pub spawned: Option<usize>,
}

/// Payout of [`Game::claim_reward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardClaim {
    pub bonus: u64,
    pub idle_points: u64,
    pub total: u64,
}

pub struct Game<R = StdRng> {
    rules: Rules,
    rng: R,
    grid: Grid,
    progress: Progress,
    history: History,
    furniture: Furniture,
    idle_seconds: u64,
}

impl Game<StdRng> {
    /// Fresh game with a reproducible spawn sequence.
    pub fn seeded(rules: Rules, seed: u64) -> Result<Self> {
        Game::new(rules, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    /// Fresh game: empty grid plus two spawns, no currency, no furniture.
    pub fn new(rules: Rules, rng: R) -> Result<Self> {
        Game::from_save(rules, SaveState::default(), rng)
    }

    /// Restore the persisted part of a session and start a new board.
    pub fn from_save(rules: Rules, save: SaveState, rng: R) -> Result<Self> {
        rules.validate()?;
        if let Some(id) = save
            .purchased_furniture
            .keys()
            .find(|id| rules.furniture_item(id).is_none())
        {
            return Err(EngineError::UnknownFurniture(id.clone()));
        }
        let mut game = Game {
            grid: Grid::empty(rules.board_size),
            progress: Progress::new(save.healing_points, rules.thresholds),
            history: History::default(),
            furniture: Furniture::from_owned(save.purchased_furniture),
            idle_seconds: 0,
            rules,
            rng,
        };
        game.reset_game();
        Ok(game)
    }

    /// Start from an explicit grid and counters instead of random spawns.
    pub fn from_parts(rules: Rules, grid: Grid, currency: u64, sleepiness: u64, rng: R) -> Result<Self> {
        rules.validate()?;
        grid.check()?;
        if grid.size() != rules.board_size {
            return Err(EngineError::InvariantViolation(format!(
                "grid size {} does not match board_size {}",
                grid.size(),
                rules.board_size
            )));
        }
        let mut progress = Progress::new(currency, rules.thresholds);
        progress.restore(currency, sleepiness);
        Ok(Game {
            grid,
            progress,
            history: History::default(),
            furniture: Furniture::default(),
            idle_seconds: 0,
            rules,
            rng,
        })
    }

    /// Slide the grid one way.
    ///
    /// A move that changes nothing is a normal outcome with `moved == false`.
    /// While stuck no move is attempted and the undo slot is left as it was.
    pub fn apply_move(&mut self, direction: Move) -> Result<MoveOutcome> {
        if !self.grid.can_move() {
            debug!("ignoring {direction}: no legal move left");
            return Ok(self.unchanged());
        }

        let snapshot = Snapshot {
            grid: self.grid.clone(),
            currency: self.progress.currency(),
            sleepiness: self.progress.sleepiness(),
        };

        // A failed shift leaves the previous snapshot in place.
        let shifted = engine::shift(&self.grid, direction)?;
        if !shifted.moved {
            self.history.clear();
            return Ok(self.unchanged());
        }
        self.history.record(snapshot);

        let sleepiness_delta = shifted.sleepiness(self.rules.merge_sleepiness);
        let step_sleepiness = self.rules.move_sleepiness;
        let points_gained = shifted.points;
        self.grid = shifted.grid;
        let transition = self.progress.apply(points_gained, sleepiness_delta + step_sleepiness);
        let spawned = self.grid.spawn(&mut self.rng, self.rules.four_probability);

        let legal_moves_remain = self.grid.can_move();
        if transition.just_fell_asleep() {
            info!("mochi fell asleep at sleepiness {}", self.progress.sleepiness());
        }
        if !legal_moves_remain {
            info!("no legal move left, mochi is stuck");
        }

        Ok(MoveOutcome {
            moved: true,
            points_gained,
            sleepiness_delta,
            step_sleepiness,
            transition,
            pet_state: self.progress.pet_state(legal_moves_remain),
            just_fell_asleep: transition.just_fell_asleep(),
            legal_moves_remain,
            spawned,
        })
    }

    /// Roll back the last move. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.take() {
            Some(snapshot) => {
                self.grid = snapshot.grid;
                self.progress.restore(snapshot.currency, snapshot.sleepiness);
                debug!("undo: back to sleepiness {}", snapshot.sleepiness);
                true
            }
            None => false,
        }
    }

    /// New board, empty gauge. Healing points and furniture stay.
    pub fn reset_game(&mut self) {
        self.grid = Grid::empty(self.rules.board_size);
        self.grid.spawn(&mut self.rng, self.rules.four_probability);
        self.grid.spawn(&mut self.rng, self.rules.four_probability);
        self.progress.reset_sleepiness();
        self.history.clear();
    }

    /// Advance the idle timer. It stands still while the mochi sleeps;
    /// a stuck mochi is not asleep, whatever the gauge says.
    pub fn tick_idle(&mut self, seconds: u64) {
        if self.pet_state() != PetState::Asleep {
            self.idle_seconds = self.idle_seconds.saturating_add(seconds);
        }
    }

    pub fn idle_seconds(&self) -> u64 {
        self.idle_seconds
    }

    pub fn idle_points(&self) -> u64 {
        self.idle_seconds / self.rules.idle.seconds_per_point
    }

    /// True once enough idle points built up, or as soon as the game is over.
    pub fn can_claim_reward(&self) -> bool {
        self.idle_points() >= self.rules.idle.points_to_claim || !self.grid.can_move()
    }

    /// Pay out idle points, plus the game-over bonus when the mochi is
    /// asleep or stuck, then start a new board.
    pub fn claim_reward(&mut self) -> RewardClaim {
        let bonus = match self.pet_state() {
            PetState::Asleep | PetState::Stuck => self.rules.idle.game_over_bonus,
            PetState::Awake | PetState::Sleepy => 0,
        };
        let idle_points = self.idle_points();
        let total = bonus + idle_points;
        self.progress.earn(total);
        self.idle_seconds = 0;
        info!("claimed {total} healing points ({bonus} bonus, {idle_points} idle)");
        self.reset_game();
        RewardClaim {
            bonus,
            idle_points,
            total,
        }
    }

    /// Buy a catalog item.
    pub fn purchase(&mut self, id: &str) -> Result<Placement> {
        let item = self
            .rules
            .furniture_item(id)
            .ok_or_else(|| EngineError::UnknownFurniture(id.to_string()))?;
        self.furniture.purchase(item, &mut self.progress)
    }

    /// Drag an owned item to a new spot; the result is clamped into the room.
    pub fn place(&mut self, id: &str, wanted: Placement) -> Result<Placement> {
        let item = self
            .rules
            .furniture_item(id)
            .ok_or_else(|| EngineError::UnknownFurniture(id.to_string()))?;
        self.furniture.place(item, wanted, &self.rules.room)
    }

    /// The persisted slice of this session.
    pub fn to_save(&self) -> SaveState {
        SaveState {
            healing_points: self.progress.currency(),
            purchased_furniture: self.furniture.owned().clone(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn currency(&self) -> u64 {
        self.progress.currency()
    }

    pub fn sleepiness(&self) -> u64 {
        self.progress.sleepiness()
    }

    pub fn can_move(&self) -> bool {
        self.grid.can_move()
    }

    pub fn pet_state(&self) -> PetState {
        self.progress.pet_state(self.grid.can_move())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn furniture(&self) -> &Furniture {
        &self.furniture
    }

    fn unchanged(&self) -> MoveOutcome {
        let legal_moves_remain = self.grid.can_move();
        let mood = self.progress.mood();
        MoveOutcome {
            moved: false,
            points_gained: 0,
            sleepiness_delta: 0,
            step_sleepiness: 0,
            transition: Transition { from: mood, to: mood },
            pet_state: self.progress.pet_state(legal_moves_remain),
            just_fell_asleep: false,
            legal_moves_remain,
            spawned: None,
        }
    }
}
