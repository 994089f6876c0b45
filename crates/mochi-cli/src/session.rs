use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::warn;
use mochi_engine::{EngineError, Game, PetState, SaveState};

use crate::command::{Command, HELP};

/// What the main loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A game plus the file it persists to.
pub struct Session {
    game: Game,
    save_path: PathBuf,
}

impl Session {
    pub fn new(game: Game, save_path: PathBuf) -> Self {
        Session { game, save_path }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run one command. `idle_seconds` is wall time since the previous one.
    /// Anything to show the player is appended to `out`.
    pub fn handle(&mut self, cmd: Command, idle_seconds: u64, out: &mut String) -> Result<Flow> {
        self.game.tick_idle(idle_seconds);
        match cmd {
            Command::Move(dir) => {
                let outcome = self.game.apply_move(dir)?;
                if !outcome.moved {
                    if outcome.legal_moves_remain {
                        let _ = writeln!(out, "nothing moves {dir}");
                    } else {
                        let _ = writeln!(out, "no moves left: claim your reward with c");
                    }
                    return Ok(Flow::Continue);
                }
                if outcome.points_gained > 0 {
                    let _ = writeln!(out, "+{} healing points", outcome.points_gained);
                }
                if outcome.just_fell_asleep {
                    let _ = writeln!(out, "zzz... the mochi fell asleep");
                } else if outcome.transition.changed() {
                    let _ = writeln!(out, "the mochi is {} now", outcome.transition.to);
                }
                if outcome.pet_state == PetState::Stuck {
                    let _ = writeln!(out, "no moves left: claim your reward with c");
                }
            }
            Command::Undo => {
                if !self.game.undo() {
                    let _ = writeln!(out, "nothing to undo");
                }
            }
            Command::Claim => {
                if !self.game.can_claim_reward() {
                    let _ = writeln!(
                        out,
                        "not yet: {} idle points, {} needed",
                        self.game.idle_points(),
                        self.game.rules().idle.points_to_claim
                    );
                    return Ok(Flow::Continue);
                }
                let claim = self.game.claim_reward();
                let _ = writeln!(
                    out,
                    "reward: {} bonus + {} idle = {} healing points",
                    claim.bonus, claim.idle_points, claim.total
                );
                self.persist()?;
            }
            Command::Shop => {
                out.push_str(&crate::render::shop(&self.game));
                return Ok(Flow::Continue);
            }
            Command::Buy(id) => match self.game.purchase(&id) {
                Ok(at) => {
                    let _ = writeln!(out, "bought {id}, placed at top {} left {}", at.top, at.left);
                    self.persist()?;
                }
                Err(e) => refuse(out, e)?,
            },
            Command::Place { id, at } => match self.game.place(&id, at) {
                Ok(at) => {
                    let _ = writeln!(out, "{id} moved to top {} left {}", at.top, at.left);
                    self.persist()?;
                }
                Err(e) => refuse(out, e)?,
            },
            Command::NewGame => self.game.reset_game(),
            Command::Status => {}
            Command::Help => {
                let _ = writeln!(out, "{HELP}");
                return Ok(Flow::Continue);
            }
            Command::Quit => {
                self.persist()?;
                return Ok(Flow::Quit);
            }
        }
        out.push_str(&crate::render::status(&self.game));
        Ok(Flow::Continue)
    }

    pub fn persist(&self) -> Result<()> {
        self.game
            .to_save()
            .save(&self.save_path)
            .with_context(|| format!("failed to write save file {}", self.save_path.display()))
    }
}

/// Shop refusals are shown to the player; anything else is a real failure.
fn refuse(out: &mut String, e: EngineError) -> Result<()> {
    match e {
        EngineError::UnknownFurniture(_)
        | EngineError::AlreadyOwned(_)
        | EngineError::InsufficientPoints { .. } => {
            warn!("shop refused: {e}");
            let _ = writeln!(out, "{e}");
            Ok(())
        }
        other => Err(other.into()),
    }
}

/// Load the save file, falling back to a fresh one if it is unreadable.
pub fn load_save(path: &std::path::Path) -> SaveState {
    match SaveState::load(path) {
        Ok(save) => save,
        Err(e) => {
            warn!("ignoring save file {}: {e}", path.display());
            SaveState::default()
        }
    }
}
