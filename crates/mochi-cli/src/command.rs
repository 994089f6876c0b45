use anyhow::{Context, Result, bail};
use mochi_engine::{Move, Placement};

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Undo,
    Claim,
    Shop,
    Buy(String),
    Place { id: String, at: Placement },
    NewGame,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
moves:   w/a/s/d or up/left/down/right
undo:    u
reward:  c        (claim idle reward, starts a new board)
shop:    shop     (list furniture)
buy:     buy <id>
place:   place <id> <top> <left>
new:     n        (new board, keeps healing points)
quit:    q";

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Status);
        };
        let cmd = match head.to_ascii_lowercase().as_str() {
            "w" | "k" => Command::Move(Move::Up),
            "a" | "h" => Command::Move(Move::Left),
            "s" | "j" => Command::Move(Move::Down),
            "d" | "l" => Command::Move(Move::Right),
            "u" | "undo" => Command::Undo,
            "c" | "claim" => Command::Claim,
            "shop" => Command::Shop,
            "buy" => {
                let id = words.next().context("usage: buy <id>")?;
                Command::Buy(id.to_string())
            }
            "place" => {
                let (Some(id), Some(top), Some(left)) = (words.next(), words.next(), words.next()) else {
                    bail!("usage: place <id> <top> <left>");
                };
                let top = top.parse().with_context(|| format!("bad top {top:?}"))?;
                let left = left.parse().with_context(|| format!("bad left {left:?}"))?;
                Command::Place {
                    id: id.to_string(),
                    at: Placement { top, left },
                }
            }
            "n" | "new" => Command::NewGame,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => Command::Move(other.parse().with_context(|| format!("unknown command {other:?}, try help"))?),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected argument {extra:?}");
        }
        Ok(cmd)
    }
}
