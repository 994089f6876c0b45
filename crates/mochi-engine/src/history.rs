//! One-step undo.

use crate::engine::Grid;

/// Everything a move can change, captured just before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub currency: u64,
    pub sleepiness: u64,
}

/// Single-slot undo buffer. Recording overwrites, taking empties.
#[derive(Debug, Clone, Default)]
pub struct History {
    slot: Option<Snapshot>,
}

impl History {
    pub fn record(&mut self, snapshot: Snapshot) {
        self.slot = Some(snapshot);
    }

    pub fn take(&mut self) -> Option<Snapshot> {
        self.slot.take()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.slot.is_some()
    }
}
