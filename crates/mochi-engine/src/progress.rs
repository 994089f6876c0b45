//! Healing points, the sleepiness gauge, and the pet state derived from them.

use log::info;
use serde::{Deserialize, Serialize};

/// How the mochi is doing.
///
/// `Awake`, `Sleepy` and `Asleep` follow from the sleepiness gauge alone.
/// `Stuck` overrides all three whenever the grid has no legal move left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetState {
    Awake,
    Sleepy,
    Asleep,
    Stuck,
}

impl PetState {
    /// State implied by the gauge, ignoring the grid.
    pub fn from_sleepiness(sleepiness: u64, thresholds: &Thresholds) -> Self {
        if sleepiness >= thresholds.asleep {
            PetState::Asleep
        } else if sleepiness >= thresholds.sleepy {
            PetState::Sleepy
        } else {
            PetState::Awake
        }
    }

    /// Full derivation with the stuck overlay.
    pub fn derive(sleepiness: u64, has_legal_move: bool, thresholds: &Thresholds) -> Self {
        if has_legal_move {
            PetState::from_sleepiness(sleepiness, thresholds)
        } else {
            PetState::Stuck
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PetState::Awake => "awake",
            PetState::Sleepy => "sleepy",
            PetState::Asleep => "asleep",
            PetState::Stuck => "stuck",
        }
    }
}

impl std::fmt::Display for PetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Sleepiness levels at which the mochi gets sleepy and falls asleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub sleepy: u64,
    pub asleep: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            sleepy: 2501,
            asleep: 5000,
        }
    }
}

/// Edge between two gauge-derived states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PetState,
    pub to: PetState,
}

impl Transition {
    #[inline]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    /// Fires once on the move that crosses into `Asleep`.
    #[inline]
    pub fn just_fell_asleep(&self) -> bool {
        self.to == PetState::Asleep && self.from != PetState::Asleep
    }
}

/// The two counters plus the last gauge-derived state, cached only so that
/// transitions can be detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    currency: u64,
    sleepiness: u64,
    thresholds: Thresholds,
    mood: PetState,
}

impl Progress {
    pub fn new(currency: u64, thresholds: Thresholds) -> Self {
        Progress {
            currency,
            sleepiness: 0,
            thresholds,
            mood: PetState::from_sleepiness(0, &thresholds),
        }
    }

    #[inline]
    pub fn currency(&self) -> u64 {
        self.currency
    }

    #[inline]
    pub fn sleepiness(&self) -> u64 {
        self.sleepiness
    }

    #[inline]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Gauge-derived state, without the stuck overlay.
    #[inline]
    pub fn mood(&self) -> PetState {
        self.mood
    }

    /// Pet state with the stuck overlay applied.
    #[inline]
    pub fn pet_state(&self, has_legal_move: bool) -> PetState {
        PetState::derive(self.sleepiness, has_legal_move, &self.thresholds)
    }

    /// Add the gains of one move and report the state edge it caused.
    pub fn apply(&mut self, points: u64, sleepiness: u64) -> Transition {
        self.currency = self.currency.saturating_add(points);
        self.sleepiness = self.sleepiness.saturating_add(sleepiness);
        self.refresh()
    }

    /// Put both counters back to earlier values. The cached state follows
    /// them silently, so crossing back over a threshold later fires again.
    pub fn restore(&mut self, currency: u64, sleepiness: u64) {
        self.currency = currency;
        self.sleepiness = sleepiness;
        self.mood = PetState::from_sleepiness(sleepiness, &self.thresholds);
    }

    pub fn reset_sleepiness(&mut self) {
        self.sleepiness = 0;
        self.mood = PetState::from_sleepiness(0, &self.thresholds);
    }

    pub fn earn(&mut self, amount: u64) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Deduct `amount` if affordable.
    pub fn spend(&mut self, amount: u64) -> bool {
        match self.currency.checked_sub(amount) {
            Some(left) => {
                self.currency = left;
                true
            }
            None => false,
        }
    }

    fn refresh(&mut self) -> Transition {
        let to = PetState::from_sleepiness(self.sleepiness, &self.thresholds);
        let transition = Transition {
            from: self.mood,
            to,
        };
        if transition.changed() {
            info!(
                "mochi is now {} (sleepiness {})",
                transition.to, self.sleepiness
            );
        }
        self.mood = to;
        transition
    }
}
