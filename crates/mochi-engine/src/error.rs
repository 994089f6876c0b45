use thiserror::Error;

/// Everything the engine can refuse or fail at.
///
/// Moves that change nothing, undo without a snapshot and spawning on a full
/// grid are ordinary outcomes and never show up here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The grid broke one of its structural rules. Always a bug in the caller
    /// or in the engine, never something a player can trigger.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),

    #[error("invalid rules: {0}")]
    Config(String),

    #[error("unknown furniture: {0}")]
    UnknownFurniture(String),

    #[error("furniture already owned: {0}")]
    AlreadyOwned(String),

    #[error("not enough healing points: need {price}, have {available}")]
    InsufficientPoints { price: u64, available: u64 },

    #[error("save file error: {0}")]
    Save(#[from] std::io::Error),

    #[error("save file format error: {0}")]
    SaveFormat(#[from] serde_json::Error),

    #[error("rules file format error: {0}")]
    RulesFormat(#[from] toml::de::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
