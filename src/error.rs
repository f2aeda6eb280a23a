use crate::character::CharacterId;
use crate::item::ItemId;
use thiserror::Error;

// Top-level error returned by the table service.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Rules error: {0}")]
    Rules(#[from] RulesError), // A rule refused the operation; nothing was written.

    #[error("Store error: {0}")]
    Store(#[from] StoreError), // The persistence collaborator failed.
}

// Failures raised by the rules engine. None of them leave a character half-updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("You must use at least two other characteristics before tapping {characteristic} again.")]
    CooldownViolation { characteristic: String },

    #[error("Not enough Reserve! Need {required}, have {available}")]
    InsufficientReserve { required: i32, available: i32 },

    #[error("No target selected for this conflict")]
    InsufficientTarget,

    #[error("Unknown characteristic: {0}")]
    UnknownCharacteristic(String),

    #[error("Unknown burden domain: {0}")]
    UnknownBurdenDomain(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Unknown faith scale: {0}")]
    UnknownFaithScale(String),

    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Invalid dice expression: {0}")]
    InvalidDiceExpression(String),
}

// Errors from the character stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Character store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not create log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger already set")]
    AlreadySet,

    #[error("Failed to install logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}
