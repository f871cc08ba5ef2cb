use thiserror::Error;

/// Errors that can arise in the dojo engine and storage layer.
///
/// All variants are recoverable by the caller; a failed operation never
/// mutates stored state.
#[derive(Debug, Error)]
pub enum DojoError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown quest id passed to a catalog lookup.
    #[error("quest not found: {0}")]
    QuestNotFound(String),

    /// No run exists for this participant/quest pair.
    #[error("no run found for {participant} on quest {quest_id}")]
    RunNotFound {
        participant: String,
        quest_id: String,
    },

    /// Step id is not part of the quest's step list.
    #[error("step {step_id} is not part of quest {quest_id}")]
    InvalidStep { quest_id: String, step_id: u32 },

    /// Attempted to complete a step other than the next unlocked one.
    /// Covers both re-completing a finished step and skipping ahead.
    #[error("step {step_id} is locked; next unlocked step is {unlocked}")]
    StepNotUnlocked { step_id: u32, unlocked: u32 },

    /// Attempted a step completion on a run already at 100% progress.
    #[error("quest {0} is already complete")]
    QuestAlreadyComplete(String),

    /// Attempted to start a quest that already has an unfinished run.
    #[error("quest {0} already has a run in progress")]
    RunAlreadyStarted(String),

    /// Quest definition failed validation at catalog-insert time.
    #[error("invalid quest definition: {0}")]
    InvalidDefinition(String),

    /// One badge per quest per participant; a second mint is rejected.
    #[error("badge {badge_id} already minted for {participant}")]
    BadgeAlreadyMinted {
        participant: String,
        badge_id: u32,
    },

    /// Caller is not the dojo authority (badge mints are owner-gated).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },
}
