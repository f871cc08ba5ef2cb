//! DeFi Dojo domain: quest catalog, the pure progress engine, Sled-backed
//! persistence, and the XP/badge ledger with its leaderboard.
//!
//! The engine itself (`engine`) is pure computation; `progress` wires it to
//! the store and ledger for callers.

pub mod badge;
pub mod catalog;
pub mod clock;
pub mod engine;
pub mod errors;
pub mod leaderboard;
pub mod progress;
pub mod storage;
pub mod types;

pub use badge::{badges_for, has_badge, mint_badge};
pub use catalog::{canonical_quest_seed, CANONICAL_QUEST_SLUGS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::DojoError;
pub use leaderboard::{format_leaderboard, participant_rank, top_participants};
pub use progress::{
    complete_step, format_progress, format_quest_list, get_progress, list_quests, start_quest,
};
pub use storage::{DojoStore, DojoStoreBuilder};
pub use types::*;
