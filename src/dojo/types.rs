//! Core data model for the dojo: quest definitions, per-participant run
//! state, completion events, and the XP/badge ledger records.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dojo::errors::DojoError;

pub const QUEST_SCHEMA_VERSION: u8 = 1;
pub const RUN_SCHEMA_VERSION: u8 = 1;
pub const BADGE_SCHEMA_VERSION: u8 = 1;

/// A single training step within a quest. Step ids are 1-based and
/// contiguous; the engine unlocks them strictly in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Short verb label shown on the step's action button.
    pub action: String,
}

/// Immutable quest definition sourced from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestDefinition {
    /// Slug identifier, e.g. `liquidity-kata`.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Difficulty tier 1-4; scales the time budget (15 minutes per tier).
    pub difficulty: u8,
    pub steps: Vec<StepDefinition>,
    pub base_reward_xp: u32,
    /// Badge minted on completion.
    pub badge_id: u32,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl QuestDefinition {
    pub fn new(id: &str, title: &str, description: &str, difficulty: u8) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            difficulty: difficulty.clamp(1, 4),
            steps: Vec::new(),
            base_reward_xp: 0,
            badge_id: 0,
            created_at: Utc::now(),
            schema_version: QUEST_SCHEMA_VERSION,
        }
    }

    /// Append a step; ids are assigned sequentially starting at 1.
    pub fn with_step(mut self, title: &str, description: &str, action: &str) -> Self {
        let id = self.steps.len() as u32 + 1;
        self.steps.push(StepDefinition {
            id,
            title: title.to_string(),
            description: description.to_string(),
            action: action.to_string(),
        });
        self
    }

    pub fn with_reward_xp(mut self, xp: u32) -> Self {
        self.base_reward_xp = xp;
        self
    }

    pub fn with_badge(mut self, badge_id: u32) -> Self {
        self.badge_id = badge_id;
        self
    }

    /// Enforce the catalog invariants: at least one step, and step ids
    /// forming a contiguous ascending sequence starting at 1.
    pub fn validate(&self) -> Result<(), DojoError> {
        if self.steps.is_empty() {
            return Err(DojoError::InvalidDefinition(format!(
                "quest {} has no steps",
                self.id
            )));
        }
        for (idx, step) in self.steps.iter().enumerate() {
            let expected = idx as u32 + 1;
            if step.id != expected {
                return Err(DojoError::InvalidDefinition(format!(
                    "quest {} step ids must be contiguous from 1 (found {} at position {})",
                    self.id, step.id, expected
                )));
            }
        }
        Ok(())
    }
}

/// Mutable per-participant quest attempt. Created when a quest is started,
/// mutated only by step completion, terminal once every step is done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestRunState {
    /// Unique id for this attempt (a restarted quest gets a fresh one).
    pub run_id: Uuid,
    pub quest_id: String,
    pub participant: String,
    /// Only ever grows; a step id, once added, is never removed.
    pub completed_step_ids: BTreeSet<u32>,
    /// Set once when the run begins; immutable thereafter.
    pub started_at: DateTime<Utc>,
    /// Sticky flag: set the first time the time budget runs out while the
    /// run is unfinished, never cleared afterwards.
    pub timed_out: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub schema_version: u8,
}

impl QuestRunState {
    pub fn new(quest_id: &str, participant: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            quest_id: quest_id.to_string(),
            participant: participant.to_string(),
            completed_step_ids: BTreeSet::new(),
            started_at,
            timed_out: false,
            completed_at: None,
            schema_version: RUN_SCHEMA_VERSION,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Emitted exactly once, when the final step of a run is completed.
/// The surrounding system uses it to persist XP and mint the quest badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionEvent {
    pub quest_id: String,
    pub participant: String,
    pub base_xp: u32,
    pub bonus_xp: u32,
    pub total_xp: u32,
    pub badge_id: u32,
    pub completed_at: DateTime<Utc>,
}

/// Result of a successful step completion: the new run state, the derived
/// progress percentage, and the completion event when the run just finished.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub run: QuestRunState,
    pub progress_percent: u8,
    pub event: Option<CompletionEvent>,
}

/// Read-only view of a run's progress for the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub progress_percent: u8,
    /// Milliseconds left in the time budget; `None` once the run completes.
    pub remaining_ms: Option<i64>,
    pub timed_out: bool,
    pub completed: bool,
}

/// One minted badge in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeRecord {
    pub badge_id: u32,
    pub quest_id: String,
    pub participant: String,
    pub minted_at: DateTime<Utc>,
    pub schema_version: u8,
}

/// Per-participant XP tally kept in the ledger tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub xp: u64,
    pub quests_completed: u32,
}

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub participant: String,
    pub xp: u64,
    pub quests_completed: u32,
    pub badges: Vec<u32>,
    /// 1-based rank.
    pub rank: usize,
}
