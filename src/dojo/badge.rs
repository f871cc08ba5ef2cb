//! Badge ledger: an authorization-checked record of quest completion badges.
//!
//! Mints are gated on the dojo authority recorded when the store was first
//! opened; one badge per quest per participant. The ledger is deliberately
//! separate from the progress engine, which only announces the badge id in
//! its completion event.

use chrono::{DateTime, Utc};

use crate::dojo::errors::DojoError;
use crate::dojo::storage::DojoStore;
use crate::dojo::types::{BadgeRecord, QuestDefinition, BADGE_SCHEMA_VERSION};

/// Mint a quest badge for a participant.
///
/// Fails with [`DojoError::PermissionDenied`] unless `caller` is the dojo
/// authority, and with [`DojoError::BadgeAlreadyMinted`] when the
/// participant already holds this quest's badge.
pub fn mint_badge(
    store: &DojoStore,
    caller: &str,
    participant: &str,
    quest: &QuestDefinition,
    minted_at: DateTime<Utc>,
) -> Result<BadgeRecord, DojoError> {
    let owner = store.authority()?;
    if caller != owner {
        return Err(DojoError::PermissionDenied(format!(
            "only {} may mint badges, not {}",
            owner, caller
        )));
    }

    if store.get_badge(participant, quest.badge_id)?.is_some() {
        return Err(DojoError::BadgeAlreadyMinted {
            participant: participant.to_string(),
            badge_id: quest.badge_id,
        });
    }

    let badge = BadgeRecord {
        badge_id: quest.badge_id,
        quest_id: quest.id.clone(),
        participant: participant.to_string(),
        minted_at,
        schema_version: BADGE_SCHEMA_VERSION,
    };
    store.put_badge(&badge)?;
    Ok(badge)
}

/// Whether the participant holds the badge.
pub fn has_badge(store: &DojoStore, participant: &str, badge_id: u32) -> Result<bool, DojoError> {
    Ok(store.get_badge(participant, badge_id)?.is_some())
}

/// All badges held by the participant, ordered by badge id.
pub fn badges_for(store: &DojoStore, participant: &str) -> Result<Vec<BadgeRecord>, DojoError> {
    store.list_badges(participant)
}
