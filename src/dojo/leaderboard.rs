//! Leaderboard over the XP ledger.
//!
//! Ranks participants by total XP earned from completed quests, descending,
//! with ties broken by participant id so ranks stay deterministic.

use crate::dojo::errors::DojoError;
use crate::dojo::storage::DojoStore;
use crate::dojo::types::LeaderboardEntry;

/// Top `limit` participants with 1-based ranks and their minted badges.
pub fn top_participants(
    store: &DojoStore,
    limit: usize,
) -> Result<Vec<LeaderboardEntry>, DojoError> {
    let mut rows = store.list_ledger()?;
    rows.sort_by(|a, b| b.1.xp.cmp(&a.1.xp).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(limit);

    let mut entries = Vec::with_capacity(rows.len());
    for (rank, (participant, tally)) in rows.into_iter().enumerate() {
        let badges = store
            .list_badges(&participant)?
            .into_iter()
            .map(|b| b.badge_id)
            .collect();
        entries.push(LeaderboardEntry {
            participant,
            xp: tally.xp,
            quests_completed: tally.quests_completed,
            badges,
            rank: rank + 1,
        });
    }
    Ok(entries)
}

/// A participant's 1-based rank, or `None` when they have no XP yet.
pub fn participant_rank(
    store: &DojoStore,
    participant: &str,
) -> Result<Option<usize>, DojoError> {
    let mut rows = store.list_ledger()?;
    rows.sort_by(|a, b| b.1.xp.cmp(&a.1.xp).then_with(|| a.0.cmp(&b.0)));
    let needle = participant.to_ascii_lowercase();
    Ok(rows.iter().position(|(p, _)| *p == needle).map(|i| i + 1))
}

/// Format the leaderboard for display.
pub fn format_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No one has earned XP yet.".to_string();
    }
    let mut output = String::from("=== DOJO LEADERBOARD ===\n");
    for entry in entries {
        output.push_str(&format!(
            "{}. {} - {} XP ({} quests, {} badges)\n",
            entry.rank,
            entry.participant,
            entry.xp,
            entry.quests_completed,
            entry.badges.len()
        ));
    }
    output
}
