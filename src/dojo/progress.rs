//! Quest lifecycle operations exposed to the surrounding UI/CLI layer.
//!
//! These functions wire the pure engine to the store and ledger: load a run,
//! apply the request, and persist the result only on success. They provide
//! no locking of their own; an embedding with concurrent callers must
//! serialize writes per (participant, quest) pair.

use log::{debug, info};

use crate::dojo::badge;
use crate::dojo::clock::Clock;
use crate::dojo::engine;
use crate::dojo::errors::DojoError;
use crate::dojo::storage::DojoStore;
use crate::dojo::types::{
    CompletionEvent, ProgressSnapshot, QuestDefinition, QuestRunState,
};

/// Start a quest run for a participant.
///
/// Rejected with [`DojoError::RunAlreadyStarted`] while an unfinished run
/// exists; a completed quest may be re-attempted as a fresh run (the ledger
/// keeps the earlier attempt's XP and badge).
pub fn start_quest(
    store: &DojoStore,
    clock: &impl Clock,
    participant: &str,
    quest_id: &str,
) -> Result<QuestRunState, DojoError> {
    let quest = store.get_quest(quest_id)?;
    if let Some(existing) = store.find_run(participant, quest_id)? {
        if !existing.is_complete() {
            return Err(DojoError::RunAlreadyStarted(quest_id.to_string()));
        }
        debug!(
            "{} restarting completed quest {} (previous run {})",
            participant, quest_id, existing.run_id
        );
    }

    let run = QuestRunState::new(&quest.id, participant, clock.now());
    store.put_run(&run)?;
    info!("{} started quest {} (run {})", participant, quest_id, run.run_id);
    Ok(run)
}

/// Complete the next unlocked step of a participant's run.
///
/// On quest completion the returned [`CompletionEvent`] has already been
/// applied to the ledger: XP recorded and the quest badge minted under the
/// dojo authority. A rejected call leaves the stored run untouched.
pub fn complete_step(
    store: &DojoStore,
    clock: &impl Clock,
    participant: &str,
    quest_id: &str,
    step_id: u32,
) -> Result<(QuestRunState, Option<CompletionEvent>), DojoError> {
    let quest = store.get_quest(quest_id)?;
    let run = store.get_run(participant, quest_id)?;

    let outcome = engine::complete_step(&quest, &run, step_id, clock.now())?;
    store.put_run(&outcome.run)?;

    if let Some(ref event) = outcome.event {
        store.record_xp(participant, event.total_xp)?;
        let authority = store.authority()?;
        match badge::mint_badge(store, &authority, participant, &quest, event.completed_at) {
            Ok(_) => {}
            // Re-completion of a restarted quest: the badge stays from the
            // first clear, only the XP is awarded again.
            Err(DojoError::BadgeAlreadyMinted { .. }) => {
                debug!("{} already holds badge {}", participant, event.badge_id);
            }
            Err(e) => return Err(e),
        }
        info!(
            "{} completed quest {} for {} XP ({} base + {} bonus)",
            participant, quest_id, event.total_xp, event.base_xp, event.bonus_xp
        );
    } else {
        debug!(
            "{} completed step {} of quest {} ({}%)",
            participant, step_id, quest_id, outcome.progress_percent
        );
    }

    Ok((outcome.run, outcome.event))
}

/// Current progress of a participant's run.
///
/// Observes the clock, persisting the sticky `timed_out` flag when it is
/// newly set; otherwise the read leaves stored state untouched.
pub fn get_progress(
    store: &DojoStore,
    clock: &impl Clock,
    participant: &str,
    quest_id: &str,
) -> Result<ProgressSnapshot, DojoError> {
    let quest = store.get_quest(quest_id)?;
    let mut run = store.get_run(participant, quest_id)?;
    let now = clock.now();

    let was_timed_out = run.timed_out;
    engine::observe_clock(&quest, &mut run, now);
    if run.timed_out && !was_timed_out {
        store.put_run(&run)?;
    }

    let completed = run.is_complete();
    Ok(ProgressSnapshot {
        progress_percent: engine::progress_percent(&quest, &run),
        remaining_ms: if completed {
            None
        } else {
            Some(engine::remaining_ms(&quest, &run, now))
        },
        timed_out: run.timed_out,
        completed,
    })
}

/// All quests in the catalog, ordered by difficulty then slug.
pub fn list_quests(store: &DojoStore) -> Result<Vec<QuestDefinition>, DojoError> {
    let mut quests = Vec::new();
    for id in store.list_quest_ids()? {
        quests.push(store.get_quest(&id)?);
    }
    quests.sort_by(|a, b| a.difficulty.cmp(&b.difficulty).then(a.id.cmp(&b.id)));
    Ok(quests)
}

/// Format the quest catalog for display.
pub fn format_quest_list(quests: &[QuestDefinition]) -> String {
    if quests.is_empty() {
        return "No quests available.".to_string();
    }
    let mut output = String::from("=== AVAILABLE QUESTS ===\n");
    for (idx, quest) in quests.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} (Lv{}, {} XP, {} steps)\n",
            idx + 1,
            quest.title,
            quest.difficulty,
            quest.base_reward_xp,
            quest.steps.len()
        ));
    }
    output
}

/// Format a run's progress for display.
pub fn format_progress(quest: &QuestDefinition, snapshot: &ProgressSnapshot) -> String {
    let mut output = format!("=== {} ===\n", quest.title);
    output.push_str(&format!("Progress: {}%\n", snapshot.progress_percent));
    if snapshot.completed {
        output.push_str("Status: complete\n");
    } else if snapshot.timed_out {
        output.push_str("Status: in progress (time bonus expired)\n");
    } else if let Some(remaining) = snapshot.remaining_ms {
        output.push_str(&format!(
            "Status: in progress ({}m {}s remaining for bonus)\n",
            remaining / 60_000,
            remaining % 60_000 / 1000
        ));
    }
    output
}
