//! Pure quest progress engine.
//!
//! Computes the next run state from a "complete step" request and the XP
//! payout when a run finishes. No I/O, no locking: each call reads one
//! [`QuestRunState`] and produces a new one plus zero-or-one completion
//! event. Callers must serialize invocations per (participant, quest) pair.

use chrono::{DateTime, Utc};

use crate::dojo::errors::DojoError;
use crate::dojo::types::{CompletionEvent, QuestDefinition, QuestRunState, StepOutcome};

/// Each difficulty tier buys 15 minutes of time budget.
pub const MS_PER_DIFFICULTY_TIER: i64 = 15 * 60 * 1000;

/// Time-bonus tiers, checked top to bottom; first match wins.
/// A `percent_remaining` strictly above the threshold earns the fraction,
/// so exactly 75/50/25 percent falls to the next-lower tier.
const BONUS_TIERS: &[(f64, f64)] = &[(75.0, 0.50), (50.0, 0.30), (25.0, 0.20), (0.0, 0.10)];

/// Time budget in milliseconds: 15/30/45/60 minutes for difficulty 1-4.
pub fn time_budget_ms(difficulty: u8) -> i64 {
    i64::from(difficulty) * MS_PER_DIFFICULTY_TIER
}

pub fn elapsed_ms(run: &QuestRunState, now: DateTime<Utc>) -> i64 {
    (now - run.started_at).num_milliseconds().max(0)
}

pub fn remaining_ms(quest: &QuestDefinition, run: &QuestRunState, now: DateTime<Utc>) -> i64 {
    (time_budget_ms(quest.difficulty) - elapsed_ms(run, now)).max(0)
}

/// Progress as a rounded percentage, clamped to [0, 100].
pub fn progress_percent(quest: &QuestDefinition, run: &QuestRunState) -> u8 {
    let ratio = run.completed_step_ids.len() as f64 / quest.steps.len() as f64;
    (ratio * 100.0).round().min(100.0) as u8
}

/// The only step currently accepted: 1 for a fresh run, otherwise the
/// successor of the highest completed step id.
pub fn next_unlocked_step(run: &QuestRunState) -> u32 {
    run.completed_step_ids
        .iter()
        .next_back()
        .map(|max| max + 1)
        .unwrap_or(1)
}

/// Sets the sticky `timed_out` flag the first instant the budget runs out
/// while the run is unfinished. Never clears it.
pub fn observe_clock(quest: &QuestDefinition, run: &mut QuestRunState, now: DateTime<Utc>) {
    if !run.timed_out && !run.is_complete() && remaining_ms(quest, run, now) == 0 {
        run.timed_out = true;
    }
}

fn bonus_fraction(percent_remaining: f64) -> f64 {
    for &(threshold, fraction) in BONUS_TIERS {
        if percent_remaining > threshold {
            return fraction;
        }
    }
    // Unreachable while callers gate on remaining > 0, but the lowest tier
    // is the documented fallback for an exact-zero percentage.
    0.10
}

/// XP payout at the instant progress reaches 100%. Returns (base, bonus).
///
/// `observe_clock` runs before payout, so `remaining == 0` always implies
/// `timed_out` here; both route to the no-bonus branch.
fn compute_payout(quest: &QuestDefinition, run: &QuestRunState, now: DateTime<Utc>) -> (u32, u32) {
    let base = quest.base_reward_xp;
    let remaining = remaining_ms(quest, run, now);
    if run.timed_out || remaining == 0 {
        return (base, 0);
    }
    let percent_remaining = remaining as f64 / time_budget_ms(quest.difficulty) as f64 * 100.0;
    let bonus = (f64::from(base) * bonus_fraction(percent_remaining)).floor() as u32;
    (base, bonus)
}

/// Apply a "complete step" request to a run.
///
/// Rejections, in order: [`DojoError::QuestAlreadyComplete`] for a finished
/// run, [`DojoError::InvalidStep`] for an out-of-range id, and
/// [`DojoError::StepNotUnlocked`] for any step other than the next unlocked
/// one. On success the returned outcome carries the new state and, when the
/// final step was just completed, exactly one [`CompletionEvent`].
pub fn complete_step(
    quest: &QuestDefinition,
    run: &QuestRunState,
    step_id: u32,
    now: DateTime<Utc>,
) -> Result<StepOutcome, DojoError> {
    let mut next = run.clone();
    observe_clock(quest, &mut next, now);

    if next.is_complete() || next.completed_step_ids.len() >= quest.steps.len() {
        return Err(DojoError::QuestAlreadyComplete(quest.id.clone()));
    }
    if step_id == 0 || step_id > quest.steps.len() as u32 {
        return Err(DojoError::InvalidStep {
            quest_id: quest.id.clone(),
            step_id,
        });
    }
    let unlocked = next_unlocked_step(&next);
    if step_id != unlocked {
        return Err(DojoError::StepNotUnlocked { step_id, unlocked });
    }

    next.completed_step_ids.insert(step_id);
    let percent = progress_percent(quest, &next);

    let event = if next.completed_step_ids.len() == quest.steps.len() {
        next.completed_at = Some(now);
        let (base_xp, bonus_xp) = compute_payout(quest, &next, now);
        Some(CompletionEvent {
            quest_id: quest.id.clone(),
            participant: next.participant.clone(),
            base_xp,
            bonus_xp,
            total_xp: base_xp + bonus_xp,
            badge_id: quest.badge_id,
            completed_at: now,
        })
    } else {
        None
    };

    Ok(StepOutcome {
        run: next,
        progress_percent: percent,
        event,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn quest_with_steps(n: usize, difficulty: u8, xp: u32) -> QuestDefinition {
        let mut quest = QuestDefinition::new("test-quest", "Test Quest", "A test quest", difficulty)
            .with_reward_xp(xp)
            .with_badge(1);
        for i in 1..=n {
            quest = quest.with_step(&format!("Step {}", i), "do it", "Go");
        }
        quest
    }

    fn fresh_run(started_at: DateTime<Utc>) -> QuestRunState {
        QuestRunState::new("test-quest", "alice", started_at)
    }

    /// Complete the run with the final step landing at `elapsed` ms.
    fn complete_at_elapsed(quest: &QuestDefinition, elapsed: i64) -> CompletionEvent {
        let start = Utc::now();
        let mut run = fresh_run(start);
        let steps = quest.steps.len() as u32;
        for id in 1..steps {
            run = complete_step(quest, &run, id, start).expect("intermediate step").run;
        }
        let outcome = complete_step(quest, &run, steps, start + Duration::milliseconds(elapsed))
            .expect("final step");
        outcome.event.expect("completion event")
    }

    #[test]
    fn time_budget_scales_with_difficulty() {
        assert_eq!(time_budget_ms(1), 900_000);
        assert_eq!(time_budget_ms(2), 1_800_000);
        assert_eq!(time_budget_ms(3), 2_700_000);
        assert_eq!(time_budget_ms(4), 3_600_000);
    }

    #[test]
    fn ordering_only_unlocks_next_step() {
        let quest = quest_with_steps(3, 1, 100);
        let start = Utc::now();
        let run = fresh_run(start);

        assert!(matches!(
            complete_step(&quest, &run, 3, start),
            Err(DojoError::StepNotUnlocked { step_id: 3, unlocked: 1 })
        ));
        assert!(matches!(
            complete_step(&quest, &run, 2, start),
            Err(DojoError::StepNotUnlocked { step_id: 2, unlocked: 1 })
        ));

        let run = complete_step(&quest, &run, 1, start).expect("step 1").run;
        assert!(matches!(
            complete_step(&quest, &run, 1, start),
            Err(DojoError::StepNotUnlocked { step_id: 1, unlocked: 2 })
        ));
    }

    #[test]
    fn invalid_step_id_is_rejected() {
        let quest = quest_with_steps(3, 1, 100);
        let start = Utc::now();
        let run = fresh_run(start);
        assert!(matches!(
            complete_step(&quest, &run, 99, start),
            Err(DojoError::InvalidStep { step_id: 99, .. })
        ));
        assert!(matches!(
            complete_step(&quest, &run, 0, start),
            Err(DojoError::InvalidStep { step_id: 0, .. })
        ));
    }

    #[test]
    fn four_step_quest_hits_thresholds() {
        let quest = quest_with_steps(4, 1, 100);
        let start = Utc::now();
        let mut run = fresh_run(start);
        let mut last_percent = 0u8;

        for id in 1..=3u32 {
            let outcome = complete_step(&quest, &run, id, start).expect("step");
            assert!(outcome.event.is_none(), "no event before the final step");
            assert!(outcome.progress_percent >= last_percent, "monotonic progress");
            last_percent = outcome.progress_percent;
            run = outcome.run;
        }
        assert_eq!(last_percent, 75);

        let outcome = complete_step(&quest, &run, 4, start).expect("final step");
        assert_eq!(outcome.progress_percent, 100);
        assert!(outcome.event.is_some());
        assert!(outcome.run.is_complete());
    }

    #[test]
    fn completed_run_rejects_further_steps() {
        let quest = quest_with_steps(2, 1, 100);
        let start = Utc::now();
        let run = fresh_run(start);
        let run = complete_step(&quest, &run, 1, start).expect("step 1").run;
        let run = complete_step(&quest, &run, 2, start).expect("step 2").run;
        assert!(matches!(
            complete_step(&quest, &run, 1, start),
            Err(DojoError::QuestAlreadyComplete(_))
        ));
        assert!(matches!(
            complete_step(&quest, &run, 2, start),
            Err(DojoError::QuestAlreadyComplete(_))
        ));
    }

    #[test]
    fn bonus_tiers_match_remaining_time() {
        // difficulty 1: budget 900_000 ms, base 100 XP
        let quest = quest_with_steps(4, 1, 100);
        let cases = [
            (100_000, 50, 150),  // remaining 800_000 -> ~88.9% > 75
            (400_000, 30, 130),  // remaining 500_000 -> ~55.6% > 50
            (600_000, 20, 120),  // remaining 300_000 -> ~33.3% > 25
            (850_000, 10, 110),  // remaining 50_000 -> ~5.6% <= 25
        ];
        for (elapsed, bonus, total) in cases {
            let event = complete_at_elapsed(&quest, elapsed);
            assert_eq!(event.base_xp, 100);
            assert_eq!(event.bonus_xp, bonus, "elapsed {}", elapsed);
            assert_eq!(event.total_xp, total, "elapsed {}", elapsed);
        }
    }

    #[test]
    fn exact_tier_boundaries_fall_to_lower_tier() {
        let quest = quest_with_steps(4, 1, 100);
        // remaining 675_000 of 900_000 is exactly 75% -> 0.30 tier
        assert_eq!(complete_at_elapsed(&quest, 225_000).bonus_xp, 30);
        // exactly 50% -> 0.20 tier
        assert_eq!(complete_at_elapsed(&quest, 450_000).bonus_xp, 20);
        // exactly 25% -> 0.10 tier
        assert_eq!(complete_at_elapsed(&quest, 675_000).bonus_xp, 10);
    }

    #[test]
    fn bonus_xp_is_floored() {
        // base 75 at the 0.10 tier: 7.5 floors to 7
        let quest = quest_with_steps(2, 1, 75);
        let start = Utc::now();
        let run = fresh_run(start);
        let run = complete_step(&quest, &run, 1, start).expect("step 1").run;
        let outcome = complete_step(&quest, &run, 2, start + Duration::milliseconds(850_000))
            .expect("final");
        let event = outcome.event.expect("event");
        assert_eq!(event.bonus_xp, 7);
        assert_eq!(event.total_xp, 82);
    }

    #[test]
    fn timed_out_completion_pays_base_only() {
        let quest = quest_with_steps(2, 1, 100);
        let start = Utc::now();
        let run = fresh_run(start);
        let run = complete_step(&quest, &run, 1, start).expect("step 1").run;

        // Finish well past the 900_000 ms budget.
        let late = start + Duration::milliseconds(1_000_000);
        let outcome = complete_step(&quest, &run, 2, late).expect("final");
        assert!(outcome.run.timed_out);
        let event = outcome.event.expect("event");
        assert_eq!(event.bonus_xp, 0);
        assert_eq!(event.total_xp, 100);
    }

    #[test]
    fn timed_out_flag_is_sticky() {
        let quest = quest_with_steps(3, 1, 100);
        let start = Utc::now();
        let mut run = fresh_run(start);

        observe_clock(&quest, &mut run, start + Duration::milliseconds(900_000));
        assert!(run.timed_out);

        // Re-observing at an earlier instant must not clear the flag.
        observe_clock(&quest, &mut run, start);
        assert!(run.timed_out);
    }

    #[test]
    fn exact_budget_boundary_counts_as_timed_out() {
        let quest = quest_with_steps(2, 1, 100);
        let start = Utc::now();
        let run = fresh_run(start);
        let run = complete_step(&quest, &run, 1, start).expect("step 1").run;

        // remaining == 0 at completion: observe_clock flags the run, no bonus.
        let boundary = start + Duration::milliseconds(900_000);
        let outcome = complete_step(&quest, &run, 2, boundary).expect("final");
        assert!(outcome.run.timed_out);
        assert_eq!(outcome.event.expect("event").total_xp, 100);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        let quest = quest_with_steps(3, 1, 100);
        let start = Utc::now();
        let run = fresh_run(start);
        let run = complete_step(&quest, &run, 1, start).expect("step 1").run;
        // 1/3 rounds to 33
        assert_eq!(progress_percent(&quest, &run), 33);
        let run = complete_step(&quest, &run, 2, start).expect("step 2").run;
        // 2/3 rounds to 67
        assert_eq!(progress_percent(&quest, &run), 67);
    }
}
