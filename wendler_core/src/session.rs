//! The session recorder: the progression state machine transition.
//!
//! A single call to [`record_workout`] finalizes the session in progress.
//! It writes the day's history entry, updates increase eligibility for the
//! lift just trained, rotates to the next lift, and advances the week when
//! the rotation wraps. At a week 4 -> 1 wrap (the cycle boundary) every
//! still-eligible lift's training max goes up by its fixed increment and
//! all eligibility flags reset.

use crate::history::day_key;
use crate::{HistoryEntry, Lift, MainSets, SessionOutcome, WorkoutState};
use chrono::{DateTime, Local};

/// Record a finished session and advance the progression state.
///
/// Preconditions (caller-enforced, see the CLI): every main-set index 0-2
/// appears in exactly one of `completed_sets` / `failed_sets`. The
/// transition itself is total; it never fails.
///
/// The clock is passed in so the calendar-day keying is deterministic
/// under test.
pub fn record_workout(state: &mut WorkoutState, outcome: &SessionOutcome, now: DateTime<Local>) {
    let lift = state.current_lift;
    let week = state.current_week;

    let entry = HistoryEntry {
        date: now,
        lift,
        week,
        training_max: *state.maxes.get(lift),
        duration_seconds: outcome.duration_seconds,
        selected_assistance: outcome.selected_assistance.clone(),
        completed_assistance: outcome.completed_assistance.clone(),
        main_sets: MainSets {
            completed: outcome.completed_sets.clone(),
            failed: outcome.failed_sets.clone(),
        },
    };

    // One failed set anywhere in the cycle makes the lift ineligible until
    // the next boundary. AND keeps the flag monotone within a cycle.
    let eligible = state.eligible_for_increase.get_mut(lift);
    *eligible = *eligible && outcome.failed_sets.is_empty();

    // One entry per calendar day for the whole state, last write wins
    let key = day_key(now.date_naive());
    if state.history.insert(key.clone(), entry).is_some() {
        tracing::debug!("Replaced existing history entry for {}", key);
    }

    state.current_lift = lift.next();

    // The week only advances after the last lift in the rotation
    if lift == *Lift::ROTATION.last().unwrap_or(&Lift::Squat) {
        state.current_week += 1;
        if state.current_week > 4 {
            state.current_week = 1;
            apply_cycle_boundary(state);
        }
    }

    tracing::info!(
        "Recorded {} week {} session; next up {} week {}",
        lift,
        week,
        state.current_lift,
        state.current_week
    );
}

/// End of a 4-week cycle: bump every still-eligible training max by its
/// lift-specific increment, then reset all flags for the new cycle.
fn apply_cycle_boundary(state: &mut WorkoutState) {
    for lift in Lift::ROTATION {
        if *state.eligible_for_increase.get(lift) {
            let max = state.maxes.get_mut(lift);
            *max += lift.increment();
            tracing::info!("Cycle boundary: {} training max now {}", lift, *max);
        } else {
            tracing::info!("Cycle boundary: {} had a failed set, max unchanged", lift);
        }
    }
    state.eligible_for_increase = crate::LiftMap::from_fn(|_| true);
}
