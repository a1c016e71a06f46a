//! Full-state snapshot import/export.
//!
//! Export writes the whole state as pretty JSON for download/backup.
//! Import is a trust boundary: the snapshot is parsed, then validated and
//! sanitized, and only then merged over the current state. A snapshot that
//! fails parsing or validation is rejected whole and the prior state is
//! untouched. Fields absent from the snapshot leave the current state
//! as-is.

use crate::state::ASSISTANCE_CAPACITY;
use crate::{Error, HistoryEntry, Lift, LiftMap, Maxes, Result, WeightUnit, WorkoutState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A partial state snapshot. Every field is optional; missing fields are
/// left untouched on apply.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSnapshot {
    pub maxes: Option<Maxes>,
    pub eligible_for_increase: Option<LiftMap<bool>>,
    pub current_lift: Option<Lift>,
    pub current_week: Option<u8>,
    pub weight_unit: Option<WeightUnit>,
    pub is_onboarded: Option<bool>,
    pub preferred_assistance: Option<LiftMap<Vec<String>>>,
    pub history: Option<BTreeMap<String, HistoryEntry>>,
}

/// Serialize the full state as a pretty JSON document
pub fn export_json(state: &WorkoutState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parse and validate a snapshot document.
///
/// Domain checks applied after parsing:
/// - `current_week` must be 1-4
/// - training maxes must be finite and non-negative
/// - preferred assistance lists are truncated to capacity
/// - history keys that are not 8-digit day keys are dropped with a warning
pub fn import_json(text: &str) -> Result<StateSnapshot> {
    let snapshot: StateSnapshot = serde_json::from_str(text)
        .map_err(|e| Error::Import(format!("invalid snapshot JSON: {}", e)))?;
    sanitize(snapshot)
}

fn sanitize(mut snapshot: StateSnapshot) -> Result<StateSnapshot> {
    if let Some(week) = snapshot.current_week {
        if !(1..=4).contains(&week) {
            return Err(Error::Import(format!("week out of range: {}", week)));
        }
    }

    if let Some(ref maxes) = snapshot.maxes {
        for (lift, max) in maxes.iter() {
            if !max.is_finite() || *max < 0.0 {
                return Err(Error::Import(format!(
                    "invalid training max for {}: {}",
                    lift, max
                )));
            }
        }
    }

    if let Some(ref mut preferred) = snapshot.preferred_assistance {
        for lift in Lift::ROTATION {
            let list = preferred.get_mut(lift);
            if list.len() > ASSISTANCE_CAPACITY {
                tracing::warn!(
                    "Truncating preferred assistance for {} from {} to {}",
                    lift,
                    list.len(),
                    ASSISTANCE_CAPACITY
                );
                list.truncate(ASSISTANCE_CAPACITY);
            }
        }
    }

    if let Some(ref mut history) = snapshot.history {
        let before = history.len();
        history.retain(|key, _| key.len() == 8 && key.bytes().all(|b| b.is_ascii_digit()));
        let dropped = before - history.len();
        if dropped > 0 {
            tracing::warn!("Dropped {} history entries with malformed day keys", dropped);
        }
    }

    Ok(snapshot)
}

/// Merge a validated snapshot over the current state. Fields the snapshot
/// does not carry keep their current values.
pub fn apply_snapshot(state: &mut WorkoutState, snapshot: StateSnapshot) {
    if let Some(maxes) = snapshot.maxes {
        state.maxes = maxes;
    }
    if let Some(eligible) = snapshot.eligible_for_increase {
        state.eligible_for_increase = eligible;
    }
    if let Some(lift) = snapshot.current_lift {
        state.current_lift = lift;
    }
    if let Some(week) = snapshot.current_week {
        state.current_week = week;
    }
    if let Some(unit) = snapshot.weight_unit {
        state.weight_unit = unit;
    }
    if let Some(onboarded) = snapshot.is_onboarded {
        state.is_onboarded = onboarded;
    }
    if let Some(preferred) = snapshot.preferred_assistance {
        state.preferred_assistance = preferred;
    }
    if let Some(history) = snapshot.history {
        state.history = history;
    }
    tracing::info!("Applied imported snapshot");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_import_roundtrip() {
        let mut state = WorkoutState::default();
        state.set_maxes(Maxes {
            press: 130.0,
            deadlift: 350.0,
            bench: 200.0,
            squat: 300.0,
        });
        state.set_current_week(3);
        state.set_current_lift(Lift::Bench);

        let json = export_json(&state).unwrap();
        let snapshot = import_json(&json).unwrap();

        let mut restored = WorkoutState::default();
        apply_snapshot(&mut restored, snapshot);

        assert_eq!(restored.maxes, state.maxes);
        assert_eq!(restored.current_week, 3);
        assert_eq!(restored.current_lift, Lift::Bench);
        assert!(restored.is_onboarded);
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let err = import_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    #[test]
    fn test_week_out_of_range_rejected() {
        assert!(import_json(r#"{"current_week": 0}"#).is_err());
        assert!(import_json(r#"{"current_week": 5}"#).is_err());
        assert!(import_json(r#"{"current_week": 4}"#).is_ok());
    }

    #[test]
    fn test_negative_max_rejected() {
        let json = r#"{"maxes":{"press":130.0,"deadlift":-1.0,"bench":200.0,"squat":300.0}}"#;
        let err = import_json(json).unwrap_err();
        assert!(err.to_string().contains("deadlift"));
    }

    #[test]
    fn test_unknown_lift_rejected_at_parse() {
        assert!(import_json(r#"{"current_lift": "curl"}"#).is_err());
    }

    #[test]
    fn test_oversized_assistance_truncated() {
        let json = r#"{"preferred_assistance":{
            "press":["A","B","C","D","E"],
            "deadlift":[],"bench":[],"squat":[]}}"#;
        let snapshot = import_json(json).unwrap();
        assert_eq!(snapshot.preferred_assistance.unwrap().press.len(), 3);
    }

    #[test]
    fn test_malformed_history_keys_dropped() {
        let entry = r#"{"date":"2024-01-01T09:00:00-05:00","lift":"press","week":1,
            "training_max":130.0,"duration_seconds":0,
            "selected_assistance":[],"completed_assistance":[],
            "main_sets":{"completed":[0,1,2],"failed":[]}}"#;
        let json = format!(
            r#"{{"history":{{"20240101":{e},"not-a-day":{e},"202401":{e}}}}}"#,
            e = entry
        );

        let snapshot = import_json(&json).unwrap();
        let history = snapshot.history.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history.contains_key("20240101"));
    }

    #[test]
    fn test_absent_fields_leave_state_untouched() {
        let mut state = WorkoutState::default();
        state.set_maxes(Maxes {
            press: 130.0,
            deadlift: 350.0,
            bench: 200.0,
            squat: 300.0,
        });
        state.set_current_week(2);

        let snapshot = import_json(r#"{"current_week": 4}"#).unwrap();
        apply_snapshot(&mut state, snapshot);

        assert_eq!(state.current_week, 4);
        // Everything else untouched
        assert_eq!(*state.maxes.get(Lift::Press), 130.0);
        assert!(state.is_onboarded);
    }
}
