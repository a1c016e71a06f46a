//! Progression state: the durable record and its mutation operations.
//!
//! `WorkoutState` is the sole unit of persistence. It is mutated through a
//! small set of transition functions (plus [`crate::record_workout`]) and
//! saved to a single JSON file with file locking and atomic replacement.

use crate::{default_preferred, Error, HistoryEntry, Lift, LiftMap, Maxes, Result, WeightUnit};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Maximum preferred assistance exercises per lift
pub const ASSISTANCE_CAPACITY: usize = 3;

const STATE_VERSION: u32 = 1;

/// The whole persistent state of the tracker.
///
/// Every field carries a serde default so snapshots written by older
/// versions load cleanly, missing fields falling back instead of failing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkoutState {
    pub version: u32,
    /// Training maxes in pounds. All zero until onboarding.
    pub maxes: Maxes,
    /// Per-lift flag: no failed main set so far in the current 4-week cycle.
    /// Monotone-decreasing within a cycle, reset to true at each boundary.
    pub eligible_for_increase: LiftMap<bool>,
    pub current_lift: Lift,
    pub current_week: u8,
    pub weight_unit: WeightUnit,
    pub is_onboarded: bool,
    pub preferred_assistance: LiftMap<Vec<String>>,
    /// One entry per local calendar day, keyed YYYYMMDD. BTreeMap keeps
    /// enumeration in day order.
    pub history: BTreeMap<String, HistoryEntry>,
}

impl Default for WorkoutState {
    fn default() -> Self {
        WorkoutState {
            version: STATE_VERSION,
            maxes: Maxes::default(),
            eligible_for_increase: LiftMap::from_fn(|_| true),
            current_lift: Lift::ROTATION[0],
            current_week: 1,
            weight_unit: WeightUnit::Lbs,
            is_onboarded: false,
            preferred_assistance: default_preferred(),
            history: BTreeMap::new(),
        }
    }
}

impl WorkoutState {
    /// Replace all four training maxes unconditionally and mark the user
    /// onboarded. Positivity is a caller-side precondition, not enforced
    /// here.
    pub fn set_maxes(&mut self, maxes: Maxes) {
        self.maxes = maxes;
        self.is_onboarded = true;
    }

    /// Manual week override. Bypasses the automatic rotation; no range
    /// check (an out-of-range week prescribes an empty set list).
    pub fn set_current_week(&mut self, week: u8) {
        self.current_week = week;
    }

    /// Manual lift override. Bypasses the automatic rotation and can
    /// desynchronize `eligible_for_increase` from the session history.
    pub fn set_current_lift(&mut self, lift: Lift) {
        self.current_lift = lift;
    }

    pub fn set_weight_unit(&mut self, unit: WeightUnit) {
        self.weight_unit = unit;
    }

    /// Toggle an exercise on a lift's preferred list.
    ///
    /// Removes it if present; appends it if the list has room. A toggle-on
    /// at capacity is silently ignored.
    pub fn toggle_preferred_assistance(&mut self, lift: Lift, exercise: &str) {
        let list = self.preferred_assistance.get_mut(lift);
        if let Some(pos) = list.iter().position(|e| e == exercise) {
            list.remove(pos);
        } else if list.len() < ASSISTANCE_CAPACITY {
            list.push(exercise.to_string());
        } else {
            tracing::debug!(
                "Preferred assistance for {} at capacity, ignoring {}",
                lift,
                exercise
            );
        }
    }

    /// History entry for a day key, if one was recorded
    pub fn entry_for_day(&self, day_key: &str) -> Option<&HistoryEntry> {
        self.history.get(day_key)
    }

    /// Whether a session was already recorded on the given day
    pub fn trained_on(&self, day_key: &str) -> bool {
        self.history.contains_key(day_key)
    }

    /// Load state from a file with shared locking.
    ///
    /// Returns default state if the file doesn't exist. A corrupted or
    /// unreadable file logs a warning and also yields the default state;
    /// startup never hard-fails on bad local data.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open state file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read state file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<WorkoutState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save state to a file with exclusive locking.
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames
    /// over the original so a crash can never leave a half-written state.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "state path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut WorkoutState) -> Result<()>,
    {
        let mut state = Self::load(path)?;
        f(&mut state)?;
        state.save(path)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_shape() {
        let state = WorkoutState::default();
        assert_eq!(state.current_lift, Lift::Press);
        assert_eq!(state.current_week, 1);
        assert!(!state.is_onboarded);
        assert!(state.eligible_for_increase.iter().all(|(_, e)| *e));
        assert_eq!(*state.maxes.get(Lift::Squat), 0.0);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_set_maxes_marks_onboarded() {
        let mut state = WorkoutState::default();
        state.set_maxes(Maxes {
            press: 130.0,
            deadlift: 350.0,
            bench: 200.0,
            squat: 300.0,
        });
        assert!(state.is_onboarded);
        assert_eq!(*state.maxes.get(Lift::Deadlift), 350.0);
    }

    #[test]
    fn test_toggle_assistance_add_remove() {
        let mut state = WorkoutState::default();
        state.preferred_assistance.squat.clear();

        state.toggle_preferred_assistance(Lift::Squat, "Leg Press");
        assert_eq!(state.preferred_assistance.squat, vec!["Leg Press"]);

        // Toggling again removes it
        state.toggle_preferred_assistance(Lift::Squat, "Leg Press");
        assert!(state.preferred_assistance.squat.is_empty());
    }

    #[test]
    fn test_toggle_assistance_capacity_is_noop() {
        let mut state = WorkoutState::default();
        state.preferred_assistance.bench.clear();
        for exercise in ["A", "B", "C"] {
            state.toggle_preferred_assistance(Lift::Bench, exercise);
        }
        assert_eq!(state.preferred_assistance.bench.len(), 3);

        // Fourth distinct exercise at capacity: silently ignored
        state.toggle_preferred_assistance(Lift::Bench, "D");
        assert_eq!(state.preferred_assistance.bench, vec!["A", "B", "C"]);

        // But removing one of the existing entries still works
        state.toggle_preferred_assistance(Lift::Bench, "B");
        assert_eq!(state.preferred_assistance.bench, vec!["A", "C"]);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        let mut state = WorkoutState::default();
        state.set_maxes(Maxes {
            press: 117.0,
            deadlift: 315.0,
            bench: 180.0,
            squat: 283.0,
        });
        state.set_current_week(3);
        state.set_current_lift(Lift::Bench);

        state.save(&state_path).unwrap();
        let loaded = WorkoutState::load(&state_path).unwrap();

        assert_eq!(loaded, state);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state = WorkoutState::load(&temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(state, WorkoutState::default());
    }

    #[test]
    fn test_corrupted_state_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("corrupted.json");
        std::fs::write(&state_path, "{ invalid json }").unwrap();

        let state = WorkoutState::load(&state_path).unwrap();
        assert_eq!(state, WorkoutState::default());
    }

    #[test]
    fn test_older_snapshot_missing_fields_loads() {
        // A minimal pre-versioning snapshot: absent fields must default
        let json = r#"{"maxes":{"press":117.0,"deadlift":315.0,"bench":180.0,"squat":283.0},"current_lift":"bench","current_week":2}"#;
        let state: WorkoutState = serde_json::from_str(json).unwrap();

        assert_eq!(state.current_lift, Lift::Bench);
        assert_eq!(state.current_week, 2);
        assert_eq!(state.version, 1);
        assert!(state.eligible_for_increase.iter().all(|(_, e)| *e));
        assert_eq!(state.weight_unit, WeightUnit::Lbs);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        WorkoutState::default().save(&state_path).unwrap();

        WorkoutState::update(&state_path, |state| {
            state.set_current_week(4);
            Ok(())
        })
        .unwrap();

        let loaded = WorkoutState::load(&state_path).unwrap();
        assert_eq!(loaded.current_week, 4);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_path = temp_dir.path().join("state.json");

        WorkoutState::default().save(&state_path).unwrap();

        assert!(state_path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "state.json")
            .collect();
        assert!(extras.is_empty(), "found stray files: {:?}", extras);
    }
}
