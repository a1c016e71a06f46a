//! History store helpers: calendar-day keys and CSV export.
//!
//! History lives inside [`crate::WorkoutState`] as a `BTreeMap` keyed by an
//! 8-character local-date string, so enumeration is already in day order.
//! This module owns the key derivation and a flat CSV export of the log.

use crate::{HistoryEntry, Result, WorkoutState};
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;

/// Day key for a calendar date: `YYYYMMDD`.
///
/// Callers must pass the *local* date (`now.date_naive()` on a
/// `DateTime<Local>`), never a UTC date, so day boundaries follow the
/// user's midnight.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    day: &'a str,
    date: String,
    lift: &'static str,
    week: u8,
    training_max: f64,
    duration_seconds: u64,
    completed_sets: String,
    failed_sets: String,
    completed_assistance: String,
}

impl<'a> CsvRow<'a> {
    fn new(day: &'a str, entry: &HistoryEntry) -> Self {
        let join_indices = |v: &[usize]| {
            v.iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        CsvRow {
            day,
            date: entry.date.to_rfc3339(),
            lift: entry.lift.name(),
            week: entry.week,
            training_max: entry.training_max,
            duration_seconds: entry.duration_seconds,
            completed_sets: join_indices(&entry.main_sets.completed),
            failed_sets: join_indices(&entry.main_sets.failed),
            completed_assistance: entry.completed_assistance.join("; "),
        }
    }
}

/// Export the whole history to a CSV file, one row per day, oldest first.
///
/// The file is created or truncated, flushed, and fsynced before this
/// returns. Returns the number of rows written.
pub fn history_to_csv(state: &WorkoutState, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    for (day, entry) in &state.history {
        writer.serialize(CsvRow::new(day, entry))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} history rows to {:?}", state.history.len(), path);
    Ok(state.history.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record_workout, Maxes, SessionOutcome};
    use chrono::{Duration, Local, TimeZone};

    #[test]
    fn test_day_key_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(day_key(date), "20240307");

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(day_key(date), "20241231");
    }

    #[test]
    fn test_day_key_uses_local_calendar_date() {
        let late_evening = Local.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap();
        assert_eq!(day_key(late_evening.date_naive()), "20240601");
    }

    fn recorded_state(sessions: usize) -> WorkoutState {
        let mut state = WorkoutState::default();
        state.set_maxes(Maxes {
            press: 130.0,
            deadlift: 350.0,
            bench: 200.0,
            squat: 300.0,
        });
        let outcome = SessionOutcome {
            duration_seconds: 1800,
            completed_sets: vec![0, 1, 2],
            ..SessionOutcome::default()
        };
        let start = Local.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        for n in 0..sessions {
            record_workout(&mut state, &outcome, start + Duration::days(n as i64));
        }
        state
    }

    #[test]
    fn test_history_enumerates_in_day_order() {
        let state = recorded_state(5);
        let keys: Vec<&String> = state.history.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_csv_export_rows_and_headers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let state = recorded_state(3);
        let count = history_to_csv(&state, &csv_path).unwrap();
        assert_eq!(count, 3);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("day,date,lift,week"));
        assert!(contents.contains("press"));
        assert!(contents.contains("20240101"));

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 3);
    }

    #[test]
    fn test_csv_export_empty_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let count = history_to_csv(&WorkoutState::default(), &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }
}
