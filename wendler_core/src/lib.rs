#![forbid(unsafe_code)]

//! Core domain model and business logic for the Wendler 5/3/1 tracker.
//!
//! This crate provides:
//! - Domain types (lifts, training maxes, sessions, history entries)
//! - The weekly set prescription table
//! - The progression state machine (lift rotation, week cycle, TM increments)
//! - History store with calendar-day keys and CSV export
//! - Snapshot import/export with validation
//! - Persistence (locked, atomic JSON state file)

pub mod types;
pub mod error;
pub mod assistance;
pub mod config;
pub mod logging;
pub mod prescription;
pub mod state;
pub mod session;
pub mod history;
pub mod snapshot;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use assistance::{assistance_options, default_preferred};
pub use config::Config;
pub use prescription::{prescribe, prescribed_weight, workout_sets, PrescribedSet, SetTemplate};
pub use state::WorkoutState;
pub use session::record_workout;
pub use history::{day_key, history_to_csv};
pub use snapshot::{apply_snapshot, export_json, import_json, StateSnapshot};
