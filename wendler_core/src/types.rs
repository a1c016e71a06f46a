//! Core domain types for the Wendler 5/3/1 tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - The four barbell lifts and their fixed rotation order
//! - Per-lift records (training maxes, eligibility flags, assistance picks)
//! - Weight units
//! - Session outcomes and history entries

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Lifts
// ============================================================================

/// One of the four main barbell lifts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Lift {
    Press,
    Deadlift,
    Bench,
    Squat,
}

impl Lift {
    /// The fixed training rotation. One session per lift, in this order,
    /// then the week advances. The order is load-bearing: the week only
    /// increments after the last lift in this array.
    pub const ROTATION: [Lift; 4] = [Lift::Press, Lift::Deadlift, Lift::Bench, Lift::Squat];

    /// The lift trained in the session after this one
    pub fn next(self) -> Lift {
        let idx = Self::ROTATION
            .iter()
            .position(|l| *l == self)
            .unwrap_or(0);
        Self::ROTATION[(idx + 1) % Self::ROTATION.len()]
    }

    /// End-of-cycle training max increment in pounds.
    ///
    /// Upper-body lifts move up by 5, lower-body lifts by 10.
    pub fn increment(self) -> f64 {
        match self {
            Lift::Press | Lift::Bench => 5.0,
            Lift::Squat | Lift::Deadlift => 10.0,
        }
    }

    /// Human-readable lift name
    pub fn name(self) -> &'static str {
        match self {
            Lift::Press => "press",
            Lift::Deadlift => "deadlift",
            Lift::Bench => "bench",
            Lift::Squat => "squat",
        }
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() honors width flags so lift names line up in tables
        f.pad(self.name())
    }
}

impl FromStr for Lift {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "press" | "ohp" | "overhead_press" => Ok(Lift::Press),
            "deadlift" => Ok(Lift::Deadlift),
            "bench" => Ok(Lift::Bench),
            "squat" => Ok(Lift::Squat),
            other => Err(crate::Error::State(format!("unknown lift: {}", other))),
        }
    }
}

// ============================================================================
// Per-lift records
// ============================================================================

/// A record with one value per lift.
///
/// Used for training maxes (`LiftMap<f64>`), increase eligibility
/// (`LiftMap<bool>`) and preferred assistance (`LiftMap<Vec<String>>`).
/// All four lifts are always present.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LiftMap<T> {
    pub press: T,
    pub deadlift: T,
    pub bench: T,
    pub squat: T,
}

impl<T> LiftMap<T> {
    pub fn get(&self, lift: Lift) -> &T {
        match lift {
            Lift::Press => &self.press,
            Lift::Deadlift => &self.deadlift,
            Lift::Bench => &self.bench,
            Lift::Squat => &self.squat,
        }
    }

    pub fn get_mut(&mut self, lift: Lift) -> &mut T {
        match lift {
            Lift::Press => &mut self.press,
            Lift::Deadlift => &mut self.deadlift,
            Lift::Bench => &mut self.bench,
            Lift::Squat => &mut self.squat,
        }
    }

    /// Iterate entries in rotation order
    pub fn iter(&self) -> impl Iterator<Item = (Lift, &T)> {
        Lift::ROTATION.iter().map(move |l| (*l, self.get(*l)))
    }

    /// Build a record by evaluating a function per lift
    pub fn from_fn(mut f: impl FnMut(Lift) -> T) -> Self {
        LiftMap {
            press: f(Lift::Press),
            deadlift: f(Lift::Deadlift),
            bench: f(Lift::Bench),
            squat: f(Lift::Squat),
        }
    }
}

/// Training maxes in pounds, one per lift. Zero means "not yet onboarded".
pub type Maxes = LiftMap<f64>;

// ============================================================================
// Weight units
// ============================================================================

const LBS_PER_KG: f64 = 2.204_622_6;

/// Display unit for weights. Storage is always pounds.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    /// Convert a stored weight (pounds) into this display unit
    pub fn from_lbs(self, lbs: f64) -> f64 {
        match self {
            WeightUnit::Lbs => lbs,
            WeightUnit::Kg => lbs / LBS_PER_KG,
        }
    }

    /// Convert a user-entered weight in this unit into pounds for storage
    pub fn to_lbs(self, value: f64) -> f64 {
        match self {
            WeightUnit::Lbs => value,
            WeightUnit::Kg => value * LBS_PER_KG,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "lbs" | "lb" | "pounds" => Ok(WeightUnit::Lbs),
            "kg" | "kgs" | "kilograms" => Ok(WeightUnit::Kg),
            other => Err(crate::Error::Config(format!("unknown weight unit: {}", other))),
        }
    }
}

// ============================================================================
// Sessions and history
// ============================================================================

/// Resolution of the three main sets of a session.
///
/// Indices 0-2; the caller guarantees the two sets are disjoint and
/// together cover all three indices before a session is recorded.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MainSets {
    pub completed: Vec<usize>,
    pub failed: Vec<usize>,
}

/// What happened in the session being finalized
#[derive(Clone, Debug, Default)]
pub struct SessionOutcome {
    /// Seconds spent, 0 if the timer was not used
    pub duration_seconds: u64,
    /// Snapshot of the preferred assistance list at completion time
    pub selected_assistance: Vec<String>,
    /// Subset of assistance actually performed
    pub completed_assistance: Vec<String>,
    pub completed_sets: Vec<usize>,
    pub failed_sets: Vec<usize>,
}

/// One recorded session, keyed in history by its local calendar day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub date: DateTime<Local>,
    pub lift: Lift,
    pub week: u8,
    /// Training max for the lift at the time the session was recorded
    pub training_max: f64,
    pub duration_seconds: u64,
    pub selected_assistance: Vec<String>,
    pub completed_assistance: Vec<String>,
    pub main_sets: MainSets,
}
