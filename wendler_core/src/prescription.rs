//! Weekly set prescription table.
//!
//! Maps a week number (1-4) to the fixed three-set percentage/rep scheme
//! and derives concrete weights from a training max. Pure functions, no
//! side effects.

use serde::{Deserialize, Serialize};

/// One prescribed set, as a fraction of the training max.
///
/// The final set of weeks 1-3 is AMRAP ("as many reps as possible"):
/// `reps` is then the minimum, not a ceiling. Week 4 (deload) has no
/// AMRAP set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetTemplate {
    pub percentage: f64,
    pub reps: u32,
    pub amrap: bool,
}

impl SetTemplate {
    const fn new(percentage: f64, reps: u32, amrap: bool) -> Self {
        SetTemplate {
            percentage,
            reps,
            amrap,
        }
    }
}

/// A set template combined with a training max into a concrete weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrescribedSet {
    pub weight: u32,
    pub percentage: f64,
    pub reps: u32,
    pub amrap: bool,
}

/// The set templates for a given week of the cycle.
///
/// Weeks outside 1-4 yield an empty list. That is a defensive default for
/// a manually overridden week, not an error.
pub fn workout_sets(week: u8) -> Vec<SetTemplate> {
    match week {
        1 => vec![
            SetTemplate::new(0.65, 5, false),
            SetTemplate::new(0.75, 5, false),
            SetTemplate::new(0.85, 5, true),
        ],
        2 => vec![
            SetTemplate::new(0.70, 3, false),
            SetTemplate::new(0.80, 3, false),
            SetTemplate::new(0.90, 3, true),
        ],
        3 => vec![
            SetTemplate::new(0.75, 5, false),
            SetTemplate::new(0.85, 3, false),
            SetTemplate::new(0.95, 1, true),
        ],
        // Deload week: reduced percentages, no AMRAP
        4 => vec![
            SetTemplate::new(0.40, 5, false),
            SetTemplate::new(0.50, 5, false),
            SetTemplate::new(0.60, 5, false),
        ],
        _ => Vec::new(),
    }
}

/// Derived weight for one set, rounded to the nearest whole pound
pub fn prescribed_weight(training_max: f64, percentage: f64) -> u32 {
    (training_max * percentage).round().max(0.0) as u32
}

/// The full prescription for a week against a training max
pub fn prescribe(week: u8, training_max: f64) -> Vec<PrescribedSet> {
    workout_sets(week)
        .into_iter()
        .map(|t| PrescribedSet {
            weight: prescribed_weight(training_max, t.percentage),
            percentage: t.percentage,
            reps: t.reps,
            amrap: t.amrap,
        })
        .collect()
}
