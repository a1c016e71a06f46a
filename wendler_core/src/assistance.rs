//! Built-in assistance exercise catalog.
//!
//! Each main lift has a fixed menu of assistance exercises the user can
//! pick preferred movements from. Selection is display-only; the
//! progression logic never consults it.

use crate::{Lift, LiftMap};
use once_cell::sync::Lazy;

/// Cached catalog - built once and reused across all operations
static ASSISTANCE_CATALOG: Lazy<LiftMap<Vec<String>>> = Lazy::new(build_catalog);

fn build_catalog() -> LiftMap<Vec<String>> {
    let owned = |names: &[&str]| names.iter().map(|s| (*s).to_string()).collect();

    LiftMap {
        press: owned(&[
            "Dip",
            "Chin-Ups",
            "Dumbbell Shoulder Press",
            "Push Press",
            "Lateral Raises",
            "Front Raises",
            "Face Pulls",
            "Upright Rows",
            "Tricep Pushdowns",
            "Band Pull-Aparts",
            "Rear Delt Flies",
            "Shrugs",
        ]),
        deadlift: owned(&[
            "Good Mornings",
            "Hanging Leg Raises",
            "Back Extensions",
            "Barbell Rows",
            "Pull-Ups/Lat Pulldowns",
            "Face Pulls",
            "Planks",
            "Cable Rows",
            "Reverse Hyperextensions",
            "Farmer's Walks",
        ]),
        bench: owned(&[
            "Dumbbell Chest Press",
            "Dumbbell Rows",
            "Incline Bench Press",
            "Close-Grip Bench Press",
            "Tricep Pushdowns",
            "Tricep Extensions",
            "Dips",
            "Push-Ups",
            "Lateral Raises",
            "Face Pulls",
            "Band Pull-Aparts",
        ]),
        squat: owned(&[
            "Leg Press",
            "Leg Curls",
            "Bulgarian Split Squats",
            "Leg Extensions",
            "Romanian Deadlifts",
            "Walking Lunges",
            "Calf Raises",
            "Goblet Squats",
            "Hip Thrusts",
            "Ab Wheel Rollouts",
        ]),
    }
}

/// All assistance options for a lift
pub fn assistance_options(lift: Lift) -> &'static [String] {
    ASSISTANCE_CATALOG.get(lift)
}

/// Default preferred picks for a fresh state (first two options per lift)
pub fn default_preferred() -> LiftMap<Vec<String>> {
    LiftMap::from_fn(|lift| assistance_options(lift).iter().take(2).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_lift_has_options() {
        for lift in Lift::ROTATION {
            assert!(!assistance_options(lift).is_empty());
        }
    }

    #[test]
    fn test_default_preferred_within_capacity() {
        let preferred = default_preferred();
        for (lift, picks) in preferred.iter() {
            assert!(picks.len() <= 3, "{} preferred list over capacity", lift);
            for pick in picks {
                assert!(assistance_options(lift).contains(pick));
            }
        }
    }

    #[test]
    fn test_default_preferred_values() {
        let preferred = default_preferred();
        assert_eq!(preferred.squat, vec!["Leg Press", "Leg Curls"]);
        assert_eq!(preferred.press, vec!["Dip", "Chin-Ups"]);
    }
}
