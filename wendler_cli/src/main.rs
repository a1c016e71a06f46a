use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wendler_core::*;

#[derive(Parser)]
#[command(name = "wendler")]
#[command(about = "5/3/1 strength progression tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set training maxes for all four lifts
    Onboard {
        #[arg(long)]
        press: f64,
        #[arg(long)]
        deadlift: f64,
        #[arg(long)]
        bench: f64,
        #[arg(long)]
        squat: f64,

        /// Inputs are true one-rep maxes; store 90% as the training max
        #[arg(long)]
        actual: bool,

        /// Unit the inputs are given in (lbs or kg); also becomes the
        /// display unit
        #[arg(long)]
        unit: Option<String>,
    },

    /// Show the current session prescription (default)
    Status,

    /// Record the session in progress
    Record {
        /// Session duration in seconds (0 if untimed)
        #[arg(long, default_value_t = 0)]
        duration: u64,

        /// Comma-separated completed main-set indices (0-2)
        #[arg(long, default_value = "")]
        completed: String,

        /// Comma-separated failed main-set indices (0-2)
        #[arg(long, default_value = "")]
        failed: String,

        /// Assistance exercise actually performed (repeatable)
        #[arg(long = "assistance")]
        assistance: Vec<String>,
    },

    /// List recorded sessions
    History {
        /// Show only the most recent N entries
        #[arg(long)]
        limit: Option<usize>,

        /// Export the full history to a CSV file instead of listing
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Export the full state as a JSON snapshot
    Export {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import a JSON snapshot, replacing the fields it carries
    Import {
        /// Snapshot file to import
        input: PathBuf,
    },

    /// Manually override the current week (1-4)
    SetWeek {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        week: u8,
    },

    /// Manually override the current lift
    SetLift { lift: String },

    /// Manage preferred assistance exercises
    Assistance {
        #[command(subcommand)]
        command: AssistanceCommands,
    },
}

#[derive(Subcommand)]
enum AssistanceCommands {
    /// Show the assistance catalog and current preferred picks
    List,

    /// Toggle an exercise on a lift's preferred list (capacity 3)
    Toggle { lift: String, exercise: String },
}

fn main() -> Result<()> {
    wendler_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let state_path = data_dir.join("state.json");

    match cli.command {
        Some(Commands::Onboard {
            press,
            deadlift,
            bench,
            squat,
            actual,
            unit,
        }) => cmd_onboard(
            &state_path,
            [press, deadlift, bench, squat],
            actual,
            unit,
            &config,
        ),
        Some(Commands::Status) | None => cmd_status(&state_path),
        Some(Commands::Record {
            duration,
            completed,
            failed,
            assistance,
        }) => cmd_record(&state_path, duration, &completed, &failed, assistance),
        Some(Commands::History { limit, csv }) => cmd_history(&state_path, limit, csv),
        Some(Commands::Export { output }) => cmd_export(&state_path, output),
        Some(Commands::Import { input }) => cmd_import(&state_path, &input),
        Some(Commands::SetWeek { week }) => cmd_set_week(&state_path, week),
        Some(Commands::SetLift { lift }) => cmd_set_lift(&state_path, &lift),
        Some(Commands::Assistance { command }) => match command {
            AssistanceCommands::List => cmd_assistance_list(&state_path),
            AssistanceCommands::Toggle { lift, exercise } => {
                cmd_assistance_toggle(&state_path, &lift, &exercise)
            }
        },
    }
}

fn cmd_onboard(
    state_path: &std::path::Path,
    values: [f64; 4],
    actual: bool,
    unit: Option<String>,
    config: &Config,
) -> Result<()> {
    let [press, deadlift, bench, squat] = values;

    // Caller-side precondition: navigation past onboarding requires all
    // maxes positive
    if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(Error::Config("all training maxes must be positive".into()));
    }

    let unit = match unit {
        Some(s) => s.parse::<WeightUnit>()?,
        None => config.display.weight_unit,
    };

    // Store pounds internally; an actual 1RM is discounted to a 90%
    // training max
    let factor = if actual { 0.9 } else { 1.0 };
    let to_stored = |v: f64| unit.to_lbs(v) * factor;

    let mut state = WorkoutState::load(state_path)?;
    state.set_maxes(Maxes {
        press: to_stored(press),
        deadlift: to_stored(deadlift),
        bench: to_stored(bench),
        squat: to_stored(squat),
    });
    state.set_weight_unit(unit);
    state.save(state_path)?;

    println!("Training maxes set ({}):", unit.label());
    for (lift, max) in state.maxes.iter() {
        println!("  {:<9} {}", lift, display_weight(*max, unit));
    }
    println!("\nUp next: {} day, week {}", state.current_lift, state.current_week);
    Ok(())
}

fn cmd_status(state_path: &std::path::Path) -> Result<()> {
    let state = WorkoutState::load(state_path)?;

    if !state.is_onboarded {
        println!("Not onboarded yet. Run `wendler onboard` to set training maxes.");
        return Ok(());
    }

    let unit = state.weight_unit;
    let week_display = if state.current_week == 4 {
        "Deload Week".to_string()
    } else {
        format!("Week {}", state.current_week)
    };

    println!("{} Day - {}", capitalize(state.current_lift.name()), week_display);
    println!();

    let training_max = *state.maxes.get(state.current_lift);
    for (i, set) in prescribe(state.current_week, training_max).iter().enumerate() {
        let reps = if set.amrap {
            format!("{}+", set.reps)
        } else {
            set.reps.to_string()
        };
        println!(
            "  Set {}: {} {} x {}  ({:.0}%)",
            i + 1,
            display_weight(set.weight as f64, unit),
            unit.label(),
            reps,
            set.percentage * 100.0
        );
    }

    println!();
    println!("Assistance (preferred):");
    for exercise in state.preferred_assistance.get(state.current_lift) {
        println!("  - {}", exercise);
    }

    let today = day_key(Local::now().date_naive());
    if let Some(entry) = state.entry_for_day(&today) {
        println!();
        println!(
            "Already trained today: {} week {} ({} sets completed)",
            entry.lift,
            entry.week,
            entry.main_sets.completed.len()
        );
    }

    Ok(())
}

fn cmd_record(
    state_path: &std::path::Path,
    duration: u64,
    completed: &str,
    failed: &str,
    assistance: Vec<String>,
) -> Result<()> {
    let mut state = WorkoutState::load(state_path)?;

    if !state.is_onboarded {
        return Err(Error::State(
            "not onboarded; run `wendler onboard` first".into(),
        ));
    }

    let completed_sets = parse_indices(completed)?;
    let failed_sets = parse_indices(failed)?;

    // Completeness check: every set 0-2 resolved exactly once. The core
    // transition assumes this and does not re-validate.
    let mut seen = [0u8; 3];
    for &i in completed_sets.iter().chain(failed_sets.iter()) {
        if i > 2 {
            return Err(Error::State(format!("set index out of range: {}", i)));
        }
        seen[i] += 1;
    }
    if seen != [1, 1, 1] {
        return Err(Error::State(
            "each main set 0-2 must be marked completed or failed exactly once".into(),
        ));
    }

    let now = Local::now();
    let today = day_key(now.date_naive());
    let replacing = state.trained_on(&today);

    let lift = state.current_lift;
    let week = state.current_week;
    let maxes_before = state.maxes.clone();

    let outcome = SessionOutcome {
        duration_seconds: duration,
        selected_assistance: state.preferred_assistance.get(lift).clone(),
        completed_assistance: assistance,
        completed_sets,
        failed_sets,
    };

    record_workout(&mut state, &outcome, now);
    state.save(state_path)?;

    if replacing {
        println!("Note: replaced the session already recorded today.");
    }
    println!("Recorded {} day, week {}.", lift, week);

    if state.maxes != maxes_before {
        println!("\nCycle complete! New training maxes:");
        for (l, max) in state.maxes.iter() {
            let before = *maxes_before.get(l);
            if *max != before {
                println!("  {:<9} {} -> {}", l, before, max);
            } else {
                println!("  {:<9} {} (unchanged, had a failed set)", l, max);
            }
        }
    }

    println!("Up next: {} day, week {}", state.current_lift, state.current_week);
    Ok(())
}

fn cmd_history(
    state_path: &std::path::Path,
    limit: Option<usize>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let state = WorkoutState::load(state_path)?;

    if let Some(csv_path) = csv {
        let count = history_to_csv(&state, &csv_path)?;
        println!("Exported {} sessions to {}", count, csv_path.display());
        return Ok(());
    }

    if state.history.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    let skip = limit
        .map(|n| state.history.len().saturating_sub(n))
        .unwrap_or(0);

    for (day, entry) in state.history.iter().skip(skip) {
        let failures = if entry.main_sets.failed.is_empty() {
            String::new()
        } else {
            format!("  ({} failed)", entry.main_sets.failed.len())
        };
        println!(
            "{}  {:<9} week {}  TM {}  {} min{}",
            day,
            entry.lift,
            entry.week,
            entry.training_max,
            entry.duration_seconds / 60,
            failures
        );
    }

    Ok(())
}

fn cmd_export(state_path: &std::path::Path, output: Option<PathBuf>) -> Result<()> {
    let state = WorkoutState::load(state_path)?;
    let json = export_json(&state)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Exported state to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_import(state_path: &std::path::Path, input: &std::path::Path) -> Result<()> {
    let text = std::fs::read_to_string(input)?;

    // Parse + validate before touching the current state; a bad snapshot
    // leaves everything as it was
    let snapshot = import_json(&text)?;

    let mut state = WorkoutState::load(state_path)?;
    apply_snapshot(&mut state, snapshot);
    state.save(state_path)?;

    println!("Imported snapshot from {}", input.display());
    println!("Up next: {} day, week {}", state.current_lift, state.current_week);
    Ok(())
}

fn cmd_set_week(state_path: &std::path::Path, week: u8) -> Result<()> {
    let state = WorkoutState::update(state_path, |state| {
        state.set_current_week(week);
        Ok(())
    })?;

    println!("Current week set to {}.", state.current_week);
    println!("Warning: manual overrides bypass the automatic rotation and can");
    println!("desynchronize increase eligibility from your session history.");
    Ok(())
}

fn cmd_set_lift(state_path: &std::path::Path, lift: &str) -> Result<()> {
    let lift: Lift = lift.parse()?;
    let state = WorkoutState::update(state_path, |state| {
        state.set_current_lift(lift);
        Ok(())
    })?;

    println!("Current lift set to {}.", state.current_lift);
    println!("Warning: manual overrides bypass the automatic rotation and can");
    println!("desynchronize increase eligibility from your session history.");
    Ok(())
}

fn cmd_assistance_list(state_path: &std::path::Path) -> Result<()> {
    let state = WorkoutState::load(state_path)?;

    for lift in Lift::ROTATION {
        println!("{}:", capitalize(lift.name()));
        let preferred = state.preferred_assistance.get(lift);
        for exercise in assistance_options(lift) {
            let marker = if preferred.contains(exercise) { "*" } else { " " };
            println!("  {} {}", marker, exercise);
        }
        println!();
    }
    println!("* preferred (up to 3 per lift)");
    Ok(())
}

fn cmd_assistance_toggle(state_path: &std::path::Path, lift: &str, exercise: &str) -> Result<()> {
    let lift: Lift = lift.parse()?;
    let state = WorkoutState::update(state_path, |state| {
        state.toggle_preferred_assistance(lift, exercise);
        Ok(())
    })?;

    println!("Preferred assistance for {}:", lift);
    for exercise in state.preferred_assistance.get(lift) {
        println!("  - {}", exercise);
    }
    Ok(())
}

fn parse_indices(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| Error::State(format!("invalid set index: {}", part)))
        })
        .collect()
}

fn display_weight(lbs: f64, unit: WeightUnit) -> i64 {
    unit.from_lbs(lbs).round() as i64
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
