// src/cli.rs
use chrono::{Duration, NaiveDate, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use fitness_tracker_lib::{Set, TimeRange};

#[derive(Parser, Debug)]
#[command(author, version, about = "Log workouts, manage templates and track body weight", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Answer yes to overwrite and delete confirmations
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryCli {
    Strength,
    Cardio,
    Flexibility,
    Other,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricCli {
    MaxWeight,
    Reps,
    Sets,
    Volume,
    OneRepMax,
    Duration,
    Distance,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatCli {
    Csv,
    Json,
}

// Custom parser for date strings and shorthands
pub fn parse_date_shorthand(s: &str) -> Result<NaiveDate, String> {
    match s.to_lowercase().as_str() {
        "today" => Ok(Utc::now().date_naive()),
        "yesterday" => Ok((Utc::now() - Duration::days(1)).date_naive()),
        _ => {
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(date)
            } else if let Ok(date) = NaiveDate::parse_from_str(s, "%d.%m.%Y") {
                Ok(date)
            } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y/%m/%d") {
                Ok(date)
            } else {
                Err(format!(
                    "Invalid date format: '{s}'. Use 'today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY, or YYYY/MM/DD."
                ))
            }
        }
    }
}

pub fn parse_set(s: &str) -> Result<Set, String> {
    s.parse::<Set>().map_err(|e| e.to_string())
}

pub fn parse_time_range(s: &str) -> Result<TimeRange, String> {
    s.parse::<TimeRange>()
}

/// Where an export goes: stdout by default.
#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, conflicts_with = "save")]
    pub output: Option<PathBuf>,
    /// Write to a file with the default export name in the current directory
    #[arg(long)]
    pub save: bool,
}

/// Filters shared by workout listing, history stats and history export.
#[derive(clap::Args, Debug, Clone)]
pub struct WorkoutFilterArgs {
    /// Text to look for in workout notes, exercise names and exercise notes
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only workouts containing this exercise
    #[arg(short, long)]
    pub exercise: Option<String>,
    /// Only workouts containing this exercise type
    #[arg(short = 't', long = "type", value_enum)]
    pub category: Option<CategoryCli>,
    /// Only workouts from the last N days
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,
    /// Only workouts on this date ('today', 'yesterday', YYYY-MM-DD, ...)
    #[arg(long, value_parser = parse_date_shorthand)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // --- Session ---
    /// Add an exercise to the current session
    Add {
        /// Name of the exercise (e.g., "Bench Press", "Running")
        #[arg(short, long)]
        exercise: String,
        /// Exercise type
        #[arg(short = 't', long = "type", value_enum, default_value = "strength")]
        category: CategoryCli,
        /// Number of sets (strength). Without --set values the sets are left to fill in
        #[arg(short, long)]
        sets: Option<usize>,
        /// A performed set as WEIGHTxREPS (e.g. 135x10). Repeat once per set
        #[arg(long = "set", value_name = "WEIGHTxREPS", value_parser = parse_set)]
        set_values: Vec<Set>,
        /// Duration in minutes
        #[arg(short, long)]
        duration: Option<f64>,
        /// Distance (miles or km, per configured units)
        #[arg(long)]
        distance: Option<f64>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Session date ('today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY)
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },
    /// Show the current session (loads a queued template first)
    Session {
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },
    /// Remove an exercise from the session by its number
    Remove {
        index: usize,
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },
    /// Fill in one set of a session exercise
    FillSet {
        /// Exercise number as shown by `session`
        exercise: usize,
        /// Set number within the exercise
        set: usize,
        /// WEIGHTxREPS, e.g. 135x10
        #[arg(value_parser = parse_set)]
        value: Set,
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },
    /// Discard every exercise in the session
    Clear {
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },
    /// Save the session as a workout
    SaveWorkout {
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },
    /// Queue a template for the next session, or load it right away with --now
    UseTemplate {
        /// Template name or id
        template: String,
        #[arg(long)]
        now: bool,
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
    },

    // --- Workouts ---
    /// List saved workouts, newest first
    List {
        #[command(flatten)]
        filters: WorkoutFilterArgs,
        /// Show only the last N workouts
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Show a saved workout in detail
    Show {
        /// Workout id (a unique prefix is enough)
        id: String,
    },
    /// Change the date or notes of a saved workout
    EditWorkout {
        id: String,
        #[arg(long, value_parser = parse_date_shorthand)]
        date: Option<NaiveDate>,
        /// New notes. An empty string clears them
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete one or more saved workouts
    DeleteWorkout {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Totals across saved workouts
    History {
        #[command(flatten)]
        filters: WorkoutFilterArgs,
    },

    // --- Templates ---
    /// Create a workout template
    TemplateCreate {
        #[arg(short, long)]
        name: String,
        /// Day of the week (monday..sunday)
        #[arg(long)]
        day: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// NAME[:TYPE[:SETS]], e.g. "Bench Press:strength:4". Repeat per exercise
        #[arg(short, long = "exercise", required = true)]
        exercises: Vec<String>,
        /// Replace an existing template with the same name
        #[arg(long)]
        replace: bool,
    },
    /// List templates
    TemplateList,
    /// Show one template
    TemplateShow { template: String },
    /// Rename a template or change its day or description
    TemplateEdit {
        template: String,
        #[arg(long)]
        name: Option<String>,
        /// Day of the week, or "none" to clear
        #[arg(long)]
        day: Option<String>,
        /// An empty string clears the description
        #[arg(long)]
        description: Option<String>,
    },
    /// Add an exercise to a template
    TemplateAddExercise {
        template: String,
        #[arg(short, long)]
        exercise: String,
        #[arg(short = 't', long = "type", value_enum, default_value = "strength")]
        category: CategoryCli,
        /// Number of sets (strength)
        #[arg(short, long)]
        sets: Option<usize>,
        #[arg(short, long)]
        duration: Option<f64>,
        #[arg(long)]
        distance: Option<f64>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Remove an exercise from a template by its number
    TemplateRemoveExercise { template: String, index: usize },
    /// Copy a template
    TemplateDuplicate { template: String },
    /// Delete a template
    TemplateDelete { template: String },
    /// Export one template, or all of them, as JSON
    TemplateExport {
        template: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Import templates from a JSON file
    TemplateImport { file: PathBuf },

    // --- Weight ---
    /// Log body weight and optional body composition for a day
    WeightAdd {
        weight: f64,
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
        /// Body fat percentage
        #[arg(long)]
        body_fat: Option<f64>,
        #[arg(long)]
        muscle_mass: Option<f64>,
        /// Height (inches or cm, per configured units)
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        chest: Option<f64>,
        #[arg(long)]
        arms: Option<f64>,
        #[arg(long)]
        thighs: Option<f64>,
        #[arg(long)]
        calories: Option<u32>,
        /// Water intake in ounces
        #[arg(long)]
        water: Option<u32>,
        #[arg(long)]
        sleep: Option<f64>,
        /// Stress level 1-10
        #[arg(long)]
        stress: Option<u8>,
        /// Energy level 1-10
        #[arg(long)]
        energy: Option<u8>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List weight entries, newest first
    WeightList {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_name = "N")]
        days: Option<u32>,
    },
    /// Delete a weight entry by date (YYYY-MM-DD) or id
    WeightDelete { entry: String },
    /// Current weight, total change and days tracked
    WeightSummary,
    /// Export weight entries
    WeightExport {
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatCli,
        #[command(flatten)]
        output: OutputArgs,
    },

    // --- Lift metrics ---
    /// List strength exercises with saved history
    Lifts,
    /// Analyze progress for one exercise
    Metrics {
        exercise: String,
        #[arg(short, long, value_enum, default_value = "max-weight")]
        metric: MetricCli,
        /// Number of days, or "all". Defaults to the configured range
        #[arg(short, long, value_parser = parse_time_range)]
        range: Option<TimeRange>,
    },
    /// Export per-session performance for one exercise as CSV
    MetricsExport {
        exercise: String,
        #[arg(short, long, value_parser = parse_time_range)]
        range: Option<TimeRange>,
        #[command(flatten)]
        output: OutputArgs,
    },

    // --- Export ---
    /// Export the current session as CSV
    ExportSession {
        #[arg(long, value_parser = parse_date_shorthand, default_value = "today")]
        date: NaiveDate,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Export saved workouts
    ExportHistory {
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatCli,
        #[command(flatten)]
        filters: WorkoutFilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    // --- Config ---
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Set the units used for labels and body weight validation
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Set how many sets a strength exercise gets when none are given
    SetDefaultSets { count: u32 },
    /// Set the default lift metrics range in days
    SetTimeRange {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },
    /// Generate a shell completion script
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn parses_add_with_sets() {
        let cli = Cli::try_parse_from([
            "fitness-tracker",
            "add",
            "-e",
            "Bench Press",
            "--set",
            "135x10",
            "--set",
            "145x8",
            "--date",
            "2024-01-15",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                exercise,
                category,
                set_values,
                date,
                ..
            } => {
                assert_eq!(exercise, "Bench Press");
                assert_eq!(category, CategoryCli::Strength);
                assert_eq!(set_values, vec![Set::new(135.0, 10), Set::new(145.0, 8)]);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_and_save_conflict() {
        let result = Cli::try_parse_from([
            "fitness-tracker",
            "weight-export",
            "--output",
            "w.csv",
            "--save",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn date_shorthands() {
        assert!(parse_date_shorthand("today").is_ok());
        assert_eq!(
            parse_date_shorthand("15.01.2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date_shorthand("someday").is_err());
    }
}
