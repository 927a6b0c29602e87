// src/export.rs
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::config::Units;
use crate::models::{Exercise, ExerciseCategory, WeightEntry, Workout};
use crate::stats::{format_number, SessionMetrics};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error while exporting: {0}")]
    Io(#[from] std::io::Error),
    #[error("Exported data is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    Session,
    History,
    WeightCsv,
    WeightJson,
    Performance(String),
    Templates,
}

/// Suggested file name for an export made on `date`.
pub fn default_export_filename(kind: &ExportKind, date: NaiveDate) -> String {
    let iso = date.format("%Y-%m-%d");
    match kind {
        ExportKind::Session => format!("workout_{}.csv", date.format("%Y_%m_%d")),
        ExportKind::History => format!("workout_history_{iso}.csv"),
        ExportKind::WeightCsv => format!("weight_tracker_{iso}.csv"),
        ExportKind::WeightJson => format!("weight_tracker_{iso}.json"),
        ExportKind::Performance(name) => {
            let name = name.split_whitespace().collect::<Vec<_>>().join("_");
            format!("{name}_performance_{iso}.csv")
        }
        ExportKind::Templates => format!("workout_templates_{iso}.json"),
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn opt_cell(value: Option<f64>) -> String {
    value.map_or_else(String::new, format_number)
}

fn nonzero_cell(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        format_number(value)
    }
}

/// One row per set for strength exercises, one row for everything else.
pub fn session_csv(exercises: &[Exercise], date: NaiveDate, units: Units) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "Exercise Name",
        "Exercise Type",
        "Set Number",
        &format!("Weight ({})", units.weight_label()),
        "Reps",
        "Duration (min)",
        &format!("Distance ({})", units.distance_label()),
        "Notes",
        "Date",
    ])?;

    let date = date.format("%Y-%m-%d").to_string();
    for exercise in exercises {
        let notes = exercise.notes.clone().unwrap_or_default();
        if exercise.category == ExerciseCategory::Strength {
            for (i, set) in exercise.sets.iter().enumerate() {
                writer.write_record([
                    exercise.name.clone(),
                    exercise.category.to_string(),
                    (i + 1).to_string(),
                    nonzero_cell(set.weight),
                    nonzero_cell(f64::from(set.reps)),
                    String::new(),
                    String::new(),
                    notes.clone(),
                    date.clone(),
                ])?;
            }
        } else {
            writer.write_record([
                exercise.name.clone(),
                exercise.category.to_string(),
                String::new(),
                String::new(),
                String::new(),
                opt_cell(exercise.duration_minutes),
                opt_cell(exercise.distance),
                notes,
                date.clone(),
            ])?;
        }
    }
    finish(writer)
}

pub fn history_csv(workouts: &[Workout], units: Units) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "Date",
        "Workout ID",
        "Exercise Name",
        "Exercise Type",
        "Set Number",
        &format!("Weight ({})", units.weight_label()),
        "Reps",
        "Duration (min)",
        &format!("Distance ({})", units.distance_label()),
        "Notes",
        "Workout Notes",
    ])?;

    for workout in workouts {
        let date = workout.date.format("%Y-%m-%d").to_string();
        let id = workout.id.to_string();
        let workout_notes = workout.notes.clone().unwrap_or_default();
        for exercise in &workout.exercises {
            let notes = exercise.notes.clone().unwrap_or_default();
            let base = [
                date.clone(),
                id.clone(),
                exercise.name.clone(),
                exercise.category.to_string(),
            ];
            if exercise.category == ExerciseCategory::Strength && !exercise.sets.is_empty() {
                for (i, set) in exercise.sets.iter().enumerate() {
                    writer.write_record(base.iter().cloned().chain([
                        (i + 1).to_string(),
                        format_number(set.weight),
                        set.reps.to_string(),
                        String::new(),
                        String::new(),
                        notes.clone(),
                        workout_notes.clone(),
                    ]))?;
                }
            } else {
                writer.write_record(base.iter().cloned().chain([
                    String::new(),
                    String::new(),
                    String::new(),
                    opt_cell(exercise.duration_minutes),
                    opt_cell(exercise.distance),
                    notes,
                    workout_notes.clone(),
                ]))?;
            }
        }
    }
    finish(writer)
}

pub fn performance_csv(history: &[SessionMetrics], units: Units) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "Date",
        "Exercise Name",
        "Sets",
        "Avg Reps",
        &format!("Max Weight ({})", units.weight_label()),
        &format!("Volume ({})", units.weight_label()),
        &format!("Est. 1RM ({})", units.weight_label()),
        "Notes",
    ])?;

    for session in history {
        #[allow(clippy::cast_precision_loss)]
        let sets = session.sets as f64;
        writer.write_record([
            session.date.format("%Y-%m-%d").to_string(),
            session.name.clone(),
            nonzero_cell(sets),
            nonzero_cell(crate::stats::round1(session.avg_reps)),
            nonzero_cell(session.max_weight),
            nonzero_cell(session.total_volume),
            nonzero_cell(session.estimated_one_rep_max),
            session.notes.clone().unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

pub fn weight_csv(entries: &[WeightEntry], units: Units) -> Result<String, Error> {
    let w = units.weight_label();
    let l = units.length_label();
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "Date".to_string(),
        format!("Body Weight ({w})"),
        "Body Fat %".to_string(),
        format!("Muscle Mass ({w})"),
        format!("Body Fat ({w})"),
        format!("Lean Mass ({w})"),
        "BMI".to_string(),
        format!("Height ({l})"),
        format!("Waist ({l})"),
        format!("Chest ({l})"),
        format!("Arms ({l})"),
        format!("Thighs ({l})"),
        "Calories Consumed".to_string(),
        "Water Intake (oz)".to_string(),
        "Sleep Hours".to_string(),
        "Stress Level".to_string(),
        "Energy Level".to_string(),
        "Notes".to_string(),
        "Timestamp".to_string(),
    ])?;

    for entry in entries {
        let lifestyle = &entry.lifestyle;
        writer.write_record([
            entry.date.format("%Y-%m-%d").to_string(),
            format_number(entry.body_weight),
            opt_cell(entry.body_fat_percent),
            opt_cell(entry.muscle_mass),
            opt_cell(entry.fat_mass),
            opt_cell(entry.lean_mass),
            opt_cell(entry.bmi),
            opt_cell(entry.height),
            opt_cell(entry.measurements.waist),
            opt_cell(entry.measurements.chest),
            opt_cell(entry.measurements.arms),
            opt_cell(entry.measurements.thighs),
            lifestyle.calories_consumed.map_or_else(String::new, |v| v.to_string()),
            lifestyle.water_intake.map_or_else(String::new, |v| v.to_string()),
            opt_cell(lifestyle.sleep_hours),
            lifestyle.stress_level.map_or_else(String::new, |v| v.to_string()),
            lifestyle.energy_level.map_or_else(String::new, |v| v.to_string()),
            entry.notes.clone().unwrap_or_default(),
            entry.timestamp.to_rfc3339(),
        ])?;
    }
    finish(writer)
}

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(value)?)
}
