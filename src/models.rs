//src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum_macros::EnumIter;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Units, MAX_DEFAULT_SETS};

/// Body weight bounds accepted for a weight entry, in pounds.
pub const MIN_BODY_WEIGHT_LBS: f64 = 50.0;
pub const MAX_BODY_WEIGHT_LBS: f64 = 500.0;
pub const LBS_TO_KG: f64 = 0.453_592;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Exercise name cannot be empty.")]
    EmptyExerciseName,
    #[error("Strength exercise '{0}' needs at least one set.")]
    NoSets(String),
    #[error("Expected {expected} set(s) for '{name}', got {actual}.")]
    SetCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("Set {set} of '{name}' needs at least one rep.")]
    MissingReps { name: String, set: usize },
    #[error("Set {set} of '{name}' has a negative weight.")]
    NegativeWeight { name: String, set: usize },
    #[error("Set {set} of '{name}' needs a finite weight.")]
    NonFiniteWeight { name: String, set: usize },
    #[error("'{name}' can have at most {max} sets, got {count}.", max = MAX_DEFAULT_SETS)]
    TooManySets { name: String, count: usize },
    #[error("Cardio exercise '{0}' needs a duration or a distance.")]
    MissingCardioDetails(String),
    #[error("Duration and distance must be finite and not negative.")]
    NegativeDurationOrDistance,
    #[error("Template name cannot be empty.")]
    EmptyTemplateName,
    #[error("Template '{0}' needs at least one exercise.")]
    EmptyTemplate(String),
    #[error("Body weight must be between {min:.1} and {max:.1} {unit}.")]
    BodyWeightOutOfRange { min: f64, max: f64, unit: &'static str },
    #[error("Body fat must be between 0 and 100 percent, got {0}.")]
    InvalidBodyFat(f64),
    #[error("{field} must be between 1 and 10, got {value}.")]
    InvalidScale { field: &'static str, value: u8 },
    #[error("{0} must be a positive number.")]
    NonPositive(&'static str),
    #[error("Invalid exercise type: {0}")]
    InvalidCategory(String),
    #[error("Invalid day: {0}")]
    InvalidDay(String),
    #[error("Invalid set '{0}'. Use WEIGHTxREPS, e.g. 135x10.")]
    InvalidSet(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Flexibility,
    Other,
}

impl TryFrom<&str> for ExerciseCategory {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "strength" => Ok(Self::Strength),
            "cardio" => Ok(Self::Cardio),
            "flexibility" => Ok(Self::Flexibility),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::InvalidCategory(value.to_string())),
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => write!(f, "strength"),
            Self::Cardio => write!(f, "cardio"),
            Self::Flexibility => write!(f, "flexibility"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Day-of-week tag attached to a template.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum TrainingDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl TryFrom<&str> for TrainingDay {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "tuesday" | "tue" => Ok(Self::Tuesday),
            "wednesday" | "wed" => Ok(Self::Wednesday),
            "thursday" | "thu" => Ok(Self::Thursday),
            "friday" | "fri" => Ok(Self::Friday),
            "saturday" | "sat" => Ok(Self::Saturday),
            "sunday" | "sun" => Ok(Self::Sunday),
            _ => Err(ValidationError::InvalidDay(value.to_string())),
        }
    }
}

impl fmt::Display for TrainingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        };
        write!(f, "{name}")
    }
}

// Older template exports store "" for "no day".
fn deserialize_optional_day<'de, D>(deserializer: D) -> Result<Option<TrainingDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(day) => TrainingDay::try_from(day)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Set {
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
}

impl Set {
    pub const fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }

    /// A set not filled in yet (template blueprint or freshly loaded session).
    pub const fn is_placeholder(&self) -> bool {
        self.reps == 0
    }

    #[allow(clippy::cast_lossless)]
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

impl std::str::FromStr for Set {
    type Err = ValidationError;

    /// Parses `WEIGHTxREPS` (e.g. `135x10`) or a bare rep count (`12`, bodyweight).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidSet(s.to_string());
        let trimmed = s.trim().to_lowercase();
        match trimmed.split_once(['x', '@']) {
            Some((weight, reps)) => {
                let weight: f64 = weight
                    .trim()
                    .parse()
                    .ok()
                    .filter(|w: &f64| w.is_finite())
                    .ok_or_else(invalid)?;
                let reps: u32 = reps.trim().parse().map_err(|_| invalid())?;
                Ok(Self::new(weight, reps))
            }
            None => {
                let reps: u32 = trimmed.parse().map_err(|_| invalid())?;
                Ok(Self::new(0.0, reps))
            }
        }
    }
}

/// An exercise as it was performed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    #[serde(rename = "type")]
    pub category: ExerciseCategory,
    #[serde(default)]
    pub sets: Vec<Set>,
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Exercise {
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(Set::volume).sum()
    }

    pub fn has_placeholder_sets(&self) -> bool {
        self.sets.iter().any(Set::is_placeholder)
    }
}

/// Input for logging an exercise into the current session.
#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    pub name: String,
    pub category: Option<ExerciseCategory>,
    /// Number of sets the user said they performed; checked against `sets`.
    pub set_count: Option<usize>,
    pub sets: Vec<Set>,
    pub duration_minutes: Option<f64>,
    pub distance: Option<f64>,
    pub notes: Option<String>,
}

impl NewExercise {
    /// Validates the input and turns it into a timestamped `Exercise`.
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(self, timestamp: DateTime<Utc>) -> Result<Exercise, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyExerciseName);
        }
        let category = self.category.unwrap_or(ExerciseCategory::Strength);
        if !valid_amount(self.duration_minutes) || !valid_amount(self.distance) {
            return Err(ValidationError::NegativeDurationOrDistance);
        }

        let sets = match category {
            ExerciseCategory::Strength => {
                if self.sets.is_empty() {
                    return Err(ValidationError::NoSets(name));
                }
                if let Some(expected) = self.set_count {
                    if expected != self.sets.len() {
                        return Err(ValidationError::SetCountMismatch {
                            name,
                            expected,
                            actual: self.sets.len(),
                        });
                    }
                }
                validate_sets(&name, &self.sets)?;
                self.sets
            }
            ExerciseCategory::Cardio => {
                let has_duration = self.duration_minutes.is_some_and(|d| d > 0.0);
                let has_distance = self.distance.is_some_and(|d| d > 0.0);
                if !has_duration && !has_distance {
                    return Err(ValidationError::MissingCardioDetails(name));
                }
                Vec::new()
            }
            ExerciseCategory::Flexibility | ExerciseCategory::Other => {
                validate_sets(&name, &self.sets)?;
                self.sets
            }
        };

        Ok(Exercise {
            name,
            category,
            sets,
            duration_minutes: self.duration_minutes.filter(|d| *d > 0.0),
            distance: self.distance.filter(|d| *d > 0.0),
            notes: clean_notes(self.notes),
            timestamp,
        })
    }

    /// Builds a strength exercise with `set_count` placeholder sets to fill in later.
    /// # Errors
    /// Returns `ValidationError` for an empty name or a zero set count.
    pub fn plan(self, set_count: usize, timestamp: DateTime<Utc>) -> Result<Exercise, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyExerciseName);
        }
        check_set_count(&name, ExerciseCategory::Strength, set_count)?;
        Ok(Exercise {
            name,
            category: ExerciseCategory::Strength,
            sets: vec![Set::default(); set_count],
            duration_minutes: None,
            distance: None,
            notes: clean_notes(self.notes),
            timestamp,
        })
    }
}

/// Strength exercises need 1 to `MAX_DEFAULT_SETS` sets, others at most `MAX_DEFAULT_SETS`.
/// # Errors
/// `ValidationError::NoSets` or `ValidationError::TooManySets`.
pub fn check_set_count(
    name: &str,
    category: ExerciseCategory,
    count: usize,
) -> Result<(), ValidationError> {
    if count == 0 && category == ExerciseCategory::Strength {
        return Err(ValidationError::NoSets(name.to_string()));
    }
    if count > MAX_DEFAULT_SETS as usize {
        return Err(ValidationError::TooManySets {
            name: name.to_string(),
            count,
        });
    }
    Ok(())
}

/// Optional duration or distance: absent, or finite and not negative.
fn valid_amount(value: Option<f64>) -> bool {
    value.map_or(true, |v| v.is_finite() && v >= 0.0)
}

pub(crate) fn validate_sets(name: &str, sets: &[Set]) -> Result<(), ValidationError> {
    for (i, set) in sets.iter().enumerate() {
        if !set.weight.is_finite() {
            return Err(ValidationError::NonFiniteWeight {
                name: name.to_string(),
                set: i + 1,
            });
        }
        if set.weight < 0.0 {
            return Err(ValidationError::NegativeWeight {
                name: name.to_string(),
                set: i + 1,
            });
        }
        if set.reps == 0 {
            return Err(ValidationError::MissingReps {
                name: name.to_string(),
                set: i + 1,
            });
        }
    }
    Ok(())
}

pub(crate) fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub date: NaiveDate,
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Workout {
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Blueprint exercise stored in a template. Set values of 0 are placeholders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub name: String,
    #[serde(rename = "type")]
    pub category: ExerciseCategory,
    #[serde(default)]
    pub sets: Vec<Set>,
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TemplateExercise {
    /// Creates a blueprint with `set_count` placeholder sets.
    pub fn new(name: &str, category: ExerciseCategory, set_count: usize) -> Self {
        Self {
            name: name.trim().to_string(),
            category,
            sets: vec![Set::default(); set_count],
            duration_minutes: None,
            distance: None,
            notes: None,
        }
    }

    /// Turns the blueprint into a session exercise whose sets must still be filled in.
    pub fn instantiate(&self, timestamp: DateTime<Utc>) -> Exercise {
        Exercise {
            name: self.name.clone(),
            category: self.category,
            sets: vec![Set::default(); self.sets.len()],
            duration_minutes: self.duration_minutes,
            distance: self.distance,
            notes: self.notes.clone(),
            timestamp,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyExerciseName);
        }
        if !valid_amount(self.duration_minutes) || !valid_amount(self.distance) {
            return Err(ValidationError::NegativeDurationOrDistance);
        }
        check_set_count(&self.name, self.category, self.sets.len())?;
        for (i, set) in self.sets.iter().enumerate() {
            if !set.weight.is_finite() {
                return Err(ValidationError::NonFiniteWeight {
                    name: self.name.clone(),
                    set: i + 1,
                });
            }
            if set.weight < 0.0 {
                return Err(ValidationError::NegativeWeight {
                    name: self.name.clone(),
                    set: i + 1,
                });
            }
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub day: Option<TrainingDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub exercises: Vec<TemplateExercise>,
    pub created_at: DateTime<Utc>,
}

/// Template as it arrives from a user or an import file. Ids and creation
/// times are always regenerated, so numeric ids from old exports are ignored.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub day: Option<TrainingDay>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
}

impl NewTemplate {
    pub(crate) fn validate(self, created_at: DateTime<Utc>) -> Result<Template, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyTemplateName);
        }
        if self.exercises.is_empty() {
            return Err(ValidationError::EmptyTemplate(name));
        }
        for exercise in &self.exercises {
            exercise.validate()?;
        }
        Ok(Template {
            id: Uuid::new_v4(),
            name,
            day: self.day,
            description: clean_notes(self.description),
            exercises: self.exercises,
            created_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BodyMeasurements {
    pub waist: Option<f64>,
    pub chest: Option<f64>,
    pub arms: Option<f64>,
    pub thighs: Option<f64>,
}

impl BodyMeasurements {
    pub const fn is_empty(&self) -> bool {
        self.waist.is_none() && self.chest.is_none() && self.arms.is_none() && self.thighs.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleMetrics {
    pub calories_consumed: Option<u32>,
    /// Ounces.
    pub water_intake: Option<u32>,
    pub sleep_hours: Option<f64>,
    /// 1-10
    pub stress_level: Option<u8>,
    /// 1-10
    pub energy_level: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub body_weight: f64,
    pub body_fat_percent: Option<f64>,
    pub fat_mass: Option<f64>,
    pub lean_mass: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    #[serde(default)]
    pub measurements: BodyMeasurements,
    #[serde(default)]
    pub lifestyle: LifestyleMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewWeightEntry {
    pub date: Option<NaiveDate>,
    pub body_weight: f64,
    pub body_fat_percent: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub height: Option<f64>,
    pub measurements: BodyMeasurements,
    pub lifestyle: LifestyleMetrics,
    pub notes: Option<String>,
}

impl NewWeightEntry {
    /// Validates ranges and derives fat mass, lean mass and BMI.
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(
        self,
        date: NaiveDate,
        units: Units,
        timestamp: DateTime<Utc>,
    ) -> Result<WeightEntry, ValidationError> {
        let (min, max) = body_weight_bounds(units);
        if !(min..=max).contains(&self.body_weight) {
            return Err(ValidationError::BodyWeightOutOfRange {
                min,
                max,
                unit: units.weight_label(),
            });
        }
        if let Some(bf) = self.body_fat_percent {
            if !(bf > 0.0 && bf < 100.0) {
                return Err(ValidationError::InvalidBodyFat(bf));
            }
        }
        for (field, value) in [
            ("Muscle mass", self.muscle_mass),
            ("Height", self.height),
            ("Waist", self.measurements.waist),
            ("Chest", self.measurements.chest),
            ("Arms", self.measurements.arms),
            ("Thighs", self.measurements.thighs),
            ("Sleep hours", self.lifestyle.sleep_hours),
        ] {
            if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
                return Err(ValidationError::NonPositive(field));
            }
        }
        for (field, value) in [
            ("Stress level", self.lifestyle.stress_level),
            ("Energy level", self.lifestyle.energy_level),
        ] {
            if let Some(v) = value {
                if !(1..=10).contains(&v) {
                    return Err(ValidationError::InvalidScale { field, value: v });
                }
            }
        }

        let fat_mass = self
            .body_fat_percent
            .map(|bf| crate::stats::fat_mass(self.body_weight, bf));
        let lean_mass = self
            .body_fat_percent
            .map(|bf| crate::stats::lean_mass(self.body_weight, bf));
        let bmi = self
            .height
            .and_then(|h| crate::stats::bmi(self.body_weight, h, units));

        Ok(WeightEntry {
            id: Uuid::new_v4(),
            date,
            body_weight: self.body_weight,
            body_fat_percent: self.body_fat_percent,
            fat_mass,
            lean_mass,
            muscle_mass: self.muscle_mass,
            height: self.height,
            bmi,
            measurements: self.measurements,
            lifestyle: self.lifestyle,
            notes: clean_notes(self.notes),
            timestamp,
        })
    }
}

/// Accepted body weight range in the configured units.
pub fn body_weight_bounds(units: Units) -> (f64, f64) {
    match units {
        Units::Imperial => (MIN_BODY_WEIGHT_LBS, MAX_BODY_WEIGHT_LBS),
        Units::Metric => (
            (MIN_BODY_WEIGHT_LBS * LBS_TO_KG * 10.0).round() / 10.0,
            (MAX_BODY_WEIGHT_LBS * LBS_TO_KG * 10.0).round() / 10.0,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength(sets: Vec<Set>, set_count: Option<usize>) -> NewExercise {
        NewExercise {
            name: "  Bench Press ".into(),
            category: Some(ExerciseCategory::Strength),
            set_count,
            sets,
            ..Default::default()
        }
    }

    #[test]
    fn parse_set_strings() {
        assert_eq!("135x10".parse::<Set>().unwrap(), Set::new(135.0, 10));
        assert_eq!("62.5 @ 8".parse::<Set>().unwrap(), Set::new(62.5, 8));
        assert_eq!("12".parse::<Set>().unwrap(), Set::new(0.0, 12));
        assert!("heavy".parse::<Set>().is_err());
    }

    #[test]
    fn strength_requires_matching_set_count() {
        let err = strength(vec![Set::new(100.0, 5)], Some(3))
            .validate(Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::SetCountMismatch {
                name: "Bench Press".into(),
                expected: 3,
                actual: 1
            }
        );

        let ok = strength(vec![Set::new(100.0, 5); 3], Some(3))
            .validate(Utc::now())
            .unwrap();
        assert_eq!(ok.name, "Bench Press");
        assert_eq!(ok.sets.len(), 3);
    }

    #[test]
    fn strength_rejects_missing_reps() {
        let err = strength(vec![Set::new(100.0, 5), Set::new(100.0, 0)], None)
            .validate(Utc::now())
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingReps { set: 2, .. }));
    }

    #[test]
    fn cardio_needs_duration_or_distance() {
        let run = NewExercise {
            name: "Running".into(),
            category: Some(ExerciseCategory::Cardio),
            ..Default::default()
        };
        assert!(matches!(
            run.clone().validate(Utc::now()),
            Err(ValidationError::MissingCardioDetails(_))
        ));
        let run = NewExercise {
            distance: Some(3.1),
            sets: vec![Set::new(1.0, 1)],
            ..run
        };
        let exercise = run.validate(Utc::now()).unwrap();
        assert!(exercise.sets.is_empty());
        assert_eq!(exercise.distance, Some(3.1));
    }

    #[test]
    fn template_day_accepts_empty_string() {
        let template: NewTemplate = serde_json::from_str(
            r#"{"id": 1700000000000, "name": "Push", "day": "", "exercises": [
                {"id": 1.5, "name": "Bench", "type": "strength", "sets": [{"weight": 0, "reps": 0}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(template.day, None);
        assert_eq!(template.exercises[0].sets[0], Set::default());
    }

    #[test]
    fn weight_entry_derives_composition() {
        let entry = NewWeightEntry {
            body_weight: 200.0,
            body_fat_percent: Some(20.0),
            height: Some(70.0),
            ..Default::default()
        }
        .validate(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            Units::Imperial,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(entry.fat_mass, Some(40.0));
        assert_eq!(entry.lean_mass, Some(160.0));
        assert_eq!(entry.bmi, Some(28.7));
    }

    #[test]
    fn weight_entry_range_follows_units() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let light = NewWeightEntry {
            body_weight: 40.0,
            ..Default::default()
        };
        assert!(light.clone().validate(date, Units::Imperial, Utc::now()).is_err());
        assert!(light.validate(date, Units::Metric, Utc::now()).is_ok());
    }
}
