// src/stats.rs
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use strum_macros::EnumIter;

use crate::config::Units;
use crate::models::{Exercise, ExerciseCategory, WeightEntry, Workout};
use crate::models::LBS_TO_KG;

const INCHES_TO_METERS: f64 = 0.0254;
/// Sets per session that count as a "complete" session for the consistency insight.
const TARGET_SETS: usize = 3;
const CONSISTENCY_THRESHOLD: f64 = 80.0;

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Renders a number without a trailing ".0" for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Epley estimate. A single rep is the weight itself.
pub fn epley_one_rep_max(weight: f64, reps: u32) -> Option<f64> {
    if reps == 0 || weight <= 0.0 {
        return None;
    }
    if reps == 1 {
        return Some(weight);
    }
    Some(weight * (1.0 + f64::from(reps) / 30.0))
}

/// Percent change from `first` to `last`; `None` when `first` is zero.
pub fn percentage_change(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

pub fn format_percentage(percentage: f64) -> String {
    if percentage > 0.0 {
        format!("+{percentage:.1}%")
    } else if percentage < 0.0 {
        format!("{percentage:.1}%")
    } else {
        "0.0%".to_string()
    }
}

/// Formats a signed change like "+10" or "-2.5".
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{}", format_number(change))
    } else {
        format_number(change)
    }
}

/// One exercise within one workout, reduced to the numbers lift metrics care about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub date: NaiveDate,
    pub name: String,
    pub max_weight: f64,
    pub total_volume: f64,
    pub avg_reps: f64,
    pub sets: usize,
    /// Rounded to a whole number.
    pub estimated_one_rep_max: f64,
    pub duration_minutes: f64,
    pub distance: f64,
    pub notes: Option<String>,
}

impl SessionMetrics {
    pub fn from_exercise(date: NaiveDate, exercise: &Exercise) -> Self {
        let sets = exercise.sets.len();
        let max_weight = exercise
            .sets
            .iter()
            .map(|s| s.weight)
            .fold(0.0_f64, f64::max);
        let total_reps: u32 = exercise.sets.iter().map(|s| s.reps).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg_reps = if sets == 0 {
            0.0
        } else {
            f64::from(total_reps) / sets as f64
        };
        let estimated_one_rep_max = exercise
            .sets
            .iter()
            .filter_map(|s| epley_one_rep_max(s.weight, s.reps))
            .fold(0.0_f64, f64::max)
            .round();

        Self {
            date,
            name: exercise.name.clone(),
            max_weight,
            total_volume: exercise.volume(),
            avg_reps,
            sets,
            estimated_one_rep_max,
            duration_minutes: exercise.duration_minutes.unwrap_or(0.0),
            distance: exercise.distance.unwrap_or(0.0),
            notes: exercise.notes.clone(),
        }
    }
}

fn sum_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

/// Per-session metrics for `name` (case-insensitive), oldest first.
/// Repeated entries in the same workout are merged into one session.
pub fn exercise_history(workouts: &[Workout], name: &str) -> Vec<SessionMetrics> {
    let wanted = name.trim().to_lowercase();
    let mut history: Vec<SessionMetrics> = workouts
        .iter()
        .filter_map(|w| {
            let mut matching = w.exercises.iter().filter(|e| e.name.to_lowercase() == wanted);
            let first = matching.next()?;
            let mut merged = first.clone();
            for more in matching {
                merged.sets.extend_from_slice(&more.sets);
                merged.duration_minutes = sum_opt(merged.duration_minutes, more.duration_minutes);
                merged.distance = sum_opt(merged.distance, more.distance);
            }
            Some(SessionMetrics::from_exercise(w.date, &merged))
        })
        .collect();
    history.sort_by_key(|m| m.date);
    history
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Metric {
    MaxWeight,
    Reps,
    Sets,
    Volume,
    OneRepMax,
    Duration,
    Distance,
}

impl Metric {
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self, metrics: &SessionMetrics) -> f64 {
        match self {
            Self::MaxWeight => metrics.max_weight,
            Self::Reps => metrics.avg_reps,
            Self::Sets => metrics.sets as f64,
            Self::Volume => metrics.total_volume,
            Self::OneRepMax => metrics.estimated_one_rep_max,
            Self::Duration => metrics.duration_minutes,
            Self::Distance => metrics.distance,
        }
    }

    pub fn label(self, units: Units) -> String {
        match self {
            Self::MaxWeight => format!("Max Weight ({})", units.weight_label()),
            Self::Reps => "Reps".to_string(),
            Self::Sets => "Sets".to_string(),
            Self::Volume => format!("Volume ({})", units.weight_label()),
            Self::OneRepMax => format!("Est. 1RM ({})", units.weight_label()),
            Self::Duration => "Duration (min)".to_string(),
            Self::Distance => format!("Distance ({})", units.distance_label()),
        }
    }

    /// Formats a value of this metric with its unit.
    pub fn format_value(self, value: f64, units: Units) -> String {
        match self {
            Self::Volume => format!("{:.0} {}", value, units.weight_label()),
            Self::MaxWeight | Self::OneRepMax => {
                format!("{} {}", format_number(value), units.weight_label())
            }
            Self::Duration => format!("{} min", format_number(value)),
            Self::Distance => format!("{} {}", format_number(value), units.distance_label()),
            Self::Reps => format_number(round1(value)),
            Self::Sets => format_number(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Days(u32),
    #[default]
    All,
}

impl TimeRange {
    /// Earliest date inside the range, counted back from `today`.
    /// First date inside the range. A window reaching past the calendar has no cutoff.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Days(days) => today.checked_sub_signed(Duration::days(i64::from(days))),
            Self::All => None,
        }
    }

    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        self.cutoff(today).map_or(true, |cutoff| date >= cutoff)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "last {days} days"),
            Self::All => write!(f, "all time"),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<u32>() {
            Ok(days) if days > 0 => Ok(Self::Days(days)),
            _ => Err(format!("Invalid time range '{s}'. Use a number of days or 'all'.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub current_best: f64,
    pub personal_record: f64,
    pub average: f64,
    pub improvement: Option<f64>,
}

/// Summarizes `window` (sessions inside the selected range) for one metric.
/// The personal record is taken from `all_time`. `None` when the window is empty.
pub fn performance_summary(
    window: &[SessionMetrics],
    all_time: &[SessionMetrics],
    metric: Metric,
) -> Option<PerformanceSummary> {
    let values: Vec<f64> = window.iter().map(|m| metric.value(m)).collect();
    let (first, last) = (values.first()?, values.last()?);

    let current_best = values.iter().copied().fold(0.0_f64, f64::max);
    let personal_record = all_time
        .iter()
        .map(|m| metric.value(m))
        .fold(current_best, f64::max);
    let positive: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    #[allow(clippy::cast_precision_loss)]
    let average = if positive.is_empty() {
        0.0
    } else {
        positive.iter().sum::<f64>() / positive.len() as f64
    };
    let improvement = if values.len() < 2 {
        None
    } else {
        percentage_change(*first, *last)
    };

    Some(PerformanceSummary {
        current_best,
        personal_record,
        average,
        improvement,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    NotEnoughData,
}

impl Trend {
    pub fn of(history: &[SessionMetrics], metric: Metric) -> Self {
        match (history.first(), history.last()) {
            (Some(first), Some(last)) if history.len() >= 2 => {
                Self::from_change(metric.value(last) - metric.value(first))
            }
            _ => Self::NotEnoughData,
        }
    }

    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Improving
        } else if change < 0.0 {
            Self::Declining
        } else {
            Self::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Improving => write!(f, "Improving"),
            Self::Declining => write!(f, "Declining"),
            Self::Stable => write!(f, "Stable"),
            Self::NotEnoughData => write!(f, "Not enough data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Frequency {
    High,
    Moderate,
    Low,
    VeryLow,
    NotEnoughData,
}

impl Frequency {
    /// Sessions per week across the span of `history`.
    /// All sessions on one day count as high frequency.
    pub fn of(history: &[SessionMetrics]) -> Self {
        let (Some(first), Some(last)) = (history.first(), history.last()) else {
            return Self::NotEnoughData;
        };
        if history.len() < 2 {
            return Self::NotEnoughData;
        }
        let span_days = (last.date - first.date).num_days();
        if span_days <= 0 {
            return Self::High;
        }
        #[allow(clippy::cast_precision_loss)]
        let per_week = history.len() as f64 / (span_days as f64 / 7.0);
        if per_week >= 3.0 {
            Self::High
        } else if per_week >= 2.0 {
            Self::Moderate
        } else if per_week >= 1.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High (3+ times/week)"),
            Self::Moderate => write!(f, "Moderate (2 times/week)"),
            Self::Low => write!(f, "Low (1 time/week)"),
            Self::VeryLow => write!(f, "Very Low (<1 time/week)"),
            Self::NotEnoughData => write!(f, "Not enough data"),
        }
    }
}

pub fn recommendation(trend: Trend, frequency: Frequency, sessions: usize) -> &'static str {
    if sessions < 3 {
        return "Continue tracking to get personalized recommendations";
    }
    match (trend, frequency) {
        (Trend::Improving, Frequency::High) => {
            "Great progress! Consider increasing intensity or adding variations"
        }
        (Trend::Improving, Frequency::Low | Frequency::VeryLow) => {
            "Good progress! Try increasing frequency to 2-3 times/week"
        }
        (Trend::Declining, _) => "Consider deloading, checking form, or adjusting programming",
        (Trend::Stable, _) => "Try progressive overload or increasing volume gradually",
        _ => "Focus on consistency and progressive overload",
    }
}

/// First-versus-last comparison across an exercise history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub max_weight_change: f64,
    pub volume_change: f64,
    pub avg_reps_change: f64,
    pub one_rep_max_change: f64,
    pub max_weight_trend: Trend,
    pub volume_trend: Trend,
    pub avg_reps_trend: Trend,
    pub one_rep_max_trend: Trend,
    pub sessions: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub current_one_rep_max: f64,
}

impl ProgressReport {
    pub fn from_history(history: &[SessionMetrics]) -> Option<Self> {
        if history.len() < 2 {
            return None;
        }
        let (first, last) = (history.first()?, history.last()?);
        let max_weight_change = last.max_weight - first.max_weight;
        let volume_change = last.total_volume - first.total_volume;
        let avg_reps_change = last.avg_reps - first.avg_reps;
        let one_rep_max_change = last.estimated_one_rep_max - first.estimated_one_rep_max;
        Some(Self {
            max_weight_change,
            volume_change,
            avg_reps_change,
            one_rep_max_change,
            max_weight_trend: Trend::from_change(max_weight_change),
            volume_trend: Trend::from_change(volume_change),
            avg_reps_trend: Trend::from_change(avg_reps_change),
            one_rep_max_trend: Trend::from_change(one_rep_max_change),
            sessions: history.len(),
            first_date: first.date,
            last_date: last.date,
            current_one_rep_max: last.estimated_one_rep_max,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightKind {
    Positive,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

/// Up to three short observations about an exercise history.
pub fn insights(history: &[SessionMetrics], units: Units) -> Vec<Insight> {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return Vec::new();
    };
    if history.len() < 2 {
        return Vec::new();
    }
    let unit = units.weight_label();
    let mut insights = Vec::new();

    let weight_progress = last.max_weight - first.max_weight;
    if weight_progress > 0.0 {
        insights.push(Insight {
            kind: InsightKind::Positive,
            message: format!(
                "You've increased your max weight by {} {unit}!",
                format_number(weight_progress)
            ),
        });
    } else if weight_progress < 0.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            message: format!(
                "Your max weight has decreased by {} {unit}. Consider deloading or checking form.",
                format_number(weight_progress.abs())
            ),
        });
    }

    let consistent = history.iter().filter(|m| m.sets >= TARGET_SETS).count();
    #[allow(clippy::cast_precision_loss)]
    let consistency_rate = consistent as f64 / history.len() as f64 * 100.0;
    if consistency_rate >= CONSISTENCY_THRESHOLD {
        insights.push(Insight {
            kind: InsightKind::Positive,
            message: format!(
                "Great consistency! You're hitting {consistency_rate:.0}% of your target sets."
            ),
        });
    } else {
        insights.push(Insight {
            kind: InsightKind::Info,
            message: format!(
                "Consider aiming for more consistent set completion (currently {consistency_rate:.0}%)."
            ),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let avg_volume =
        history.iter().map(|m| m.total_volume).sum::<f64>() / history.len() as f64;
    if last.total_volume > avg_volume {
        insights.push(Insight {
            kind: InsightKind::Positive,
            message: format!(
                "Your latest workout volume ({} {unit}) is above your average ({avg_volume:.0} {unit}).",
                format_number(last.total_volume)
            ),
        });
    }

    insights
}

/// Totals over a list of exercises, e.g. the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub exercises: usize,
    pub total_sets: usize,
    pub total_reps: u32,
    pub total_weight: f64,
    pub total_duration: f64,
    pub total_distance: f64,
}

impl WorkoutSummary {
    pub fn from_exercises(exercises: &[Exercise]) -> Self {
        let mut summary = Self {
            exercises: exercises.len(),
            ..Self::default()
        };
        for exercise in exercises {
            if exercise.category == ExerciseCategory::Strength {
                summary.total_sets += exercise.sets.len();
                for set in &exercise.sets {
                    summary.total_reps += set.reps;
                    summary.total_weight += set.weight;
                }
            } else {
                summary.total_duration += exercise.duration_minutes.unwrap_or(0.0);
                summary.total_distance += exercise.distance.unwrap_or(0.0);
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub workout_days: usize,
    pub total_workouts: usize,
    pub total_exercises: usize,
}

impl HistoryStats {
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        let days: HashSet<NaiveDate> = workouts.iter().map(|w| w.date).collect();
        Self {
            workout_days: days.len(),
            total_workouts: workouts.len(),
            total_exercises: workouts.iter().map(|w| w.exercises.len()).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSummary {
    pub current_weight: f64,
    pub starting_weight: f64,
    pub total_change: f64,
    pub current_body_fat: Option<f64>,
    pub entries: usize,
    pub days_tracked: i64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl WeightSummary {
    pub fn from_entries(entries: &[WeightEntry]) -> Option<Self> {
        let latest = entries.iter().max_by_key(|e| e.date)?;
        let earliest = entries.iter().min_by_key(|e| e.date)?;
        Some(Self {
            current_weight: latest.body_weight,
            starting_weight: earliest.body_weight,
            total_change: round1(latest.body_weight - earliest.body_weight),
            current_body_fat: latest.body_fat_percent,
            entries: entries.len(),
            days_tracked: (latest.date - earliest.date).num_days() + 1,
            first_date: earliest.date,
            last_date: latest.date,
        })
    }
}

pub fn fat_mass(weight: f64, body_fat_percent: f64) -> f64 {
    round1(weight * body_fat_percent / 100.0)
}

pub fn lean_mass(weight: f64, body_fat_percent: f64) -> f64 {
    round1(weight - weight * body_fat_percent / 100.0)
}

/// BMI in kg/m². Imperial takes lbs and inches, metric takes kg and cm.
pub fn bmi(weight: f64, height: f64, units: Units) -> Option<f64> {
    if weight <= 0.0 || height <= 0.0 {
        return None;
    }
    let (kg, meters) = match units {
        Units::Imperial => (weight * LBS_TO_KG, height * INCHES_TO_METERS),
        Units::Metric => (weight, height / 100.0),
    };
    Some(round1(kg / (meters * meters)))
}

/// Sorted, de-duplicated exercise names, optionally for one category.
pub fn unique_exercise_names(
    workouts: &[Workout],
    category: Option<ExerciseCategory>,
) -> Vec<String> {
    workouts
        .iter()
        .flat_map(|w| w.exercises.iter())
        .filter(|e| category.map_or(true, |c| e.category == c))
        .map(|e| e.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Set;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn bench(sets: &[(f64, u32)]) -> Exercise {
        Exercise {
            name: "Bench Press".into(),
            category: ExerciseCategory::Strength,
            sets: sets.iter().map(|(w, r)| Set::new(*w, *r)).collect(),
            duration_minutes: None,
            distance: None,
            notes: None,
            timestamp: Utc::now(),
        }
    }

    fn workout(day: &str, exercises: Vec<Exercise>) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            date: date(day),
            exercises,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn metrics(day: &str, max_weight: f64, sets: usize, volume: f64) -> SessionMetrics {
        SessionMetrics {
            date: date(day),
            name: "Squat".into(),
            max_weight,
            total_volume: volume,
            avg_reps: 5.0,
            sets,
            estimated_one_rep_max: 0.0,
            duration_minutes: 0.0,
            distance: 0.0,
            notes: None,
        }
    }

    #[test]
    fn epley_estimates() {
        assert_eq!(epley_one_rep_max(100.0, 1), Some(100.0));
        assert_eq!(epley_one_rep_max(100.0, 0), None);
        assert_eq!(epley_one_rep_max(0.0, 10), None);
        let estimate = epley_one_rep_max(100.0, 10).unwrap();
        assert!((estimate - 133.333).abs() < 0.01);
    }

    #[test]
    fn percentage_formatting() {
        assert_eq!(percentage_change(0.0, 10.0), None);
        assert_eq!(percentage_change(100.0, 110.0), Some(10.0));
        assert_eq!(format_percentage(10.0), "+10.0%");
        assert_eq!(format_percentage(-12.34), "-12.3%");
        assert_eq!(format_percentage(0.0), "0.0%");
    }

    #[test]
    fn session_metrics_for_bench() {
        let m = SessionMetrics::from_exercise(
            date("2024-01-15"),
            &bench(&[(135.0, 10), (155.0, 8), (165.0, 5)]),
        );
        assert_eq!(m.max_weight, 165.0);
        assert_eq!(m.total_volume, 1350.0 + 1240.0 + 825.0);
        assert!((m.avg_reps - 23.0 / 3.0).abs() < 1e-9);
        assert_eq!(m.sets, 3);
        // 155 x 8 = 196.33 beats 135 x 10 = 180 and 165 x 5 = 192.5
        assert_eq!(m.estimated_one_rep_max, 196.0);
    }

    #[test]
    fn history_is_sorted_and_case_insensitive() {
        let workouts = vec![
            workout("2024-01-20", vec![bench(&[(145.0, 5)])]),
            workout("2024-01-10", vec![bench(&[(135.0, 5)])]),
        ];
        let history = exercise_history(&workouts, "bench press");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, date("2024-01-10"));
        assert_eq!(history[1].max_weight, 145.0);
    }

    #[test]
    fn repeated_exercise_in_one_workout_is_merged() {
        let workouts = vec![workout(
            "2024-01-15",
            vec![bench(&[(135.0, 10)]), bench(&[(185.0, 3), (185.0, 3)])],
        )];
        let history = exercise_history(&workouts, "Bench Press");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sets, 3);
        assert_eq!(history[0].max_weight, 185.0);
        assert_eq!(history[0].total_volume, 1350.0 + 1110.0);
    }

    #[test]
    fn trend_and_frequency() {
        let history = vec![
            metrics("2024-01-01", 100.0, 3, 1500.0),
            metrics("2024-01-03", 105.0, 3, 1600.0),
            metrics("2024-01-05", 110.0, 3, 1700.0),
            metrics("2024-01-07", 115.0, 3, 1800.0),
        ];
        assert_eq!(Trend::of(&history, Metric::MaxWeight), Trend::Improving);
        // 4 sessions over 6 days = 4.67 per week
        assert_eq!(Frequency::of(&history), Frequency::High);
        assert_eq!(
            recommendation(Trend::Improving, Frequency::High, history.len()),
            "Great progress! Consider increasing intensity or adding variations"
        );

        let same_day = vec![
            metrics("2024-01-01", 100.0, 3, 1500.0),
            metrics("2024-01-01", 100.0, 3, 1500.0),
        ];
        assert_eq!(Frequency::of(&same_day), Frequency::High);
        assert_eq!(Trend::of(&same_day[..1], Metric::Volume), Trend::NotEnoughData);

        let sparse = vec![
            metrics("2024-01-01", 100.0, 3, 1500.0),
            metrics("2024-02-01", 90.0, 3, 1500.0),
        ];
        assert_eq!(Frequency::of(&sparse), Frequency::VeryLow);
    }

    #[test]
    fn recommendation_rules() {
        assert_eq!(
            recommendation(Trend::Improving, Frequency::High, 2),
            "Continue tracking to get personalized recommendations"
        );
        assert_eq!(
            recommendation(Trend::Improving, Frequency::VeryLow, 3),
            "Good progress! Try increasing frequency to 2-3 times/week"
        );
        assert_eq!(
            recommendation(Trend::Improving, Frequency::Moderate, 3),
            "Focus on consistency and progressive overload"
        );
        assert_eq!(
            recommendation(Trend::Stable, Frequency::High, 5),
            "Try progressive overload or increasing volume gradually"
        );
    }

    #[test]
    fn summary_uses_window_and_all_time() {
        let all = vec![
            metrics("2023-06-01", 200.0, 3, 3000.0),
            metrics("2024-01-01", 0.0, 3, 0.0),
            metrics("2024-01-08", 150.0, 3, 2000.0),
        ];
        let summary = performance_summary(&all[1..], &all, Metric::MaxWeight).unwrap();
        assert_eq!(summary.current_best, 150.0);
        assert_eq!(summary.personal_record, 200.0);
        assert_eq!(summary.average, 150.0);
        assert_eq!(summary.improvement, None);
        assert!(performance_summary(&[], &all, Metric::MaxWeight).is_none());
    }

    #[test]
    fn insights_cover_weight_consistency_and_volume() {
        let history = vec![
            metrics("2024-01-01", 100.0, 3, 1000.0),
            metrics("2024-01-08", 110.0, 2, 1500.0),
        ];
        let found = insights(&history, Units::Imperial);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].message, "You've increased your max weight by 10 lbs!");
        assert_eq!(found[1].kind, InsightKind::Info);
        assert!(found[1].message.contains("50%"));
        assert_eq!(
            found[2].message,
            "Your latest workout volume (1500 lbs) is above your average (1250 lbs)."
        );
        assert!(insights(&history[..1], Units::Imperial).is_empty());
    }

    #[test]
    fn progress_report_compares_first_and_last() {
        let history = vec![
            metrics("2024-01-01", 100.0, 3, 1000.0),
            metrics("2024-01-05", 100.0, 3, 900.0),
            metrics("2024-01-10", 110.0, 3, 900.0),
        ];
        let report = ProgressReport::from_history(&history).unwrap();
        assert_eq!(report.max_weight_change, 10.0);
        assert_eq!(report.max_weight_trend, Trend::Improving);
        assert_eq!(report.volume_trend, Trend::Declining);
        assert_eq!(report.avg_reps_trend, Trend::Stable);
        assert_eq!(report.sessions, 3);
        assert!(ProgressReport::from_history(&history[..1]).is_none());
    }

    #[test]
    fn workout_summary_splits_strength_and_cardio() {
        let run = Exercise {
            name: "Running".into(),
            category: ExerciseCategory::Cardio,
            sets: Vec::new(),
            duration_minutes: Some(30.0),
            distance: Some(3.1),
            notes: None,
            timestamp: Utc::now(),
        };
        let summary = WorkoutSummary::from_exercises(&[bench(&[(100.0, 10), (100.0, 8)]), run]);
        assert_eq!(summary.exercises, 2);
        assert_eq!(summary.total_sets, 2);
        assert_eq!(summary.total_reps, 18);
        assert_eq!(summary.total_weight, 200.0);
        assert_eq!(summary.total_duration, 30.0);
        assert_eq!(summary.total_distance, 3.1);
    }

    #[test]
    fn history_stats_counts_distinct_days() {
        let workouts = vec![
            workout("2024-01-01", vec![bench(&[(100.0, 5)])]),
            workout("2024-01-01", vec![bench(&[(100.0, 5)]), bench(&[(90.0, 5)])]),
            workout("2024-01-02", vec![]),
        ];
        let stats = HistoryStats::from_workouts(&workouts);
        assert_eq!(stats.workout_days, 2);
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.total_exercises, 3);
    }

    #[test]
    fn body_composition_helpers() {
        assert_eq!(fat_mass(180.0, 15.0), 27.0);
        assert_eq!(lean_mass(180.0, 15.0), 153.0);
        assert_eq!(bmi(180.0, 72.0, Units::Imperial), Some(24.4));
        assert_eq!(bmi(80.0, 180.0, Units::Metric), Some(24.7));
        assert_eq!(bmi(80.0, 0.0, Units::Metric), None);
    }

    #[test]
    fn time_range_parsing_and_cutoff() {
        assert_eq!("30".parse::<TimeRange>().unwrap(), TimeRange::Days(30));
        assert_eq!("ALL".parse::<TimeRange>().unwrap(), TimeRange::All);
        assert!("0".parse::<TimeRange>().is_err());
        let today = date("2024-02-01");
        assert!(TimeRange::Days(7).contains(date("2024-01-25"), today));
        assert!(!TimeRange::Days(7).contains(date("2024-01-24"), today));
        assert!(TimeRange::All.contains(date("1999-01-01"), today));
        assert_eq!(TimeRange::Days(u32::MAX).cutoff(today), None);
        assert!(TimeRange::Days(u32::MAX).contains(date("1999-01-01"), today));
    }

    #[test]
    fn unique_names_filter_by_category() {
        let run = Exercise {
            name: "Running".into(),
            category: ExerciseCategory::Cardio,
            sets: Vec::new(),
            duration_minutes: Some(20.0),
            distance: None,
            notes: None,
            timestamp: Utc::now(),
        };
        let workouts = vec![
            workout("2024-01-01", vec![bench(&[(100.0, 5)]), run]),
            workout("2024-01-02", vec![bench(&[(100.0, 5)])]),
        ];
        assert_eq!(
            unique_exercise_names(&workouts, None),
            vec!["Bench Press", "Running"]
        );
        assert_eq!(
            unique_exercise_names(&workouts, Some(ExerciseCategory::Strength)),
            vec!["Bench Press"]
        );
    }
}
