use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

// --- Declare modules ---
mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod stats;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, Error as ConfigError, StandardColor, Theme, Units,
    MAX_DEFAULT_SETS, MAX_TIME_RANGE_DAYS,
};

pub use db::{
    get_db_path as get_db_path_util, Error as DbError, KeyValueStore, MemoryStore, SqliteStore,
};

pub use export::{default_export_filename, Error as ExportError, ExportKind};

pub use models::{
    body_weight_bounds, BodyMeasurements, Exercise, ExerciseCategory, LifestyleMetrics,
    NewExercise, NewTemplate, NewWeightEntry, Set, Template, TemplateExercise, TrainingDay,
    ValidationError, WeightEntry, Workout,
};

pub use stats::{
    format_change, format_number, format_percentage, Frequency, HistoryStats, Insight,
    InsightKind, Metric, PerformanceSummary, ProgressReport, SessionMetrics, TimeRange, Trend,
    WeightSummary, WorkoutSummary,
};

#[derive(Default, Debug, Clone)]
pub struct WorkoutFilters<'a> {
    /// Matches workout notes, exercise names and exercise notes.
    pub search: Option<&'a str>,
    pub exercise: Option<&'a str>,
    pub category: Option<ExerciseCategory>,
    pub since_days: Option<u32>,
    pub date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Default, Debug, Clone)]
pub struct WeightFilters<'a> {
    /// Matches notes or the ISO date.
    pub search: Option<&'a str>,
    pub since_days: Option<u32>,
}

#[derive(Default, Debug, Clone)]
pub struct EditTemplateParams {
    pub name: Option<String>,
    /// `Some(None)` clears the day.
    pub day: Option<Option<TrainingDay>>,
    /// An empty string clears the description.
    pub description: Option<String>,
}

/// Everything lift metrics shows for one exercise.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseAnalysis {
    pub exercise: String,
    pub metric_label: String,
    pub range: String,
    /// Sessions inside the requested range, oldest first.
    pub history: Vec<SessionMetrics>,
    pub summary: Option<PerformanceSummary>,
    pub trend: Trend,
    pub frequency: Frequency,
    pub recommendation: String,
    pub progress: Option<ProgressReport>,
    pub insights: Vec<Insight>,
}

pub struct AppService {
    pub config: Config,
    pub store: Box<dyn KeyValueStore>,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle))
}

/// Finds the single item whose UUID starts with `ident` (hyphens optional).
fn resolve_id_prefix<T>(
    items: &[T],
    ident: &str,
    id_of: impl Fn(&T) -> Uuid,
) -> std::result::Result<Option<usize>, DbError> {
    let wanted = ident.trim().to_lowercase().replace('-', "");
    if wanted.is_empty() {
        return Ok(None);
    }
    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, item)| id_of(item).simple().to_string().starts_with(&wanted))
        .map(|(i, _)| i);
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        return Err(DbError::AmbiguousId(ident.to_string()));
    }
    Ok(first)
}

fn check_index(what: &'static str, index: usize, len: usize) -> std::result::Result<usize, DbError> {
    if index == 0 || index > len {
        return Err(DbError::IndexOutOfRange { what, index, len });
    }
    Ok(index - 1)
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path(config.storage_path.as_deref())
            .context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;
        tracing::debug!(db = %db_path.display(), config = %config_path.display(), "service initialized");

        Ok(Self {
            config,
            store: Box::new(store),
            db_path,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the measurement units.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// Sets how many placeholder sets a strength exercise gets when none are given.
    /// # Errors
    /// - `ConfigError::InvalidSetCount` if `count` is 0 or above `MAX_DEFAULT_SETS`.
    /// - `ConfigError` variants if saving fails.
    pub fn set_default_set_count(&mut self, count: u32) -> Result<(), ConfigError> {
        if count == 0 || count > MAX_DEFAULT_SETS {
            return Err(ConfigError::InvalidSetCount(count));
        }
        self.config.default_set_count = count;
        self.save_config()
    }

    /// Sets the lift metrics window used when no range is given.
    /// # Errors
    /// - `ConfigError::InvalidTimeRange` if `days` is 0 or above `MAX_TIME_RANGE_DAYS`.
    /// - `ConfigError` variants if saving fails.
    pub fn set_default_time_range(&mut self, days: u32) -> Result<(), ConfigError> {
        if days == 0 || days > MAX_TIME_RANGE_DAYS {
            return Err(ConfigError::InvalidTimeRange);
        }
        self.config.default_time_range_days = days;
        self.save_config()
    }

    pub const fn default_time_range(&self) -> TimeRange {
        TimeRange::Days(self.config.default_time_range_days)
    }

    // --- Storage helpers ---

    fn load_workouts(&self) -> Result<Vec<Workout>> {
        db::load_json(self.store.as_ref(), db::WORKOUTS_KEY).context("Failed to load saved workouts")
    }

    fn save_workouts(&mut self, workouts: &[Workout]) -> Result<()> {
        db::save_json(self.store.as_mut(), db::WORKOUTS_KEY, workouts)
            .context("Failed to save workouts")
    }

    fn load_templates(&self) -> Result<Vec<Template>> {
        db::load_json(self.store.as_ref(), db::TEMPLATES_KEY).context("Failed to load templates")
    }

    fn save_templates(&mut self, templates: &[Template]) -> Result<()> {
        db::save_json(self.store.as_mut(), db::TEMPLATES_KEY, templates)
            .context("Failed to save templates")
    }

    fn load_weight_entries(&self) -> Result<Vec<WeightEntry>> {
        db::load_json(self.store.as_ref(), db::WEIGHT_ENTRIES_KEY)
            .context("Failed to load weight entries")
    }

    fn save_weight_entries(&mut self, entries: &[WeightEntry]) -> Result<()> {
        db::save_json(self.store.as_mut(), db::WEIGHT_ENTRIES_KEY, entries)
            .context("Failed to save weight entries")
    }

    fn save_session_draft(&mut self, date: NaiveDate, exercises: &[Exercise]) -> Result<()> {
        let key = db::session_key(date);
        if exercises.is_empty() {
            self.store
                .remove(&key)
                .with_context(|| format!("Failed to clear session for {date}"))
        } else {
            db::save_json(self.store.as_mut(), &key, exercises)
                .with_context(|| format!("Failed to save session for {date}"))
        }
    }

    // --- Session ---

    /// Exercises logged so far for `date` but not yet saved as a workout.
    /// # Errors
    /// - `anyhow::Error` wrapping `DbError::CorruptData` if the draft is unreadable.
    pub fn session_exercises(&self, date: NaiveDate) -> Result<Vec<Exercise>> {
        db::load_json(self.store.as_ref(), &db::session_key(date))
            .with_context(|| format!("Failed to load session for {date}"))
    }

    /// Adds an exercise to the session for `date`.
    /// A strength exercise given without sets gets placeholder sets
    /// (`set_count`, or the configured default) to fill in later.
    /// # Errors
    /// - `ValidationError` variants for invalid input.
    /// - `anyhow::Error` wrapping `DbError` variants.
    pub fn add_session_exercise(&mut self, date: NaiveDate, input: NewExercise) -> Result<Exercise> {
        let now = Utc::now();
        let planned = input.category.unwrap_or(ExerciseCategory::Strength)
            == ExerciseCategory::Strength
            && input.sets.is_empty();
        let exercise = if planned {
            let count = input
                .set_count
                .unwrap_or(self.config.default_set_count as usize);
            input.plan(count, now)?
        } else {
            input.validate(now)?
        };

        let mut exercises = self.session_exercises(date)?;
        exercises.push(exercise.clone());
        self.save_session_draft(date, &exercises)?;
        tracing::debug!(%date, exercise = %exercise.name, "added session exercise");
        Ok(exercise)
    }

    /// Removes the exercise at 1-based `index` from the session.
    /// # Errors
    /// - `DbError::IndexOutOfRange` if there is no such exercise.
    pub fn remove_session_exercise(&mut self, date: NaiveDate, index: usize) -> Result<Exercise> {
        let mut exercises = self.session_exercises(date)?;
        let i = check_index("Exercise", index, exercises.len())?;
        let removed = exercises.remove(i);
        self.save_session_draft(date, &exercises)?;
        Ok(removed)
    }

    /// Fills set `set_index` of exercise `exercise_index` (both 1-based).
    /// # Errors
    /// - `DbError::IndexOutOfRange` for a bad index.
    /// - `ValidationError` for a negative weight or zero reps.
    pub fn fill_session_set(
        &mut self,
        date: NaiveDate,
        exercise_index: usize,
        set_index: usize,
        set: Set,
    ) -> Result<Exercise> {
        let mut exercises = self.session_exercises(date)?;
        let e = check_index("Exercise", exercise_index, exercises.len())?;
        let exercise = &mut exercises[e];
        let s = check_index("Set", set_index, exercise.sets.len())?;
        models::validate_sets(&exercise.name, std::slice::from_ref(&set))?;
        exercise.sets[s] = set;
        let updated = exercise.clone();
        self.save_session_draft(date, &exercises)?;
        Ok(updated)
    }

    /// Drops the whole session draft and returns how many exercises it held.
    /// # Errors
    /// - `DbError::EmptySession` if there was nothing to clear.
    pub fn clear_session(&mut self, date: NaiveDate) -> Result<usize> {
        let exercises = self.session_exercises(date)?;
        if exercises.is_empty() {
            bail!(DbError::EmptySession(date));
        }
        self.save_session_draft(date, &[])?;
        Ok(exercises.len())
    }

    /// Dates that still hold an unsaved session draft, oldest first.
    pub fn pending_sessions(&self) -> Result<Vec<NaiveDate>> {
        let keys = self
            .store
            .keys(db::SESSION_KEY_PREFIX)
            .context("Failed to list session drafts")?;
        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(db::SESSION_KEY_PREFIX))
            .filter_map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .collect())
    }

    pub fn session_summary(&self, date: NaiveDate) -> Result<WorkoutSummary> {
        Ok(WorkoutSummary::from_exercises(&self.session_exercises(date)?))
    }

    /// Queues a template to be loaded into the next session.
    /// # Errors
    /// - `DbError::TemplateNotFound` if `identifier` matches nothing.
    pub fn queue_template(&mut self, identifier: &str) -> Result<Template> {
        let template = self.get_template(identifier)?;
        db::save_json(self.store.as_mut(), db::SELECTED_TEMPLATE_KEY, &template)
            .context("Failed to queue template")?;
        Ok(template)
    }

    /// The queued template, if any. An unreadable one is dropped.
    pub fn selected_template(&mut self) -> Result<Option<Template>> {
        match db::load_value::<Template>(self.store.as_ref(), db::SELECTED_TEMPLATE_KEY) {
            Ok(template) => Ok(template),
            Err(DbError::CorruptData { key, source }) => {
                tracing::warn!(%key, error = %source, "dropping unreadable queued template");
                self.store
                    .remove(db::SELECTED_TEMPLATE_KEY)
                    .context("Failed to drop queued template")?;
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to read queued template"),
        }
    }

    /// Loads the queued template (if any) into the session and un-queues it.
    /// # Errors
    /// - `DbError::EmptyTemplate` if the queued template has no exercises.
    pub fn apply_selected_template(&mut self, date: NaiveDate) -> Result<Option<Template>> {
        let Some(template) = self.selected_template()? else {
            return Ok(None);
        };
        self.store
            .remove(db::SELECTED_TEMPLATE_KEY)
            .context("Failed to un-queue template")?;
        self.load_template_into_session(date, &template)?;
        Ok(Some(template))
    }

    /// Loads a template straight into the session for `date`.
    /// # Errors
    /// - `DbError::TemplateNotFound` / `DbError::EmptyTemplate`.
    pub fn apply_template_to_session(
        &mut self,
        date: NaiveDate,
        identifier: &str,
    ) -> Result<Vec<Exercise>> {
        let template = self.get_template(identifier)?;
        self.load_template_into_session(date, &template)
    }

    fn load_template_into_session(
        &mut self,
        date: NaiveDate,
        template: &Template,
    ) -> Result<Vec<Exercise>> {
        if template.exercises.is_empty() {
            bail!(DbError::EmptyTemplate(template.name.clone()));
        }
        let now = Utc::now();
        let added: Vec<Exercise> = template
            .exercises
            .iter()
            .map(|blueprint| blueprint.instantiate(now))
            .collect();
        let mut exercises = self.session_exercises(date)?;
        exercises.extend(added.iter().cloned());
        self.save_session_draft(date, &exercises)?;
        tracing::info!(%date, template = %template.name, count = added.len(), "loaded template into session");
        Ok(added)
    }

    /// Saves the session as a workout and clears the draft.
    /// # Errors
    /// - `DbError::EmptySession` if nothing was logged.
    /// - `DbError::UnfilledSet` if a strength set still holds a placeholder.
    pub fn save_session(&mut self, date: NaiveDate, notes: Option<String>) -> Result<Workout> {
        let exercises = self.session_exercises(date)?;
        if exercises.is_empty() {
            bail!(DbError::EmptySession(date));
        }
        for exercise in &exercises {
            if exercise.category != ExerciseCategory::Strength {
                continue;
            }
            if exercise.sets.is_empty() {
                bail!(ValidationError::NoSets(exercise.name.clone()));
            }
            if let Some(i) = exercise.sets.iter().position(Set::is_placeholder) {
                bail!(DbError::UnfilledSet {
                    exercise: exercise.name.clone(),
                    set: i + 1,
                });
            }
        }

        let workout = Workout {
            id: Uuid::new_v4(),
            date,
            exercises,
            notes: models::clean_notes(notes),
            created_at: Utc::now(),
        };
        let mut workouts = self.load_workouts()?;
        workouts.push(workout.clone());
        self.save_workouts(&workouts)?;
        self.save_session_draft(date, &[])?;
        tracing::info!(id = %workout.id, %date, exercises = workout.exercises.len(), "saved workout");
        Ok(workout)
    }

    /// CSV of the current session.
    pub fn export_session_csv(&self, date: NaiveDate) -> Result<String> {
        let exercises = self.session_exercises(date)?;
        if exercises.is_empty() {
            bail!(DbError::EmptySession(date));
        }
        export::session_csv(&exercises, date, self.config.units)
            .context("Failed to export session")
    }

    // --- Workouts ---

    /// Lists saved workouts, newest first.
    pub fn list_workouts(&self, filters: &WorkoutFilters) -> Result<Vec<Workout>> {
        let cutoff = filters.since_days.and_then(|d| TimeRange::Days(d).cutoff(today()));
        let search = filters.search.map(|s| s.trim().to_lowercase());
        let exercise = filters.exercise.map(|s| s.trim().to_lowercase());

        let mut workouts: Vec<Workout> = self
            .load_workouts()?
            .into_iter()
            .filter(|w| filters.date.map_or(true, |d| w.date == d))
            .filter(|w| cutoff.map_or(true, |c| w.date >= c))
            .filter(|w| {
                filters
                    .category
                    .map_or(true, |c| w.exercises.iter().any(|e| e.category == c))
            })
            .filter(|w| {
                exercise.as_deref().map_or(true, |name| {
                    w.exercises.iter().any(|e| e.name.to_lowercase() == name)
                })
            })
            .filter(|w| {
                search.as_deref().map_or(true, |term| {
                    contains_ci(w.notes.as_deref(), term)
                        || w.exercises.iter().any(|e| {
                            contains_ci(Some(e.name.as_str()), term) || contains_ci(e.notes.as_deref(), term)
                        })
                })
            })
            .collect();

        workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        if let Some(limit) = filters.limit {
            workouts.truncate(limit);
        }
        Ok(workouts)
    }

    /// Looks a workout up by a unique prefix of its id.
    /// # Errors
    /// - `DbError::WorkoutNotFound` / `DbError::AmbiguousId`.
    pub fn get_workout(&self, id_or_prefix: &str) -> Result<Workout> {
        let workouts = self.load_workouts()?;
        let i = resolve_id_prefix(&workouts, id_or_prefix, |w| w.id)?
            .ok_or_else(|| DbError::WorkoutNotFound(id_or_prefix.to_string()))?;
        Ok(workouts[i].clone())
    }

    /// Changes the date and/or notes of a saved workout. Empty notes clear them.
    pub fn edit_workout(
        &mut self,
        id_or_prefix: &str,
        new_date: Option<NaiveDate>,
        new_notes: Option<String>,
    ) -> Result<Workout> {
        if new_date.is_none() && new_notes.is_none() {
            bail!("No fields provided to update for workout '{id_or_prefix}'");
        }
        let mut workouts = self.load_workouts()?;
        let i = resolve_id_prefix(&workouts, id_or_prefix, |w| w.id)?
            .ok_or_else(|| DbError::WorkoutNotFound(id_or_prefix.to_string()))?;
        if let Some(date) = new_date {
            workouts[i].date = date;
        }
        if let Some(notes) = new_notes {
            workouts[i].notes = models::clean_notes(Some(notes));
        }
        let updated = workouts[i].clone();
        self.save_workouts(&workouts)?;
        tracing::info!(id = %updated.id, "updated workout");
        Ok(updated)
    }

    /// Deletes every listed workout. Nothing is deleted if any id fails to resolve.
    pub fn delete_workouts(&mut self, ids: &[String]) -> Result<Vec<Workout>> {
        let mut workouts = self.load_workouts()?;
        let mut doomed = Vec::with_capacity(ids.len());
        for ident in ids {
            let i = resolve_id_prefix(&workouts, ident, |w| w.id)?
                .ok_or_else(|| DbError::WorkoutNotFound(ident.clone()))?;
            doomed.push(workouts[i].id);
        }
        let (deleted, kept): (Vec<Workout>, Vec<Workout>) =
            workouts.drain(..).partition(|w| doomed.contains(&w.id));
        self.save_workouts(&kept)?;
        tracing::info!(count = deleted.len(), "deleted workouts");
        Ok(deleted)
    }

    pub fn history_stats(&self, filters: &WorkoutFilters) -> Result<HistoryStats> {
        Ok(HistoryStats::from_workouts(&self.list_workouts(filters)?))
    }

    pub fn export_history_csv(&self, filters: &WorkoutFilters) -> Result<String> {
        let workouts = self.list_workouts(filters)?;
        export::history_csv(&workouts, self.config.units).context("Failed to export history")
    }

    pub fn export_history_json(&self, filters: &WorkoutFilters) -> Result<String> {
        let workouts = self.list_workouts(filters)?;
        export::to_pretty_json(&workouts).context("Failed to export history")
    }

    // --- Templates ---

    pub fn list_templates(&self) -> Result<Vec<Template>> {
        self.load_templates()
    }

    fn template_index(templates: &[Template], ident: &str) -> Result<usize> {
        let wanted = ident.trim().to_lowercase();
        if let Some(i) = templates.iter().position(|t| t.name.to_lowercase() == wanted) {
            return Ok(i);
        }
        resolve_id_prefix(templates, ident, |t| t.id)?
            .ok_or_else(|| DbError::TemplateNotFound(ident.to_string()).into())
    }

    fn name_taken(templates: &[Template], name: &str, except: Option<Uuid>) -> bool {
        let wanted = name.trim().to_lowercase();
        templates
            .iter()
            .any(|t| Some(t.id) != except && t.name.to_lowercase() == wanted)
    }

    /// Looks a template up by name (case-insensitive) or id prefix.
    pub fn get_template(&self, name_or_id: &str) -> Result<Template> {
        let templates = self.load_templates()?;
        let i = Self::template_index(&templates, name_or_id)?;
        Ok(templates[i].clone())
    }

    /// Creates a template, or replaces the one with the same name when `replace` is set.
    /// # Errors
    /// - `DbError::TemplateExists` if the name is taken and `replace` is false.
    /// - `ValidationError` variants.
    pub fn save_template(&mut self, input: NewTemplate, replace: bool) -> Result<Template> {
        let mut template = input.validate(Utc::now())?;
        let mut templates = self.load_templates()?;
        let wanted = template.name.to_lowercase();
        match templates.iter().position(|t| t.name.to_lowercase() == wanted) {
            Some(_) if !replace => bail!(DbError::TemplateExists(template.name)),
            Some(i) => {
                template.id = templates[i].id;
                templates[i] = template.clone();
            }
            None => templates.push(template.clone()),
        }
        self.save_templates(&templates)?;
        tracing::info!(name = %template.name, "saved template");
        Ok(template)
    }

    pub fn edit_template(&mut self, ident: &str, params: EditTemplateParams) -> Result<Template> {
        let mut templates = self.load_templates()?;
        let i = Self::template_index(&templates, ident)?;
        let id = templates[i].id;
        if let Some(name) = params.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!(ValidationError::EmptyTemplateName);
            }
            if Self::name_taken(&templates, &name, Some(id)) {
                bail!(DbError::TemplateExists(name));
            }
            templates[i].name = name;
        }
        if let Some(day) = params.day {
            templates[i].day = day;
        }
        if let Some(description) = params.description {
            templates[i].description = models::clean_notes(Some(description));
        }
        let updated = templates[i].clone();
        self.save_templates(&templates)?;
        Ok(updated)
    }

    pub fn add_template_exercise(
        &mut self,
        ident: &str,
        exercise: TemplateExercise,
    ) -> Result<Template> {
        exercise.validate()?;
        let mut templates = self.load_templates()?;
        let i = Self::template_index(&templates, ident)?;
        templates[i].exercises.push(exercise);
        let updated = templates[i].clone();
        self.save_templates(&templates)?;
        Ok(updated)
    }

    /// Removes the blueprint at 1-based `index`. The last one cannot be removed.
    pub fn remove_template_exercise(
        &mut self,
        ident: &str,
        index: usize,
    ) -> Result<TemplateExercise> {
        let mut templates = self.load_templates()?;
        let i = Self::template_index(&templates, ident)?;
        let e = check_index("Exercise", index, templates[i].exercises.len())?;
        if templates[i].exercises.len() == 1 {
            bail!(ValidationError::EmptyTemplate(templates[i].name.clone()));
        }
        let removed = templates[i].exercises.remove(e);
        self.save_templates(&templates)?;
        Ok(removed)
    }

    /// Copies a template as "<name> (Copy)", numbering further copies.
    pub fn duplicate_template(&mut self, ident: &str) -> Result<Template> {
        let mut templates = self.load_templates()?;
        let i = Self::template_index(&templates, ident)?;
        let base = format!("{} (Copy)", templates[i].name);
        let name = Self::unique_name(&templates, &base);
        let copy = Template {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
            ..templates[i].clone()
        };
        templates.push(copy.clone());
        self.save_templates(&templates)?;
        tracing::info!(from = %templates[i].name, to = %copy.name, "duplicated template");
        Ok(copy)
    }

    fn unique_name(templates: &[Template], base: &str) -> String {
        if !Self::name_taken(templates, base, None) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base} ({n})"))
            .find(|candidate| !Self::name_taken(templates, candidate, None))
            .unwrap_or_else(|| format!("{base} ({})", Uuid::new_v4().simple()))
    }

    pub fn delete_template(&mut self, ident: &str) -> Result<Template> {
        let mut templates = self.load_templates()?;
        let i = Self::template_index(&templates, ident)?;
        let removed = templates.remove(i);
        self.save_templates(&templates)?;
        tracing::info!(name = %removed.name, "deleted template");
        Ok(removed)
    }

    /// Pretty JSON of one template, or an array of all of them.
    pub fn export_templates(&self, ident: Option<&str>) -> Result<String> {
        match ident {
            Some(ident) => export::to_pretty_json(&self.get_template(ident)?),
            None => {
                let templates = self.load_templates()?;
                if templates.is_empty() {
                    bail!("No templates to export.");
                }
                export::to_pretty_json(&templates)
            }
        }
        .context("Failed to export templates")
    }

    /// Imports one template object or an array of them. Every entry is
    /// validated before anything is stored; clashing names are numbered.
    pub fn import_templates(&mut self, json: &str) -> Result<Vec<Template>> {
        let value: serde_json::Value =
            serde_json::from_str(json).context("Template file is not valid JSON")?;
        let raw = match value {
            serde_json::Value::Array(items) => items,
            object @ serde_json::Value::Object(_) => vec![object],
            _ => bail!("Template file must hold a template object or an array of templates"),
        };

        let now = Utc::now();
        let mut incoming = Vec::with_capacity(raw.len());
        for (i, item) in raw.into_iter().enumerate() {
            let parsed: NewTemplate = serde_json::from_value(item)
                .with_context(|| format!("Template #{} has an invalid format", i + 1))?;
            let template = parsed
                .validate(now)
                .with_context(|| format!("Template #{} was rejected", i + 1))?;
            incoming.push(template);
        }

        let mut templates = self.load_templates()?;
        let mut imported = Vec::with_capacity(incoming.len());
        for mut template in incoming {
            if Self::name_taken(&templates, &template.name, None) {
                template.name = (1..)
                    .map(|n| format!("{} ({n})", template.name))
                    .find(|candidate| !Self::name_taken(&templates, candidate, None))
                    .unwrap_or_else(|| template.id.simple().to_string());
            }
            templates.push(template.clone());
            imported.push(template);
        }
        self.save_templates(&templates)?;
        tracing::info!(count = imported.len(), "imported templates");
        Ok(imported)
    }

    // --- Weight entries ---

    /// Records a weight entry. One entry per date.
    /// # Errors
    /// - `DbError::WeightEntryExists` when the date is taken and `overwrite` is false.
    /// - `ValidationError` variants.
    pub fn add_weight_entry(&mut self, input: NewWeightEntry, overwrite: bool) -> Result<WeightEntry> {
        let date = input.date.unwrap_or_else(today);
        let mut entry = input.validate(date, self.config.units, Utc::now())?;
        let mut entries = self.load_weight_entries()?;
        if let Some(i) = entries.iter().position(|e| e.date == date) {
            if !overwrite {
                bail!(DbError::WeightEntryExists(date));
            }
            entry.id = entries[i].id;
            entries[i] = entry.clone();
            tracing::info!(%date, "replaced weight entry");
        } else {
            entries.push(entry.clone());
            entries.sort_by_key(|e| e.date);
            tracing::info!(%date, weight = entry.body_weight, "added weight entry");
        }
        self.save_weight_entries(&entries)?;
        Ok(entry)
    }

    /// Weight entries, newest first.
    pub fn list_weight_entries(&self, filters: &WeightFilters) -> Result<Vec<WeightEntry>> {
        let cutoff = filters.since_days.and_then(|d| TimeRange::Days(d).cutoff(today()));
        let search = filters.search.map(|s| s.trim().to_lowercase());
        let mut entries: Vec<WeightEntry> = self
            .load_weight_entries()?
            .into_iter()
            .filter(|e| cutoff.map_or(true, |c| e.date >= c))
            .filter(|e| {
                search.as_deref().map_or(true, |term| {
                    contains_ci(e.notes.as_deref(), term)
                        || e.date.format("%Y-%m-%d").to_string().contains(term)
                })
            })
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    /// Deletes the entry for an ISO date, or by id prefix.
    pub fn delete_weight_entry(&mut self, date_or_id: &str) -> Result<WeightEntry> {
        let mut entries = self.load_weight_entries()?;
        let index = match NaiveDate::parse_from_str(date_or_id.trim(), "%Y-%m-%d") {
            Ok(date) => entries.iter().position(|e| e.date == date),
            Err(_) => resolve_id_prefix(&entries, date_or_id, |e| e.id)?,
        };
        let i = index.ok_or_else(|| DbError::WeightEntryNotFound(date_or_id.to_string()))?;
        let removed = entries.remove(i);
        self.save_weight_entries(&entries)?;
        tracing::info!(date = %removed.date, "deleted weight entry");
        Ok(removed)
    }

    pub fn weight_summary(&self) -> Result<Option<WeightSummary>> {
        Ok(WeightSummary::from_entries(&self.load_weight_entries()?))
    }

    /// CSV of every weight entry, oldest first.
    pub fn export_weight_csv(&self) -> Result<String> {
        let entries = self.load_weight_entries()?;
        if entries.is_empty() {
            bail!("No weight entries to export.");
        }
        export::weight_csv(&entries, self.config.units).context("Failed to export weight entries")
    }

    pub fn export_weight_json(&self) -> Result<String> {
        let entries = self.load_weight_entries()?;
        if entries.is_empty() {
            bail!("No weight entries to export.");
        }
        export::to_pretty_json(&entries).context("Failed to export weight entries")
    }

    // --- Lift metrics ---

    /// Names of every strength exercise in the saved history.
    pub fn lift_exercises(&self) -> Result<Vec<String>> {
        Ok(stats::unique_exercise_names(
            &self.load_workouts()?,
            Some(ExerciseCategory::Strength),
        ))
    }

    fn exercise_window(
        &self,
        name: &str,
        range: TimeRange,
    ) -> Result<(Vec<SessionMetrics>, Vec<SessionMetrics>)> {
        let all_time = stats::exercise_history(&self.load_workouts()?, name);
        if all_time.is_empty() {
            bail!(DbError::NoExerciseHistory(name.to_string()));
        }
        let today = today();
        let window = all_time
            .iter()
            .filter(|m| range.contains(m.date, today))
            .cloned()
            .collect();
        Ok((window, all_time))
    }

    /// Full lift metrics for one exercise over `range`.
    /// # Errors
    /// - `DbError::NoExerciseHistory` if the exercise was never logged.
    pub fn analyze_exercise(
        &self,
        name: &str,
        metric: Metric,
        range: TimeRange,
    ) -> Result<ExerciseAnalysis> {
        let (window, all_time) = self.exercise_window(name, range)?;
        let trend = Trend::of(&window, metric);
        let frequency = Frequency::of(&window);
        let exercise = all_time
            .last()
            .map_or_else(|| name.to_string(), |m| m.name.clone());

        Ok(ExerciseAnalysis {
            exercise,
            metric_label: metric.label(self.config.units),
            range: range.to_string(),
            summary: stats::performance_summary(&window, &all_time, metric),
            trend,
            frequency,
            recommendation: stats::recommendation(trend, frequency, window.len()).to_string(),
            progress: ProgressReport::from_history(&window),
            insights: stats::insights(&window, self.config.units),
            history: window,
        })
    }

    pub fn export_performance_csv(&self, name: &str, range: TimeRange) -> Result<String> {
        let (window, _) = self.exercise_window(name, range)?;
        if window.is_empty() {
            bail!("No data to export for '{name}' in the {range}.");
        }
        export::performance_csv(&window, self.config.units)
            .context("Failed to export performance data")
    }
}
