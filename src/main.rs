//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io::{stdin, stdout, Write}; // For prompts
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fitness_tracker_lib::{
    default_export_filename, format_change, format_number, format_percentage, AppService,
    BodyMeasurements, DbError, EditTemplateParams, Exercise, ExerciseAnalysis, ExerciseCategory,
    ExportKind, HistoryStats, LifestyleMetrics, Metric, NewExercise, NewTemplate, NewWeightEntry,
    Template, TemplateExercise, TrainingDay, Units, WeightEntry, WeightFilters, WeightSummary,
    Workout, WorkoutFilters, WorkoutSummary,
};
use fitness_tracker_lib::models::check_set_count;

fn main() -> Result<()> {
    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}..."); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    // Initialize the application service (loads config, opens the store)
    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    init_tracing(&service.config.log_level);

    run(cli_args.command, cli_args.yes, &mut service)
}

/// Logs go to stderr. RUST_LOG wins over the configured level.
fn init_tracing(fallback_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[allow(clippy::too_many_lines)]
fn run(command: cli::Commands, assume_yes: bool, service: &mut AppService) -> Result<()> {
    let units = service.config.units;
    let header_color = service.config.header_color();

    match command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }

        // --- Session ---
        cli::Commands::Add {
            exercise,
            category,
            sets,
            set_values,
            duration,
            distance,
            notes,
            date,
        } => {
            let input = NewExercise {
                name: exercise,
                category: Some(cli_category(category)),
                set_count: sets,
                sets: set_values,
                duration_minutes: duration,
                distance,
                notes,
            };
            let added = service.add_session_exercise(date, input)?;
            println!("Added '{}' to the session for {date}.", added.name);
            if added.has_placeholder_sets() {
                println!(
                    "{} set(s) to fill in. Use `fill-set <exercise> <set> WEIGHTxREPS`.",
                    added.sets.len()
                );
            }
        }
        cli::Commands::Session { date } => {
            if let Some(template) = service.apply_selected_template(date)? {
                println!(
                    "Loaded queued template '{}' ({} exercises).",
                    template.name,
                    template.exercises.len()
                );
            }
            let exercises = service.session_exercises(date)?;
            if exercises.is_empty() {
                println!("No exercises in the session for {date}.");
            } else {
                println!("Session for {date}:");
                print_session_table(&exercises, header_color, units);
                print_workout_summary(&service.session_summary(date)?, units);
            }
            let others: Vec<String> = service
                .pending_sessions()?
                .into_iter()
                .filter(|d| *d != date)
                .map(|d| d.to_string())
                .collect();
            if !others.is_empty() {
                println!("Unsaved sessions on other days: {}", others.join(", "));
            }
        }
        cli::Commands::Remove { index, date } => {
            let removed = service.remove_session_exercise(date, index)?;
            println!("Removed '{}' from the session.", removed.name);
        }
        cli::Commands::FillSet {
            exercise,
            set,
            value,
            date,
        } => {
            let updated = service.fill_session_set(date, exercise, set, value)?;
            println!(
                "Set {set} of '{}' is now {} x {}.",
                updated.name,
                format_number(value.weight),
                value.reps
            );
        }
        cli::Commands::Clear { date } => {
            if !confirm(assume_yes, &format!("Clear every exercise in the session for {date}?"))? {
                println!("Cancelled.");
                return Ok(());
            }
            let cleared = service.clear_session(date)?;
            println!("Cleared {cleared} exercise(s).");
        }
        cli::Commands::SaveWorkout { notes, date } => {
            let workout = service.save_session(date, notes)?;
            println!(
                "Saved workout {} for {} with {} exercise(s).",
                workout.short_id(),
                workout.date,
                workout.exercises.len()
            );
        }
        cli::Commands::UseTemplate {
            template,
            now,
            date,
        } => {
            if now {
                let added = service.apply_template_to_session(date, &template)?;
                println!("Loaded {} exercise(s) into the session for {date}.", added.len());
                println!("Fill in the sets with `fill-set` before saving.");
            } else {
                let queued = service.queue_template(&template)?;
                println!(
                    "Template '{}' queued. It will be loaded the next time you run `session`.",
                    queued.name
                );
            }
        }

        // --- Workouts ---
        cli::Commands::List { filters, limit } => {
            let workouts = service.list_workouts(&workout_filters(&filters, Some(limit)))?;
            if workouts.is_empty() {
                println!("No workouts found.");
            } else {
                print_workout_table(&workouts, header_color);
            }
        }
        cli::Commands::Show { id } => {
            let workout = service.get_workout(&id)?;
            print_workout_detail(&workout, header_color, units);
        }
        cli::Commands::EditWorkout { id, date, notes } => {
            let workout = service.edit_workout(&id, date, notes)?;
            println!("Updated workout {} ({}).", workout.short_id(), workout.date);
        }
        cli::Commands::DeleteWorkout { ids } => {
            if !confirm(assume_yes, &format!("Delete {} workout(s)?", ids.len()))? {
                println!("Cancelled.");
                return Ok(());
            }
            let deleted = service.delete_workouts(&ids)?;
            for workout in deleted {
                println!("Deleted workout {} ({}).", workout.short_id(), workout.date);
            }
        }
        cli::Commands::History { filters } => {
            let stats = service.history_stats(&workout_filters(&filters, None))?;
            print_history_stats(&stats, header_color);
        }

        // --- Templates ---
        cli::Commands::TemplateCreate {
            name,
            day,
            description,
            exercises,
            replace,
        } => {
            let default_sets = service.config.default_set_count as usize;
            let input = NewTemplate {
                name,
                day: parse_day(day.as_deref())?.flatten(),
                description,
                exercises: exercises
                    .iter()
                    .map(|entry| parse_template_exercise(entry, default_sets))
                    .collect::<Result<Vec<_>>>()?,
            };
            let template = match service.save_template(input.clone(), replace) {
                Ok(t) => t,
                Err(e) => match e.downcast_ref::<DbError>() {
                    Some(DbError::TemplateExists(existing)) => {
                        if !confirm(
                            assume_yes,
                            &format!("A template named '{existing}' already exists. Replace it?"),
                        )? {
                            println!("Cancelled.");
                            return Ok(());
                        }
                        service.save_template(input, true)?
                    }
                    _ => return Err(e),
                },
            };
            println!(
                "Saved template '{}' with {} exercise(s).",
                template.name,
                template.exercises.len()
            );
        }
        cli::Commands::TemplateList => {
            let templates = service.list_templates()?;
            if templates.is_empty() {
                println!("No templates yet. Create one with `template-create`.");
            } else {
                print_template_table(&templates, header_color);
            }
        }
        cli::Commands::TemplateShow { template } => {
            let template = service.get_template(&template)?;
            print_template_detail(&template, header_color, units);
        }
        cli::Commands::TemplateEdit {
            template,
            name,
            day,
            description,
        } => {
            let params = EditTemplateParams {
                name,
                day: parse_day(day.as_deref())?,
                description,
            };
            let updated = service.edit_template(&template, params)?;
            println!("Updated template '{}'.", updated.name);
        }
        cli::Commands::TemplateAddExercise {
            template,
            exercise,
            category,
            sets,
            duration,
            distance,
            notes,
        } => {
            let category = cli_category(category);
            let set_count = match category {
                ExerciseCategory::Strength => {
                    sets.unwrap_or(service.config.default_set_count as usize)
                }
                _ => sets.unwrap_or(0),
            };
            check_set_count(exercise.trim(), category, set_count)?;
            let mut blueprint = TemplateExercise::new(&exercise, category, set_count);
            blueprint.duration_minutes = duration;
            blueprint.distance = distance;
            blueprint.notes = notes;
            let updated = service.add_template_exercise(&template, blueprint)?;
            println!(
                "Added '{}' to template '{}' ({} exercises).",
                exercise.trim(),
                updated.name,
                updated.exercises.len()
            );
        }
        cli::Commands::TemplateRemoveExercise { template, index } => {
            let removed = service.remove_template_exercise(&template, index)?;
            println!("Removed '{}' from template '{template}'.", removed.name);
        }
        cli::Commands::TemplateDuplicate { template } => {
            let copy = service.duplicate_template(&template)?;
            println!("Created '{}'.", copy.name);
        }
        cli::Commands::TemplateDelete { template } => {
            let found = service.get_template(&template)?;
            if !confirm(
                assume_yes,
                &format!("Are you sure you want to delete template '{}'?", found.name),
            )? {
                println!("Cancelled.");
                return Ok(());
            }
            let removed = service.delete_template(&found.id.to_string())?;
            println!("Deleted template '{}'.", removed.name);
        }
        cli::Commands::TemplateExport { template, output } => {
            let json = service.export_templates(template.as_deref())?;
            write_export(&json, &output, &ExportKind::Templates)?;
        }
        cli::Commands::TemplateImport { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let imported = service.import_templates(&json)?;
            println!("Successfully imported {} template(s):", imported.len());
            for template in imported {
                println!("  {}", template.name);
            }
        }

        // --- Weight ---
        cli::Commands::WeightAdd {
            weight,
            date,
            body_fat,
            muscle_mass,
            height,
            waist,
            chest,
            arms,
            thighs,
            calories,
            water,
            sleep,
            stress,
            energy,
            notes,
        } => {
            let input = NewWeightEntry {
                date: Some(date),
                body_weight: weight,
                body_fat_percent: body_fat,
                muscle_mass,
                height,
                measurements: BodyMeasurements {
                    waist,
                    chest,
                    arms,
                    thighs,
                },
                lifestyle: LifestyleMetrics {
                    calories_consumed: calories,
                    water_intake: water,
                    sleep_hours: sleep,
                    stress_level: stress,
                    energy_level: energy,
                },
                notes,
            };
            let entry = match service.add_weight_entry(input.clone(), false) {
                Ok(entry) => entry,
                Err(e) => match e.downcast_ref::<DbError>() {
                    Some(DbError::WeightEntryExists(existing)) => {
                        if !confirm(
                            assume_yes,
                            &format!("An entry for {existing} already exists. Overwrite it?"),
                        )? {
                            println!("Cancelled.");
                            return Ok(());
                        }
                        service.add_weight_entry(input, true)?
                    }
                    _ => return Err(e),
                },
            };
            println!(
                "Logged {} {} for {}.",
                format_number(entry.body_weight),
                units.weight_label(),
                entry.date
            );
            if let Some(bmi) = entry.bmi {
                println!("BMI: {bmi:.1}");
            }
        }
        cli::Commands::WeightList { search, days } => {
            let entries = service.list_weight_entries(&WeightFilters {
                search: search.as_deref(),
                since_days: days,
            })?;
            if entries.is_empty() {
                println!("No weight entries found.");
            } else {
                print_weight_table(&entries, header_color, units);
            }
        }
        cli::Commands::WeightDelete { entry } => {
            if !confirm(assume_yes, &format!("Delete weight entry '{entry}'?"))? {
                println!("Cancelled.");
                return Ok(());
            }
            let removed = service.delete_weight_entry(&entry)?;
            println!("Deleted weight entry for {}.", removed.date);
        }
        cli::Commands::WeightSummary => match service.weight_summary()? {
            Some(summary) => print_weight_summary(&summary, header_color, units),
            None => println!("No weight entries yet. Log one with `weight-add`."),
        },
        cli::Commands::WeightExport { format, output } => {
            let (content, kind) = match format {
                cli::FormatCli::Csv => (service.export_weight_csv()?, ExportKind::WeightCsv),
                cli::FormatCli::Json => (service.export_weight_json()?, ExportKind::WeightJson),
            };
            write_export(&content, &output, &kind)?;
        }

        // --- Lift metrics ---
        cli::Commands::Lifts => {
            let names = service.lift_exercises()?;
            if names.is_empty() {
                println!("No strength exercises in your saved workouts yet.");
            }
            for name in names {
                println!("{name}");
            }
        }
        cli::Commands::Metrics {
            exercise,
            metric,
            range,
        } => {
            let range = range.unwrap_or_else(|| service.default_time_range());
            let metric = cli_metric(metric);
            let analysis = service.analyze_exercise(&exercise, metric, range)?;
            print_analysis(&analysis, metric, header_color, units);
        }
        cli::Commands::MetricsExport {
            exercise,
            range,
            output,
        } => {
            let range = range.unwrap_or_else(|| service.default_time_range());
            let csv = service.export_performance_csv(&exercise, range)?;
            write_export(&csv, &output, &ExportKind::Performance(exercise))?;
        }

        // --- Export ---
        cli::Commands::ExportSession { date, output } => {
            let csv = service.export_session_csv(date)?;
            write_export(&csv, &output, &ExportKind::Session)?;
        }
        cli::Commands::ExportHistory {
            format,
            filters,
            output,
        } => {
            let filters = workout_filters(&filters, None);
            let content = match format {
                cli::FormatCli::Csv => service.export_history_csv(&filters)?,
                cli::FormatCli::Json => service.export_history_json(&filters)?,
            };
            write_export(&content, &output, &ExportKind::History)?;
        }

        // --- Config ---
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
        cli::Commands::SetUnits { units } => {
            let units = match units {
                cli::UnitsCli::Metric => Units::Metric,
                cli::UnitsCli::Imperial => Units::Imperial,
            };
            service.set_units(units)?;
            println!("Units set to {units:?}.");
        }
        cli::Commands::SetDefaultSets { count } => {
            service.set_default_set_count(count)?;
            println!("Default set count set to {count}.");
        }
        cli::Commands::SetTimeRange { days } => {
            service.set_default_time_range(days)?;
            println!("Default lift metrics range set to {days} days.");
        }
    }

    Ok(())
}

const fn cli_category(category: cli::CategoryCli) -> ExerciseCategory {
    match category {
        cli::CategoryCli::Strength => ExerciseCategory::Strength,
        cli::CategoryCli::Cardio => ExerciseCategory::Cardio,
        cli::CategoryCli::Flexibility => ExerciseCategory::Flexibility,
        cli::CategoryCli::Other => ExerciseCategory::Other,
    }
}

const fn cli_metric(metric: cli::MetricCli) -> Metric {
    match metric {
        cli::MetricCli::MaxWeight => Metric::MaxWeight,
        cli::MetricCli::Reps => Metric::Reps,
        cli::MetricCli::Sets => Metric::Sets,
        cli::MetricCli::Volume => Metric::Volume,
        cli::MetricCli::OneRepMax => Metric::OneRepMax,
        cli::MetricCli::Duration => Metric::Duration,
        cli::MetricCli::Distance => Metric::Distance,
    }
}

fn workout_filters(args: &cli::WorkoutFilterArgs, limit: Option<usize>) -> WorkoutFilters<'_> {
    WorkoutFilters {
        search: args.search.as_deref(),
        exercise: args.exercise.as_deref(),
        category: args.category.map(cli_category),
        since_days: args.days,
        date: args.date,
        limit,
    }
}

/// `None`: leave unchanged. `Some(None)`: "none" or empty, clears the day.
fn parse_day(day: Option<&str>) -> Result<Option<Option<TrainingDay>>> {
    match day.map(str::trim) {
        None => Ok(None),
        Some(d) if d.is_empty() || d.eq_ignore_ascii_case("none") => Ok(Some(None)),
        Some(d) => Ok(Some(Some(TrainingDay::try_from(d)?))),
    }
}

/// Parses NAME[:TYPE[:SETS]].
fn parse_template_exercise(entry: &str, default_sets: usize) -> Result<TemplateExercise> {
    let mut parts = entry.split(':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        bail!("Exercise name cannot be empty in '{entry}'");
    }
    let category = match parts.next() {
        Some(t) if !t.is_empty() => ExerciseCategory::try_from(t)?,
        _ => ExerciseCategory::Strength,
    };
    let sets = match parts.next() {
        Some(n) => n
            .parse::<usize>()
            .with_context(|| format!("Invalid set count '{n}' in '{entry}'"))?,
        None if category == ExerciseCategory::Strength => default_sets,
        None => 0,
    };
    if parts.next().is_some() {
        bail!("Too many ':' separated parts in '{entry}'. Use NAME[:TYPE[:SETS]]");
    }
    check_set_count(name, category, sets)?;
    Ok(TemplateExercise::new(name, category, sets))
}

/// Asks a y/N question on stdin. `assume_yes` skips the prompt.
fn confirm(assume_yes: bool, question: &str) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{question} [y/N]: ");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn write_export(content: &str, output: &cli::OutputArgs, kind: &ExportKind) -> Result<()> {
    let path = if output.save {
        Some(PathBuf::from(default_export_filename(
            kind,
            Utc::now().date_naive(),
        )))
    } else {
        output.output.clone()
    };
    match path {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported to {}", path.display());
        }
        None => {
            let mut out = stdout();
            out.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn new_table(header_color: Color, headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(header_color))
                .collect::<Vec<_>>(),
        );
    table
}

fn opt_cell(value: Option<f64>) -> Cell {
    Cell::new(value.map_or_else(|| "-".to_string(), format_number))
}

fn describe_sets(exercise: &Exercise) -> String {
    if exercise.sets.is_empty() {
        return "-".to_string();
    }
    exercise
        .sets
        .iter()
        .map(|s| {
            if s.is_placeholder() {
                "_".to_string()
            } else {
                format!("{}x{}", format_number(s.weight), s.reps)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_session_table(exercises: &[Exercise], header_color: Color, units: Units) {
    let mut table = new_table(
        header_color,
        &[
            "#",
            "Exercise",
            "Type",
            &format!("Sets ({}x reps)", units.weight_label()),
            "Duration (min)",
            &format!("Distance ({})", units.distance_label()),
            "Notes",
        ],
    );
    for (i, exercise) in exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&exercise.name),
            Cell::new(exercise.category),
            Cell::new(describe_sets(exercise)),
            opt_cell(exercise.duration_minutes),
            opt_cell(exercise.distance),
            Cell::new(exercise.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

fn print_workout_summary(summary: &WorkoutSummary, units: Units) {
    println!(
        "Exercises: {}  Sets: {}  Reps: {}  Weight: {} {}  Duration: {} min  Distance: {} {}",
        summary.exercises,
        summary.total_sets,
        summary.total_reps,
        format_number(summary.total_weight),
        units.weight_label(),
        format_number(summary.total_duration),
        format_number(summary.total_distance),
        units.distance_label()
    );
}

fn print_workout_table(workouts: &[Workout], header_color: Color) {
    let mut table = new_table(header_color, &["ID", "Date", "Exercises", "Sets", "Notes"]);
    for workout in workouts {
        let names = workout
            .exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let sets: usize = workout.exercises.iter().map(|e| e.sets.len()).sum();
        table.add_row(vec![
            Cell::new(workout.short_id()),
            Cell::new(workout.date),
            Cell::new(names),
            Cell::new(sets),
            Cell::new(workout.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

fn print_workout_detail(workout: &Workout, header_color: Color, units: Units) {
    println!("Workout {} on {}", workout.id, workout.date);
    println!(
        "Saved: {}",
        workout
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    if let Some(notes) = &workout.notes {
        println!("Notes: {notes}");
    }
    print_session_table(&workout.exercises, header_color, units);
    print_workout_summary(&WorkoutSummary::from_exercises(&workout.exercises), units);
}

fn print_history_stats(stats: &HistoryStats, header_color: Color) {
    let mut table = new_table(header_color, &["Statistic", "Value"]);
    table.add_row(vec![Cell::new("Workout days"), Cell::new(stats.workout_days)]);
    table.add_row(vec![Cell::new("Total workouts"), Cell::new(stats.total_workouts)]);
    table.add_row(vec![Cell::new("Total exercises"), Cell::new(stats.total_exercises)]);
    println!("{table}");
}

fn print_template_table(templates: &[Template], header_color: Color) {
    let mut table = new_table(header_color, &["ID", "Name", "Day", "Exercises", "Description"]);
    for template in templates {
        let mut preview = template
            .exercises
            .iter()
            .take(3)
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if template.exercises.len() > 3 {
            preview.push_str(&format!(" +{} more", template.exercises.len() - 3));
        }
        table.add_row(vec![
            Cell::new(&template.id.simple().to_string()[..8]),
            Cell::new(&template.name),
            Cell::new(template.day.map_or_else(|| "-".to_string(), |d| d.to_string())),
            Cell::new(preview),
            Cell::new(template.description.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

fn print_template_detail(template: &Template, header_color: Color, units: Units) {
    let day = template
        .day
        .map_or_else(String::new, |d| format!(" ({d})"));
    println!("{}{day}", template.name);
    println!(
        "{}",
        template
            .description
            .as_deref()
            .unwrap_or("No description provided")
    );
    let mut table = new_table(
        header_color,
        &[
            "#",
            "Exercise",
            "Type",
            "Sets",
            "Duration (min)",
            &format!("Distance ({})", units.distance_label()),
            "Notes",
        ],
    );
    for (i, exercise) in template.exercises.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&exercise.name),
            Cell::new(exercise.category),
            Cell::new(if exercise.sets.is_empty() {
                "-".to_string()
            } else {
                exercise.sets.len().to_string()
            }),
            opt_cell(exercise.duration_minutes),
            opt_cell(exercise.distance),
            Cell::new(exercise.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

fn print_weight_table(entries: &[WeightEntry], header_color: Color, units: Units) {
    let w = units.weight_label();
    let mut table = new_table(
        header_color,
        &[
            "Date",
            &format!("Weight ({w})"),
            "Body Fat %",
            &format!("Lean Mass ({w})"),
            "BMI",
            "Sleep (h)",
            "Energy",
            "Notes",
        ],
    );
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.date),
            Cell::new(format_number(entry.body_weight)),
            opt_cell(entry.body_fat_percent),
            opt_cell(entry.lean_mass),
            opt_cell(entry.bmi),
            opt_cell(entry.lifestyle.sleep_hours),
            Cell::new(
                entry
                    .lifestyle
                    .energy_level
                    .map_or_else(|| "-".to_string(), |v| v.to_string()),
            ),
            Cell::new(entry.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");

    if let Some(latest) = entries.first() {
        if !latest.measurements.is_empty() {
            let l = units.length_label();
            let m = &latest.measurements;
            println!(
                "Latest measurements ({l}): waist {}, chest {}, arms {}, thighs {}",
                m.waist.map_or_else(|| "-".to_string(), format_number),
                m.chest.map_or_else(|| "-".to_string(), format_number),
                m.arms.map_or_else(|| "-".to_string(), format_number),
                m.thighs.map_or_else(|| "-".to_string(), format_number),
            );
        }
    }
}

fn print_weight_summary(summary: &WeightSummary, header_color: Color, units: Units) {
    let w = units.weight_label();
    let mut table = new_table(header_color, &["Statistic", "Value"]);
    table.add_row(vec![
        Cell::new("Current weight"),
        Cell::new(format!("{} {w}", format_number(summary.current_weight))),
    ]);
    table.add_row(vec![
        Cell::new("Starting weight"),
        Cell::new(format!("{} {w}", format_number(summary.starting_weight))),
    ]);
    table.add_row(vec![
        Cell::new("Total change"),
        Cell::new(format!("{} {w}", format_change(summary.total_change))),
    ]);
    table.add_row(vec![
        Cell::new("Current body fat"),
        Cell::new(
            summary
                .current_body_fat
                .map_or_else(|| "N/A".to_string(), |bf| format!("{bf:.1}%")),
        ),
    ]);
    table.add_row(vec![Cell::new("Entries"), Cell::new(summary.entries)]);
    table.add_row(vec![Cell::new("Days tracked"), Cell::new(summary.days_tracked)]);
    println!("{table}");
}

fn print_analysis(analysis: &ExerciseAnalysis, metric: Metric, header_color: Color, units: Units) {
    println!(
        "{} - {} ({})",
        analysis.exercise, analysis.metric_label, analysis.range
    );
    if analysis.history.is_empty() {
        println!("No sessions in this range.");
        return;
    }

    if let Some(summary) = &analysis.summary {
        let mut table = new_table(header_color, &["Current Best", "Personal Record", "Average", "Improvement"]);
        table.add_row(vec![
            Cell::new(metric.format_value(summary.current_best, units)),
            Cell::new(metric.format_value(summary.personal_record, units)),
            Cell::new(metric.format_value(summary.average, units)),
            Cell::new(summary.improvement.map_or_else(|| "N/A".to_string(), format_percentage)),
        ]);
        println!("{table}");
    }

    let w = units.weight_label();
    let mut table = new_table(
        header_color,
        &[
            "Date",
            "Sets",
            "Avg Reps",
            &format!("Max Weight ({w})"),
            &format!("Volume ({w})"),
            &format!("Est. 1RM ({w})"),
            "Notes",
        ],
    );
    for session in &analysis.history {
        table.add_row(vec![
            Cell::new(session.date),
            Cell::new(session.sets),
            Cell::new(format!("{:.1}", session.avg_reps)),
            Cell::new(format_number(session.max_weight)),
            Cell::new(format_number(session.total_volume)),
            Cell::new(format_number(session.estimated_one_rep_max)),
            Cell::new(session.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");

    if let Some(progress) = &analysis.progress {
        println!(
            "{} sessions from {} to {}. Current est. 1RM: {} {w}",
            progress.sessions,
            progress.first_date,
            progress.last_date,
            format_number(progress.current_one_rep_max)
        );
        println!(
            "Max weight {} ({}), volume {} ({}), avg reps {} ({}), est. 1RM {} ({})",
            format_change(progress.max_weight_change),
            progress.max_weight_trend,
            format_change(progress.volume_change),
            progress.volume_trend,
            format_change((progress.avg_reps_change * 10.0).round() / 10.0),
            progress.avg_reps_trend,
            format_change(progress.one_rep_max_change),
            progress.one_rep_max_trend,
        );
    }

    println!("Trend: {}", analysis.trend);
    println!("Frequency: {}", analysis.frequency);
    println!("Recommendation: {}", analysis.recommendation);
    for insight in &analysis.insights {
        println!("* {}", insight.message);
    }
}
