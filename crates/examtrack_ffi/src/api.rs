//! FFI command API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose each user action as one command handler returning an envelope.
//! - Run every command as open -> boot (load + migrate) -> mutate -> persist.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Commands are serialized by a process-wide lock so concurrent callers
//!   cannot interleave read-modify-persist sequences.
//! - `today` is read from the local clock here and nowhere in core.

use chrono::NaiveDate;
use examtrack_core::db::open_db;
use examtrack_core::{
    core_version as core_version_inner, format_exam_date_for_display,
    init_logging as init_logging_inner, ping as ping_inner, today_local, ExamCommandReceipt,
    GradeStats, MigrationReport, MigrationSchedule, MigrationSummary, PastExam, PersistReport,
    SqliteKeyValueStore, Task, Tracker, TrackerConfig, UpcomingExam, CALENDAR_WINDOW_DAYS,
};
use log::warn;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

static TRACKER_CONFIG: OnceLock<TrackerConfig> = OnceLock::new();
static COMMAND_LOCK: Mutex<()> = Mutex::new(());
static MIGRATION_SCHEDULE: Mutex<Option<MigrationSchedule>> = Mutex::new(None);

type SqliteTracker<'conn> = Tracker<SqliteKeyValueStore<'conn>>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Points the tracker at `db_path` before the first command runs.
///
/// Returns empty string on success. Once any command has run (or a path was
/// configured) the store location is fixed for the process.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let mut config = match TrackerConfig::from_env() {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    config.db_path = trimmed.into();
    let requested = config.db_path.clone();

    match TRACKER_CONFIG.set(config) {
        Ok(()) => String::new(),
        Err(_) if resolve_config().db_path == requested => String::new(),
        Err(_) => format!(
            "store already configured at `{}`",
            resolve_config().db_path.display()
        ),
    }
}

/// Upcoming exam row for list and select widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamItem {
    /// Position used as `selection` by save/remove commands.
    pub index: u32,
    pub exam_id: String,
    pub subject: String,
    pub date: String,
    /// `DD/MM/YYYY`, or the raw value when malformed.
    pub display_date: String,
}

/// Past exam row; `grade` is `None` until recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastExamItem {
    pub index: u32,
    pub exam_id: String,
    pub subject: String,
    pub display_date: String,
    pub grade: Option<u8>,
}

/// Statistics panel; `has_data = false` means no graded exams yet.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeStatsItem {
    pub has_data: bool,
    pub graded_count: u32,
    pub total_count: u32,
    pub average: f64,
    pub max: u8,
    pub min: u8,
}

/// Envelope returned by every exam command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamsResponse {
    /// Whether the command was accepted.
    pub ok: bool,
    /// Human-readable result or rejection reason.
    pub message: String,
    /// Non-fatal persistence warning.
    pub warning: Option<String>,
    /// Id of the saved/removed exam, when the command targeted one.
    pub exam_id: Option<String>,
    pub upcoming: Vec<ExamItem>,
    pub past: Vec<PastExamItem>,
    pub stats: GradeStatsItem,
}

/// Migrates and returns the upcoming list for the edit view.
#[flutter_rust_bridge::frb(sync)]
pub fn exams_open_editor() -> ExamsResponse {
    exams_command("exams_open_editor", |tracker, today, _boot| {
        let report = tracker.exams_mut().open_exam_editor(today);
        Ok(Outcome::new("Exams loaded.", None, report.persist))
    })
}

/// Migrates and returns the past list with grade statistics.
#[flutter_rust_bridge::frb(sync)]
pub fn exams_open_past() -> ExamsResponse {
    exams_command("exams_open_past", |tracker, today, _boot| {
        let view = tracker.exams_mut().open_past_exams(today);
        Ok(Outcome::new("Past exams loaded.", None, view.migration.persist))
    })
}

/// Saves an exam: updates `selection` when it exists, otherwise adds.
#[flutter_rust_bridge::frb(sync)]
pub fn exams_save(selection: Option<u32>, subject: String, date: String) -> ExamsResponse {
    exams_command("exams_save", |tracker, today, _boot| {
        tracker
            .exams_mut()
            .save_exam(today, selection.map(to_index), &subject, &date)
            .map(|receipt| receipt_outcome("Exam saved.", receipt))
            .map_err(|err| err.to_string())
    })
}

/// Removes the upcoming exam at `selection`.
#[flutter_rust_bridge::frb(sync)]
pub fn exams_remove(selection: Option<u32>) -> ExamsResponse {
    exams_command("exams_remove", |tracker, today, _boot| {
        tracker
            .exams_mut()
            .remove_exam(today, selection.map(to_index))
            .map(|receipt| receipt_outcome("Exam removed.", receipt))
            .map_err(|err| err.to_string())
    })
}

/// Records a grade typed by the user (`0`-`100`, decimals are rounded).
#[flutter_rust_bridge::frb(sync)]
pub fn exams_set_grade(index: u32, input: String) -> ExamsResponse {
    exams_command("exams_set_grade", |tracker, _today, _boot| {
        let saved = tracker
            .exams_mut()
            .set_grade_from_input(to_index(index), &input)
            .map_err(|err| err.to_string())?;
        let exam_id = tracker
            .exams()
            .past()
            .get(to_index(index))
            .and_then(|exam| exam.id.clone());
        Ok(Outcome::new(
            format!("Grade {} saved.", saved.value),
            exam_id,
            saved.persist,
        ))
    })
}

/// Runs the periodic migration when it is due.
///
/// The UI calls this from its own timer; returns `None` when nothing was due
/// or the timer was stopped.
#[flutter_rust_bridge::frb(sync)]
pub fn exams_poll_migration() -> Option<ExamsResponse> {
    if !with_schedule(|schedule, now| schedule.poll(now)) {
        return None;
    }
    Some(exams_command("exams_poll_migration", |tracker, today, boot| {
        let report = tracker.exams_mut().run_migration(today);
        Ok(Outcome::new(
            format!(
                "{} exam(s) moved to past.",
                boot.moved + report.summary.moved
            ),
            None,
            report.persist,
        ))
    }))
}

/// Whole seconds until the next periodic migration is due, rounded up.
///
/// Lets the UI arm a one-shot timer instead of polling; `None` once stopped.
#[flutter_rust_bridge::frb(sync)]
pub fn exams_migration_due_in_secs() -> Option<u64> {
    with_schedule(|schedule, now| schedule.time_until_due(now)).map(|left| {
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    })
}

/// Stops the periodic migration; later polls return `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn exams_stop_migration_timer() {
    with_schedule(|schedule, _now| schedule.stop());
}

/// Task row for the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub name: String,
    pub date: String,
    pub done: bool,
}

/// Calendar strip cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarItem {
    pub date: String,
    pub label: String,
    pub has_tasks: bool,
}

/// Envelope returned by task and goal commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksResponse {
    pub ok: bool,
    pub message: String,
    pub warning: Option<String>,
    /// Tasks of the requested view (one day, or all).
    pub items: Vec<TaskItem>,
    /// Completion percent of `items`.
    pub percent: u8,
    /// Task removed by `tasks_take_for_edit`, for prefilling the form.
    pub editing: Option<TaskItem>,
    pub goal: Option<String>,
    pub goal_achieved: bool,
    /// Goal reached by this command; show the celebration.
    pub celebrate: bool,
    pub calendar: Vec<CalendarItem>,
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(view_date: Option<String>) -> TasksResponse {
    tasks_command("tasks_list", view_date, |_tracker| {
        Ok(TaskOutcome::message("Tasks loaded."))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_add(name: String, date: String, view_date: Option<String>) -> TasksResponse {
    tasks_command("tasks_add", view_date, |tracker| {
        let saved = tracker
            .tasks_mut()
            .add_task(&name, &date)
            .map_err(|err| err.to_string())?;
        Ok(TaskOutcome::message("Task added.").with_persist(saved.persist))
    })
}

/// Toggles completion and checks the goal against the view's progress.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_toggle(task_id: String, view_date: Option<String>) -> TasksResponse {
    let filter = view_date.clone();
    tasks_command("tasks_toggle", view_date, move |tracker| {
        let toggle = tracker
            .toggle_task(&task_id, filter.as_deref())
            .map_err(|err| err.to_string())?;
        let mut outcome = TaskOutcome::message(if toggle.done {
            "Task completed."
        } else {
            "Task reopened."
        })
        .with_persist(toggle.persist);
        outcome.celebrate = toggle.celebrate;
        Ok(outcome)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_remove(task_id: String, view_date: Option<String>) -> TasksResponse {
    tasks_command("tasks_remove", view_date, |tracker| {
        let saved = tracker
            .tasks_mut()
            .remove_task(&task_id)
            .map_err(|err| err.to_string())?;
        Ok(TaskOutcome::message("Task removed.").with_persist(saved.persist))
    })
}

/// Removes a task and returns it in `editing` so the form can be prefilled.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_take_for_edit(task_id: String, view_date: Option<String>) -> TasksResponse {
    tasks_command("tasks_take_for_edit", view_date, |tracker| {
        let saved = tracker
            .tasks_mut()
            .take_for_edit(&task_id)
            .map_err(|err| err.to_string())?;
        let mut outcome = TaskOutcome::message("Task ready to edit.").with_persist(saved.persist);
        outcome.editing = Some(to_task_item(&saved.value));
        Ok(outcome)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_set(text: String, view_date: Option<String>) -> TasksResponse {
    tasks_command("goal_set", view_date, |tracker| {
        let persist = tracker
            .goal_mut()
            .set_goal(&text)
            .map_err(|err| err.to_string())?;
        Ok(TaskOutcome::message("Goal set.").with_persist(persist))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_clear(view_date: Option<String>) -> TasksResponse {
    tasks_command("goal_clear", view_date, |tracker| {
        let persist = tracker.goal_mut().clear_goal();
        Ok(TaskOutcome::message("Goal cleared.").with_persist(persist))
    })
}

/// Returns `dark` or `light`; empty string when the store is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_get() -> String {
    with_tracker(|tracker, _today, _boot| tracker.theme().as_str().to_string()).unwrap_or_default()
}

/// Flips the theme and returns the new value (`dark`/`light`).
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle() -> String {
    with_tracker(|tracker, _today, _boot| tracker.toggle_theme().value.as_str().to_string())
        .unwrap_or_default()
}

struct Outcome {
    message: String,
    exam_id: Option<String>,
    persist: PersistReport,
}

impl Outcome {
    fn new(message: impl Into<String>, exam_id: Option<String>, persist: PersistReport) -> Self {
        Self {
            message: message.into(),
            exam_id,
            persist,
        }
    }
}

fn receipt_outcome(message: &str, receipt: ExamCommandReceipt) -> Outcome {
    let message = if receipt.now_past {
        format!("{message} The date has passed, so it was moved to past exams.")
    } else {
        message.to_string()
    };
    Outcome::new(message, Some(receipt.exam_id), receipt.persist)
}

struct TaskOutcome {
    message: String,
    persist: PersistReport,
    editing: Option<TaskItem>,
    celebrate: bool,
}

impl TaskOutcome {
    fn message(message: &str) -> Self {
        Self {
            message: message.to_string(),
            persist: PersistReport::new(),
            editing: None,
            celebrate: false,
        }
    }

    fn with_persist(mut self, persist: PersistReport) -> Self {
        self.persist = persist;
        self
    }
}

fn exams_command(
    command: &'static str,
    f: impl FnOnce(&mut SqliteTracker<'_>, NaiveDate, &MigrationSummary) -> Result<Outcome, String>,
) -> ExamsResponse {
    let result = with_tracker(|tracker, today, boot| {
        let outcome = f(tracker, today, &boot.summary);
        let upcoming = tracker
            .exams()
            .upcoming()
            .iter()
            .enumerate()
            .map(|(index, exam)| to_exam_item(index, exam))
            .collect::<Vec<_>>();
        let past = tracker
            .exams()
            .past()
            .iter()
            .enumerate()
            .map(|(index, exam)| to_past_exam_item(index, exam))
            .collect::<Vec<_>>();
        let stats = to_stats_item(&tracker.exams().stats());
        (outcome, boot.persist, upcoming, past, stats)
    });

    match result {
        Ok((Ok(outcome), boot_persist, upcoming, past, stats)) => ExamsResponse {
            ok: true,
            message: outcome.message,
            warning: command_warning(boot_persist, outcome.persist),
            exam_id: outcome.exam_id,
            upcoming,
            past,
            stats,
        },
        Ok((Err(reason), boot_persist, upcoming, past, stats)) => ExamsResponse {
            ok: false,
            message: format!("{command} failed: {reason}"),
            warning: boot_persist.warning(),
            exam_id: None,
            upcoming,
            past,
            stats,
        },
        Err(reason) => ExamsResponse {
            ok: false,
            message: format!("{command} failed: {reason}"),
            warning: None,
            exam_id: None,
            upcoming: Vec::new(),
            past: Vec::new(),
            stats: to_stats_item(&GradeStats::NoData),
        },
    }
}

fn tasks_command(
    command: &'static str,
    view_date: Option<String>,
    f: impl FnOnce(&mut SqliteTracker<'_>) -> Result<TaskOutcome, String>,
) -> TasksResponse {
    let view_date = view_date
        .map(|date| date.trim().to_string())
        .filter(|date| !date.is_empty());

    let result = with_tracker(|tracker, today, boot| {
        let outcome = f(tracker);
        let filter = view_date.as_deref();
        let items = tracker
            .tasks()
            .view(filter)
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>();
        let percent = tracker.tasks().progress(filter);
        let calendar = tracker
            .tasks()
            .calendar(today, CALENDAR_WINDOW_DAYS)
            .into_iter()
            .map(|day| CalendarItem {
                date: day.date,
                label: day.label,
                has_tasks: day.has_tasks,
            })
            .collect::<Vec<_>>();
        let goal = tracker.goal().goal().cloned();
        (outcome, boot.persist, items, percent, calendar, goal)
    });

    match result {
        Ok((outcome, boot_persist, items, percent, calendar, goal)) => {
            let (ok, message, warning, editing, celebrate) = match outcome {
                Ok(outcome) => (
                    true,
                    outcome.message,
                    command_warning(boot_persist, outcome.persist),
                    outcome.editing,
                    outcome.celebrate,
                ),
                Err(reason) => (
                    false,
                    format!("{command} failed: {reason}"),
                    boot_persist.warning(),
                    None,
                    false,
                ),
            };
            TasksResponse {
                ok,
                message,
                warning,
                items,
                percent,
                editing,
                goal_achieved: goal.as_ref().is_some_and(|goal| goal.achieved),
                goal: goal.map(|goal| goal.text),
                celebrate,
                calendar,
            }
        }
        Err(reason) => TasksResponse {
            ok: false,
            message: format!("{command} failed: {reason}"),
            warning: None,
            items: Vec::new(),
            percent: 0,
            editing: None,
            goal: None,
            goal_achieved: false,
            celebrate: false,
            calendar: Vec::new(),
        },
    }
}

/// Write warnings of the boot migration and of the command itself.
fn command_warning(boot: PersistReport, command: PersistReport) -> Option<String> {
    let mut persist = boot;
    persist.merge(command);
    persist.warning()
}

/// Runs `f` with the boot migration report; the boot pass is the one that
/// moves expired exams, so its writes belong to the command's outcome.
fn with_tracker<T>(
    f: impl FnOnce(&mut SqliteTracker<'_>, NaiveDate, MigrationReport) -> T,
) -> Result<T, String> {
    let _guard = COMMAND_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let config = resolve_config();
    let conn = open_db(&config.db_path).map_err(|err| {
        warn!("event=ffi_command module=ffi status=error error_code=db_open_failed");
        format!("tracker DB open failed: {err}")
    })?;
    let today = today_local();
    let (mut tracker, boot) = Tracker::boot(SqliteKeyValueStore::new(&conn), config, today);
    Ok(f(&mut tracker, today, boot))
}

fn with_schedule<T>(f: impl FnOnce(&mut MigrationSchedule, Instant) -> T) -> T {
    let now = Instant::now();
    let mut schedule = MIGRATION_SCHEDULE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let schedule = schedule
        .get_or_insert_with(|| MigrationSchedule::new(resolve_config().migration_interval, now));
    f(schedule, now)
}

fn resolve_config() -> &'static TrackerConfig {
    TRACKER_CONFIG.get_or_init(|| {
        TrackerConfig::from_env().unwrap_or_else(|err| {
            warn!("event=ffi_config module=ffi status=error error={err}");
            TrackerConfig::default()
        })
    })
}

fn to_index(value: u32) -> usize {
    value as usize
}

fn to_exam_item(index: usize, exam: &UpcomingExam) -> ExamItem {
    ExamItem {
        index: index as u32,
        exam_id: exam.id.clone().unwrap_or_default(),
        subject: exam.subject.clone(),
        date: exam.date.clone(),
        display_date: format_exam_date_for_display(&exam.date),
    }
}

fn to_past_exam_item(index: usize, exam: &PastExam) -> PastExamItem {
    PastExamItem {
        index: index as u32,
        exam_id: exam.id.clone().unwrap_or_default(),
        subject: exam.subject.clone(),
        display_date: format_exam_date_for_display(&exam.date),
        grade: exam.grade.map(|grade| grade.value()),
    }
}

fn to_stats_item(stats: &GradeStats) -> GradeStatsItem {
    match stats {
        GradeStats::NoData => GradeStatsItem {
            has_data: false,
            graded_count: 0,
            total_count: 0,
            average: 0.0,
            max: 0,
            min: 0,
        },
        GradeStats::Summary(summary) => GradeStatsItem {
            has_data: true,
            graded_count: summary.graded_count as u32,
            total_count: summary.total_count as u32,
            average: summary.average,
            max: summary.max,
            min: summary.min,
        },
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        task_id: task.id.clone(),
        name: task.name.clone(),
        date: task.date.clone(),
        done: task.done,
    }
}
