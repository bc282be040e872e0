//! Application state owner.
//!
//! # Responsibility
//! - Load every collection at boot and run the startup migration.
//! - Route commands that span services (task toggle -> goal check).
//!
//! # Invariants
//! - One `Tracker` per store; commands run to completion one at a time.

use crate::config::TrackerConfig;
use crate::model::preference::Theme;
use crate::repo::json::PersistReport;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::exam_service::{ExamService, MigrationReport};
use crate::service::goal_service::GoalService;
use crate::service::preference_service::{load_theme, toggle_theme};
use crate::service::task_service::{TaskService, TaskServiceError};
use crate::service::Saved;
use chrono::NaiveDate;
use log::info;

/// Result of toggling a task from a (possibly date-filtered) view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskToggle {
    pub done: bool,
    /// Completion percent of the view after the toggle.
    pub percent: u8,
    /// Goal reached by this toggle.
    pub celebrate: bool,
    pub persist: PersistReport,
}

pub struct Tracker<S: KeyValueStore + Copy> {
    store: S,
    exams: ExamService<S>,
    tasks: TaskService<S>,
    goal: GoalService<S>,
}

impl<S: KeyValueStore + Copy> Tracker<S> {
    /// Loads all collections and runs the startup migration.
    pub fn boot(store: S, config: &TrackerConfig, today: NaiveDate) -> (Self, MigrationReport) {
        let mut tracker = Self {
            store,
            exams: ExamService::load(store, config.seed_defaults),
            tasks: TaskService::load(store),
            goal: GoalService::load(store),
        };
        let report = tracker.exams.run_migration(today);
        info!(
            "event=tracker_boot module=tracker status=ok today={} upcoming={} past={} tasks={}",
            today,
            tracker.exams.upcoming().len(),
            tracker.exams.past().len(),
            tracker.tasks.tasks().len()
        );
        (tracker, report)
    }

    pub fn exams(&self) -> &ExamService<S> {
        &self.exams
    }

    pub fn exams_mut(&mut self) -> &mut ExamService<S> {
        &mut self.exams
    }

    pub fn tasks(&self) -> &TaskService<S> {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskService<S> {
        &mut self.tasks
    }

    pub fn goal(&self) -> &GoalService<S> {
        &self.goal
    }

    pub fn goal_mut(&mut self) -> &mut GoalService<S> {
        &mut self.goal
    }

    pub fn theme(&self) -> Theme {
        load_theme(&self.store)
    }

    pub fn toggle_theme(&mut self) -> Saved<Theme> {
        toggle_theme(&self.store)
    }

    /// Toggles a task and checks the goal against the view's progress.
    pub fn toggle_task(
        &mut self,
        id: &str,
        view_date: Option<&str>,
    ) -> Result<TaskToggle, TaskServiceError> {
        let toggled = self.tasks.toggle_done(id)?;
        let percent = self.tasks.progress(view_date);
        let achievement = self.goal.check_achievement(percent);

        let mut persist = toggled.persist;
        persist.merge(achievement.persist);
        Ok(TaskToggle {
            done: toggled.value,
            percent,
            celebrate: achievement.value,
            persist,
        })
    }
}
