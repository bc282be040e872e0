//! Task use-case service.
//!
//! # Invariants
//! - Task names and dates are trimmed; dates must be valid `YYYY-MM-DD`.
//! - Every mutation writes the whole `tasks` collection.

use crate::engine::progress::{calendar_window, completion_percent, tasks_for_date, CalendarDay};
use crate::model::task::Task;
use crate::repo::json::{load_json, PersistReport, TASKS_KEY};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::Saved;
use crate::util::date::is_valid_iso_date;
use crate::util::id::new_record_id;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskServiceError {
    EmptyName,
    EmptyDate,
    InvalidDate(String),
    NotFound(String),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "task name is required"),
            Self::EmptyDate => write!(f, "task date is required"),
            Self::InvalidDate(value) => {
                write!(f, "task date `{value}` is not a valid YYYY-MM-DD date")
            }
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for TaskServiceError {}

pub struct TaskService<S: KeyValueStore> {
    store: S,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore> TaskService<S> {
    pub fn load(store: S) -> Self {
        let mut tasks: Vec<Task> = load_json(&store, TASKS_KEY, Vec::new());
        let mut ids_assigned = 0;
        for task in tasks.iter_mut().filter(|task| task.id.trim().is_empty()) {
            task.id = new_record_id();
            ids_assigned += 1;
        }
        info!(
            "event=task_load module=task status=ok tasks={} ids_assigned={}",
            tasks.len(),
            ids_assigned
        );
        Self { store, tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks for the selected calendar day, or all tasks.
    pub fn view(&self, date: Option<&str>) -> Vec<&Task> {
        tasks_for_date(&self.tasks, date)
    }

    /// Completion percent of the same view.
    pub fn progress(&self, date: Option<&str>) -> u8 {
        completion_percent(&self.view(date))
    }

    pub fn calendar(&self, today: NaiveDate, days: u32) -> Vec<CalendarDay> {
        calendar_window(&self.tasks, today, days)
    }

    pub fn add_task(&mut self, name: &str, date: &str) -> Result<Saved<Task>, TaskServiceError> {
        let name = name.trim();
        let date = date.trim();
        let rejection = if name.is_empty() {
            Some(TaskServiceError::EmptyName)
        } else if date.is_empty() {
            Some(TaskServiceError::EmptyDate)
        } else if !is_valid_iso_date(date) {
            Some(TaskServiceError::InvalidDate(date.to_string()))
        } else {
            None
        };
        if let Some(err) = rejection {
            warn!("event=task_add module=task status=rejected reason={err}");
            return Err(err);
        }

        let task = Task::new(name, date);
        self.tasks.push(task.clone());
        let persist = self.persist();
        info!("event=task_add module=task status=ok task_id={}", task.id);
        Ok(Saved::new(task, persist))
    }

    /// Flips `done` and returns the new state.
    pub fn toggle_done(&mut self, id: &str) -> Result<Saved<bool>, TaskServiceError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskServiceError::NotFound(id.to_string()))?;
        task.done = !task.done;
        let done = task.done;
        let persist = self.persist();
        info!("event=task_toggle module=task status=ok task_id={id} done={done}");
        Ok(Saved::new(done, persist))
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Saved<Task>, TaskServiceError> {
        let removed = self.take(id)?;
        info!("event=task_remove module=task status=ok task_id={id}");
        Ok(removed)
    }

    /// Removes the task and returns it so the caller can prefill an edit form.
    ///
    /// Re-submitting the form creates a new task with a new id.
    pub fn take_for_edit(&mut self, id: &str) -> Result<Saved<Task>, TaskServiceError> {
        let taken = self.take(id)?;
        info!("event=task_edit module=task status=ok task_id={id}");
        Ok(taken)
    }

    fn take(&mut self, id: &str) -> Result<Saved<Task>, TaskServiceError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskServiceError::NotFound(id.to_string()))?;
        let task = self.tasks.remove(index);
        let persist = self.persist();
        Ok(Saved::new(task, persist))
    }

    fn persist(&self) -> PersistReport {
        let mut persist = PersistReport::new();
        persist.save(&self.store, TASKS_KEY, &self.tasks);
        persist
    }
}
