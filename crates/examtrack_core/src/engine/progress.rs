//! Task completion progress and the calendar strip.

use crate::model::task::Task;
use crate::util::date::{day_month_label, format_iso_date};
use chrono::{Days, NaiveDate};

/// Default number of days shown by the calendar strip.
pub const CALENDAR_WINDOW_DAYS: u32 = 30;

/// Tasks due on `date`, or every task when no date is selected.
pub fn tasks_for_date<'a>(tasks: &'a [Task], date: Option<&str>) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| date.map_or(true, |selected| task.date == selected))
        .collect()
}

/// Rounded percentage of done tasks; 0 for an empty view.
pub fn completion_percent(tasks: &[&Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let done = tasks.iter().filter(|task| task.done).count();
    let percent = (done as f64 * 100.0 / tasks.len() as f64 + 0.5).floor();
    percent as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `d/m` display label.
    pub label: String,
    pub has_tasks: bool,
}

/// `days` consecutive days starting at `today`.
pub fn calendar_window(tasks: &[Task], today: NaiveDate, days: u32) -> Vec<CalendarDay> {
    (0..days)
        .filter_map(|offset| today.checked_add_days(Days::new(u64::from(offset))))
        .map(|day| {
            let date = format_iso_date(day);
            let has_tasks = tasks.iter().any(|task| task.date == date);
            CalendarDay {
                date,
                label: day_month_label(day),
                has_tasks,
            }
        })
        .collect()
}
