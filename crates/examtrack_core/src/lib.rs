//! Core domain logic for the exam and task tracker.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod util;

pub use config::{ConfigError, TrackerConfig};
pub use engine::crud::{add_or_update, remove, ExamCommandError, SaveAction};
pub use engine::migration::{migrate, DateStanding, MigrationOutcome, MigrationSummary};
pub use engine::progress::{CalendarDay, CALENDAR_WINDOW_DAYS};
pub use engine::stats::{compute_stats, GradeStats, GradeSummary};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::exam::{ExamValidationError, Grade, PastExam, UpcomingExam};
pub use model::goal::Goal;
pub use model::preference::Theme;
pub use model::task::Task;
pub use repo::json::{load_json, save_json, PersistFailure, PersistReport};
pub use repo::kv_repo::{KeyValueStore, SqliteKeyValueStore, StoreError, StoreResult};
pub use schedule::MigrationSchedule;
pub use service::exam_service::{
    ExamCommandReceipt, ExamService, MigrationReport, PastExamsView,
};
pub use service::goal_service::{GoalService, GoalServiceError};
pub use service::task_service::{TaskService, TaskServiceError};
pub use service::tracker::{TaskToggle, Tracker};
pub use service::Saved;
pub use util::date::{format_exam_date_for_display, format_iso_date, today_local};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
