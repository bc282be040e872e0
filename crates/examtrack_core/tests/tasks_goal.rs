mod common;

use common::{day, RecordingStore};
use examtrack_core::repo::json::{CURRENT_GOAL_KEY, GOAL_ACHIEVED_KEY, TASKS_KEY, THEME_KEY};
use examtrack_core::{
    GoalService, GoalServiceError, TaskService, TaskServiceError, Theme, Tracker, TrackerConfig,
};

#[test]
fn add_task_validates_and_persists() {
    let store = RecordingStore::new();
    let mut tasks = TaskService::load(&store);

    assert_eq!(
        tasks.add_task("  ", "2025-01-01").unwrap_err(),
        TaskServiceError::EmptyName
    );
    assert_eq!(
        tasks.add_task("read", "").unwrap_err(),
        TaskServiceError::EmptyDate
    );
    assert!(matches!(
        tasks.add_task("read", "1/1/2025"),
        Err(TaskServiceError::InvalidDate(_))
    ));
    assert!(store.writes().is_empty());

    let saved = tasks.add_task(" read ", "2025-01-01").unwrap();
    assert_eq!(saved.value.name, "read");
    assert!(!saved.value.done);
    assert_eq!(store.writes(), vec![TASKS_KEY.to_string()]);
}

#[test]
fn legacy_numeric_ids_can_be_toggled_and_removed() {
    let store = RecordingStore::new().with_entry(
        TASKS_KEY,
        r#"[{"id":1734000000000,"name":"read","date":"2025-01-01","done":false}]"#,
    );
    let mut tasks = TaskService::load(&store);

    assert!(tasks.toggle_done("1734000000000").unwrap().value);
    assert_eq!(tasks.progress(None), 100);
    let removed = tasks.remove_task("1734000000000").unwrap();
    assert_eq!(removed.value.name, "read");
    assert!(tasks.tasks().is_empty());
    assert!(matches!(
        tasks.remove_task("1734000000000"),
        Err(TaskServiceError::NotFound(_))
    ));
}

#[test]
fn take_for_edit_returns_the_removed_task() {
    let store = RecordingStore::new();
    let mut tasks = TaskService::load(&store);
    let id = tasks.add_task("write", "2025-02-02").unwrap().value.id;

    let taken = tasks.take_for_edit(&id).unwrap();
    assert_eq!(taken.value.date, "2025-02-02");
    assert!(tasks.tasks().is_empty());
}

#[test]
fn calendar_flags_days_with_tasks() {
    let store = RecordingStore::new();
    let mut tasks = TaskService::load(&store);
    tasks.add_task("write", "2025-01-03").unwrap();

    let calendar = tasks.calendar(day("2025-01-01"), 30);
    assert_eq!(calendar.len(), 30);
    assert!(calendar[2].has_tasks);
    assert_eq!(calendar[2].label, "3/1");
    assert_eq!(calendar.iter().filter(|day| day.has_tasks).count(), 1);
}

#[test]
fn goal_requires_text_and_resets_achievement() {
    let store = RecordingStore::new();
    let mut goal = GoalService::load(&store);
    assert_eq!(goal.set_goal("   ").unwrap_err(), GoalServiceError::EmptyGoal);

    goal.set_goal("finish the reading list").unwrap();
    assert!(goal.check_achievement(100).value);
    assert!(goal.goal().unwrap().achieved);

    goal.set_goal("next goal").unwrap();
    assert!(!goal.goal().unwrap().achieved);
    assert_eq!(store.raw(GOAL_ACHIEVED_KEY).as_deref(), Some("false"));

    goal.clear_goal();
    assert!(goal.goal().is_none());
    assert_eq!(store.raw(CURRENT_GOAL_KEY).as_deref(), Some("null"));
}

#[test]
fn goal_state_survives_reload() {
    let store = RecordingStore::new();
    {
        let mut goal = GoalService::load(&store);
        goal.set_goal("ship it").unwrap();
        goal.check_achievement(100);
    }
    let goal = GoalService::load(&store);
    let loaded = goal.goal().expect("goal should reload");
    assert_eq!(loaded.text, "ship it");
    assert!(loaded.achieved);
}

#[test]
fn tracker_celebrates_exactly_once_when_view_completes() {
    let store = RecordingStore::new();
    let config = TrackerConfig {
        seed_defaults: false,
        ..TrackerConfig::default()
    };
    let (mut tracker, boot) = Tracker::boot(&store, &config, day("2025-01-01"));
    assert_eq!(boot.summary.moved, 0);

    tracker.goal_mut().set_goal("clear the day").unwrap();
    let first = tracker
        .tasks_mut()
        .add_task("a", "2025-01-02")
        .unwrap()
        .value
        .id;
    let second = tracker
        .tasks_mut()
        .add_task("b", "2025-01-02")
        .unwrap()
        .value
        .id;
    tracker.tasks_mut().add_task("other day", "2025-01-05").unwrap();

    let half = tracker.toggle_task(&first, Some("2025-01-02")).unwrap();
    assert!(half.done);
    assert_eq!(half.percent, 50);
    assert!(!half.celebrate);

    let full = tracker.toggle_task(&second, Some("2025-01-02")).unwrap();
    assert_eq!(full.percent, 100);
    assert!(full.celebrate);

    tracker.toggle_task(&second, Some("2025-01-02")).unwrap();
    let again = tracker.toggle_task(&second, Some("2025-01-02")).unwrap();
    assert_eq!(again.percent, 100);
    assert!(!again.celebrate);
}

#[test]
fn theme_defaults_to_light_and_toggles() {
    let store = RecordingStore::new();
    let config = TrackerConfig::default();
    let (mut tracker, _) = Tracker::boot(&store, &config, day("2025-01-01"));

    assert_eq!(tracker.theme(), Theme::Light);
    assert_eq!(tracker.toggle_theme().value, Theme::Dark);
    assert_eq!(store.raw(THEME_KEY).as_deref(), Some("\"dark\""));
    assert_eq!(tracker.theme(), Theme::Dark);
}

#[test]
fn bare_theme_text_is_understood() {
    let store = RecordingStore::new().with_entry(THEME_KEY, "dark");
    let config = TrackerConfig::default();
    let (tracker, _) = Tracker::boot(&store, &config, day("2025-01-01"));
    assert_eq!(tracker.theme(), Theme::Dark);
}

#[test]
fn incomplete_stored_task_does_not_wipe_the_list() {
    let store = RecordingStore::new().with_entry(
        TASKS_KEY,
        r#"[{"id":"keep","name":"read","date":"2025-01-01","done":true},
            {"date":"2025-01-02"}]"#,
    );
    let mut tasks = TaskService::load(&store);
    assert_eq!(tasks.tasks().len(), 2);
    assert!(!tasks.tasks()[1].id.is_empty());

    tasks.add_task("write", "2025-01-03").unwrap();
    let reloaded = TaskService::load(&store);
    let names = reloaded
        .tasks()
        .iter()
        .map(|task| task.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["read", "", "write"]);
    assert!(reloaded.tasks()[0].done);
}
