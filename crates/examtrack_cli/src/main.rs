//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `examtrack_core` linkage.
//! - Exercise boot, migration and statistics against an in-memory store with
//!   a fixed date, so output is deterministic.

use chrono::NaiveDate;
use examtrack_core::db::open_db_in_memory;
use examtrack_core::{GradeStats, SqliteKeyValueStore, Tracker, TrackerConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("examtrack_core ping={}", examtrack_core::ping());
    println!("examtrack_core version={}", examtrack_core::core_version());

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("examtrack_core store=error error={err}");
            return ExitCode::FAILURE;
        }
    };
    let Some(today) = NaiveDate::from_ymd_opt(2026, 1, 1) else {
        return ExitCode::FAILURE;
    };

    let config = TrackerConfig::default();
    let (mut tracker, boot) = Tracker::boot(SqliteKeyValueStore::new(&conn), &config, today);
    println!(
        "examtrack_core boot moved={} upcoming={} past={}",
        boot.summary.moved,
        tracker.exams().upcoming().len(),
        tracker.exams().past().len()
    );

    for (index, grade) in ["80", "90", "100"].into_iter().enumerate() {
        if let Err(err) = tracker.exams_mut().set_grade_from_input(index, grade) {
            eprintln!("examtrack_core grade=error error={err}");
            return ExitCode::FAILURE;
        }
    }

    match tracker.exams().stats() {
        GradeStats::NoData => println!("examtrack_core stats=none"),
        GradeStats::Summary(summary) => println!(
            "examtrack_core stats graded={} total={} average={:.1} max={} min={}",
            summary.graded_count, summary.total_count, summary.average, summary.max, summary.min
        ),
    }
    ExitCode::SUCCESS
}
