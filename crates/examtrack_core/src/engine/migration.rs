//! Upcoming-to-past exam migration.
//!
//! # Responsibility
//! - Partition upcoming exams around `today`.
//! - Append each expired exam to the past collection exactly once.
//!
//! # Invariants
//! - Migration is one-directional; nothing returns to the upcoming list.
//! - No two past records share a `(subject, date)` pair after migration,
//!   provided none did before.
//! - Expired exams are appended in their original upcoming order.
//! - Exams with malformed dates never expire.
//! - Every returned record, upcoming or newly past, carries an id.

use crate::model::exam::{PastExam, UpcomingExam};
use crate::util::date::{format_iso_date, is_valid_iso_date};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Where an upcoming exam falls relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStanding {
    /// Date is today or later.
    Upcoming,
    /// Date is strictly before today.
    Expired,
    /// Date is missing or not a real `YYYY-MM-DD` day; treated as upcoming.
    Malformed,
}

/// Classifies `date` against `today_iso` (itself a well-formed ISO date).
///
/// Well-formed dates compare as strings, which is chronological for the
/// fixed-width format.
pub fn classify_date(date: &str, today_iso: &str) -> DateStanding {
    if !is_valid_iso_date(date) {
        return DateStanding::Malformed;
    }
    if date < today_iso {
        DateStanding::Expired
    } else {
        DateStanding::Upcoming
    }
}

/// Counters describing one migration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// New past records appended by this pass.
    pub moved: usize,
    /// Expired exams dropped because the past list already had them.
    pub skipped_duplicates: usize,
    /// Ids of upcoming exams kept back because their date is malformed.
    pub malformed_ids: Vec<String>,
    /// Records that received a fresh id during this pass.
    pub ids_assigned: usize,
}

impl MigrationSummary {
    pub fn past_changed(&self) -> bool {
        self.moved > 0
    }
}

/// Result collections plus the pass summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub upcoming: Vec<UpcomingExam>,
    pub past: Vec<PastExam>,
    pub summary: MigrationSummary,
}

/// Moves every exam dated before `today` from `upcoming` into `past`.
///
/// Running this again on its own output with the same `today` appends
/// nothing.
pub fn migrate(
    upcoming: Vec<UpcomingExam>,
    mut past: Vec<PastExam>,
    today: NaiveDate,
) -> MigrationOutcome {
    let today_iso = format_iso_date(today);
    let mut summary = MigrationSummary::default();
    let mut still_upcoming = Vec::with_capacity(upcoming.len());

    let mut seen: HashSet<(String, String)> = past
        .iter()
        .map(|exam| (exam.subject.clone(), exam.date.clone()))
        .collect();

    for mut exam in upcoming {
        match classify_date(&exam.date, &today_iso) {
            DateStanding::Upcoming => {
                if exam.ensure_id() {
                    summary.ids_assigned += 1;
                }
                still_upcoming.push(exam);
            }
            DateStanding::Malformed => {
                if exam.ensure_id() {
                    summary.ids_assigned += 1;
                }
                summary.malformed_ids.push(exam.id_or_empty().to_string());
                still_upcoming.push(exam);
            }
            DateStanding::Expired => {
                if !seen.insert((exam.subject.clone(), exam.date.clone())) {
                    summary.skipped_duplicates += 1;
                    continue;
                }
                let had_id = exam.id.as_deref().is_some_and(|id| !id.trim().is_empty());
                if !had_id {
                    summary.ids_assigned += 1;
                }
                past.push(PastExam::from_expired(&exam));
                summary.moved += 1;
            }
        }
    }

    MigrationOutcome {
        upcoming: still_upcoming,
        past,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_date, migrate, DateStanding};
    use crate::model::exam::{Grade, PastExam, UpcomingExam};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn classify_treats_today_as_upcoming() {
        assert_eq!(
            classify_date("2025-01-01", "2025-01-01"),
            DateStanding::Upcoming
        );
        assert_eq!(
            classify_date("2024-12-31", "2025-01-01"),
            DateStanding::Expired
        );
        assert_eq!(classify_date("", "2025-01-01"), DateStanding::Malformed);
        assert_eq!(
            classify_date("2024-13-01", "2025-01-01"),
            DateStanding::Malformed
        );
    }

    #[test]
    fn expired_exam_moves_with_null_grade() {
        let upcoming = vec![UpcomingExam::unidentified("Math", "2020-01-01")];
        let outcome = migrate(upcoming, Vec::new(), day("2025-01-01"));

        assert!(outcome.upcoming.is_empty());
        assert_eq!(outcome.past.len(), 1);
        assert_eq!(outcome.past[0].subject, "Math");
        assert_eq!(outcome.past[0].date, "2020-01-01");
        assert_eq!(outcome.past[0].grade, None);
        assert!(outcome.past[0].id.is_some());
        assert_eq!(outcome.summary.moved, 1);
    }

    #[test]
    fn existing_past_record_is_not_duplicated_or_regraded() {
        let past = vec![PastExam {
            id: Some("p1".to_string()),
            subject: "Math".to_string(),
            date: "2020-01-01".to_string(),
            grade: Some(Grade::new(50).unwrap()),
        }];
        let upcoming = vec![UpcomingExam::new("Math", "2020-01-01")];

        let outcome = migrate(upcoming, past.clone(), day("2025-01-01"));
        assert!(outcome.upcoming.is_empty());
        assert_eq!(outcome.past, past);
        assert_eq!(outcome.summary.moved, 0);
        assert_eq!(outcome.summary.skipped_duplicates, 1);
        assert!(!outcome.summary.past_changed());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let upcoming = vec![
            UpcomingExam::new("Math", "2020-01-01"),
            UpcomingExam::new("Physics", "2030-01-01"),
            UpcomingExam::new("Math", "2020-01-01"),
            UpcomingExam::new("Chemistry", "2019-06-10"),
        ];
        let first = migrate(upcoming, Vec::new(), day("2025-01-01"));
        let second = migrate(
            first.upcoming.clone(),
            first.past.clone(),
            day("2025-01-01"),
        );

        assert_eq!(second.past, first.past);
        assert_eq!(second.upcoming, first.upcoming);
        assert_eq!(second.summary.moved, 0);

        let pairs = first
            .past
            .iter()
            .map(|exam| (exam.subject.as_str(), exam.date.as_str()))
            .collect::<HashSet<_>>();
        assert_eq!(pairs.len(), first.past.len());
    }

    #[test]
    fn expired_order_is_preserved_in_append_order() {
        let upcoming = vec![
            UpcomingExam::new("B", "2021-05-01"),
            UpcomingExam::new("Keep", "2026-01-01"),
            UpcomingExam::new("A", "2020-01-01"),
        ];
        let outcome = migrate(upcoming, Vec::new(), day("2025-01-01"));
        let subjects = outcome
            .past
            .iter()
            .map(|exam| exam.subject.as_str())
            .collect::<Vec<_>>();
        assert_eq!(subjects, vec!["B", "A"]);
        assert_eq!(outcome.upcoming.len(), 1);
    }

    #[test]
    fn malformed_dates_stay_upcoming_and_get_ids() {
        let upcoming = vec![
            UpcomingExam::unidentified("Art", ""),
            UpcomingExam::unidentified("Music", "next week"),
        ];
        let outcome = migrate(upcoming, Vec::new(), day("2025-01-01"));

        assert_eq!(outcome.upcoming.len(), 2);
        assert!(outcome.past.is_empty());
        assert_eq!(outcome.summary.malformed_ids.len(), 2);
        assert_eq!(outcome.summary.ids_assigned, 2);
        assert!(outcome.upcoming.iter().all(|exam| exam.id.is_some()));
    }

    #[test]
    fn migrated_record_keeps_upcoming_id() {
        let exam = UpcomingExam::new("History", "2024-02-02");
        let id = exam.id.clone();
        let outcome = migrate(vec![exam], Vec::new(), day("2024-02-03"));
        assert_eq!(outcome.past[0].id, id);
        assert_eq!(outcome.summary.ids_assigned, 0);
    }
}
