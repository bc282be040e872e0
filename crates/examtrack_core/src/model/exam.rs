//! Exam records in their upcoming and past shapes.
//!
//! # Responsibility
//! - Model the upcoming/past exam documents and the bounded grade value.
//! - Provide field validation used by the edit flow.
//!
//! # Invariants
//! - `id` is assigned once and never reassigned.
//! - A past exam starts with `grade = None`; only explicit user action sets it.
//! - Missing `subject`/`date` fields load as empty strings rather than failing
//!   the whole collection.
//! - A stored grade outside `[0, 100]` loads as unset; the record is kept.

use crate::util::date::is_valid_iso_date;
use crate::util::id::{ensure_id, new_record_id};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for exam fields and grades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamValidationError {
    EmptySubject,
    EmptyDate,
    InvalidDate(String),
    GradeOutOfRange(String),
    InvalidGradeInput(String),
}

impl Display for ExamValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySubject => write!(f, "exam subject is required"),
            Self::EmptyDate => write!(f, "exam date is required"),
            Self::InvalidDate(value) => {
                write!(f, "exam date `{value}` is not a valid YYYY-MM-DD date")
            }
            Self::GradeOutOfRange(value) => {
                write!(f, "grade {value} is outside the range 0-100")
            }
            Self::InvalidGradeInput(value) => write!(f, "grade `{value}` is not a number"),
        }
    }
}

impl Error for ExamValidationError {}

/// Exam grade in the closed range `[0, 100]`.
///
/// Serialized as a bare integer; out-of-range stored values fail to
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, ExamValidationError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(ExamValidationError::GradeOutOfRange(value.to_string()));
        }
        Ok(Self(value as u8))
    }

    /// Parses free-text grade input such as `"87"` or `"92.5"`.
    ///
    /// The raw number is range-checked first and then rounded half-up, so
    /// `"99.6"` becomes 100 while `"100.4"` is rejected.
    pub fn parse(input: &str) -> Result<Self, ExamValidationError> {
        let trimmed = input.trim();
        let raw = trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ExamValidationError::InvalidGradeInput(trimmed.to_string()))?;
        if raw < f64::from(Self::MIN) || raw > f64::from(Self::MAX) {
            return Err(ExamValidationError::GradeOutOfRange(trimmed.to_string()));
        }
        Self::new((raw + 0.5).floor() as i64)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Grade {
    type Error = ExamValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for i64 {
    fn from(value: Grade) -> Self {
        i64::from(value.0)
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exam that has not been migrated yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingExam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: String,
    /// `YYYY-MM-DD`; may be malformed in data written by older clients.
    #[serde(default)]
    pub date: String,
}

impl UpcomingExam {
    /// Creates a record with a freshly generated id.
    pub fn new(subject: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: Some(new_record_id()),
            subject: subject.into(),
            date: date.into(),
        }
    }

    /// Creates a record without an id, the shape of seed and legacy data.
    pub fn unidentified(subject: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: None,
            subject: subject.into(),
            date: date.into(),
        }
    }

    pub fn ensure_id(&mut self) -> bool {
        ensure_id(&mut self.id)
    }

    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Exam whose date has elapsed; only `grade` changes after migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPastExam")]
pub struct PastExam {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub subject: String,
    pub date: String,
    pub grade: Option<Grade>,
}

impl PastExam {
    /// Builds the past record for an expired upcoming exam.
    ///
    /// Copies identity, subject and date; the grade starts unset.
    pub fn from_expired(exam: &UpcomingExam) -> Self {
        let mut past = Self {
            id: exam.id.clone(),
            subject: exam.subject.clone(),
            date: exam.date.clone(),
            grade: None,
        };
        past.ensure_id();
        past
    }

    pub fn ensure_id(&mut self) -> bool {
        ensure_id(&mut self.id)
    }
}

/// Storage shape of a past exam; `grade` is checked per record.
#[derive(Deserialize)]
struct StoredPastExam {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    grade: Option<serde_json::Value>,
}

impl From<StoredPastExam> for PastExam {
    fn from(stored: StoredPastExam) -> Self {
        let grade = stored.grade.and_then(|raw| {
            let grade = stored_grade(&raw);
            if grade.is_none() {
                warn!(
                    "event=grade_discarded module=exam status=skipped exam_id={} reason=invalid_stored_grade",
                    stored.id.as_deref().unwrap_or("unassigned")
                );
            }
            grade
        });
        Self {
            id: stored.id,
            subject: stored.subject,
            date: stored.date,
            grade,
        }
    }
}

fn stored_grade(raw: &serde_json::Value) -> Option<Grade> {
    let whole = raw.as_i64().or_else(|| {
        raw.as_f64()
            .filter(|value| value.fract() == 0.0)
            .map(|value| value as i64)
    })?;
    Grade::new(whole).ok()
}

/// Validates and normalizes edit-flow input.
///
/// Returns the trimmed subject and date.
pub fn validate_exam_fields(
    subject: &str,
    date: &str,
) -> Result<(String, String), ExamValidationError> {
    let subject = subject.trim();
    let date = date.trim();
    if subject.is_empty() {
        return Err(ExamValidationError::EmptySubject);
    }
    if date.is_empty() {
        return Err(ExamValidationError::EmptyDate);
    }
    if !is_valid_iso_date(date) {
        return Err(ExamValidationError::InvalidDate(date.to_string()));
    }
    Ok((subject.to_string(), date.to_string()))
}

/// Example exams used when no upcoming collection has been stored yet.
pub fn default_upcoming_exams() -> Vec<UpcomingExam> {
    vec![
        UpcomingExam::unidentified("Machine Elements", "2025-12-20"),
        UpcomingExam::unidentified("Dynamics", "2025-12-22"),
        UpcomingExam::unidentified("Thermodynamics", "2025-12-25"),
    ]
}

#[cfg(test)]
mod tests {
    use super::{validate_exam_fields, ExamValidationError, Grade, PastExam, UpcomingExam};

    #[test]
    fn grade_bounds_are_inclusive() {
        assert_eq!(Grade::new(0).unwrap().value(), 0);
        assert_eq!(Grade::new(100).unwrap().value(), 100);
        assert!(matches!(
            Grade::new(101),
            Err(ExamValidationError::GradeOutOfRange(_))
        ));
        assert!(matches!(
            Grade::new(-1),
            Err(ExamValidationError::GradeOutOfRange(_))
        ));
    }

    #[test]
    fn grade_parse_rounds_after_range_check() {
        assert_eq!(Grade::parse(" 99.6 ").unwrap().value(), 100);
        assert_eq!(Grade::parse("72.5").unwrap().value(), 73);
        assert!(matches!(
            Grade::parse("100.4"),
            Err(ExamValidationError::GradeOutOfRange(_))
        ));
        assert!(matches!(
            Grade::parse("abc"),
            Err(ExamValidationError::InvalidGradeInput(_))
        ));
        assert!(matches!(
            Grade::parse("NaN"),
            Err(ExamValidationError::InvalidGradeInput(_))
        ));
    }

    #[test]
    fn grade_serializes_as_integer_and_rejects_out_of_range() {
        let json = serde_json::to_string(&Grade::new(88).unwrap()).unwrap();
        assert_eq!(json, "88");
        assert!(serde_json::from_str::<Grade>("150").is_err());
    }

    #[test]
    fn past_exam_serializes_null_grade() {
        let exam = UpcomingExam::new("Math", "2020-01-01");
        let past = PastExam::from_expired(&exam);
        let value = serde_json::to_value(&past).unwrap();
        assert!(value["grade"].is_null());
        assert_eq!(value["id"], exam.id.clone().unwrap());
    }

    #[test]
    fn invalid_stored_grade_unsets_only_that_record() {
        let past: Vec<PastExam> = serde_json::from_str(
            r#"[{"id":"a","subject":"Math","date":"2020-01-01","grade":90},
                {"id":"b","subject":"Bio","date":"2020-01-02","grade":150},
                {"id":"c","subject":"Art","date":"2020-01-03","grade":"A+"},
                {"id":"d","subject":"Chem","date":"2020-01-04","grade":null},
                {"id":"e","subject":"Geo","date":"2020-01-05","grade":75.0}]"#,
        )
        .unwrap();
        let grades = past
            .iter()
            .map(|exam| exam.grade.map(Grade::value))
            .collect::<Vec<_>>();
        assert_eq!(grades, vec![Some(90), None, None, None, Some(75)]);
        assert_eq!(past[1].subject, "Bio");
    }

    #[test]
    fn legacy_upcoming_without_id_or_date_still_loads() {
        let exams: Vec<UpcomingExam> =
            serde_json::from_str(r#"[{"subject":"Physics"}]"#).unwrap();
        assert_eq!(exams[0].id, None);
        assert_eq!(exams[0].date, "");
    }

    #[test]
    fn validate_trims_and_checks_date_shape() {
        assert_eq!(
            validate_exam_fields("  Math ", "2025-06-01").unwrap(),
            ("Math".to_string(), "2025-06-01".to_string())
        );
        assert_eq!(
            validate_exam_fields("   ", "2025-06-01"),
            Err(ExamValidationError::EmptySubject)
        );
        assert_eq!(
            validate_exam_fields("Math", ""),
            Err(ExamValidationError::EmptyDate)
        );
        assert!(matches!(
            validate_exam_fields("Math", "01/06/2025"),
            Err(ExamValidationError::InvalidDate(_))
        ));
    }
}
