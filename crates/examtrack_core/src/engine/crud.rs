//! Edit-flow commands over the upcoming and past exam collections.
//!
//! # Invariants
//! - A rejected command leaves the collection untouched.
//! - Updates keep the record's id; appends always carry a fresh id.

use crate::model::exam::{validate_exam_fields, ExamValidationError, Grade, PastExam, UpcomingExam};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for exam commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamCommandError {
    Validation(ExamValidationError),
    /// The command needs a selected record and none was given.
    NoSelection,
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for ExamCommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoSelection => write!(f, "no exam selected"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "exam index {index} is out of range for {len} exam(s)")
            }
        }
    }
}

impl Error for ExamCommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExamValidationError> for ExamCommandError {
    fn from(value: ExamValidationError) -> Self {
        Self::Validation(value)
    }
}

/// What `add_or_update` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAction {
    Updated { index: usize, id: String },
    Added { id: String },
}

impl SaveAction {
    pub fn id(&self) -> &str {
        match self {
            Self::Updated { id, .. } | Self::Added { id } => id,
        }
    }
}

/// Overwrites the record at `selection` or appends a new one.
///
/// A selection that does not point at an existing record appends.
pub fn add_or_update(
    upcoming: &mut Vec<UpcomingExam>,
    selection: Option<usize>,
    subject: &str,
    date: &str,
) -> Result<SaveAction, ExamCommandError> {
    let (subject, date) = validate_exam_fields(subject, date)?;

    if let Some(index) = selection {
        if let Some(exam) = upcoming.get_mut(index) {
            exam.subject = subject;
            exam.date = date;
            exam.ensure_id();
            return Ok(SaveAction::Updated {
                index,
                id: exam.id_or_empty().to_string(),
            });
        }
    }

    let exam = UpcomingExam::new(subject, date);
    let id = exam.id_or_empty().to_string();
    upcoming.push(exam);
    Ok(SaveAction::Added { id })
}

/// Removes and returns the record at `selection`.
pub fn remove(
    upcoming: &mut Vec<UpcomingExam>,
    selection: Option<usize>,
) -> Result<UpcomingExam, ExamCommandError> {
    let index = selection.ok_or(ExamCommandError::NoSelection)?;
    if index >= upcoming.len() {
        return Err(ExamCommandError::IndexOutOfRange {
            index,
            len: upcoming.len(),
        });
    }
    Ok(upcoming.remove(index))
}

/// Sets or clears the grade of the past exam at `index`.
pub fn set_grade(
    past: &mut [PastExam],
    index: usize,
    grade: Option<Grade>,
) -> Result<&PastExam, ExamCommandError> {
    let len = past.len();
    let exam = past
        .get_mut(index)
        .ok_or(ExamCommandError::IndexOutOfRange { index, len })?;
    exam.grade = grade;
    Ok(&*exam)
}
