//! Aggregate statistics over recorded grades.

use crate::model::exam::PastExam;

/// Aggregates over the graded subset of past exams.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    pub graded_count: usize,
    /// All past exams, graded or not.
    pub total_count: usize,
    /// Mean grade rounded to one decimal.
    pub average: f64,
    pub max: u8,
    pub min: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradeStats {
    /// No past exam has a grade yet.
    NoData,
    Summary(GradeSummary),
}

impl GradeStats {
    pub fn summary(&self) -> Option<&GradeSummary> {
        match self {
            Self::NoData => None,
            Self::Summary(summary) => Some(summary),
        }
    }
}

/// One-decimal rounding, half up: `floor(10x + 0.5) / 10`.
pub fn round_one_decimal(value: f64) -> f64 {
    ((10.0 * value) + 0.5).floor() / 10.0
}

/// Computes count/average/max/min over graded exams.
///
/// Never divides by zero: an empty graded subset yields `GradeStats::NoData`.
pub fn compute_stats(past: &[PastExam]) -> GradeStats {
    let grades = past
        .iter()
        .filter_map(|exam| exam.grade.map(|grade| grade.value()))
        .collect::<Vec<_>>();

    let (Some(&max), Some(&min)) = (grades.iter().max(), grades.iter().min()) else {
        return GradeStats::NoData;
    };

    let sum: u32 = grades.iter().map(|grade| u32::from(*grade)).sum();
    let average = round_one_decimal(f64::from(sum) / grades.len() as f64);

    GradeStats::Summary(GradeSummary {
        graded_count: grades.len(),
        total_count: past.len(),
        average,
        max,
        min,
    })
}

#[cfg(test)]
mod tests {
    use super::{compute_stats, round_one_decimal, GradeStats};
    use crate::model::exam::{Grade, PastExam};

    fn past(subject: &str, grade: Option<i64>) -> PastExam {
        PastExam {
            id: Some(subject.to_string()),
            subject: subject.to_string(),
            date: "2024-01-01".to_string(),
            grade: grade.map(|value| Grade::new(value).unwrap()),
        }
    }

    #[test]
    fn empty_and_ungraded_collections_have_no_data() {
        assert_eq!(compute_stats(&[]), GradeStats::NoData);
        assert_eq!(
            compute_stats(&[past("a", None), past("b", None)]),
            GradeStats::NoData
        );
    }

    #[test]
    fn three_grades_summarize() {
        let stats = compute_stats(&[
            past("a", Some(80)),
            past("b", Some(90)),
            past("c", Some(100)),
        ]);
        let summary = stats.summary().expect("graded exams should summarize");
        assert_eq!(summary.graded_count, 3);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.average, 90.0);
        assert_eq!(summary.max, 100);
        assert_eq!(summary.min, 80);
    }

    #[test]
    fn single_grade_and_ungraded_total() {
        let stats = compute_stats(&[past("a", Some(0)), past("b", None)]);
        let summary = stats.summary().unwrap();
        assert_eq!(summary.graded_count, 1);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.max, 0);
        assert_eq!(summary.min, 0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let stats = compute_stats(&[
            past("a", Some(70)),
            past("b", Some(75)),
            past("c", Some(76)),
        ]);
        assert_eq!(stats.summary().unwrap().average, 73.7);
        assert_eq!(round_one_decimal(84.25), 84.3);
    }
}
