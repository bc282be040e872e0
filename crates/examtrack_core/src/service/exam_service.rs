//! Exam use-case service.
//!
//! # Responsibility
//! - Load upcoming/past collections, seeding examples on first run.
//! - Run migration on every entry point that shows exams.
//! - Persist after every mutation and report write failures.
//!
//! # Invariants
//! - Every CRUD command is followed by a migration pass, so an exam saved with
//!   a past date is reclassified before the caller re-renders.
//! - The past collection is written only when migration appended to it, a
//!   grade changed, or an earlier past write failed; the upcoming collection
//!   is written on every pass.

use crate::engine::crud::{self, ExamCommandError, SaveAction};
use crate::engine::migration::{migrate, MigrationSummary};
use crate::engine::stats::{compute_stats, GradeStats};
use crate::model::exam::{default_upcoming_exams, Grade, PastExam, UpcomingExam};
use crate::repo::json::{
    load_json, load_json_with_source, PersistReport, PAST_EXAMS_KEY, UPCOMING_EXAMS_KEY,
};
use crate::repo::kv_repo::KeyValueStore;
use crate::service::Saved;
use chrono::NaiveDate;
use log::{info, warn};

/// Migration counters plus the writes it performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub summary: MigrationSummary,
    pub persist: PersistReport,
}

/// Outcome of a save/remove command on the upcoming collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamCommandReceipt {
    /// Id of the saved or removed exam.
    pub exam_id: String,
    /// Whether the saved exam was migrated straight to the past list.
    pub now_past: bool,
    /// Summary of the migration pass that followed the command.
    pub migration: MigrationSummary,
    /// Writes of the command and of the migration pass.
    pub persist: PersistReport,
}

/// Snapshot handed to the past-exams view.
#[derive(Debug, Clone, PartialEq)]
pub struct PastExamsView<'a> {
    pub exams: &'a [PastExam],
    pub stats: GradeStats,
    pub migration: MigrationReport,
}

/// Owner of both exam collections.
pub struct ExamService<S: KeyValueStore> {
    store: S,
    upcoming: Vec<UpcomingExam>,
    past: Vec<PastExam>,
    /// In-memory past list differs from the stored one after a failed write.
    past_unsaved: bool,
}

impl<S: KeyValueStore> ExamService<S> {
    /// Loads both collections from `store`.
    ///
    /// Missing or unreadable upcoming data falls back to the example exams when
    /// `seed_defaults` is set. Ids are ensured on every loaded record.
    pub fn load(store: S, seed_defaults: bool) -> Self {
        let seed = if seed_defaults {
            default_upcoming_exams()
        } else {
            Vec::new()
        };
        let (mut upcoming, source) = load_json_with_source(&store, UPCOMING_EXAMS_KEY, seed);
        let mut past: Vec<PastExam> = load_json(&store, PAST_EXAMS_KEY, Vec::new());

        let assigned = upcoming
            .iter_mut()
            .map(UpcomingExam::ensure_id)
            .chain(past.iter_mut().map(PastExam::ensure_id))
            .filter(|assigned| *assigned)
            .count();

        info!(
            "event=exam_load module=exam status=ok upcoming={} past={} upcoming_source={:?} ids_assigned={}",
            upcoming.len(),
            past.len(),
            source,
            assigned
        );

        Self {
            store,
            upcoming,
            past,
            past_unsaved: false,
        }
    }

    pub fn upcoming(&self) -> &[UpcomingExam] {
        &self.upcoming
    }

    pub fn past(&self) -> &[PastExam] {
        &self.past
    }

    pub fn stats(&self) -> GradeStats {
        compute_stats(&self.past)
    }

    /// Moves expired exams to the past list and persists the result.
    pub fn run_migration(&mut self, today: NaiveDate) -> MigrationReport {
        let outcome = migrate(
            std::mem::take(&mut self.upcoming),
            std::mem::take(&mut self.past),
            today,
        );
        self.upcoming = outcome.upcoming;
        self.past = outcome.past;
        let summary = outcome.summary;

        let mut persist = PersistReport::new();
        if summary.past_changed() || self.past_unsaved {
            self.past_unsaved = !persist.save(&self.store, PAST_EXAMS_KEY, &self.past);
        }
        persist.save(&self.store, UPCOMING_EXAMS_KEY, &self.upcoming);

        for exam_id in &summary.malformed_ids {
            warn!(
                "event=exam_date_malformed module=exam status=skipped exam_id={}",
                exam_id
            );
        }
        info!(
            "event=exam_migrate module=exam status=ok moved={} skipped_duplicates={} malformed={} ids_assigned={} upcoming={} past={} persist_failures={}",
            summary.moved,
            summary.skipped_duplicates,
            summary.malformed_ids.len(),
            summary.ids_assigned,
            self.upcoming.len(),
            self.past.len(),
            persist.failures.len()
        );

        MigrationReport { summary, persist }
    }

    /// Migrates before the edit view lists upcoming exams.
    pub fn open_exam_editor(&mut self, today: NaiveDate) -> MigrationReport {
        self.run_migration(today)
    }

    /// Migrates, then returns the past list with its statistics.
    pub fn open_past_exams(&mut self, today: NaiveDate) -> PastExamsView<'_> {
        let migration = self.run_migration(today);
        PastExamsView {
            exams: &self.past,
            stats: compute_stats(&self.past),
            migration,
        }
    }

    /// Updates the exam at `selection` or adds a new one, then migrates.
    pub fn save_exam(
        &mut self,
        today: NaiveDate,
        selection: Option<usize>,
        subject: &str,
        date: &str,
    ) -> Result<ExamCommandReceipt, ExamCommandError> {
        let action = crud::add_or_update(&mut self.upcoming, selection, subject, date)
            .inspect_err(|err| {
                warn!(
                    "event=exam_save module=exam status=rejected reason={}",
                    command_error_code(err)
                );
            })?;

        let mut persist = PersistReport::new();
        persist.save(&self.store, UPCOMING_EXAMS_KEY, &self.upcoming);
        let migration = self.run_migration(today);
        persist.merge(migration.persist);

        let exam_id = action.id().to_string();
        let now_past = !self
            .upcoming
            .iter()
            .any(|exam| exam.id.as_deref() == Some(exam_id.as_str()));
        info!(
            "event=exam_save module=exam status=ok action={} exam_id={} now_past={}",
            match action {
                SaveAction::Updated { .. } => "updated",
                SaveAction::Added { .. } => "added",
            },
            exam_id,
            now_past
        );

        Ok(ExamCommandReceipt {
            exam_id,
            now_past,
            migration: migration.summary,
            persist,
        })
    }

    /// Removes the upcoming exam at `selection`, then migrates.
    pub fn remove_exam(
        &mut self,
        today: NaiveDate,
        selection: Option<usize>,
    ) -> Result<ExamCommandReceipt, ExamCommandError> {
        let removed = crud::remove(&mut self.upcoming, selection).inspect_err(|err| {
            warn!(
                "event=exam_remove module=exam status=rejected reason={}",
                command_error_code(err)
            );
        })?;

        let mut persist = PersistReport::new();
        persist.save(&self.store, UPCOMING_EXAMS_KEY, &self.upcoming);
        let migration = self.run_migration(today);
        persist.merge(migration.persist);

        let exam_id = removed.id.unwrap_or_default();
        info!(
            "event=exam_remove module=exam status=ok exam_id={}",
            exam_id
        );

        Ok(ExamCommandReceipt {
            exam_id,
            now_past: false,
            migration: migration.summary,
            persist,
        })
    }

    /// Records `grade` on the past exam at `index`.
    pub fn set_grade(
        &mut self,
        index: usize,
        grade: Grade,
    ) -> Result<PersistReport, ExamCommandError> {
        self.write_grade(index, Some(grade))
    }

    /// Parses free-text input and records it as the grade at `index`.
    pub fn set_grade_from_input(
        &mut self,
        index: usize,
        input: &str,
    ) -> Result<Saved<Grade>, ExamCommandError> {
        let grade = Grade::parse(input)
            .map_err(ExamCommandError::from)
            .inspect_err(|err| {
                warn!(
                    "event=grade_set module=exam status=rejected reason={}",
                    command_error_code(err)
                );
            })?;
        let persist = self.write_grade(index, Some(grade))?;
        Ok(Saved::new(grade, persist))
    }

    /// Resets the grade at `index` back to unset.
    pub fn clear_grade(&mut self, index: usize) -> Result<PersistReport, ExamCommandError> {
        self.write_grade(index, None)
    }

    fn write_grade(
        &mut self,
        index: usize,
        grade: Option<Grade>,
    ) -> Result<PersistReport, ExamCommandError> {
        let exam = crud::set_grade(&mut self.past, index, grade).inspect_err(|err| {
            warn!(
                "event=grade_set module=exam status=rejected reason={}",
                command_error_code(err)
            );
        })?;
        let exam_id = exam.id.clone().unwrap_or_default();

        let mut persist = PersistReport::new();
        self.past_unsaved = !persist.save(&self.store, PAST_EXAMS_KEY, &self.past);
        info!(
            "event=grade_set module=exam status=ok exam_id={} graded={}",
            exam_id,
            grade.is_some()
        );
        Ok(persist)
    }
}

fn command_error_code(err: &ExamCommandError) -> &'static str {
    use crate::model::exam::ExamValidationError as V;
    match err {
        ExamCommandError::NoSelection => "no_selection",
        ExamCommandError::IndexOutOfRange { .. } => "index_out_of_range",
        ExamCommandError::Validation(V::EmptySubject) => "empty_subject",
        ExamCommandError::Validation(V::EmptyDate) => "empty_date",
        ExamCommandError::Validation(V::InvalidDate(_)) => "invalid_date",
        ExamCommandError::Validation(V::GradeOutOfRange(_)) => "grade_out_of_range",
        ExamCommandError::Validation(V::InvalidGradeInput(_)) => "invalid_grade_input",
    }
}
