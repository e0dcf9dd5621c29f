use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::decline::{self, DeclineReason};
use crate::form::{FormError, ParseMode, Submission};
use crate::models::{EvaluationResult, StudentRecord};
use crate::suggest;

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    gender: String,
    absences: String,
    study_hours: String,
    activities: String,
    math: String,
    geography: String,
    biology: String,
    chemistry: String,
    physics: String,
    english: String,
    second_language: String,
    parent_email: String,
}

impl From<CsvRow> for Submission {
    fn from(row: CsvRow) -> Self {
        Submission {
            name: row.name,
            gender: row.gender,
            absences: row.absences,
            study_hours: row.study_hours,
            activities: row.activities,
            scores: [
                row.math,
                row.geography,
                row.biology,
                row.chemistry,
                row.physics,
                row.english,
                row.second_language,
            ],
            parent_email: row.parent_email,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub row: usize,
    pub record: StudentRecord,
    pub parent_email: String,
    pub result: EvaluationResult,
    pub reasons: Vec<DeclineReason>,
}

#[derive(Debug)]
pub struct Rejection {
    pub row: usize,
    pub error: FormError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub evaluated: Vec<RowOutcome>,
    pub rejected: Vec<Rejection>,
}

impl BatchOutcome {
    pub fn flagged(&self) -> impl Iterator<Item = &RowOutcome> {
        self.evaluated.iter().filter(|row| row.result.is_declining)
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }
}

pub fn evaluate_csv(csv_path: &Path, mode: ParseMode) -> anyhow::Result<BatchOutcome> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    evaluate_reader(file, mode)
}

pub fn evaluate_reader<R: Read>(input: R, mode: ParseMode) -> anyhow::Result<BatchOutcome> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut outcome = BatchOutcome::default();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let row = index + 2;
        let submission: Submission = result
            .with_context(|| format!("malformed CSV at row {row}"))?
            .into();

        match submission.parse(mode, None) {
            Ok(validated) => {
                let result = suggest::assess(&validated.record);
                let reasons = decline::evaluate_with_reasons(&validated.record);
                tracing::debug!(
                    row,
                    student = %validated.record.student_name,
                    declining = result.is_declining,
                    "evaluated row"
                );
                outcome.evaluated.push(RowOutcome {
                    row,
                    record: validated.record,
                    parent_email: validated.parent_email,
                    result,
                    reasons,
                });
            }
            Err(error) => {
                tracing::warn!(row, %error, "rejected row");
                outcome.rejected.push(Rejection { row, error });
            }
        }
    }

    Ok(outcome)
}
