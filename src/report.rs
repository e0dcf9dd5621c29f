use std::fmt::Write;

use chrono::NaiveDate;

use crate::batch::BatchOutcome;
use crate::decline::{self, DeclineReason};
use crate::models::{EvaluationResult, StudentRecord, Subject, SUBJECT_COUNT};

#[derive(Debug, Clone, PartialEq)]
pub struct WeakSubjectSummary {
    pub subject: Subject,
    pub count: usize,
    pub avg_score: f64,
}

pub fn summarize_weak_subjects(outcome: &BatchOutcome) -> Vec<WeakSubjectSummary> {
    let mut totals = [(0usize, 0u64); SUBJECT_COUNT];

    for row in &outcome.evaluated {
        for subject in &row.result.weak_subjects {
            let entry = &mut totals[*subject as usize];
            entry.0 += 1;
            entry.1 += u64::from(row.record.score_for(*subject));
        }
    }

    let mut summaries: Vec<WeakSubjectSummary> = Subject::ALL
        .iter()
        .zip(totals)
        .filter(|(_, (count, _))| *count > 0)
        .map(|(subject, (count, total_score))| WeakSubjectSummary {
            subject: *subject,
            count,
            avg_score: total_score as f64 / count as f64,
        })
        .collect();

    // stable sort keeps canonical order among ties
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

/// Printed after the computed suggestions for every declining student.
pub const STANDING_ADVICE: [&str; 2] = [
    "Revise class notes regularly and ask teachers for extra help in weak subjects.",
    "Reduce absence days if possible and participate in school activities.",
];

/// Plain-text verdict for a single submission.
pub fn render_assessment(
    record: &StudentRecord,
    result: &EvaluationResult,
    reasons: &[DeclineReason],
) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{}: average {:.1}, {} study hours/week, {} absence days",
        record.student_name,
        decline::average_score(record),
        record.study_hours_per_week,
        record.absence_days
    );

    if !result.is_declining {
        let _ = writeln!(
            output,
            "No academic decline detected. Keep up the good efforts and maintain a healthy study routine!"
        );
        return output;
    }

    let _ = writeln!(output, "Academic decline detected:");
    for reason in reasons {
        let _ = writeln!(output, "- {reason}");
    }

    let _ = writeln!(output, "Suggestions:");
    if !result.weak_subjects.is_empty() {
        let joined = result
            .weak_subjects
            .iter()
            .map(|subject| subject.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(output, "- Focus on: {joined}");
    }
    if let Some(hours) = result.recommended_additional_study_hours {
        let _ = writeln!(output, "- Study {hours} more hours per week");
    }
    for advice in STANDING_ADVICE {
        let _ = writeln!(output, "- {advice}");
    }

    output
}

pub fn build_report(
    source: &str,
    generated_on: NaiveDate,
    outcome: &BatchOutcome,
    limit: usize,
) -> String {
    let summaries = summarize_weak_subjects(outcome);

    let mut output = String::new();

    let _ = writeln!(output, "# Scholar Lens Decline Report");
    let _ = writeln!(output, "Generated for {} on {}", source, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Students evaluated: {}", outcome.evaluated.len());
    let _ = writeln!(output, "- Flagged for decline: {}", outcome.flagged_count());
    let _ = writeln!(output, "- Rows rejected: {}", outcome.rejected.len());

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weak Subject Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No subjects below the remediation threshold.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} students (avg score {:.1})",
                summary.subject, summary.count, summary.avg_score
            );
        }
    }

    let mut flagged: Vec<_> = outcome.flagged().collect();
    flagged.sort_by(|a, b| {
        decline::average_score(&a.record)
            .partial_cmp(&decline::average_score(&b.record))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let _ = writeln!(output);
    let _ = writeln!(output, "## Flagged Students");

    if flagged.is_empty() {
        let _ = writeln!(output, "No students flagged for decline.");
    } else {
        for row in flagged.iter().take(limit) {
            let reasons = row
                .reasons
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            let _ = writeln!(
                output,
                "- {} ({}) average {:.1}: {}",
                row.record.student_name,
                row.parent_email,
                decline::average_score(&row.record),
                reasons
            );
        }
        if flagged.len() > limit {
            let _ = writeln!(output, "- ...and {} more", flagged.len() - limit);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rejected Rows");

    if outcome.rejected.is_empty() {
        let _ = writeln!(output, "Every row passed validation.");
    } else {
        for rejection in outcome.rejected.iter() {
            let _ = writeln!(output, "- row {}: {}", rejection.row, rejection.error);
        }
    }

    output
}
