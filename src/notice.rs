use std::fmt::Write;

use crate::models::{EvaluationResult, StudentRecord, Subject};

pub const FALLBACK_STUDENT_NAME: &str = "the student";

/// Picks the name shown in the notice: the form value, then the logged-in
/// user, then a generic fallback.
pub fn resolve_student_name<'a>(form_name: &'a str, session_name: Option<&'a str>) -> &'a str {
    let form_name = form_name.trim();
    if !form_name.is_empty() {
        return form_name;
    }
    session_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_STUDENT_NAME)
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render(
    student_name: &str,
    weak_subjects: &[Subject],
    recommended_additional_study_hours: Option<u32>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "<div style='font-family:sans-serif;color:#163971;'>");
    let _ = writeln!(
        output,
        "  <h2>Academic Alert – {}</h2>",
        escape_html(student_name)
    );
    let _ = writeln!(
        output,
        "  <p>Your child is at risk of academic decline based on recent school records in SCHOLAR LENS.</p>"
    );
    let _ = writeln!(output, "  <ul>");

    if !weak_subjects.is_empty() {
        let joined = weak_subjects
            .iter()
            .map(|subject| escape_html(subject.display_name()))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            output,
            "    <li>Needs improvement in: <b>{joined}</b></li>"
        );
    }

    if let Some(hours) = recommended_additional_study_hours {
        let _ = writeln!(
            output,
            "    <li>Should increase their weekly study hours by at least <b>{hours} hours</b>.</li>"
        );
    }

    let _ = writeln!(output, "  </ul>");
    let _ = writeln!(
        output,
        "  <p>Please discuss these points and help plan improvements. <br/>Thank you.<br/><i>- SCHOLAR LENS Academic Team</i></p>"
    );
    let _ = write!(output, "</div>");

    output
}

/// Renders the parent notice, but only for a record flagged as declining.
pub fn notice_for(record: &StudentRecord, result: &EvaluationResult) -> Option<String> {
    result.is_declining.then(|| {
        render(
            &record.student_name,
            &result.weak_subjects,
            result.recommended_additional_study_hours,
        )
    })
}
