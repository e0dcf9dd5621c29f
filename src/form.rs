use clap::ValueEnum;
use thiserror::Error;

use crate::models::{
    Activities, Gender, StudentRecord, Subject, ValidatedSubmission, SUBJECT_COUNT,
};
use crate::notice;

pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(String),
    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: String, value: String },
    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange { field: String, value: u32, max: u32 },
    #[error("{field} has no option {value:?}")]
    InvalidChoice { field: String, value: String },
    #[error("parent email {0:?} is not an email address")]
    InvalidEmail(String),
}

/// How numeric text that does not parse is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Reject the submission and name the field.
    #[default]
    Strict,
    /// Read leading digits and fall back to zero, as the original web form did.
    Lenient,
}

/// The form exactly as entered, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub gender: String,
    pub absences: String,
    pub study_hours: String,
    pub activities: String,
    pub scores: [String; SUBJECT_COUNT],
    pub parent_email: String,
}

impl Submission {
    pub fn parse(
        &self,
        mode: ParseMode,
        session_name: Option<&str>,
    ) -> Result<ValidatedSubmission, FormError> {
        let student_name = notice::resolve_student_name(&self.name, session_name);
        let name_given = !self.name.trim().is_empty()
            || session_name.is_some_and(|name| !name.trim().is_empty());
        if mode == ParseMode::Strict && !name_given {
            return Err(FormError::MissingField("name".to_string()));
        }

        let gender = parse_choice::<Gender>("gender", &self.gender)?;
        let activities = parse_choice::<Activities>("activities", &self.activities)?;
        let absence_days = parse_count("absence days", &self.absences, mode)?;
        let study_hours_per_week = parse_count("study hours", &self.study_hours, mode)?;

        let mut subject_scores = [0u32; SUBJECT_COUNT];
        for (slot, (subject, raw)) in subject_scores
            .iter_mut()
            .zip(Subject::ALL.iter().zip(self.scores.iter()))
        {
            *slot = parse_score(*subject, raw, mode)?;
        }

        let parent_email = self.parent_email.trim();
        if parent_email.is_empty() {
            return Err(FormError::MissingField("parent email".to_string()));
        }
        if !parent_email.contains('@') {
            return Err(FormError::InvalidEmail(parent_email.to_string()));
        }

        Ok(ValidatedSubmission {
            record: StudentRecord {
                student_name: student_name.to_string(),
                subject_scores,
                study_hours_per_week,
                absence_days,
                participates_in_activities: activities.participates(),
            },
            gender,
            parent_email: parent_email.to_string(),
        })
    }
}

fn parse_choice<T: ValueEnum>(field: &str, raw: &str) -> Result<T, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field.to_string()));
    }
    T::from_str(value, true).map_err(|_| FormError::InvalidChoice {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_count(field: &str, raw: &str, mode: ParseMode) -> Result<u32, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field.to_string()));
    }

    match mode {
        ParseMode::Strict => value.parse::<u32>().map_err(|_| FormError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }),
        ParseMode::Lenient => Ok(coerce(field, value)),
    }
}

fn parse_score(subject: Subject, raw: &str, mode: ParseMode) -> Result<u32, FormError> {
    let field = format!("{subject} score");
    let score = parse_count(&field, raw, mode)?;
    if mode == ParseMode::Strict && score > MAX_SCORE {
        return Err(FormError::OutOfRange {
            field,
            value: score,
            max: MAX_SCORE,
        });
    }
    Ok(score)
}

fn coerce(field: &str, value: &str) -> u32 {
    let digits: String = value.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(parsed) => {
            if digits.len() != value.len() {
                tracing::warn!(field, value, parsed, "ignored trailing text in numeric field");
            }
            parsed
        }
        Err(_) => {
            tracing::warn!(field, value, "coerced unparsable numeric field to 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_submission() -> Submission {
        Submission {
            name: "Avery Lee".to_string(),
            gender: "Female".to_string(),
            absences: "2".to_string(),
            study_hours: "8".to_string(),
            activities: "Yes".to_string(),
            scores: std::array::from_fn(|_| "70".to_string()),
            parent_email: "parent@example.com".to_string(),
        }
    }

    #[test]
    fn parses_complete_form() {
        let parsed = sample_submission().parse(ParseMode::Strict, None).unwrap();
        assert_eq!(parsed.record.student_name, "Avery Lee");
        assert_eq!(parsed.record.subject_scores, [70; 7]);
        assert_eq!(parsed.record.study_hours_per_week, 8);
        assert_eq!(parsed.record.absence_days, 2);
        assert!(parsed.record.participates_in_activities);
        assert_eq!(parsed.gender, Gender::Female);
        assert_eq!(parsed.parent_email, "parent@example.com");
    }

    #[test]
    fn choices_ignore_case() {
        let mut submission = sample_submission();
        submission.gender = "other".to_string();
        submission.activities = "no".to_string();
        let parsed = submission.parse(ParseMode::Strict, None).unwrap();
        assert_eq!(parsed.gender, Gender::Other);
        assert!(!parsed.record.participates_in_activities);
    }

    #[test]
    fn strict_mode_rejects_garbage_numbers() {
        let mut submission = sample_submission();
        submission.study_hours = "lots".to_string();
        assert_eq!(
            submission.parse(ParseMode::Strict, None),
            Err(FormError::InvalidNumber {
                field: "study hours".to_string(),
                value: "lots".to_string(),
            })
        );
    }

    #[test]
    fn strict_mode_rejects_scores_above_hundred() {
        let mut submission = sample_submission();
        submission.scores[6] = "101".to_string();
        assert_eq!(
            submission.parse(ParseMode::Strict, None),
            Err(FormError::OutOfRange {
                field: "Second Language score".to_string(),
                value: 101,
                max: MAX_SCORE,
            })
        );
    }

    #[test]
    fn strict_mode_rejects_negative_numbers() {
        let mut submission = sample_submission();
        submission.absences = "-3".to_string();
        assert!(matches!(
            submission.parse(ParseMode::Strict, None),
            Err(FormError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn lenient_mode_coerces_to_zero() {
        let mut submission = sample_submission();
        submission.scores[0] = "abc".to_string();
        submission.study_hours = "12h".to_string();
        submission.absences = "-3".to_string();
        let parsed = submission.parse(ParseMode::Lenient, None).unwrap();
        assert_eq!(parsed.record.subject_scores[0], 0);
        assert_eq!(parsed.record.study_hours_per_week, 12);
        assert_eq!(parsed.record.absence_days, 0);
    }

    #[test]
    fn lenient_mode_keeps_oversized_scores_evaluable() {
        let mut submission = sample_submission();
        submission.scores = std::array::from_fn(|_| "4294967295".to_string());
        let parsed = submission.parse(ParseMode::Lenient, None).unwrap();
        assert_eq!(parsed.record.subject_scores, [u32::MAX; 7]);
        assert!(!crate::decline::evaluate(&parsed.record));
    }

    #[test]
    fn blank_fields_are_missing_in_both_modes() {
        let mut submission = sample_submission();
        submission.scores[2] = "  ".to_string();
        for mode in [ParseMode::Strict, ParseMode::Lenient] {
            assert_eq!(
                submission.parse(mode, None),
                Err(FormError::MissingField("Biology score".to_string()))
            );
        }
    }

    #[test]
    fn name_comes_from_session_when_blank() {
        let mut submission = sample_submission();
        submission.name = String::new();
        assert_eq!(
            submission.parse(ParseMode::Strict, None),
            Err(FormError::MissingField("name".to_string()))
        );
        let parsed = submission.parse(ParseMode::Strict, Some("Jules Moreno")).unwrap();
        assert_eq!(parsed.record.student_name, "Jules Moreno");
        let parsed = submission.parse(ParseMode::Lenient, None).unwrap();
        assert_eq!(parsed.record.student_name, notice::FALLBACK_STUDENT_NAME);
    }

    #[test]
    fn name_matching_the_placeholder_is_accepted() {
        let mut submission = sample_submission();
        submission.name = notice::FALLBACK_STUDENT_NAME.to_string();
        let parsed = submission.parse(ParseMode::Strict, None).unwrap();
        assert_eq!(parsed.record.student_name, notice::FALLBACK_STUDENT_NAME);
    }

    #[test]
    fn rejects_unknown_choice_and_bad_email() {
        let mut submission = sample_submission();
        submission.activities = "Sometimes".to_string();
        assert!(matches!(
            submission.parse(ParseMode::Strict, None),
            Err(FormError::InvalidChoice { .. })
        ));

        let mut submission = sample_submission();
        submission.parent_email = "parent.example.com".to_string();
        assert_eq!(
            submission.parse(ParseMode::Strict, None),
            Err(FormError::InvalidEmail("parent.example.com".to_string()))
        );
    }
}
