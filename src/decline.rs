use std::fmt;

use crate::models::StudentRecord;

pub const AVERAGE_FLOOR: f64 = 60.0;
pub const SUBJECT_FLOOR: u32 = 50;
pub const MAX_ABSENCE_DAYS: u32 = 10;
pub const MIN_STUDY_HOURS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeclineReason {
    LowAverage(f64),
    FailingSubject,
    ExcessiveAbsences(u32),
    LowStudyHours(u32),
    NoActivities,
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::LowAverage(average) => {
                write!(f, "average score {average:.1} is below {AVERAGE_FLOOR}")
            }
            DeclineReason::FailingSubject => {
                write!(f, "at least one subject is below {SUBJECT_FLOOR}")
            }
            DeclineReason::ExcessiveAbsences(days) => {
                write!(f, "{days} absence days exceeds {MAX_ABSENCE_DAYS}")
            }
            DeclineReason::LowStudyHours(hours) => {
                write!(f, "{hours} weekly study hours is below {MIN_STUDY_HOURS}")
            }
            DeclineReason::NoActivities => f.write_str("no extracurricular activities"),
        }
    }
}

pub fn average_score(record: &StudentRecord) -> f64 {
    let total: f64 = record
        .subject_scores
        .iter()
        .map(|score| f64::from(*score))
        .sum();
    total / record.subject_scores.len() as f64
}

pub fn evaluate(record: &StudentRecord) -> bool {
    !evaluate_with_reasons(record).is_empty()
}

pub fn evaluate_with_reasons(record: &StudentRecord) -> Vec<DeclineReason> {
    let mut reasons = Vec::new();

    let average = average_score(record);
    if average < AVERAGE_FLOOR {
        reasons.push(DeclineReason::LowAverage(average));
    }
    if record.subject_scores.iter().any(|score| *score < SUBJECT_FLOOR) {
        reasons.push(DeclineReason::FailingSubject);
    }
    if record.absence_days > MAX_ABSENCE_DAYS {
        reasons.push(DeclineReason::ExcessiveAbsences(record.absence_days));
    }
    if record.study_hours_per_week < MIN_STUDY_HOURS {
        reasons.push(DeclineReason::LowStudyHours(record.study_hours_per_week));
    }
    if !record.participates_in_activities {
        reasons.push(DeclineReason::NoActivities);
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(scores: [u32; 7], study_hours: u32, absences: u32) -> StudentRecord {
        StudentRecord {
            student_name: "Avery Lee".to_string(),
            subject_scores: scores,
            study_hours_per_week: study_hours,
            absence_days: absences,
            participates_in_activities: true,
        }
    }

    #[test]
    fn steady_student_is_not_flagged() {
        let record = sample_record([70; 7], 8, 2);
        assert!(!evaluate(&record));
        assert!(evaluate_with_reasons(&record).is_empty());
    }

    #[test]
    fn single_failing_subject_flags_decline() {
        let record = sample_record([40, 70, 70, 70, 70, 70, 70], 8, 2);
        assert!(evaluate(&record));
        assert_eq!(
            evaluate_with_reasons(&record),
            vec![DeclineReason::FailingSubject]
        );
    }

    #[test]
    fn low_study_hours_flags_decline() {
        let record = sample_record([80; 7], 3, 0);
        assert!(evaluate(&record));
        assert_eq!(
            evaluate_with_reasons(&record),
            vec![DeclineReason::LowStudyHours(3)]
        );
    }

    #[test]
    fn average_of_exactly_sixty_is_not_low() {
        let record = sample_record([50, 70, 60, 60, 55, 65, 60], 10, 0);
        assert_eq!(average_score(&record), 60.0);
        assert!(!evaluate(&record));
    }

    #[test]
    fn boundaries_sit_on_the_safe_side() {
        let record = sample_record([60; 7], MIN_STUDY_HOURS, MAX_ABSENCE_DAYS);
        assert!(!evaluate(&record));

        let record = sample_record([60; 7], MIN_STUDY_HOURS - 1, MAX_ABSENCE_DAYS);
        assert!(evaluate(&record));

        let record = sample_record([60; 7], MIN_STUDY_HOURS, MAX_ABSENCE_DAYS + 1);
        assert!(evaluate(&record));
    }

    #[test]
    fn missing_activities_flags_decline() {
        let mut record = sample_record([90; 7], 12, 0);
        record.participates_in_activities = false;
        assert_eq!(
            evaluate_with_reasons(&record),
            vec![DeclineReason::NoActivities]
        );
    }

    #[test]
    fn reasons_accumulate_in_rule_order() {
        let mut record = sample_record([30; 7], 1, 20);
        record.participates_in_activities = false;
        let reasons = evaluate_with_reasons(&record);
        assert_eq!(reasons.len(), 5);
        assert!(matches!(reasons[0], DeclineReason::LowAverage(avg) if (avg - 30.0).abs() < 0.001));
        assert_eq!(reasons[1], DeclineReason::FailingSubject);
        assert_eq!(reasons[2], DeclineReason::ExcessiveAbsences(20));
        assert_eq!(reasons[3], DeclineReason::LowStudyHours(1));
        assert_eq!(reasons[4], DeclineReason::NoActivities);
    }

    #[test]
    fn low_average_without_failing_subject() {
        let record = sample_record([55; 7], 8, 0);
        let reasons = evaluate_with_reasons(&record);
        assert_eq!(reasons.len(), 1);
        assert!(matches!(reasons[0], DeclineReason::LowAverage(_)));
    }

    #[test]
    fn huge_scores_do_not_overflow_the_average() {
        let record = sample_record([u32::MAX; 7], 8, 2);
        assert_eq!(average_score(&record), f64::from(u32::MAX));
        assert!(!evaluate(&record));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let record = sample_record([40, 70, 70, 70, 70, 70, 70], 8, 2);
        assert_eq!(evaluate(&record), evaluate(&record));
        assert_eq!(evaluate_with_reasons(&record), evaluate_with_reasons(&record));
    }
}
