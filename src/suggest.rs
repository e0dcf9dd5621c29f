use crate::decline;
use crate::models::{EvaluationResult, StudentRecord, Subject, Suggestions};

pub const WEAK_SUBJECT_THRESHOLD: u32 = 60;
pub const TARGET_STUDY_HOURS: u32 = 10;

pub fn weak_subjects(record: &StudentRecord) -> Vec<Subject> {
    record
        .scored_subjects()
        .filter(|(_, score)| *score < WEAK_SUBJECT_THRESHOLD)
        .map(|(subject, _)| subject)
        .collect()
}

pub fn additional_study_hours(study_hours_per_week: u32) -> Option<u32> {
    TARGET_STUDY_HOURS
        .checked_sub(study_hours_per_week)
        .filter(|hours| *hours > 0)
}

pub fn suggest(record: &StudentRecord) -> Suggestions {
    Suggestions {
        weak_subjects: weak_subjects(record),
        recommended_additional_study_hours: additional_study_hours(record.study_hours_per_week),
    }
}

pub fn assess(record: &StudentRecord) -> EvaluationResult {
    let suggestions = suggest(record);
    EvaluationResult {
        is_declining: decline::evaluate(record),
        weak_subjects: suggestions.weak_subjects,
        recommended_additional_study_hours: suggestions.recommended_additional_study_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(scores: [u32; 7], study_hours: u32) -> StudentRecord {
        StudentRecord {
            student_name: "Jules Moreno".to_string(),
            subject_scores: scores,
            study_hours_per_week: study_hours,
            absence_days: 0,
            participates_in_activities: true,
        }
    }

    #[test]
    fn weak_subjects_follow_canonical_order() {
        let record = sample_record([59, 90, 10, 60, 80, 45, 20], 8);
        assert_eq!(
            weak_subjects(&record),
            vec![
                Subject::Math,
                Subject::Biology,
                Subject::English,
                Subject::SecondLanguage
            ]
        );
    }

    #[test]
    fn never_lists_subjects_at_or_above_threshold() {
        let record = sample_record([60, 61, 99, 100, 60, 75, 88], 8);
        assert!(suggest(&record).weak_subjects.is_empty());
    }

    #[test]
    fn study_hour_gap_is_measured_against_target() {
        assert_eq!(additional_study_hours(0), Some(10));
        assert_eq!(additional_study_hours(3), Some(7));
        assert_eq!(additional_study_hours(9), Some(1));
        assert_eq!(additional_study_hours(10), None);
        assert_eq!(additional_study_hours(25), None);
    }

    #[test]
    fn failing_math_is_the_only_weak_subject() {
        let record = sample_record([40, 70, 70, 70, 70, 70, 70], 8);
        let result = assess(&record);
        assert!(result.is_declining);
        assert_eq!(result.weak_subjects, vec![Subject::Math]);
        assert_eq!(result.recommended_additional_study_hours, Some(2));
    }

    #[test]
    fn low_hours_with_strong_scores() {
        let record = sample_record([80; 7], 3);
        let result = assess(&record);
        assert!(result.is_declining);
        assert!(result.weak_subjects.is_empty());
        assert_eq!(result.recommended_additional_study_hours, Some(7));
    }

    #[test]
    fn suggestions_are_repeatable() {
        let record = sample_record([55, 65, 45, 70, 70, 70, 70], 4);
        assert_eq!(suggest(&record), suggest(&record));
    }
}
