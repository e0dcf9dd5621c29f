use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    Math,
    Geography,
    Biology,
    Chemistry,
    Physics,
    English,
    SecondLanguage,
}

impl Subject {
    /// Canonical order used for scores, weak-subject lists and CSV columns.
    pub const ALL: [Subject; 7] = [
        Subject::Math,
        Subject::Geography,
        Subject::Biology,
        Subject::Chemistry,
        Subject::Physics,
        Subject::English,
        Subject::SecondLanguage,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Geography => "Geography",
            Subject::Biology => "Biology",
            Subject::Chemistry => "Chemistry",
            Subject::Physics => "Physics",
            Subject::English => "English",
            Subject::SecondLanguage => "Second Language",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub const SUBJECT_COUNT: usize = Subject::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Activities {
    Yes,
    No,
}

impl Activities {
    pub fn participates(self) -> bool {
        matches!(self, Activities::Yes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub student_name: String,
    pub subject_scores: [u32; SUBJECT_COUNT],
    pub study_hours_per_week: u32,
    pub absence_days: u32,
    pub participates_in_activities: bool,
}

impl StudentRecord {
    pub fn score_for(&self, subject: Subject) -> u32 {
        // variants are declared in canonical order
        self.subject_scores[subject as usize]
    }

    pub fn scored_subjects(&self) -> impl Iterator<Item = (Subject, u32)> + '_ {
        Subject::ALL
            .iter()
            .copied()
            .zip(self.subject_scores.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Suggestions {
    pub weak_subjects: Vec<Subject>,
    pub recommended_additional_study_hours: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    pub is_declining: bool,
    pub weak_subjects: Vec<Subject>,
    pub recommended_additional_study_hours: Option<u32>,
}

/// A form that passed validation, ready for evaluation and dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub record: StudentRecord,
    pub gender: Gender,
    pub parent_email: String,
}
