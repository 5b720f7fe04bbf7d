use thiserror::Error;

use crate::model::ids::{QuizId, SubjectId};

/// Every question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("quiz time limit must be at least one minute")]
    InvalidTimeLimit,

    #[error("question {index} has an empty prompt")]
    EmptyPrompt { index: usize },

    #[error("question {index} has {found} options, expected {expected}", expected = OPTION_COUNT)]
    OptionCount { index: usize, found: usize },

    #[error("question {index} has an empty option")]
    EmptyOption { index: usize },

    #[error("question {index} marks option {correct} as correct, which does not exist")]
    CorrectOutOfRange { index: usize, correct: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// `correct` is only present when the backend chooses to expose it (teachers
/// editing their own quiz). Scoring always happens server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: Option<usize>,
}

impl Question {
    /// Build a validated question. `index` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the prompt or any option is blank, the option count
    /// is not [`OPTION_COUNT`], or `correct` points outside the options.
    pub fn new(
        index: usize,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: Option<usize>,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuizError::EmptyPrompt { index });
        }

        let found = options.len();
        let options: [String; OPTION_COUNT] = options
            .into_iter()
            .map(|option| option.trim().to_string())
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| QuizError::OptionCount { index, found })?;
        if options.iter().any(String::is_empty) {
            return Err(QuizError::EmptyOption { index });
        }

        if let Some(correct) = correct {
            if correct >= OPTION_COUNT {
                return Err(QuizError::CorrectOutOfRange { index, correct });
            }
        }

        Ok(Self {
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct(&self) -> Option<usize> {
        self.correct
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A quiz as loaded for an attempt. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    subject_id: SubjectId,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
    time_limit_mins: u32,
}

impl Quiz {
    /// Assemble a quiz from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty question list,
    /// `QuizError::InvalidTimeLimit` for a zero time limit, and
    /// `QuizError::EmptyTitle` for a blank title.
    pub fn new(
        id: QuizId,
        subject_id: SubjectId,
        title: impl Into<String>,
        description: Option<String>,
        questions: Vec<Question>,
        time_limit_mins: u32,
    ) -> Result<Self, QuizError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if time_limit_mins == 0 {
            return Err(QuizError::InvalidTimeLimit);
        }
        let description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Self {
            id,
            subject_id,
            title,
            description,
            questions,
            time_limit_mins,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn time_limit_mins(&self) -> u32 {
        self.time_limit_mins
    }

    /// Total time allowed for an attempt, in seconds.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_mins.saturating_mul(60)
    }
}

/// Lightweight listing entry for quizzes under a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub id: QuizId,
    pub subject_id: SubjectId,
    pub title: String,
    pub question_count: usize,
    pub time_limit_mins: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into(), "D".into()]
    }

    #[test]
    fn question_requires_four_options() {
        let err = Question::new(2, "Q", vec!["A".into(), "B".into()], None).unwrap_err();
        assert_eq!(err, QuizError::OptionCount { index: 2, found: 2 });
    }

    #[test]
    fn question_rejects_blank_option() {
        let mut opts = options();
        opts[3] = "   ".into();
        let err = Question::new(0, "Q", opts, None).unwrap_err();
        assert_eq!(err, QuizError::EmptyOption { index: 0 });
    }

    #[test]
    fn question_rejects_out_of_range_correct() {
        let err = Question::new(1, "Q", options(), Some(4)).unwrap_err();
        assert_eq!(err, QuizError::CorrectOutOfRange { index: 1, correct: 4 });
    }

    #[test]
    fn quiz_rejects_empty_questions_and_zero_limit() {
        let err = Quiz::new(
            QuizId::new("q"),
            SubjectId::new("physics"),
            "Kinematics",
            None,
            Vec::new(),
            10,
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);

        let question = Question::new(0, "Q", options(), Some(0)).unwrap();
        let err = Quiz::new(
            QuizId::new("q"),
            SubjectId::new("physics"),
            "Kinematics",
            None,
            vec![question],
            0,
        )
        .unwrap_err();
        assert_eq!(err, QuizError::InvalidTimeLimit);
    }

    #[test]
    fn quiz_normalizes_blank_description_and_reports_seconds() {
        let question = Question::new(0, "Q", options(), None).unwrap();
        let quiz = Quiz::new(
            QuizId::new("q"),
            SubjectId::new("chemistry"),
            "  Moles  ",
            Some("  ".into()),
            vec![question],
            2,
        )
        .unwrap();
        assert_eq!(quiz.title(), "Moles");
        assert_eq!(quiz.description(), None);
        assert_eq!(quiz.time_limit_secs(), 120);
    }
}
