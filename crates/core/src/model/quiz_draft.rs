use thiserror::Error;

use crate::model::ids::SubjectId;
use crate::model::quiz::{OPTION_COUNT, Question, QuizError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDraftError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("add at least one question")]
    NoQuestions,

    #[error("time limit must be at least one minute")]
    InvalidTimeLimit,

    #[error("question {} needs a correct option", .index + 1)]
    MissingCorrect { index: usize },

    #[error(transparent)]
    Question(#[from] QuizError),
}

/// Editable question as typed by a teacher (or produced by AI generation).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: Option<usize>,
}

impl QuestionDraft {
    #[must_use]
    pub fn blank() -> Self {
        Self {
            prompt: String::new(),
            options: vec![String::new(); OPTION_COUNT],
            correct: None,
        }
    }

    /// Draft pre-filled from an existing question.
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            prompt: question.prompt().to_string(),
            options: question.options().to_vec(),
            correct: question.correct(),
        }
    }
}

/// Authoring input for a new quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    pub subject_id: SubjectId,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDraft>,
    pub time_limit_mins: u32,
}

/// A draft that passed validation and is ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuizDraft {
    subject_id: SubjectId,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
    time_limit_mins: u32,
}

impl QuizDraft {
    #[must_use]
    pub fn new(subject_id: SubjectId) -> Self {
        Self {
            subject_id,
            title: String::new(),
            description: String::new(),
            questions: vec![QuestionDraft::blank()],
            time_limit_mins: 10,
        }
    }

    /// Validate and normalize the draft.
    ///
    /// Unlike quizzes loaded for an attempt, authored questions must name their
    /// correct option.
    ///
    /// # Errors
    ///
    /// Returns `QuizDraftError` describing the first problem found.
    pub fn validate(&self) -> Result<ValidQuizDraft, QuizDraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(QuizDraftError::EmptyTitle);
        }
        if self.questions.is_empty() {
            return Err(QuizDraftError::NoQuestions);
        }
        if self.time_limit_mins == 0 {
            return Err(QuizDraftError::InvalidTimeLimit);
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for (index, draft) in self.questions.iter().enumerate() {
            let correct = draft
                .correct
                .ok_or(QuizDraftError::MissingCorrect { index })?;
            questions.push(Question::new(
                index,
                draft.prompt.clone(),
                draft.options.clone(),
                Some(correct),
            )?);
        }

        let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());

        Ok(ValidQuizDraft {
            subject_id: self.subject_id.clone(),
            title: title.to_string(),
            description,
            questions,
            time_limit_mins: self.time_limit_mins,
        })
    }
}

impl ValidQuizDraft {
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
    pub fn time_limit_mins(&self) -> u32 {
        self.time_limit_mins
    }
}
