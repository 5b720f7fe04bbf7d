use std::sync::Arc;

use study_core::model::{QuestionDraft, QuizDraft, QuizSummary, OPTION_COUNT, SubjectId};

use crate::api::QuizApi;
use crate::auth_context::AuthContext;
use crate::error::AuthoringError;

/// Largest question count the generator accepts.
pub const MAX_GENERATED_QUESTIONS: u32 = 50;

/// Quiz creation, AI generation and per-subject listing.
#[derive(Clone)]
pub struct AuthoringService {
    api: Arc<dyn QuizApi>,
    auth: Arc<AuthContext>,
}

impl AuthoringService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>, auth: Arc<AuthContext>) -> Self {
        Self { api, auth }
    }

    /// # Errors
    ///
    /// Returns `AuthoringError::Api` if the request fails.
    pub async fn list_quizzes(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<QuizSummary>, AuthoringError> {
        Ok(self.api.list_quizzes(subject_id).await?)
    }

    /// Validate and publish a quiz.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Auth` for students, `AuthoringError::Draft` for
    /// an invalid draft and `AuthoringError::Api` when the server refuses it.
    pub async fn create_quiz(&self, draft: &QuizDraft) -> Result<QuizSummary, AuthoringError> {
        self.auth.require_author("creating a quiz")?;
        let valid = draft.validate()?;
        let created = self.api.create_quiz(&valid).await?;
        log::info!(
            "created quiz {} with {} questions",
            created.id,
            valid.questions().len()
        );
        Ok(created)
    }

    /// Ask the generator for questions about `topic`.
    ///
    /// Entries without a prompt or with the wrong number of options are
    /// dropped. The rest are returned as drafts for the teacher to review.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError` for a blank topic, a count outside
    /// `1..=MAX_GENERATED_QUESTIONS`, an empty result or a failed request.
    pub async fn generate_questions(
        &self,
        subject_id: &SubjectId,
        topic: &str,
        count: u32,
    ) -> Result<Vec<QuestionDraft>, AuthoringError> {
        self.auth.require_author("generating questions")?;
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AuthoringError::EmptyTopic);
        }
        if !(1..=MAX_GENERATED_QUESTIONS).contains(&count) {
            return Err(AuthoringError::QuestionCount(count));
        }

        let raw = self.api.generate_questions(subject_id, topic, count).await?;
        let received = raw.len();
        let usable: Vec<QuestionDraft> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, draft)| {
                if draft.prompt.trim().is_empty() || draft.options.len() != OPTION_COUNT {
                    log::warn!(
                        "dropping generated question {index}: {} options",
                        draft.options.len()
                    );
                    return None;
                }
                let correct = draft.correct.filter(|&c| c < OPTION_COUNT);
                Some(QuestionDraft { correct, ..draft })
            })
            .collect();

        if usable.is_empty() {
            return Err(AuthoringError::EmptyGeneration);
        }
        log::info!(
            "generated {} questions about {topic:?} ({} dropped)",
            usable.len(),
            received - usable.len()
        );
        Ok(usable)
    }
}
