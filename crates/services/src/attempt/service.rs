use std::sync::Arc;

use reqwest::StatusCode;
use study_core::model::{AttemptSubmission, Quiz, QuizId, QuizResult};

use super::runner::{AttemptHandle, spawn_runner};
use crate::api::QuizApi;
use crate::error::{ApiError, QuizLoadError, SubmitError};

/// Loads quizzes, starts attempt runners and posts answers.
#[derive(Clone)]
pub struct AttemptService {
    api: Arc<dyn QuizApi>,
}

impl AttemptService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// Fetch a quiz for an attempt. There is no retry; a failure ends the attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoadError` if the quiz is missing, malformed (no questions,
    /// zero time limit, wrong option count) or the request fails.
    pub async fn load(&self, id: &QuizId) -> Result<Quiz, QuizLoadError> {
        match self.api.fetch_quiz(id).await {
            Ok(quiz) => {
                log::info!(
                    "loaded quiz {id}: {} questions, {} min",
                    quiz.question_count(),
                    quiz.time_limit_mins()
                );
                Ok(quiz)
            }
            Err(err) => {
                log::error!("failed to load quiz {id}: {err}");
                Err(match err {
                    ApiError::HttpStatus {
                        status: StatusCode::NOT_FOUND,
                        ..
                    } => QuizLoadError::NotFound(id.clone()),
                    ApiError::InvalidQuiz(reason) => QuizLoadError::Invalid(reason),
                    other => QuizLoadError::Api(other),
                })
            }
        }
    }

    /// Post answers and return the server's score.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError` if the backend rejects or never receives the answers.
    pub async fn submit(&self, submission: &AttemptSubmission) -> Result<QuizResult, SubmitError> {
        log::info!(
            "submitting quiz {} ({:?}, {} answers)",
            submission.quiz_id,
            submission.trigger,
            submission.answers.len()
        );
        let result = self.api.submit_attempt(submission).await?;
        log::info!(
            "quiz {} scored {}/{}",
            submission.quiz_id,
            result.score(),
            result.total()
        );
        Ok(result)
    }

    /// Spawn the runner task that owns a fresh attempt for `quiz`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn begin(&self, quiz: &Quiz) -> AttemptHandle {
        spawn_runner(self.clone(), quiz)
    }
}
