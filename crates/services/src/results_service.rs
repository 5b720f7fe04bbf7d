use std::sync::Arc;

use study_core::model::{ResultRecord, UserId, sort_newest_first};

use crate::api::QuizApi;
use crate::auth_context::AuthContext;
use crate::error::ResultsError;

/// Past quiz results for the signed-in student.
#[derive(Clone)]
pub struct ResultsService {
    api: Arc<dyn QuizApi>,
    auth: Arc<AuthContext>,
    student_override: Option<UserId>,
}

impl ResultsService {
    #[must_use]
    pub fn new(api: Arc<dyn QuizApi>, auth: Arc<AuthContext>) -> Self {
        Self {
            api,
            auth,
            student_override: None,
        }
    }

    /// Show history for a fixed student id instead of the signed-in user.
    #[must_use]
    pub fn with_student_override(mut self, student: Option<UserId>) -> Self {
        self.student_override = student;
        self
    }

    /// Results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Auth` when nobody is signed in and no override is
    /// set, or `ResultsError::Api` if the request fails.
    pub async fn history(&self) -> Result<Vec<ResultRecord>, ResultsError> {
        let student = match &self.student_override {
            Some(id) => id.clone(),
            None => self.auth.require_user()?.id,
        };
        let mut records = self.api.results(&student).await?;
        sort_newest_first(&mut records);
        log::debug!("loaded {} results for {student}", records.len());
        Ok(records)
    }
}
