//! Backend contracts. `HttpApi` speaks to the REST server; tests plug in fakes.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use study_core::model::{
    AttemptSubmission, AuthSession, Chapter, ChapterId, Credentials, NewPdf, NewVideo, Pdf,
    PdfId, QuestionDraft, Quiz, QuizId, QuizResult, QuizSummary, ResultRecord, Subject,
    SubjectId, Topic, TopicId, User, UserId, ValidQuizDraft, Video,
};

use crate::error::ApiError;

mod http;
mod wire;

pub use http::HttpApi;

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for rejected credentials.
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError>;

    /// The user behind the current bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` once the token has expired.
    async fn me(&self) -> Result<User, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the server cannot be reached.
    async fn logout(&self) -> Result<(), ApiError>;
}

#[async_trait]
pub trait QuizApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::InvalidQuiz` if the payload does not form a takeable quiz.
    async fn fetch_quiz(&self, id: &QuizId) -> Result<Quiz, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects or never receives the answers.
    async fn submit_attempt(&self, submission: &AttemptSubmission) -> Result<QuizResult, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn list_quizzes(&self, subject_id: &SubjectId) -> Result<Vec<QuizSummary>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn create_quiz(&self, draft: &ValidQuizDraft) -> Result<QuizSummary, ApiError>;

    /// Raw generated questions. Entries are not validated.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn generate_questions(
        &self,
        subject_id: &SubjectId,
        topic: &str,
        count: u32,
    ) -> Result<Vec<QuestionDraft>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn results(&self, student_id: &UserId) -> Result<Vec<ResultRecord>, ApiError>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn subjects(&self) -> Result<Vec<Subject>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn chapters(&self, subject_id: &SubjectId) -> Result<Vec<Chapter>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn topics(&self, chapter_id: &ChapterId) -> Result<Vec<Topic>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn videos(&self, topic_id: &TopicId) -> Result<Vec<Video>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn pdfs(&self, topic_id: &TopicId) -> Result<Vec<Pdf>, ApiError>;

    /// Decoded PDF bytes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidPayload` if the document is not valid base64.
    async fn pdf_bytes(&self, id: &PdfId) -> Result<Vec<u8>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn add_video(&self, video: &NewVideo) -> Result<Video, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport or decoding failures.
    async fn add_pdf(&self, pdf: &NewPdf) -> Result<Pdf, ApiError>;
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for non-admin tokens.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the new password or the user is unknown.
    async fn reset_password(&self, user_id: &UserId, new_password: &str) -> Result<(), ApiError>;
}

/// Bearer token shared between the auth context and the HTTP client.
#[derive(Clone, Default)]
pub struct TokenSlot(Arc<RwLock<Option<String>>>);

impl TokenSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, token: Option<String>) {
        match self.0.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

impl std::fmt::Debug for TokenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.get().is_some() { "set" } else { "empty" };
        f.debug_tuple("TokenSlot").field(&state).finish()
    }
}

/// Aggregates backend contracts behind trait objects, mirroring `storage::Storage`.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthApi>,
    pub quizzes: Arc<dyn QuizApi>,
    pub catalog: Arc<dyn CatalogApi>,
    pub admin: Arc<dyn AdminApi>,
    pub token: TokenSlot,
}

impl Backend {
    /// Build a backend that talks HTTP to `base_url` (ending in `/api`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be constructed.
    pub fn http(base_url: &str) -> Result<Self, ApiError> {
        let token = TokenSlot::new();
        let api = Arc::new(HttpApi::new(base_url, token.clone())?);
        Ok(Self {
            auth: api.clone(),
            quizzes: api.clone(),
            catalog: api.clone(),
            admin: api,
            token,
        })
    }
}
