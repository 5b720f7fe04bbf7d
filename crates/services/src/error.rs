//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use study_core::model::{
    AppSettingsError, CatalogError as CatalogInputError, QuizDraftError, QuizError, QuizId,
    UserError,
};

/// Errors from talking to the REST backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("{}", .detail.as_deref().unwrap_or("please sign in again"))]
    Unauthorized { detail: Option<String> },
    #[error("{}", .detail.as_deref().unwrap_or("you do not have access to this"))]
    Forbidden { detail: Option<String> },
    #[error("{}", status_message(.status, .detail.as_deref()))]
    HttpStatus {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("invalid quiz from server: {0}")]
    InvalidQuiz(#[from] QuizError),
    #[error("unexpected response from server: {0}")]
    InvalidPayload(String),
    #[error("invalid server address: {0}")]
    BaseUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            ApiError::HttpStatus { status, .. } => Some(*status),
            ApiError::Http(err) => err.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

fn status_message(status: &StatusCode, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => format!("request failed with status {status}"),
    }
}

/// Errors emitted while loading a quiz for an attempt. All of them end the attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoadError {
    #[error("quiz {0} was not found")]
    NotFound(QuizId),
    #[error("quiz cannot be taken: {0}")]
    Invalid(QuizError),
    #[error("could not load quiz: {0}")]
    Api(ApiError),
}

/// Errors emitted while submitting an attempt. The attempt stays open for a retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("could not submit answers: {0}")]
    Api(#[from] ApiError),
}

/// Errors emitted by `AuthContext`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("{0} requires a teacher or admin account")]
    AuthorRequired(&'static str),
    #[error("{0} requires an admin account")]
    AdminRequired(&'static str),
    #[error(transparent)]
    Invalid(#[from] UserError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Input(#[from] CatalogInputError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not write PDF to cache: {0}")]
    Cache(#[from] std::io::Error),
}

/// Errors emitted by `AuthoringService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Draft(#[from] QuizDraftError),
    #[error("enter a topic to generate questions about")]
    EmptyTopic,
    #[error("number of questions must be between 1 and {max}, got {0}", max = crate::authoring_service::MAX_GENERATED_QUESTIONS)]
    QuestionCount(u32),
    #[error("the generator returned no usable questions")]
    EmptyGeneration,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `ResultsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Invalid(#[from] UserError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
