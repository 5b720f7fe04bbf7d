use thiserror::Error;

use crate::model::{
    AppSettingsError, AttemptError, CatalogError, QuizDraftError, QuizError, UserError,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    QuizDraft(#[from] QuizDraftError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    AppSettings(#[from] AppSettingsError),
}
