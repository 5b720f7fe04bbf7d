use dioxus::prelude::*;
use services::{
    AdminError, ApiError, AuthError, AuthoringError, CatalogError, QuizLoadError, ResultsError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    SignInRequired,
    NotAllowed,
    NotFound,
    Offline,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::SignInRequired => "Please sign in to continue.",
            ViewError::NotAllowed => "Your account cannot open this page.",
            ViewError::NotFound => "This item no longer exists.",
            ViewError::Offline => "Could not reach the server. Check your connection.",
        }
    }

    fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => ViewError::SignInRequired,
            ApiError::Forbidden { .. } => ViewError::NotAllowed,
            ApiError::Http(inner) if inner.is_connect() || inner.is_timeout() => {
                ViewError::Offline
            }
            other if other.status().map(|status| status.as_u16()) == Some(404) => {
                ViewError::NotFound
            }
            _ => ViewError::Unknown,
        }
    }

    fn from_auth(err: &AuthError) -> Self {
        match err {
            AuthError::NotSignedIn => ViewError::SignInRequired,
            AuthError::AuthorRequired(_) | AuthError::AdminRequired(_) => ViewError::NotAllowed,
            AuthError::Api(api) => ViewError::from_api(api),
            _ => ViewError::Unknown,
        }
    }
}

impl From<AuthError> for ViewError {
    fn from(err: AuthError) -> Self {
        ViewError::from_auth(&err)
    }
}

impl From<CatalogError> for ViewError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::Auth(auth) => ViewError::from_auth(auth),
            CatalogError::Api(api) => ViewError::from_api(api),
            _ => ViewError::Unknown,
        }
    }
}

impl From<AuthoringError> for ViewError {
    fn from(err: AuthoringError) -> Self {
        match &err {
            AuthoringError::Auth(auth) => ViewError::from_auth(auth),
            AuthoringError::Api(api) => ViewError::from_api(api),
            _ => ViewError::Unknown,
        }
    }
}

impl From<ResultsError> for ViewError {
    fn from(err: ResultsError) -> Self {
        match &err {
            ResultsError::Auth(auth) => ViewError::from_auth(auth),
            ResultsError::Api(api) => ViewError::from_api(api),
            _ => ViewError::Unknown,
        }
    }
}

impl From<AdminError> for ViewError {
    fn from(err: AdminError) -> Self {
        match &err {
            AdminError::Auth(auth) => ViewError::from_auth(auth),
            AdminError::Api(api) => ViewError::from_api(api),
            _ => ViewError::Unknown,
        }
    }
}

impl From<QuizLoadError> for ViewError {
    fn from(err: QuizLoadError) -> Self {
        match &err {
            QuizLoadError::NotFound(_) => ViewError::NotFound,
            QuizLoadError::Api(api) => ViewError::from_api(api),
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
