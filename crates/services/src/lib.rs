#![forbid(unsafe_code)]

pub mod admin_service;
pub mod api;
pub mod app_services;
pub mod app_settings_service;
pub mod attempt;
pub mod auth_context;
pub mod authoring_service;
pub mod catalog_service;
pub mod error;
pub mod prompt;
pub mod results_service;

pub use admin_service::AdminService;
pub use api::{AdminApi, AuthApi, Backend, CatalogApi, HttpApi, QuizApi, TokenSlot};
pub use app_services::AppServices;
pub use app_settings_service::AppSettingsService;
pub use attempt::{AttemptCommand, AttemptHandle, AttemptService, AttemptSnapshot};
pub use auth_context::AuthContext;
pub use authoring_service::{AuthoringService, MAX_GENERATED_QUESTIONS};
pub use catalog_service::CatalogService;
pub use error::{
    AdminError, ApiError, AppServicesError, AppSettingsServiceError, AuthError, AuthoringError,
    CatalogError, QuizLoadError, ResultsError, SubmitError,
};
pub use prompt::{PromptRequest, TerminalPrompt, TextPrompt};
pub use results_service::ResultsService;
