use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::{AppSettingsRepository, Storage};
use study_core::model::AppSettings;

use crate::admin_service::AdminService;
use crate::api::Backend;
use crate::app_settings_service::AppSettingsService;
use crate::attempt::AttemptService;
use crate::auth_context::AuthContext;
use crate::authoring_service::AuthoringService;
use crate::catalog_service::CatalogService;
use crate::error::AppServicesError;
use crate::results_service::ResultsService;

/// Assembles app-facing services around one backend and one local store.
#[derive(Clone)]
pub struct AppServices {
    settings: AppSettings,
    auth: Arc<AuthContext>,
    attempts: Arc<AttemptService>,
    catalog: Arc<CatalogService>,
    authoring: Arc<AuthoringService>,
    results: Arc<ResultsService>,
    admin: Arc<AdminService>,
    app_settings: Arc<AppSettingsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP backend.
    ///
    /// `api_url_override` (from the environment or flags) wins over the
    /// persisted base URL.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails, persisted
    /// settings are unreadable or the override URL is invalid.
    pub async fn new_sqlite(
        db_url: &str,
        api_url_override: Option<&str>,
        cache_dir: PathBuf,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let mut settings = storage.settings.get_settings().await?.unwrap_or_default();
        if let Some(url) = api_url_override {
            settings = settings.with_api_base_url(url)?;
        }
        log::info!("using backend {}", settings.effective_api_base_url());
        let backend = Backend::http(settings.effective_api_base_url())?;
        Ok(Self::from_parts(storage, backend, settings, cache_dir))
    }

    /// Wire services from already built parts.
    #[must_use]
    pub fn from_parts(
        storage: Storage,
        backend: Backend,
        settings: AppSettings,
        cache_dir: PathBuf,
    ) -> Self {
        let auth = Arc::new(AuthContext::new(
            Arc::clone(&backend.auth),
            Arc::clone(&storage.auth_sessions),
            backend.token.clone(),
        ));
        let attempts = Arc::new(AttemptService::new(Arc::clone(&backend.quizzes)));
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&backend.catalog),
            Arc::clone(&auth),
            cache_dir,
        ));
        let authoring = Arc::new(AuthoringService::new(
            Arc::clone(&backend.quizzes),
            Arc::clone(&auth),
        ));
        let results = Arc::new(
            ResultsService::new(Arc::clone(&backend.quizzes), Arc::clone(&auth))
                .with_student_override(settings.history_student_id().cloned()),
        );
        let admin = Arc::new(AdminService::new(
            Arc::clone(&backend.admin),
            Arc::clone(&auth),
        ));
        let app_settings = Arc::new(AppSettingsService::new(Arc::clone(&storage.settings)));

        Self {
            settings,
            auth,
            attempts,
            catalog,
            authoring,
            results,
            admin,
            app_settings,
        }
    }

    /// Settings in effect for this run, overrides applied.
    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthContext> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn attempts(&self) -> Arc<AttemptService> {
        Arc::clone(&self.attempts)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn authoring(&self) -> Arc<AuthoringService> {
        Arc::clone(&self.authoring)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }
}
