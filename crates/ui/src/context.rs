use std::sync::Arc;

use dioxus::prelude::*;
use services::{
    AdminService, AppSettingsService, AttemptService, AuthContext, AuthoringService,
    CatalogService, ResultsService,
};
use study_core::model::{AppSettings, User};

use crate::platform::LinkOpenerRef;
use crate::prompt::ModalPrompt;

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn settings(&self) -> AppSettings;

    fn auth(&self) -> Arc<AuthContext>;
    fn attempts(&self) -> Arc<AttemptService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn authoring(&self) -> Arc<AuthoringService>;
    fn results(&self) -> Arc<ResultsService>;
    fn admin(&self) -> Arc<AdminService>;
    fn app_settings(&self) -> Arc<AppSettingsService>;

    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    settings: AppSettings,

    auth: Arc<AuthContext>,
    attempts: Arc<AttemptService>,
    catalog: Arc<CatalogService>,
    authoring: Arc<AuthoringService>,
    results: Arc<ResultsService>,
    admin: Arc<AdminService>,
    app_settings: Arc<AppSettingsService>,

    link_opener: LinkOpenerRef,
    prompt: Arc<ModalPrompt>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            settings: app.settings(),
            auth: app.auth(),
            attempts: app.attempts(),
            catalog: app.catalog(),
            authoring: app.authoring(),
            results: app.results(),
            admin: app.admin(),
            app_settings: app.app_settings(),
            link_opener: app.link_opener(),
            prompt: Arc::new(ModalPrompt::new()),
        }
    }

    /// Settings the app was launched with.
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

    #[must_use]
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }

    /// The modal text prompt shown by `PromptHost`.
    #[must_use]
    pub fn prompt(&self) -> Arc<ModalPrompt> {
        Arc::clone(&self.prompt)
    }
}

/// Signed-in user as seen by the views. Updated on init, login and logout.
#[derive(Clone, Copy)]
pub struct CurrentUser(pub Signal<Option<User>>);

impl CurrentUser {
    #[must_use]
    pub fn get(&self) -> Option<User> {
        self.0.read().clone()
    }

    #[must_use]
    pub fn can_author(&self) -> bool {
        self.0.read().as_ref().is_some_and(|user| user.role.can_author())
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.read().as_ref().is_some_and(|user| user.role.is_admin())
    }

    pub fn set(&mut self, user: Option<User>) {
        self.0.set(user);
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
