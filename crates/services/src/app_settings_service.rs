use std::sync::Arc;

use storage::repository::AppSettingsRepository;
use study_core::model::{AppSettings, AppSettingsDraft};

use crate::error::AppSettingsServiceError;

#[derive(Clone)]
pub struct AppSettingsService {
    repo: Arc<dyn AppSettingsRepository>,
}

impl AppSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = self.repo.get_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings. A changed base URL applies on next launch.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsServiceError` if validation fails or persistence fails.
    pub async fn save(
        &self,
        draft: AppSettingsDraft,
    ) -> Result<AppSettings, AppSettingsServiceError> {
        let settings = draft.validate()?;
        self.repo.save_settings(&settings).await?;
        log::info!("saved settings (api: {})", settings.effective_api_base_url());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use study_core::model::{AppSettingsError, DEFAULT_API_BASE_URL};

    #[tokio::test]
    async fn load_defaults_then_save() {
        let service = AppSettingsService::new(Arc::new(InMemoryRepository::new()));
        assert_eq!(
            service.load().await.unwrap().effective_api_base_url(),
            DEFAULT_API_BASE_URL
        );

        service
            .save(AppSettingsDraft {
                api_base_url: Some("http://192.168.1.20:8001/api".into()),
                history_student_id: None,
            })
            .await
            .unwrap();
        assert_eq!(
            service.load().await.unwrap().api_base_url(),
            Some("http://192.168.1.20:8001/api")
        );
    }

    #[tokio::test]
    async fn invalid_url_is_not_saved() {
        let service = AppSettingsService::new(Arc::new(InMemoryRepository::new()));
        let err = service
            .save(AppSettingsDraft {
                api_base_url: Some("nope".into()),
                history_student_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppSettingsServiceError::Settings(AppSettingsError::InvalidBaseUrl)
        ));
        assert_eq!(service.load().await.unwrap().api_base_url(), None);
    }
}
