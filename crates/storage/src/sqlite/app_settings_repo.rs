use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{AppSettingsRepository, StorageError};
use study_core::model::AppSettings;

use super::SqliteRepository;

#[async_trait]
impl AppSettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT api_base_url, history_student_id
            FROM app_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let api_base_url: Option<String> = row
            .try_get("api_base_url")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let history_student_id: Option<String> = row
            .try_get("history_student_id")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        AppSettings::from_persisted(api_base_url, history_student_id)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (id, api_base_url, history_student_id)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                api_base_url = excluded.api_base_url,
                history_student_id = excluded.history_student_id
            ",
        )
        .bind(1_i64)
        .bind(settings.api_base_url())
        .bind(settings.history_student_id().map(|id| id.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
