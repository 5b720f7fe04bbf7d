use async_trait::async_trait;
use chrono::Utc;
use study_core::model::AuthSession;

use crate::repository::{AuthSessionRepository, StorageError};

use super::SqliteRepository;
use super::mapping::map_session_row;

#[async_trait]
impl AuthSessionRepository for SqliteRepository {
    async fn load_session(&self) -> Result<Option<AuthSession>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT token, user_id, name, email, mobile, role, batch_code
            FROM auth_session
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn save_session(&self, session: &AuthSession) -> Result<(), StorageError> {
        let user = session.user();
        sqlx::query(
            r"
            INSERT INTO auth_session (
                id, token, user_id, name, email, mobile, role, batch_code, saved_at
            )
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                user_id = excluded.user_id,
                name = excluded.name,
                email = excluded.email,
                mobile = excluded.mobile,
                role = excluded.role,
                batch_code = excluded.batch_code,
                saved_at = excluded.saved_at
            ",
        )
        .bind(session.token())
        .bind(user.id.as_str())
        .bind(user.name.as_str())
        .bind(user.email.as_deref())
        .bind(user.mobile.as_deref())
        .bind(user.role.as_str())
        .bind(user.batch_code.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM auth_session WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
