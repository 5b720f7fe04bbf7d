use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use study_core::model::{AppSettings, AuthSession};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Remembers who is signed in across restarts. At most one session is stored.
#[async_trait]
pub trait AuthSessionRepository: Send + Sync {
    /// Load the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be read or decoded.
    async fn load_session(&self) -> Result<Option<AuthSession>, StorageError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn save_session(&self, session: &AuthSession) -> Result<(), StorageError>;

    /// Forget the stored session. Clearing when nothing is stored is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    async fn clear_session(&self) -> Result<(), StorageError>;
}

#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if settings cannot be read or no longer validate.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if settings cannot be stored.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    session: Arc<Mutex<Option<AuthSession>>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthSessionRepository for InMemoryRepository {
    async fn load_session(&self) -> Result<Option<AuthSession>, StorageError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_session(&self, session: &AuthSession) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub auth_sessions: Arc<dyn AuthSessionRepository>,
    pub settings: Arc<dyn AppSettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let auth_sessions: Arc<dyn AuthSessionRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn AppSettingsRepository> = Arc::new(repo);
        Self {
            auth_sessions,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{AppSettingsDraft, Role, User, UserId};

    fn session(token: &str) -> AuthSession {
        AuthSession::new(
            token,
            User {
                id: UserId::new("teacher_1"),
                name: "Ravi".into(),
                email: Some("ravi@institute.test".into()),
                mobile: None,
                role: Role::Teacher,
                batch_code: None,
            },
        )
    }

    #[tokio::test]
    async fn session_round_trips_and_clears() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_session().await.unwrap().is_none());

        repo.save_session(&session("tok-1")).await.unwrap();
        repo.save_session(&session("tok-2")).await.unwrap();
        let loaded = repo.load_session().await.unwrap().unwrap();
        assert_eq!(loaded.token(), "tok-2");

        repo.clear_session().await.unwrap();
        repo.clear_session().await.unwrap();
        assert!(repo.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn storage_in_memory_shares_one_backend() {
        let storage = Storage::in_memory();
        let settings = AppSettingsDraft {
            api_base_url: Some("http://10.0.0.5:8001/api".into()),
            history_student_id: None,
        }
        .validate()
        .unwrap();
        storage.settings.save_settings(&settings).await.unwrap();
        assert_eq!(
            storage.settings.get_settings().await.unwrap(),
            Some(settings)
        );
    }
}
