use std::sync::{Arc, RwLock};

use storage::repository::AuthSessionRepository;
use study_core::model::{AuthSession, Credentials, Role, User};

use crate::api::{AuthApi, TokenSlot};
use crate::error::AuthError;

/// Who is signed in, with an explicit lifecycle.
///
/// `init` restores a persisted session at startup, `login` replaces it and
/// `logout` tears it down. The bearer token is mirrored into the shared
/// [`TokenSlot`] so every HTTP call picks it up.
pub struct AuthContext {
    api: Arc<dyn AuthApi>,
    sessions: Arc<dyn AuthSessionRepository>,
    token: TokenSlot,
    current: RwLock<Option<AuthSession>>,
}

impl AuthContext {
    #[must_use]
    pub fn new(
        api: Arc<dyn AuthApi>,
        sessions: Arc<dyn AuthSessionRepository>,
        token: TokenSlot,
    ) -> Self {
        Self {
            api,
            sessions,
            token,
            current: RwLock::new(None),
        }
    }

    /// Restore the persisted session, if any, and check it with `/auth/me`.
    ///
    /// An expired token clears the stored session. When the server cannot be
    /// reached the stored user is kept so the app still opens.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored session cannot be read.
    pub async fn init(&self) -> Result<Option<User>, AuthError> {
        let Some(stored) = self.sessions.load_session().await? else {
            log::debug!("no stored session");
            return Ok(None);
        };

        self.install(Some(stored.clone()));
        match self.api.me().await {
            Ok(user) => {
                log::info!("restored session for {} ({})", user.name, user.role);
                let refreshed = AuthSession::new(stored.token(), user.clone());
                self.sessions.save_session(&refreshed).await?;
                self.install(Some(refreshed));
                Ok(Some(user))
            }
            Err(err) if err.is_unauthorized() => {
                log::info!("stored session expired; signing out");
                self.sessions.clear_session().await?;
                self.install(None);
                Ok(None)
            }
            Err(err) => {
                log::warn!("could not verify stored session: {err}");
                Ok(Some(stored.user().clone()))
            }
        }
    }

    /// Sign in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` for blank fields, `AuthError::Api` when the
    /// server rejects the credentials, and `AuthError::Storage` if the session
    /// cannot be saved.
    pub async fn login(&self, credentials: Credentials) -> Result<User, AuthError> {
        let credentials = credentials.normalized()?;
        let session = self.api.login(&credentials).await?;
        self.sessions.save_session(&session).await?;
        let user = session.user().clone();
        log::info!("signed in as {} ({})", user.name, user.role);
        self.install(Some(session));
        Ok(user)
    }

    /// Sign out. The server call is best effort; local state is always cleared.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored session cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if self.token.get().is_some() {
            if let Err(err) = self.api.logout().await {
                log::warn!("logout request failed: {err}");
            }
        }
        self.install(None);
        self.sessions.clear_session().await?;
        log::info!("signed out");
        Ok(())
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.read(|session| session.map(|s| s.user().clone()))
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.read(|session| session.is_some())
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.read(|session| session.map(AuthSession::role))
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a session.
    pub fn require_user(&self) -> Result<User, AuthError> {
        self.current_user().ok_or(AuthError::NotSignedIn)
    }

    /// Guard for quiz creation and content upload.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthorRequired` for students.
    pub fn require_author(&self, action: &'static str) -> Result<User, AuthError> {
        let user = self.require_user()?;
        if !user.role.can_author() {
            return Err(AuthError::AuthorRequired(action));
        }
        Ok(user)
    }

    /// Guard for user management.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdminRequired` for non-admins.
    pub fn require_admin(&self, action: &'static str) -> Result<User, AuthError> {
        let user = self.require_user()?;
        if !user.role.is_admin() {
            return Err(AuthError::AdminRequired(action));
        }
        Ok(user)
    }

    fn install(&self, session: Option<AuthSession>) {
        self.token
            .set(session.as_ref().map(|s| s.token().to_string()));
        match self.current.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    fn read<T>(&self, f: impl FnOnce(Option<&AuthSession>) -> T) -> T {
        match self.current.read() {
            Ok(guard) => f(guard.as_ref()),
            Err(poisoned) => f(poisoned.into_inner().as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use storage::repository::InMemoryRepository;
    use study_core::model::UserId;

    #[derive(Default)]
    struct FakeAuth {
        me_result: Mutex<Option<Result<User, ApiError>>>,
        logout_calls: Mutex<u32>,
    }

    fn user(role: Role) -> User {
        User {
            id: UserId::new("u1"),
            name: "Kiran".into(),
            email: Some("kiran@institute.test".into()),
            mobile: None,
            role,
            batch_code: None,
        }
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
            match credentials {
                Credentials::Teacher { password, .. } if password == "wrong" => {
                    Err(ApiError::Unauthorized {
                        detail: Some("Invalid credentials".into()),
                    })
                }
                other => Ok(AuthSession::new("tok", user(other.role()))),
            }
        }

        async fn me(&self) -> Result<User, ApiError> {
            self.me_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(user(Role::Teacher)))
        }

        async fn logout(&self) -> Result<(), ApiError> {
            *self.logout_calls.lock().unwrap() += 1;
            Err(ApiError::InvalidPayload("offline".into()))
        }
    }

    fn context(api: Arc<FakeAuth>, repo: InMemoryRepository) -> AuthContext {
        AuthContext::new(api, Arc::new(repo), TokenSlot::new())
    }

    #[tokio::test]
    async fn login_persists_and_sets_token() {
        let repo = InMemoryRepository::new();
        let ctx = context(Arc::new(FakeAuth::default()), repo.clone());

        let user = ctx
            .login(Credentials::Teacher {
                email: " kiran@institute.test ".into(),
                password: "pw".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.role, Role::Teacher);
        assert_eq!(ctx.token.get().as_deref(), Some("tok"));
        assert!(repo.load_session().await.unwrap().is_some());
        assert!(ctx.require_author("create a quiz").is_ok());
        assert!(matches!(
            ctx.require_admin("manage users"),
            Err(AuthError::AdminRequired(_))
        ));
    }

    #[tokio::test]
    async fn rejected_login_leaves_state_untouched() {
        let repo = InMemoryRepository::new();
        let ctx = context(Arc::new(FakeAuth::default()), repo.clone());
        let err = ctx
            .login(Credentials::Teacher {
                email: "t@x".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!ctx.is_signed_in());
        assert!(repo.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn init_restores_persisted_session() {
        let repo = InMemoryRepository::new();
        repo.save_session(&AuthSession::new("stored", user(Role::Teacher)))
            .await
            .unwrap();
        let ctx = context(Arc::new(FakeAuth::default()), repo);

        let restored = ctx.init().await.unwrap();
        assert_eq!(restored.map(|u| u.role), Some(Role::Teacher));
        assert_eq!(ctx.token.get().as_deref(), Some("stored"));
    }

    #[tokio::test]
    async fn init_clears_expired_session() {
        let repo = InMemoryRepository::new();
        repo.save_session(&AuthSession::new("stale", user(Role::Student)))
            .await
            .unwrap();
        let api = Arc::new(FakeAuth::default());
        *api.me_result.lock().unwrap() = Some(Err(ApiError::Unauthorized { detail: None }));
        let ctx = context(api, repo.clone());

        assert_eq!(ctx.init().await.unwrap(), None);
        assert_eq!(ctx.token.get(), None);
        assert!(repo.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn init_keeps_session_when_offline() {
        let repo = InMemoryRepository::new();
        repo.save_session(&AuthSession::new("stored", user(Role::Student)))
            .await
            .unwrap();
        let api = Arc::new(FakeAuth::default());
        *api.me_result.lock().unwrap() = Some(Err(ApiError::InvalidPayload("down".into())));
        let ctx = context(api, repo);

        assert_eq!(ctx.init().await.unwrap().map(|u| u.role), Some(Role::Student));
        assert!(ctx.is_signed_in());
    }

    #[tokio::test]
    async fn logout_clears_even_when_server_fails() {
        let repo = InMemoryRepository::new();
        let api = Arc::new(FakeAuth::default());
        let ctx = context(api.clone(), repo.clone());
        ctx.login(Credentials::Student {
            mobile: "98".into(),
            batch_code: "B".into(),
        })
        .await
        .unwrap();

        ctx.logout().await.unwrap();
        assert_eq!(*api.logout_calls.lock().unwrap(), 1);
        assert!(!ctx.is_signed_in());
        assert_eq!(ctx.token.get(), None);
        assert!(repo.load_session().await.unwrap().is_none());
        assert!(matches!(ctx.require_user(), Err(AuthError::NotSignedIn)));
    }
}
