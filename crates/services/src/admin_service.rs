use std::sync::Arc;

use study_core::model::{User, UserId, validate_new_password};

use crate::api::AdminApi;
use crate::auth_context::AuthContext;
use crate::error::AdminError;

/// User management for admins.
#[derive(Clone)]
pub struct AdminService {
    api: Arc<dyn AdminApi>,
    auth: Arc<AuthContext>,
}

impl AdminService {
    #[must_use]
    pub fn new(api: Arc<dyn AdminApi>, auth: Arc<AuthContext>) -> Self {
        Self { api, auth }
    }

    /// # Errors
    ///
    /// Returns `AdminError::Auth` for non-admins or `AdminError::Api` on failure.
    pub async fn list_users(&self) -> Result<Vec<User>, AdminError> {
        self.auth.require_admin("listing users")?;
        Ok(self.api.list_users().await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Invalid` for a password shorter than the minimum,
    /// `AdminError::Auth` for non-admins and `AdminError::Api` on failure.
    pub async fn reset_password(
        &self,
        user_id: &UserId,
        new_password: &str,
    ) -> Result<(), AdminError> {
        self.auth.require_admin("resetting passwords")?;
        validate_new_password(new_password)?;
        self.api.reset_password(user_id, new_password).await?;
        log::info!("password reset for {user_id}");
        Ok(())
    }
}
