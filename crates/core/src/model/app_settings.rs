use thiserror::Error;
use url::Url;

use crate::model::ids::UserId;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001/api";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AppSettings {
    api_base_url: Option<String>,
    history_student_id: Option<UserId>,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub api_base_url: Option<String>,
    pub history_student_id: Option<String>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,

    #[error("invalid student id")]
    InvalidStudentId,
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into persisted settings.
    ///
    /// A trailing slash on the base URL is dropped so paths can be appended
    /// with `format!("{base}/quiz/...")`.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL is present but not an http(s)
    /// URL, or the student id is malformed.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let api_base_url = normalize_optional(self.api_base_url)
            .map(|url| normalize_base_url(&url))
            .transpose()?;
        let history_student_id = normalize_optional(self.history_student_id)
            .map(|id| id.parse::<UserId>())
            .transpose()
            .map_err(|_| AppSettingsError::InvalidStudentId)?;

        Ok(AppSettings {
            api_base_url,
            history_student_id,
        })
    }
}

impl AppSettings {
    /// Rebuild settings from stored columns, re-running validation.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if a stored value no longer validates.
    pub fn from_persisted(
        api_base_url: Option<String>,
        history_student_id: Option<String>,
    ) -> Result<Self, AppSettingsError> {
        AppSettingsDraft {
            api_base_url,
            history_student_id,
        }
        .validate()
    }

    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    /// Base URL to talk to, falling back to [`DEFAULT_API_BASE_URL`].
    #[must_use]
    pub fn effective_api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    #[must_use]
    pub fn history_student_id(&self) -> Option<&UserId> {
        self.history_student_id.as_ref()
    }

    /// Overlay another base URL (from env or flags) on top of these settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError::InvalidBaseUrl` for an unusable URL.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, AppSettingsError> {
        self.api_base_url = Some(normalize_base_url(url)?);
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, AppSettingsError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| AppSettingsError::InvalidBaseUrl)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppSettingsError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
