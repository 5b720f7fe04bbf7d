use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

/// Minimum length accepted for a password reset.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("password must be at least {min} characters", min = MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("mobile number cannot be empty")]
    EmptyMobile,

    #[error("batch code cannot be empty")]
    EmptyBatchCode,

    #[error("email cannot be empty")]
    EmptyEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Teachers and admins may create quizzes and upload content.
    #[must_use]
    pub fn can_author(self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(UserError::UnknownRole(other.to_string())),
        }
    }
}

/// A signed-in account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub role: Role,
    pub batch_code: Option<String>,
}

impl User {
    /// Email for staff, mobile for students.
    #[must_use]
    pub fn contact(&self) -> Option<&str> {
        self.email.as_deref().or(self.mobile.as_deref())
    }
}

/// Bearer token plus the user it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
    user: User,
}

impl AuthSession {
    #[must_use]
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.user.role
    }
}

// Keep the token out of logs and panic messages.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Credentials for one of the three login flows.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Student { mobile: String, batch_code: String },
    Teacher { email: String, password: String },
    Admin { email: String, password: String },
}

impl Credentials {
    /// Trim fields and reject blanks before hitting the network.
    ///
    /// # Errors
    ///
    /// Returns `UserError` naming the first empty field.
    pub fn normalized(self) -> Result<Self, UserError> {
        match self {
            Credentials::Student { mobile, batch_code } => {
                let mobile = mobile.trim().to_string();
                let batch_code = batch_code.trim().to_string();
                if mobile.is_empty() {
                    return Err(UserError::EmptyMobile);
                }
                if batch_code.is_empty() {
                    return Err(UserError::EmptyBatchCode);
                }
                Ok(Credentials::Student { mobile, batch_code })
            }
            Credentials::Teacher { email, password } => {
                let email = email.trim().to_string();
                if email.is_empty() {
                    return Err(UserError::EmptyEmail);
                }
                Ok(Credentials::Teacher { email, password })
            }
            Credentials::Admin { email, password } => {
                let email = email.trim().to_string();
                if email.is_empty() {
                    return Err(UserError::EmptyEmail);
                }
                Ok(Credentials::Admin { email, password })
            }
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Credentials::Student { .. } => Role::Student,
            Credentials::Teacher { .. } => Role::Teacher,
            Credentials::Admin { .. } => Role::Admin,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Student { mobile, .. } => f
                .debug_struct("Student")
                .field("mobile", mobile)
                .finish_non_exhaustive(),
            Credentials::Teacher { email, .. } => f
                .debug_struct("Teacher")
                .field("email", email)
                .finish_non_exhaustive(),
            Credentials::Admin { email, .. } => f
                .debug_struct("Admin")
                .field("email", email)
                .finish_non_exhaustive(),
        }
    }
}

/// Check a new password before an admin reset.
///
/// # Errors
///
/// Returns `UserError::PasswordTooShort` below [`MIN_PASSWORD_LEN`] characters.
pub fn validate_new_password(password: &str) -> Result<(), UserError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserError::PasswordTooShort);
    }
    Ok(())
}
