use sqlx::Row;
use study_core::model::{AuthSession, Role, User, UserId};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn parse_role(s: &str) -> Result<Role, StorageError> {
    s.parse::<Role>().map_err(ser)
}

pub(crate) fn user_id_from_str(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>().map_err(ser)
}

pub(crate) fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<AuthSession, StorageError> {
    let token: String = row.try_get("token").map_err(ser)?;
    let user_id: String = row.try_get("user_id").map_err(ser)?;
    let role: String = row.try_get("role").map_err(ser)?;

    let user = User {
        id: user_id_from_str(&user_id)?,
        name: row.try_get("name").map_err(ser)?,
        email: row.try_get("email").map_err(ser)?,
        mobile: row.try_get("mobile").map_err(ser)?,
        role: parse_role(&role)?,
        batch_code: row.try_get("batch_code").map_err(ser)?,
    };
    Ok(AuthSession::new(token, user))
}
