use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

/// Column widths of the `user` table, counted in characters.
pub const NAME_MAX_CHARS: usize = 128;
pub const EMAIL_MAX_CHARS: usize = 255;

/// Registration input
///
/// Missing JSON fields deserialize as empty strings so they fail
/// [`RegisterInput::validate`] with a readable message.
#[derive(Clone, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login input
#[derive(Clone, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), AuthError> {
        require("name", &self.name)?;
        max_chars("name", &self.name, NAME_MAX_CHARS)?;
        validate_email(&self.email)?;
        require("password", &self.password)
    }
}

impl LoginInput {
    pub fn validate(&self) -> Result<(), AuthError> {
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn max_chars(field: &str, value: &str, max: usize) -> Result<(), AuthError> {
    if value.chars().count() > max {
        return Err(AuthError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

/// Shape check only: `local@domain`, both parts non-empty, no whitespace.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    require("email", email)?;
    max_chars("email", email, EMAIL_MAX_CHARS)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AuthError::Validation("email is invalid".into()));
    }
    Ok(())
}

/// Stored user including the password hash. Never serialized.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Values for a user that does not exist yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Identity returned by register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub email: String,
}

/// Public listing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&UserRecord> for UserRef {
    fn from(u: &UserRecord) -> Self {
        UserRef { id: u.id, email: u.email.clone() }
    }
}

impl From<&UserRecord> for UserSummary {
    fn from(u: &UserRecord) -> Self {
        UserSummary { id: u.id, name: u.name.clone(), email: u.email.clone() }
    }
}

/// Login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserRef,
}
