use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("email already exists")]
    DuplicateEmail,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    /// Storage, hashing or signing failure. The detail is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(e: impl std::fmt::Display) -> Self {
        AuthError::Internal(e.to_string())
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::DuplicateEmail => 1002,
            AuthError::UserNotFound => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::InvalidToken(_) => 1005,
            AuthError::Internal(_) => 1200,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            AuthError::Validation("x".into()),
            AuthError::DuplicateEmail,
            AuthError::UserNotFound,
            AuthError::InvalidCredentials,
            AuthError::InvalidToken("x".into()),
            AuthError::internal("boom"),
        ];
        let mut codes: Vec<u16> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn only_internal_is_internal() {
        assert!(AuthError::internal("db down").is_internal());
        assert!(!AuthError::DuplicateEmail.is_internal());
    }
}
