use async_trait::async_trait;

use super::domain::{NewUser, UserRecord, UserSummary};
use super::errors::AuthError;

/// Credential store abstraction.
///
/// `create` must reject a taken email atomically with
/// [`AuthError::DuplicateEmail`]; callers do not check beforehand.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, AuthError>;
    /// Every user in insertion order.
    async fn find_all(&self) -> Result<Vec<UserSummary>, AuthError>;
}

/// Simple in-memory repository for tests, benches and doc examples
pub mod memory {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<Vec<UserRecord>>, // insertion order
        unavailable: AtomicBool,
    }

    impl InMemoryUserRepository {
        /// Make every subsequent call fail as if the backing store were down.
        pub fn set_unavailable(&self, down: bool) {
            self.unavailable.store(down, Ordering::SeqCst);
        }

        pub fn count_by_email(&self, email: &str) -> usize {
            self.users.lock().map(|u| u.iter().filter(|r| r.email == email).count()).unwrap_or(0)
        }

        pub fn len(&self) -> usize {
            self.users.lock().map(|u| u.len()).unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Stored record including the hash, for assertions.
        pub fn record(&self, email: &str) -> Option<UserRecord> {
            self.users.lock().ok()?.iter().find(|r| r.email == email).cloned()
        }

        fn check(&self) -> Result<(), AuthError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(AuthError::internal("store unavailable"));
            }
            Ok(())
        }

        fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<UserRecord>>, AuthError> {
            self.users.lock().map_err(|_| AuthError::internal("store lock poisoned"))
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
            self.check()?;
            let users = self.lock()?;
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn create(&self, new_user: NewUser) -> Result<UserRecord, AuthError> {
            self.check()?;
            // check and insert under one guard
            let mut users = self.lock()?;
            if users.iter().any(|u| u.email == new_user.email) {
                return Err(AuthError::DuplicateEmail);
            }
            let user = UserRecord {
                id: Uuid::new_v4(),
                name: new_user.name,
                email: new_user.email,
                password_hash: new_user.password_hash,
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn find_all(&self) -> Result<Vec<UserSummary>, AuthError> {
            self.check()?;
            let users = self.lock()?;
            Ok(users.iter().map(UserSummary::from).collect())
        }
    }

}
