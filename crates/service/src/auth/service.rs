use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, LoginInput, NewUser, RegisterInput, UserRef, UserSummary};
use super::errors::AuthError;
use super::password::{self, HashParams};
use super::repository::UserRepository;
use super::token::{self, TokenConfig};

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: TokenConfig,
    pub hashing: HashParams,
    /// Report an unknown email as [`AuthError::InvalidCredentials`].
    pub uniform_login_errors: bool,
}

impl AuthConfig {
    pub fn new(token: TokenConfig) -> Self {
        Self { token, hashing: HashParams::default(), uniform_login_errors: false }
    }
}

/// Auth business service independent of web framework
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct AuthService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    pub fn token_config(&self) -> &TokenConfig {
        &self.cfg.token
    }

    pub fn uniform_login_errors(&self) -> bool {
        self.cfg.uniform_login_errors
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, repository::memory::InMemoryUserRepository};
    /// use service::auth::domain::RegisterInput;
    /// use service::auth::token::{TokenConfig, DEFAULT_TTL};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryUserRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new(TokenConfig::new("secret", DEFAULT_TTL)));
    /// let input = RegisterInput { name: "Bunny".into(), email: "bunny@example.com".into(), password: "Bunny22".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "bunny@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserRef, AuthError> {
        input.validate()?;

        let params = self.cfg.hashing;
        let RegisterInput { name, email, password } = input;
        let password_hash = blocking(move || password::hash_password(&password, &params)).await?;

        // The store's unique constraint decides duplicates; no prior lookup.
        let user = match self.repo.create(NewUser { name, email, password_hash }).await {
            Ok(user) => user,
            Err(AuthError::DuplicateEmail) => {
                debug!("email already registered");
                return Err(AuthError::DuplicateEmail);
            }
            Err(e) => return Err(e),
        };
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(UserRef::from(&user))
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, repository::memory::InMemoryUserRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use service::auth::token::{TokenConfig, DEFAULT_TTL};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryUserRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new(TokenConfig::new("secret", DEFAULT_TTL)));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.authenticate(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        input.validate()?;

        let user = match self.repo.find_by_email(&input.email).await? {
            Some(user) => user,
            None => {
                warn!("login for unknown email");
                return Err(if self.cfg.uniform_login_errors {
                    AuthError::InvalidCredentials
                } else {
                    AuthError::UserNotFound
                });
            }
        };

        let LoginInput { password, .. } = input;
        let stored = user.password_hash.clone();
        let valid = blocking(move || password::verify_password(&password, &stored)).await?;
        if !valid {
            warn!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let user = UserRef::from(&user);
        let token = token::issue(&user, &self.cfg.token)?;
        info!(user_id = %user.id, "user_authenticated");
        Ok(AuthSession { token, user })
    }

    /// Every registered user without password material, in insertion order.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError> {
        let users = self.repo.find_all().await?;
        debug!(count = users.len(), "users listed");
        Ok(users)
    }
}

/// Run CPU-heavy hashing on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::internal(format!("hashing task failed: {e}")))?
}
