use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use service::auth::{
    domain::{AuthSession, LoginInput, RegisterInput, UserRef, UserSummary},
    repository::UserRepository,
    token::{self, Claims},
    AuthConfig, AuthError, AuthService,
};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn UserRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn UserRepository>, cfg: AuthConfig) -> Self {
        Self { auth: Arc::new(AuthService::new(repo, cfg)) }
    }
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub message: &'static str,
    pub user: UserRef,
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterOutput>), ApiError> {
    let Json(input) = payload?;
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(RegisterOutput { message: "User registered", user })))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let Json(input) = payload?;
    match state.auth.authenticate(input).await {
        Ok(session) => Ok(Json(session)),
        Err(AuthError::InvalidCredentials) if state.auth.uniform_login_errors() => {
            Err(ApiError::Unauthorized("Invalid credentials".into()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_users(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    debug!(requested_by = %claims.id, "listing users");
    Ok(Json(state.auth.list_users().await?))
}

/// Bearer gate for protected routes.
/// Missing, malformed, expired or badly signed tokens get 401; verified
/// claims are stored in the request extensions for handlers.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_owned();

    let authz = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match authz {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => t.trim().to_owned(),
            _ => {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ));
            }
        },
        None => {
            warn!(path = %path, "missing Authorization header");
            return Err(ApiError::Unauthorized("Missing Authorization header".into()));
        }
    };

    match token::verify(&token, state.auth.token_config().secret()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            Err(e.into())
        }
    }
}
