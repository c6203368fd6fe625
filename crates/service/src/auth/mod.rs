//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Password hashing and token signing live in their own modules so the HTTP
//! gate can verify tokens without constructing a service.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod repo;
pub mod service;
pub mod token;

pub use errors::AuthError;
pub use service::{AuthConfig, AuthService};
