//! Service layer holding the registration and login business logic.
//! - Independent of the web framework; handlers call into [`auth::AuthService`].
//! - Persistence sits behind [`auth::repository::UserRepository`].
//! - The SeaORM-backed repository is compiled with the `seaorm` feature.

pub mod auth;
