//! Concrete [`UserRepository`](super::repository::UserRepository) backends.

#[cfg(feature = "seaorm")]
pub mod seaorm;
