//! SeaORM entities and data-access helpers for the credential store.

pub mod errors;
pub mod db;
pub mod user;

#[cfg(test)]
mod tests;
