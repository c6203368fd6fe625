//! Pieces shared by every crate in the workspace: logging setup and the
//! small JSON envelopes returned by the HTTP layer.

pub mod types;
pub mod utils;
