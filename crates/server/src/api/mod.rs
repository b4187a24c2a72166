//! API service layer
//!
//! Request handling logic kept apart from the axum plumbing in
//! `rest_server`.

pub mod models;
mod save;
mod search;

pub use models::*;
pub use save::accept_batch;
pub use search::{execute_search, ping_engine};
