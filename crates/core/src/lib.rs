//! Core types for the searchgate document gateway
//!
//! This crate provides the foundational pieces shared by the other crates:
//!
//! - **Models**: save and search requests, batches and result documents
//! - **Configuration**: file and environment driven settings
//! - **Error handling**: unified error type
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod models;

// Re-export main types for convenience
pub use config::{Config, EngineConfig, QueueConfig, ServerConfig};
pub use error::{Error, Result, ResultExt};
pub use models::{
    Document, SaveBatch, SaveRequest, SearchBody, SearchRequest, SearchResult, DEFAULT_FUZZINESS,
};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
