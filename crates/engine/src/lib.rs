//! Search engine client for the searchgate gateway
//!
//! This crate wraps the engine's REST API behind the [`EngineClient`] trait
//! and provides the process-wide [`EngineClientAccessor`] that lazily builds
//! and memoizes the shared client handle.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod accessor;
pub mod error;
mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use accessor::{wait_for_engine, ClientFactory, EngineClientAccessor};
pub use error::EngineError;
pub use http::HttpEngineClient;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockEngineClient, RecordedWrite};

use async_trait::async_trait;
use searchgate_core::{SearchRequest, SearchResult};

/// Outcome of a successful upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedDocument {
    /// Identifier the engine stored the document under
    pub id: String,
    /// Engine-reported result ("created", "updated", ...) when available
    pub result: Option<String>,
}

/// Operations the gateway needs from the search engine
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Upsert a serialized JSON document into `index`
    ///
    /// An empty `id` lets the engine assign one. The write is made visible
    /// to searches before the call returns.
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        body: Vec<u8>,
    ) -> Result<IndexedDocument, EngineError>;

    /// Run a query and return the `_source` of every hit in engine order
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, EngineError>;

    /// Check connectivity, returning the engine's root response
    async fn ping(&self) -> Result<String, EngineError>;
}
