//! Synchronous search and connectivity checks against the engine

use searchgate_core::error::Result;
use searchgate_core::{SearchRequest, SearchResult};
use searchgate_engine::EngineClientAccessor;
use std::time::Instant;
use tracing::debug;

/// Run `request` against the engine and return the matching documents
pub async fn execute_search(
    request: SearchRequest,
    accessor: &EngineClientAccessor,
) -> Result<SearchResult> {
    request.validate()?;
    let start_time = Instant::now();

    let client = accessor.get_client().await?;
    let results = client.search(&request).await?;

    debug!(
        "Search on '{}' returned {} documents in {}ms",
        request.index,
        results.len(),
        start_time.elapsed().as_millis()
    );
    Ok(results)
}

/// Establish the engine client and ping the engine
pub async fn ping_engine(accessor: &EngineClientAccessor) -> Result<String> {
    let client = accessor.get_client().await?;
    Ok(client.ping().await?)
}
