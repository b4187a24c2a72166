//! Persisting one save request into the engine

use searchgate_core::SaveRequest;
use searchgate_engine::{EngineClientAccessor, EngineError, IndexedDocument};
use thiserror::Error;

/// A save request that could not be written
#[derive(Error, Debug, Clone)]
#[error("Failed to persist document '{id}' into '{index}': {source}")]
pub struct PersistError {
    pub index: String,
    pub id: String,
    #[source]
    pub source: EngineError,
}

impl PersistError {
    fn new(request: &SaveRequest, source: EngineError) -> Self {
        Self {
            index: request.index.clone(),
            id: request.id.clone(),
            source,
        }
    }
}

/// Upsert `request.doc` into `request.index` under `request.id`
///
/// The engine refreshes before acknowledging, so a successful write is
/// visible to the next search. Nothing is retried.
pub async fn persist(
    accessor: &EngineClientAccessor,
    request: &SaveRequest,
) -> Result<IndexedDocument, PersistError> {
    let body = serde_json::to_vec(&request.doc)
        .map_err(|e| PersistError::new(request, EngineError::Serialization(e.to_string())))?;

    let client = accessor
        .get_client()
        .await
        .map_err(|e| PersistError::new(request, e))?;

    client
        .index_document(&request.index, &request.id, body)
        .await
        .map_err(|e| PersistError::new(request, e))
}
