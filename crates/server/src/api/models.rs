//! Request and response models for API operations

use searchgate_core::SearchResult;
use serde::{Deserialize, Serialize};

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub message: String,
    pub random_num: u32,
}

/// Acknowledgment of an accepted save batch
///
/// Accepted means queued for asynchronous persistence, not yet written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub res: String,
    pub status: bool,
}

impl SaveResponse {
    pub fn accepted() -> Self {
        Self {
            res: "OK".to_string(),
            status: true,
        }
    }
}

/// Documents matching a search, in engine relevance order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub res: SearchResult,
    pub status: bool,
}

/// Error body returned with 4xx/5xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub msg: String,
    pub status: bool,
}
