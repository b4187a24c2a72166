//! Error types for engine operations

use searchgate_core::Error as CoreError;
use thiserror::Error;

/// Errors raised while talking to the search engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The client handle could not be constructed
    #[error("Failed to initialize engine client: {0}")]
    ClientInit(String),

    /// The engine could not be reached or the request did not complete
    #[error("Engine transport failed ({kind}): {message}")]
    Transport { kind: &'static str, message: String },

    /// The engine answered with a non-success status
    #[error("Engine returned {status}: {body}")]
    Response { status: u16, body: String },

    /// A document body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The engine response did not have the expected shape
    #[error("Failed to decode engine response: {0}")]
    Decode(String),

    /// The engine did not become reachable in time
    #[error("Engine not reachable after {waited_secs}s: {last_error}")]
    Unavailable {
        waited_secs: u64,
        last_error: String,
    },
}

impl EngineError {
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connection"
        } else if err.is_request() {
            "request build"
        } else if err.is_body() {
            "body"
        } else {
            "unknown"
        };
        Self::Transport {
            kind,
            message: err.to_string(),
        }
    }

    /// Whether the engine itself rejected the request
    pub fn is_engine_rejection(&self) -> bool {
        matches!(self, Self::Response { .. })
    }
}

impl From<EngineError> for CoreError {
    fn from(err: EngineError) -> Self {
        CoreError::engine(err.to_string())
    }
}
