//! In-memory engine client for tests
//!
//! Records every upsert with the instant it started, keeps the stored
//! documents per collection and can be told to reject specific ids or to
//! behave as if the engine were unreachable.

use crate::error::EngineError;
use crate::{EngineClient, IndexedDocument};
use async_trait::async_trait;
use searchgate_core::{Document, SearchRequest, SearchResult};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// One persist attempt seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    pub index: String,
    pub id: String,
    pub body: Value,
    pub started_at: Instant,
    pub succeeded: bool,
}

#[derive(Default)]
pub struct MockEngineClient {
    writes: Mutex<Vec<RecordedWrite>>,
    collections: Mutex<HashMap<String, Vec<(String, Document)>>>,
    failing_ids: Mutex<HashSet<String>>,
    unreachable: AtomicBool,
    next_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockEngineClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject upserts of documents with this id
    pub fn fail_id(&self, id: impl Into<String>) {
        lock(&self.failing_ids).insert(id.into());
    }

    /// Make every call fail with a transport error
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Create an empty collection so searches against it succeed
    pub fn create_collection(&self, index: impl Into<String>) {
        lock(&self.collections).entry(index.into()).or_default();
    }

    /// All persist attempts so far, in the order they started
    pub fn writes(&self) -> Vec<RecordedWrite> {
        lock(&self.writes).clone()
    }

    /// Ids of all persist attempts so far, in the order they started
    pub fn written_ids(&self) -> Vec<String> {
        lock(&self.writes).iter().map(|w| w.id.clone()).collect()
    }

    /// Wait until at least `count` persist attempts were recorded
    pub async fn wait_for_writes(&self, count: usize, timeout: Duration) -> Vec<RecordedWrite> {
        let deadline = Instant::now() + timeout;
        loop {
            let writes = self.writes();
            if writes.len() >= count || Instant::now() >= deadline {
                return writes;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn check_reachable(&self) -> Result<(), EngineError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(EngineError::Transport {
                kind: "connection",
                message: "mock engine is unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EngineClient for MockEngineClient {
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        body: Vec<u8>,
    ) -> Result<IndexedDocument, EngineError> {
        let started_at = Instant::now();
        let parsed: Result<Value, EngineError> = serde_json::from_slice(&body).map_err(|e| {
            EngineError::Response {
                status: 400,
                body: format!(r#"{{"error":"failed to parse document: {e}"}}"#),
            }
        });

        let outcome = self.check_reachable().and_then(|()| {
            if lock(&self.failing_ids).contains(id) {
                return Err(EngineError::Response {
                    status: 400,
                    body: format!(r#"{{"error":"mapper_parsing_exception for id [{id}]"}}"#),
                });
            }
            parsed.clone()
        });

        let assigned_id = if id.is_empty() {
            format!("auto-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
        } else {
            id.to_string()
        };

        lock(&self.writes).push(RecordedWrite {
            index: index.to_string(),
            id: id.to_string(),
            body: parsed.clone().unwrap_or(Value::Null),
            started_at,
            succeeded: outcome.is_ok(),
        });

        let body = outcome?;
        let document = match body {
            Value::Object(map) => map,
            other => {
                let mut map = Document::new();
                map.insert("value".to_string(), other);
                map
            }
        };

        let mut collections = lock(&self.collections);
        let docs = collections.entry(index.to_string()).or_default();
        let result = match docs.iter_mut().find(|(doc_id, _)| *doc_id == assigned_id) {
            Some(existing) => {
                existing.1 = document;
                "updated"
            }
            None => {
                docs.push((assigned_id.clone(), document));
                "created"
            }
        };

        Ok(IndexedDocument {
            id: assigned_id,
            result: Some(result.to_string()),
        })
    }

    /// Returns every document of the collection in insertion order
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, EngineError> {
        self.check_reachable()?;

        let collections = lock(&self.collections);
        match collections.get(&request.index) {
            Some(docs) => Ok(docs.iter().map(|(_, doc)| doc.clone()).collect()),
            None => Err(EngineError::Response {
                status: 404,
                body: format!(
                    r#"{{"error":{{"type":"index_not_found_exception","reason":"no such index [{}]"}},"status":404}}"#,
                    request.index
                ),
            }),
        }
    }

    async fn ping(&self) -> Result<String, EngineError> {
        self.check_reachable()?;
        Ok(r#"{"name":"mock","tagline":"You Know, for Search"}"#.to_string())
    }
}
