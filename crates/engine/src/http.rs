//! Engine client over the engine's JSON REST API

use crate::error::EngineError;
use crate::{EngineClient, IndexedDocument};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use searchgate_core::{Document, EngineConfig, SearchRequest, SearchResult};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Response envelope of an index request
#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: Option<String>,
    result: Option<String>,
}

/// Response envelope of a search request (`hits.hits[]._source`)
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source", default)]
    source: Document,
}

/// Engine client backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpEngineClient {
    client: Client,
    base_url: Url,
}

impl HttpEngineClient {
    /// Create a client for the engine at `config.url`
    ///
    /// No request is sent; an unreachable engine only shows up on first use.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let base_url = Url::parse(config.url.trim()).map_err(|e| {
            EngineError::ClientInit(format!("Invalid engine URL '{}': {e}", config.url))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(EngineError::ClientInit(format!(
                "Engine URL '{}' must be an absolute http(s) URL",
                config.url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EngineError::ClientInit(format!("Failed to create HTTP client: {e}")))?;

        info!("Engine client configured for {base_url}");

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                EngineError::ClientInit(format!("Engine URL '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<Response, EngineError> {
        let mut request = self.client.request(method, url.clone()).query(query);
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(|e| {
            let err = EngineError::from_reqwest(&e);
            warn!("Engine request to {url} failed: {err}");
            err
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            debug!("Engine request to {url} returned {status}: {body}");
            return Err(EngineError::Response { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl EngineClient for HttpEngineClient {
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        body: Vec<u8>,
    ) -> Result<IndexedDocument, EngineError> {
        let (method, url) = if id.is_empty() {
            (Method::POST, self.endpoint(&[index, "_doc"])?)
        } else {
            (Method::PUT, self.endpoint(&[index, "_doc", id])?)
        };

        let response = self
            .send(method, url, &[("refresh", "true")], Some(body))
            .await?;

        // Some engines answer with an empty body; the write still succeeded
        let text = response.text().await.map_err(|e| EngineError::from_reqwest(&e))?;
        let parsed = serde_json::from_str::<IndexResponse>(&text).ok();

        Ok(IndexedDocument {
            id: parsed
                .as_ref()
                .and_then(|r| r.id.clone())
                .unwrap_or_else(|| id.to_string()),
            result: parsed.and_then(|r| r.result),
        })
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, EngineError> {
        let url = self.endpoint(&[request.index.as_str(), "_search"])?;
        let body = serde_json::to_vec(&request.to_search_body())
            .map_err(|e| EngineError::Serialization(e.to_string()))?;

        let response = self
            .send(Method::POST, url, &[("track_total_hits", "true")], Some(body))
            .await?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))?;

        Ok(parsed.hits.hits.into_iter().map(|hit| hit.source).collect())
    }

    async fn ping(&self) -> Result<String, EngineError> {
        let response = self
            .send(Method::GET, self.base_url.clone(), &[], None)
            .await?;
        response.text().await.map_err(|e| EngineError::from_reqwest(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(url: &str) -> Result<HttpEngineClient, EngineError> {
        HttpEngineClient::new(&EngineConfig {
            url: url.to_string(),
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let err = client_for("not a url").unwrap_err();
        assert!(matches!(err, EngineError::ClientInit(_)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = client_for("ftp://localhost:9200").unwrap_err();
        assert!(err.to_string().contains("absolute http(s) URL"));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client_for("http://localhost:9200").unwrap();
        let url = client.endpoint(&["items", "_doc", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/items/_doc/a%2Fb%20c");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = client_for("http://proxy.local/es/").unwrap();
        let url = client.endpoint(&["items", "_search"]).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/es/items/_search");
    }
}
