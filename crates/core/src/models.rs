//! Request and result types shared by the HTTP surface, the write queue and the engine client

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A single stored document as returned by the engine (`_source` of a hit)
pub type Document = Map<String, Value>;

/// Ordered documents in engine relevance order
pub type SearchResult = Vec<Document>;

/// Fuzziness used when a flat search request leaves it unset
pub const DEFAULT_FUZZINESS: &str = "AUTO";

/// One upsert into a target collection
///
/// An empty `id` asks the engine to assign one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub index: String,
    pub id: String,
    pub doc: Value,
}

impl SaveRequest {
    pub fn new(index: impl Into<String>, id: impl Into<String>, doc: Value) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            doc,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(Error::invalid_input(format!(
                "index must not be empty (document id '{}')",
                self.id
            )));
        }
        Ok(())
    }
}

/// Save requests submitted together in one call, kept in submission order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveBatch(pub Vec<SaveRequest>);

impl SaveBatch {
    pub fn new(items: Vec<SaveRequest>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SaveRequest> {
        self.0.iter()
    }

    /// Validate every item; the whole batch is rejected on the first bad one
    pub fn validate(&self) -> Result<()> {
        self.0.iter().try_for_each(SaveRequest::validate)
    }
}

impl IntoIterator for SaveBatch {
    type Item = SaveRequest;
    type IntoIter = std::vec::IntoIter<SaveRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<SaveRequest>> for SaveBatch {
    fn from(items: Vec<SaveRequest>) -> Self {
        Self(items)
    }
}

/// A search against one collection, expressed in the engine's query DSL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub index: String,
    pub query: Value,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>, query: Value) -> Self {
        Self {
            index: index.into(),
            query,
        }
    }

    /// Build a fuzzy `match` query on a single field
    pub fn fuzzy(
        index: impl Into<String>,
        field: &str,
        value: Value,
        fuzziness: Option<&str>,
    ) -> Self {
        let fuzziness = match fuzziness {
            Some(f) if !f.trim().is_empty() => f,
            _ => DEFAULT_FUZZINESS,
        };

        let mut clause = Map::new();
        clause.insert(
            field.to_string(),
            json!({ "query": value, "fuzziness": fuzziness }),
        );

        Self::new(index, json!({ "match": Value::Object(clause) }))
    }

    /// Request body sent to the engine's `_search` endpoint
    ///
    /// A query that already carries a top-level `query` key is a complete
    /// search body and is passed through unchanged.
    pub fn to_search_body(&self) -> Value {
        match &self.query {
            Value::Object(map) if map.contains_key("query") => self.query.clone(),
            other => json!({ "query": other }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(Error::invalid_input("index must not be empty"));
        }
        if self.query.is_null() {
            return Err(Error::invalid_input("query must not be null"));
        }
        Ok(())
    }
}

/// Accepted shapes of a search body
///
/// The flat fuzzy form is converted into the DSL form, so everything
/// downstream sees a single [`SearchRequest`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchBody {
    Dsl {
        index: String,
        query: Value,
    },
    Fuzzy {
        index: String,
        field: String,
        value: Value,
        #[serde(default)]
        fuzziness: Option<String>,
    },
}

impl From<SearchBody> for SearchRequest {
    fn from(body: SearchBody) -> Self {
        match body {
            SearchBody::Dsl { index, query } => SearchRequest::new(index, query),
            SearchBody::Fuzzy {
                index,
                field,
                value,
                fuzziness,
            } => SearchRequest::fuzzy(index, &field, value, fuzziness.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_batch_preserves_order() {
        let batch: SaveBatch = serde_json::from_str(
            r#"[
                {"index": "items", "id": "1", "doc": {"name": "apple"}},
                {"index": "items", "id": "", "doc": {"name": "pear"}},
                {"index": "fruit", "id": "3", "doc": [1, 2]}
            ]"#,
        )
        .unwrap();

        let ids: Vec<_> = batch.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "", "3"]);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_save_batch_rejects_non_array() {
        let result: std::result::Result<SaveBatch, _> =
            serde_json::from_str(r#"{"index": "items", "id": "1", "doc": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_request_requires_doc() {
        let result: std::result::Result<SaveBatch, _> =
            serde_json::from_str(r#"[{"index": "items", "id": "1"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_batch_rejects_empty_index() {
        let batch = SaveBatch::new(vec![
            SaveRequest::new("items", "1", json!({})),
            SaveRequest::new(" ", "2", json!({})),
        ]);
        let err = batch.validate().unwrap_err();
        assert!(err.to_string().contains("document id '2'"));
    }

    #[test]
    fn test_flat_body_becomes_match_query() {
        let body: SearchBody = serde_json::from_value(json!({
            "index": "items",
            "field": "name",
            "value": "aple",
            "fuzziness": "AUTO"
        }))
        .unwrap();

        let request = SearchRequest::from(body);
        assert_eq!(request.index, "items");
        assert_eq!(
            request.query,
            json!({"match": {"name": {"query": "aple", "fuzziness": "AUTO"}}})
        );
    }

    #[test]
    fn test_flat_body_defaults_fuzziness() {
        let body: SearchBody = serde_json::from_value(json!({
            "index": "items",
            "field": "name",
            "value": "aple",
            "fuzziness": ""
        }))
        .unwrap();

        let request = SearchRequest::from(body);
        assert_eq!(request.query["match"]["name"]["fuzziness"], "AUTO");
    }

    #[test]
    fn test_dsl_body_is_wrapped_once() {
        let clause = SearchRequest::new("items", json!({"term": {"id": "1"}}));
        assert_eq!(
            clause.to_search_body(),
            json!({"query": {"term": {"id": "1"}}})
        );

        let full = SearchRequest::new(
            "items",
            json!({"query": {"match_all": {}}, "size": 5}),
        );
        assert_eq!(
            full.to_search_body(),
            json!({"query": {"match_all": {}}, "size": 5})
        );
    }

    #[test]
    fn test_search_body_without_query_or_field_is_rejected() {
        let result: std::result::Result<SearchBody, _> =
            serde_json::from_value(json!({"index": "items"}));
        assert!(result.is_err());
    }
}
