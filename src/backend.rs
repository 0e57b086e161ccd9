//! Backend search engine interface.
//!
//! The compiled request is a JSON document in the engine's search DSL:
//! `from`/`size` paging, an optional verbatim `sort` clause, and an optional
//! `query.bool` with unscored `filter` members and scored `should` or `must`
//! members. The engine itself is reached through the [`SearchBackend`] trait;
//! connection management and transport live behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// The compiled backend search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackendSearchRequest {
    /// Paging offset.
    pub from: u64,
    /// Result window size.
    pub size: u64,
    /// Rendered sort clause, attached verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    /// The bool query; omitted entirely for an unfiltered match-all request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryModel>,
    /// Ask the engine for per-hit score explanations (debug mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<bool>,
}

impl BackendSearchRequest {
    /// Serialize to the engine's JSON body.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Wrapper for the engine's `query` member.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryModel {
    /// The bool query.
    #[serde(rename = "bool")]
    pub bool_query: BoolModel,
}

/// The engine's bool query.
///
/// Filter members never contribute to scoring; should/must members always do.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolModel {
    /// Mandatory, unscored filter clauses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Value>,
    /// Scored OR clauses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Value>,
    /// Scored AND clauses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Value>,
    /// Minimum number of should clauses a hit must satisfy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<u32>,
}

/// One hit of a raw engine response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    /// The stored document.
    #[serde(rename = "_source")]
    pub source: Value,
    /// Relevance score; absent for unscored (filter-only) requests.
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    /// Score computation details, present when `explain` was requested.
    #[serde(rename = "_explanation")]
    pub explanation: Option<Value>,
}

/// Total hit count; newer engines report an object, older ones a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTotal {
    /// `{"value": 42, "relation": "eq"}` shape.
    Object {
        /// The count.
        value: u64,
    },
    /// Bare numeric shape.
    Legacy(u64),
}

impl RawTotal {
    /// The reported count.
    pub fn value(&self) -> u64 {
        match self {
            RawTotal::Object { value } => *value,
            RawTotal::Legacy(value) => *value,
        }
    }
}

/// The `hits` member of a raw engine response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHits {
    /// Total hit count.
    pub total: Option<RawTotal>,
    /// The returned page of hits.
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// A raw engine search response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    /// The hits member.
    pub hits: RawHits,
}

/// Diagnostic dump of a failed backend call, for operator diagnosis.
#[derive(Debug, Clone, Serialize)]
pub struct CallDump {
    /// The request body that was sent.
    pub request: Value,
    /// The response body, when one was received.
    pub response: Option<String>,
    /// The transport status code, when one was received.
    pub status: Option<u16>,
}

/// The search engine, as seen by the request processor.
///
/// Implementations perform one search call against the named index and
/// return the parsed raw response. Transport failures and unsuccessful
/// engine replies must surface as [`SearchgateError::SearchExecution`]
/// carrying a [`CallDump`]; no retries happen at this layer.
///
/// [`SearchgateError::SearchExecution`]: crate::error::SearchgateError::SearchExecution
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute one search request against an index.
    async fn search(&self, index: &str, body: &Value) -> Result<RawSearchResponse>;
}
