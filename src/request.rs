//! Client-facing request and response models.
//!
//! Clients do not send query trees: they send free text plus *references* to
//! named, server-side filter and sorting fragments, and optionally pick a
//! match strategy. Everything here is plain serde data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How generated field expressions are combined in the bool query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStrategy {
    /// Logical OR: each expression contributes to the relevance score.
    #[default]
    Should,
    /// Logical AND: all expressions are required.
    Must,
}

/// Reference to a named, pre-defined filter fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRef {
    /// Ref identifier.
    pub id: String,
    /// Named filter args.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, String>,
}

impl FilterRef {
    /// Create a reference without args.
    pub fn new<S: Into<String>>(id: S) -> Self {
        FilterRef {
            id: id.into(),
            args: HashMap::new(),
        }
    }

    /// Add a named arg.
    pub fn with_arg<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// Reference to a named, pre-defined sorting fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingRef {
    /// Ref identifier.
    pub id: String,
    /// Named sorting args.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, String>,
}

impl SortingRef {
    /// Create a reference without args.
    pub fn new<S: Into<String>>(id: S) -> Self {
        SortingRef {
            id: id.into(),
            args: HashMap::new(),
        }
    }

    /// Add a named arg.
    pub fn with_arg<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// A client search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSearchRequest {
    /// Free-text query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Explicit filter references; all of them apply (AND semantics).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterRef>,
    /// Explicit sorting reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortingRef>,
    /// Number of leading results to skip.
    #[serde(default)]
    pub offset: u64,
    /// Maximum number of results; `0` means "use the configured default".
    #[serde(default)]
    pub limit: u64,
    /// Explicit match strategy, overriding namespace and global defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_strategy: Option<QueryStrategy>,
}

/// One found document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundEntity {
    /// The stored document content.
    pub content: Value,
    /// Relevance score reported by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Score computation details, present in debug mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Value>,
}

/// Search result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundEntities {
    /// The found documents, in engine order.
    pub entities: Vec<FoundEntity>,
    /// Total hit count reported by the engine.
    pub total: u64,
    /// The compiled backend request, attached in debug mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_request: Option<Value>,
}
