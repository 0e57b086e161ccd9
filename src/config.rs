//! Gateway configuration.
//!
//! Options are deserialized once at process start and shared by reference
//! afterwards; nothing here is mutated at request time.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SearchgateError};
use crate::request::QueryStrategy;

/// Result window size applied when neither the request nor the namespace
/// configures a limit.
pub const DEFAULT_LIMIT: u64 = 10;

/// Token issuance/validation options.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizingOptions {
    /// HMAC signing key. Token scoping is enabled iff this is non-empty.
    pub sign_key: String,
}

/// Per-namespace search configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceOptions {
    /// Namespace identifier, as used by clients.
    pub id: String,
    /// Backing index name; defaults to the namespace id.
    pub index: Option<String>,
    /// Default result window size.
    pub default_limit: Option<u64>,
    /// Default sorting id.
    pub default_sort: Option<String>,
    /// Default filter id.
    pub default_filter: Option<String>,
    /// Match strategy override for this namespace.
    pub query_strategy: Option<QueryStrategy>,
}

impl NamespaceOptions {
    /// Create options with everything defaulted.
    pub fn new<S: Into<String>>(id: S) -> Self {
        NamespaceOptions {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Name of the backing index.
    pub fn index_name(&self) -> &str {
        self.index.as_deref().unwrap_or(&self.id)
    }
}

/// Top-level gateway options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearcherOptions {
    /// Configured namespaces. A request for any other namespace is rejected.
    pub namespaces: Vec<NamespaceOptions>,
    /// Global default match strategy.
    pub query_strategy: QueryStrategy,
    /// Debug mode: ask the engine for explanations and echo the compiled
    /// request in responses. Off in production.
    pub debug: bool,
    /// Base directory of filter templates.
    pub filter_path: Option<PathBuf>,
    /// Base directory of sorting templates.
    pub sort_path: Option<PathBuf>,
    /// Token issuance/validation options; absent disables token scoping.
    pub token: Option<TokenizingOptions>,
    /// Mapping cache time-to-live in seconds; absent caches until
    /// explicitly invalidated.
    pub mapping_cache_ttl_sec: Option<u64>,
}

impl SearcherOptions {
    /// Look up the options of a configured namespace.
    pub fn get_namespace(&self, namespace: &str) -> Result<&NamespaceOptions> {
        self.namespaces
            .iter()
            .find(|n| n.id == namespace)
            .ok_or_else(|| SearchgateError::unknown_namespace(namespace))
    }

    /// Configured mapping cache TTL, `None` for cache-until-invalidated.
    pub fn mapping_cache_ttl(&self) -> Option<Duration> {
        self.mapping_cache_ttl_sec.map(Duration::from_secs)
    }
}
