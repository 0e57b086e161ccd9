//! Named filter and sorting providers.
//!
//! Filters and sortings are pre-defined clause fragments selected by id.
//! Lookup is namespace-aware and may carry named args; an unknown id is a
//! strict build-time error, never masked.
//!
//! The file-backed providers resolve `<base>/<namespace>/<id>.json` first
//! and fall back to `<base>/<id>.json`, so a fragment can be shared across
//! namespaces or specialized for one. `{argName}` placeholders in the raw
//! template are substituted before JSON parsing.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use crate::config::SearcherOptions;
use crate::error::{Result, SearchgateError};

/// Source of named filter fragments.
#[async_trait]
pub trait FilterProvider: Send + Sync {
    /// Render the filter fragment with the given id and args.
    async fn provide(
        &self,
        id: &str,
        namespace: &str,
        args: &HashMap<String, String>,
    ) -> Result<Value>;
}

/// Source of named sorting fragments.
#[async_trait]
pub trait SortProvider: Send + Sync {
    /// Render the sorting fragment with the given id and args.
    async fn provide(
        &self,
        id: &str,
        namespace: &str,
        args: &HashMap<String, String>,
    ) -> Result<Value>;
}

/// Replace `{argName}` placeholders with the ref's arg values.
fn substitute_args(template: &str, args: &HashMap<String, String>) -> String {
    let mut content = template.to_string();
    for (key, value) in args {
        content = content.replace(&format!("{{{key}}}"), value);
    }
    content
}

/// Load a fragment template from the namespace directory or the shared base.
async fn load_template(base: &PathBuf, namespace: &str, id: &str) -> Option<String> {
    let candidates = [
        base.join(namespace).join(format!("{id}.json")),
        base.join(format!("{id}.json")),
    ];

    for path in candidates {
        if let Ok(content) = fs::read_to_string(&path).await {
            return Some(content);
        }
    }

    None
}

/// Filter fragments stored as JSON template files under a base directory.
pub struct FileFilterProvider {
    base: PathBuf,
}

impl FileFilterProvider {
    /// Create a provider over the given base directory.
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        FileFilterProvider { base: base.into() }
    }

    /// Create a provider over the `filterPath` directory from the gateway
    /// options; an error when no filter path is configured.
    pub fn from_options(options: &SearcherOptions) -> Result<Self> {
        options
            .filter_path
            .clone()
            .map(Self::new)
            .ok_or_else(|| SearchgateError::config("filter template path is not configured"))
    }
}

#[async_trait]
impl FilterProvider for FileFilterProvider {
    async fn provide(
        &self,
        id: &str,
        namespace: &str,
        args: &HashMap<String, String>,
    ) -> Result<Value> {
        let template = load_template(&self.base, namespace, id)
            .await
            .ok_or_else(|| SearchgateError::unknown_filter(id))?;

        Ok(serde_json::from_str(&substitute_args(&template, args))?)
    }
}

/// Sorting fragments stored as JSON template files under a base directory.
pub struct FileSortProvider {
    base: PathBuf,
}

impl FileSortProvider {
    /// Create a provider over the given base directory.
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        FileSortProvider { base: base.into() }
    }

    /// Create a provider over the `sortPath` directory from the gateway
    /// options; an error when no sort path is configured.
    pub fn from_options(options: &SearcherOptions) -> Result<Self> {
        options
            .sort_path
            .clone()
            .map(Self::new)
            .ok_or_else(|| SearchgateError::config("sorting template path is not configured"))
    }
}

#[async_trait]
impl SortProvider for FileSortProvider {
    async fn provide(
        &self,
        id: &str,
        namespace: &str,
        args: &HashMap<String, String>,
    ) -> Result<Value> {
        let template = load_template(&self.base, namespace, id)
            .await
            .ok_or_else(|| SearchgateError::unknown_sorting(id))?;

        Ok(serde_json::from_str(&substitute_args(&template, args))?)
    }
}

/// Fixed in-memory filter fragments, keyed by id.
#[derive(Default)]
pub struct StaticFilterProvider {
    filters: HashMap<String, Value>,
}

impl StaticFilterProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment template under an id.
    pub fn with_filter<S: Into<String>>(mut self, id: S, fragment: Value) -> Self {
        self.filters.insert(id.into(), fragment);
        self
    }
}

#[async_trait]
impl FilterProvider for StaticFilterProvider {
    async fn provide(
        &self,
        id: &str,
        _namespace: &str,
        args: &HashMap<String, String>,
    ) -> Result<Value> {
        let fragment = self
            .filters
            .get(id)
            .ok_or_else(|| SearchgateError::unknown_filter(id))?;

        let rendered = substitute_args(&fragment.to_string(), args);
        Ok(serde_json::from_str(&rendered)?)
    }
}

/// Fixed in-memory sorting fragments, keyed by id.
#[derive(Default)]
pub struct StaticSortProvider {
    sortings: HashMap<String, Value>,
}

impl StaticSortProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment template under an id.
    pub fn with_sorting<S: Into<String>>(mut self, id: S, fragment: Value) -> Self {
        self.sortings.insert(id.into(), fragment);
        self
    }
}

#[async_trait]
impl SortProvider for StaticSortProvider {
    async fn provide(
        &self,
        id: &str,
        _namespace: &str,
        args: &HashMap<String, String>,
    ) -> Result<Value> {
        let fragment = self
            .sortings
            .get(id)
            .ok_or_else(|| SearchgateError::unknown_sorting(id))?;

        let rendered = substitute_args(&fragment.to_string(), args);
        Ok(serde_json::from_str(&rendered)?)
    }
}
