//! Index mapping retrieval and caching.
//!
//! The mapping of a namespace is the field-name to field-type table of its
//! backing index, obtained from the engine's schema introspection. Fetching
//! it is a network round trip, so request processing goes through
//! [`CachedMappingService`], which caches one snapshot per namespace and
//! supports both a TTL policy and explicit invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::config::SearcherOptions;
use crate::error::Result;

/// One field of an index mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingProperty {
    /// Field name.
    pub name: String,
    /// Engine field type (`long`, `date`, `text`, `keyword`, ...).
    pub field_type: String,
}

/// Schema snapshot of a namespace's backing index.
///
/// Property order is preserved; generated expressions follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMapping {
    /// The mapped fields, in mapping order.
    pub properties: Vec<MappingProperty>,
}

impl IndexMapping {
    /// Create a mapping from `(name, type)` pairs.
    pub fn new<N, T>(props: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        IndexMapping {
            properties: props
                .into_iter()
                .map(|(name, field_type)| MappingProperty {
                    name: name.into(),
                    field_type: field_type.into(),
                })
                .collect(),
        }
    }
}

/// Search-parameter category a mapped field type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    /// Integer and floating point engine types.
    Numeric,
    /// The `date` engine type.
    Date,
    /// The analyzed `text` engine type.
    Text,
    /// The unanalyzed `keyword` engine type.
    Keyword,
}

impl FieldCategory {
    /// Categorize an engine field type, `None` for unsupported types.
    pub fn of(field_type: &str) -> Option<FieldCategory> {
        match field_type {
            "long" | "integer" | "short" | "byte" | "double" | "float" | "half_float"
            | "scaled_float" | "unsigned_long" => Some(FieldCategory::Numeric),
            "date" => Some(FieldCategory::Date),
            "text" => Some(FieldCategory::Text),
            "keyword" => Some(FieldCategory::Keyword),
            _ => None,
        }
    }
}

/// Source of index mappings, normally backed by the engine's
/// schema-introspection API.
#[async_trait]
pub trait MappingService: Send + Sync {
    /// Get the current mapping of the namespace's backing index.
    async fn get_mapping(&self, namespace: &str) -> Result<Arc<IndexMapping>>;
}

/// Caching wrapper around a [`MappingService`].
///
/// Snapshots are replaced atomically under a write lock, so concurrent
/// readers always observe either the previous or the new complete mapping.
/// With `ttl == None` entries are kept until explicitly invalidated.
pub struct CachedMappingService<S> {
    inner: S,
    ttl: Option<Duration>,
    cache: RwLock<HashMap<String, (Arc<IndexMapping>, Instant)>>,
}

impl<S: MappingService> CachedMappingService<S> {
    /// Wrap a mapping source with a cache-forever policy.
    pub fn new(inner: S) -> Self {
        CachedMappingService {
            inner,
            ttl: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Set a time-to-live after which a cached snapshot is re-fetched.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Wrap a mapping source with the TTL policy configured in the gateway
    /// options (`mappingCacheTtlSec`), cache-forever when unset.
    pub fn from_options(inner: S, options: &SearcherOptions) -> Self {
        CachedMappingService {
            ttl: options.mapping_cache_ttl(),
            ..Self::new(inner)
        }
    }

    /// Drop the cached snapshot of one namespace.
    pub fn invalidate(&self, namespace: &str) {
        self.cache.write().remove(namespace);
    }

    /// Drop all cached snapshots.
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    fn lookup(&self, namespace: &str) -> Option<Arc<IndexMapping>> {
        let cache = self.cache.read();
        let (mapping, fetched_at) = cache.get(namespace)?;

        match self.ttl {
            Some(ttl) if fetched_at.elapsed() >= ttl => None,
            _ => Some(Arc::clone(mapping)),
        }
    }
}

#[async_trait]
impl<S: MappingService> MappingService for CachedMappingService<S> {
    async fn get_mapping(&self, namespace: &str) -> Result<Arc<IndexMapping>> {
        if let Some(mapping) = self.lookup(namespace) {
            return Ok(mapping);
        }

        let mapping = self.inner.get_mapping(namespace).await?;
        self.cache
            .write()
            .insert(namespace.to_string(), (Arc::clone(&mapping), Instant::now()));

        Ok(mapping)
    }
}

/// Fixed in-memory mapping source, one mapping for every namespace.
///
/// Useful for tests and single-index deployments.
pub struct StaticMappingService {
    mapping: Arc<IndexMapping>,
}

impl StaticMappingService {
    /// Create a source that always returns the given mapping.
    pub fn new(mapping: IndexMapping) -> Self {
        StaticMappingService {
            mapping: Arc::new(mapping),
        }
    }
}

#[async_trait]
impl MappingService for StaticMappingService {
    async fn get_mapping(&self, _namespace: &str) -> Result<Arc<IndexMapping>> {
        Ok(Arc::clone(&self.mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MappingService for CountingService {
        async fn get_mapping(&self, _namespace: &str) -> Result<Arc<IndexMapping>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(IndexMapping::new([("id", "long")])))
        }
    }

    #[test]
    fn test_field_categories() {
        for numeric in [
            "long",
            "integer",
            "short",
            "byte",
            "double",
            "float",
            "half_float",
            "scaled_float",
            "unsigned_long",
        ] {
            assert_eq!(FieldCategory::of(numeric), Some(FieldCategory::Numeric));
        }
        assert_eq!(FieldCategory::of("date"), Some(FieldCategory::Date));
        assert_eq!(FieldCategory::of("text"), Some(FieldCategory::Text));
        assert_eq!(FieldCategory::of("keyword"), Some(FieldCategory::Keyword));
        assert_eq!(FieldCategory::of("geo_point"), None);
        assert_eq!(FieldCategory::of("nested"), None);
    }

    #[tokio::test]
    async fn test_cache_hits_once() {
        let cached = CachedMappingService::new(CountingService {
            calls: AtomicUsize::new(0),
        });

        cached.get_mapping("test").await.unwrap();
        cached.get_mapping("test").await.unwrap();
        cached.get_mapping("test").await.unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_per_namespace() {
        let cached = CachedMappingService::new(CountingService {
            calls: AtomicUsize::new(0),
        });

        cached.get_mapping("a").await.unwrap();
        cached.get_mapping("b").await.unwrap();
        cached.get_mapping("a").await.unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cached = CachedMappingService::new(CountingService {
            calls: AtomicUsize::new(0),
        });

        cached.get_mapping("test").await.unwrap();
        cached.invalidate("test");
        cached.get_mapping("test").await.unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let cached = CachedMappingService::new(CountingService {
            calls: AtomicUsize::new(0),
        })
        .with_ttl(Duration::ZERO);

        cached.get_mapping("test").await.unwrap();
        cached.get_mapping("test").await.unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ttl_taken_from_options() {
        let options = SearcherOptions {
            mapping_cache_ttl_sec: Some(0),
            ..Default::default()
        };
        let cached = CachedMappingService::from_options(
            CountingService {
                calls: AtomicUsize::new(0),
            },
            &options,
        );

        cached.get_mapping("test").await.unwrap();
        cached.get_mapping("test").await.unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);

        // Without a configured TTL the snapshot is cached until invalidated.
        let cached = CachedMappingService::from_options(
            CountingService {
                calls: AtomicUsize::new(0),
            },
            &SearcherOptions::default(),
        );

        cached.get_mapping("test").await.unwrap();
        cached.get_mapping("test").await.unwrap();

        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }
}
