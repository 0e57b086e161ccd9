//! Backend request assembly.
//!
//! Compiles a client request into a [`BackendSearchRequest`]: effective
//! paging, rendered sort and filter fragments, and the bool query combining
//! generated field expressions under the effective match strategy.
//!
//! Resolution rules, most specific wins:
//! - limit: request (`> 0`) > namespace default > global default of 10
//! - sort id: request > namespace default
//! - filters: token-imposed > request > namespace default
//! - strategy: request > namespace override > global default
//!
//! A non-empty query search orders by relevance first and applies the
//! resolved sort as tie-breaker.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::backend::{BackendSearchRequest, BoolModel, QueryModel};
use crate::config::{DEFAULT_LIMIT, SearcherOptions};
use crate::error::Result;
use crate::expression::{build_expression_groups, build_expressions};
use crate::mapping::MappingService;
use crate::provider::{FilterProvider, SortProvider};
use crate::query::SearchQuery;
use crate::request::{ClientSearchRequest, FilterRef, QueryStrategy, SortingRef};

/// Compiles client requests into backend search requests.
///
/// Stateless per call; one instance serves unbounded concurrent requests.
pub struct RequestBuilder {
    options: Arc<SearcherOptions>,
    filter_provider: Arc<dyn FilterProvider>,
    sort_provider: Arc<dyn SortProvider>,
    mapping_service: Arc<dyn MappingService>,
}

impl RequestBuilder {
    /// Create a builder over the given configuration and collaborators.
    pub fn new(
        options: Arc<SearcherOptions>,
        filter_provider: Arc<dyn FilterProvider>,
        sort_provider: Arc<dyn SortProvider>,
        mapping_service: Arc<dyn MappingService>,
    ) -> Self {
        RequestBuilder {
            options,
            filter_provider,
            sort_provider,
            mapping_service,
        }
    }

    /// Build the backend request for a client request against a namespace.
    ///
    /// `token_filters`, when present, replace any client-supplied or default
    /// filters; an empty token filter list still suppresses them.
    pub async fn build(
        &self,
        request: &ClientSearchRequest,
        namespace: &str,
        token_filters: Option<&[FilterRef]>,
    ) -> Result<BackendSearchRequest> {
        let ns_options = self.options.get_namespace(namespace)?;

        let limit = if request.limit > 0 {
            request.limit
        } else {
            ns_options.default_limit.unwrap_or(DEFAULT_LIMIT)
        };

        let mut backend_request = BackendSearchRequest {
            from: request.offset,
            size: limit,
            ..Default::default()
        };

        let query = SearchQuery::parse(request.query.as_deref().unwrap_or(""));

        let sort_ref = request
            .sort
            .clone()
            .or_else(|| ns_options.default_sort.clone().map(SortingRef::new));
        if let Some(sort_ref) = sort_ref {
            let sort = self
                .sort_provider
                .provide(&sort_ref.id, namespace, &sort_ref.args)
                .await?;
            // A query search orders by relevance first; the named sort
            // breaks score ties.
            backend_request.sort = Some(if query.is_empty() {
                sort
            } else {
                json!(["_score", sort])
            });
        }

        let effective_filters: Vec<FilterRef> = match token_filters {
            Some(imposed) => imposed.to_vec(),
            None if !request.filters.is_empty() => request.filters.clone(),
            None => ns_options
                .default_filter
                .clone()
                .map(FilterRef::new)
                .into_iter()
                .collect(),
        };

        let mut filter_clauses = Vec::with_capacity(effective_filters.len());
        for filter_ref in &effective_filters {
            let clause = self
                .filter_provider
                .provide(&filter_ref.id, namespace, &filter_ref.args)
                .await?;
            filter_clauses.push(clause);
        }

        let mapping = self.mapping_service.get_mapping(namespace).await?;
        let strategy = request
            .query_strategy
            .or(ns_options.query_strategy)
            .unwrap_or(self.options.query_strategy);

        let expressions = match strategy {
            QueryStrategy::Should => build_expressions(&query, &mapping),
            // Every word must match somewhere: each word's clauses collapse
            // into one must member satisfied by any of its fields.
            QueryStrategy::Must => build_expression_groups(&query, &mapping)
                .into_iter()
                .map(|mut group| {
                    if group.len() == 1 {
                        group.remove(0)
                    } else {
                        json!({"bool": {"should": group, "minimum_should_match": 1}})
                    }
                })
                .collect(),
        };

        backend_request.query =
            assemble_bool_query(strategy, filter_clauses, &query, expressions);

        debug!(namespace, from = backend_request.from, size = backend_request.size, "built backend request");

        Ok(backend_request)
    }
}

fn assemble_bool_query(
    strategy: QueryStrategy,
    filter_clauses: Vec<Value>,
    query: &SearchQuery,
    expressions: Vec<Value>,
) -> Option<QueryModel> {
    if filter_clauses.is_empty() && expressions.is_empty() {
        // Unfiltered match-all within paging/sort.
        return None;
    }

    let mut bool_query = BoolModel {
        filter: filter_clauses,
        ..Default::default()
    };

    match strategy {
        QueryStrategy::Should => {
            if !expressions.is_empty() && !query.is_empty() {
                bool_query.minimum_should_match = Some(1);
            }
            bool_query.should = expressions;
        }
        QueryStrategy::Must => {
            bool_query.must = expressions;
        }
    }

    Some(QueryModel { bool_query })
}
