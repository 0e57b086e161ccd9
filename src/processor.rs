//! Request processing orchestration.
//!
//! Ties the pieces together for one search call: token gate, request
//! assembly, backend execution, result shaping. Every step is strict past
//! the parser; a failed token check denies the search before any backend
//! call is made.

use std::sync::Arc;

use tracing::debug;

use crate::backend::{CallDump, SearchBackend};
use crate::builder::RequestBuilder;
use crate::config::SearcherOptions;
use crate::error::{Result, SearchgateError};
use crate::request::{ClientSearchRequest, FoundEntities, FoundEntity};
use crate::token::TokenService;

/// Processes client search requests end to end.
pub struct RequestProcessor {
    options: Arc<SearcherOptions>,
    request_builder: RequestBuilder,
    token_service: TokenService,
    backend: Arc<dyn SearchBackend>,
}

impl RequestProcessor {
    /// Create a processor over the given collaborators.
    pub fn new(
        options: Arc<SearcherOptions>,
        request_builder: RequestBuilder,
        token_service: TokenService,
        backend: Arc<dyn SearchBackend>,
    ) -> Self {
        RequestProcessor {
            options,
            request_builder,
            token_service,
            backend,
        }
    }

    /// Process one search request against a namespace.
    ///
    /// When token scoping is enabled a valid token is required; its embedded
    /// filter set overrides whatever the client supplied. In debug mode the
    /// engine is asked for per-hit explanations and the compiled request is
    /// echoed in the response.
    pub async fn process(
        &self,
        client_request: &ClientSearchRequest,
        namespace: &str,
        token: Option<&str>,
    ) -> Result<FoundEntities> {
        let token_filters = if self.token_service.is_enabled() {
            let token = token
                .ok_or_else(|| SearchgateError::invalid_token("search token required"))?;
            Some(self.token_service.validate_and_extract(token, namespace)?)
        } else {
            None
        };

        let mut backend_request = self
            .request_builder
            .build(client_request, namespace, token_filters.as_deref())
            .await?;

        if self.options.debug {
            backend_request.explain = Some(true);
        }

        let index = self.options.get_namespace(namespace)?.index_name();
        let body = backend_request.to_json()?;

        debug!(namespace, index, "performing search request");

        let response = self
            .backend
            .search(index, &body)
            .await
            .map_err(|e| match e {
                e @ SearchgateError::SearchExecution { .. } => e,
                other => SearchgateError::execution_with_dump(
                    other.to_string(),
                    CallDump {
                        request: body.clone(),
                        response: None,
                        status: None,
                    },
                ),
            })?;

        let entities = response
            .hits
            .hits
            .into_iter()
            .map(|hit| FoundEntity {
                content: hit.source,
                score: hit.score,
                explanation: hit.explanation,
            })
            .collect();

        Ok(FoundEntities {
            entities,
            total: response.hits.total.map(|t| t.value()).unwrap_or(0),
            debug_request: self.options.debug.then_some(body),
        })
    }
}
