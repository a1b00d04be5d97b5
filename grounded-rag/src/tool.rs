//! Retrieval tool surface for LLM tool calls.
//!
//! [`RetrievalTool`] exposes similarity search as a tool an external LLM
//! layer can attach. Retrieval on the chat path degrades gracefully: on
//! timeout or search failure the tool returns an empty result set and the
//! chat turn proceeds without document context.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{info, warn};

use grounded_core::SearchResult;

use crate::config::SearchOptions;
use crate::error::{Result, RetrievalError};
use crate::search::{ChunkSearch, format_search_results};

/// Cap on retrieval latency in the interactive chat path.
pub const DEFAULT_RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(10);

/// A document-search tool backed by a [`ChunkSearch`] implementation.
pub struct RetrievalTool {
    search: Arc<dyn ChunkSearch>,
    options: SearchOptions,
    timeout: Duration,
}

impl RetrievalTool {
    /// Create a tool over the given search implementation and base options.
    ///
    /// The options fix the scope the model is allowed to search; tool-call
    /// arguments can override the result limit but never the scope.
    pub fn new(search: Arc<dyn ChunkSearch>, options: SearchOptions) -> Self {
        Self { search, options, timeout: DEFAULT_RETRIEVAL_TIMEOUT }
    }

    /// Override the retrieval timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Tool name for the LLM tool definition.
    pub fn name(&self) -> &str {
        "document_search"
    }

    /// Tool description for the LLM tool definition.
    pub fn description(&self) -> &str {
        "Search the uploaded documents for passages relevant to a query"
    }

    /// JSON schema for the tool parameters.
    pub fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find relevant document passages"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of passages to return. Uses the default if omitted."
                }
            },
            "required": ["query"]
        })
    }

    /// Execute a tool call.
    ///
    /// Requires a `query` string argument; honors an optional `limit`
    /// override. The output carries both the structured results and the
    /// formatted block for prompt injection.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Pipeline`] only for malformed arguments;
    /// search failures and timeouts degrade to an empty result set.
    pub async fn execute(&self, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| RetrievalError::Pipeline("missing required 'query' parameter".into()))?;

        let mut options = self.options.clone();
        if let Some(limit) = args.get("limit").and_then(Value::as_u64) {
            options.limit = limit as usize;
        }

        info!(query, limit = options.limit, "document_search tool called");

        let results = self.search_with_degradation(query, &options).await;

        Ok(json!({
            "results": results,
            "formatted": format_search_results(&results),
        }))
    }

    /// Run the search under the timeout cap, degrading to no context on
    /// failure so the chat turn keeps functioning.
    async fn search_with_degradation(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Vec<SearchResult> {
        match tokio::time::timeout(self.timeout, self.search.find_relevant_chunks(query, options))
            .await
        {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                warn!(query, error = %e, "document search failed; continuing without context");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    query,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "document search timed out; continuing without context"
                );
                Vec::new()
            }
        }
    }
}
