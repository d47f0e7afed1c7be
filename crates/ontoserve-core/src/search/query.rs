//! Deterministic query construction for the search index.

use std::collections::BTreeMap;

use crate::config::{QueryField, SearchConfig};
use crate::error::QueryError;

/// Request parameters consumed by the search endpoint itself.
pub const RESERVED_PARAMS: &[&str] = &["q", "page", "size"];

/// A query ready to be sent to a [`SearchIndex`](super::SearchIndex).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    /// User query text.
    pub text: String,
    /// Weighted fields, in configuration order.
    pub fields: Vec<QueryField>,
    /// Maximum number of documents to return.
    pub rows: usize,
    /// Remaining request parameters, passed to the index untouched.
    pub params: BTreeMap<String, String>,
}

impl IndexQuery {
    /// Edismax `qf` value, e.g. `prefLabel^50 synonym^5`.
    pub fn query_fields(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}^{}", f.field, f.weight))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builds [`IndexQuery`] values from request parameters.
///
/// The same text and parameters always produce the same query.
pub struct QueryBuilder<'a> {
    config: &'a SearchConfig,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, params: &BTreeMap<String, String>) -> Result<IndexQuery, QueryError> {
        let text = params
            .get("q")
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                QueryError::bad_request("The search query must be provided via the `q` parameter")
            })?;

        let passthrough = params
            .iter()
            .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(IndexQuery {
            text: text.to_string(),
            fields: self.config.query_fields.clone(),
            rows: self.config.max_hits,
            params: passthrough,
        })
    }
}
