//! Full-text class search.
//!
//! The index itself is an external collaborator behind [`SearchIndex`]. This
//! module builds deterministic queries for it ([`QueryBuilder`]) and turns the
//! raw hits into a ranked, paginated result ([`SearchMerger`]).
//!
//! # Backends
//!
//! - [`SolrSearchIndex`] - edismax `select` requests over HTTP
//! - [`InMemorySearchIndex`] - field matching over a [`GraphSnapshot`](crate::graph::GraphSnapshot)

mod error;
mod memory;
mod merge;
mod query;
mod solr;

pub use error::IndexError;
pub use memory::InMemorySearchIndex;
pub use merge::{derive_ontology_id, SearchHit, SearchMerger};
pub use query::{IndexQuery, QueryBuilder, RESERVED_PARAMS};
pub use solr::SolrSearchIndex;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// A relevance-scored document as returned by the index.
///
/// Field names follow the index schema. Multi-valued fields may arrive as a
/// single string or as an array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(default)]
    pub resource_id: Option<String>,

    /// Indexed submission identifier(s); the first one is used.
    #[serde(rename = "ontologyId", default, deserialize_with = "one_or_many")]
    pub ontology_id: Vec<String>,

    #[serde(rename = "submissionAcronym", default)]
    pub submission_acronym: Option<String>,

    #[serde(default)]
    pub score: f64,

    #[serde(rename = "prefLabel", default, deserialize_with = "one_or_many")]
    pub pref_label: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub synonym: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub definition: Vec<String>,
}

/// Index answer: total matches plus the returned documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexResponse {
    pub num_found: usize,
    pub docs: Vec<RawHit>,
}

/// A full-text index over class documents.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(&self, query: &IndexQuery) -> Result<IndexResponse, IndexError>;
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null,
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
        OneOrMany::Null => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_hit_accepts_single_and_multi_valued_fields() {
        let hit: RawHit = serde_json::from_str(
            r#"{
                "resource_id": "http://purl.obolibrary.org/obo/GO_0005623",
                "ontologyId": ["http://data.example.org/ontologies/GO/submissions/3"],
                "submissionAcronym": "GO",
                "score": 4.5,
                "prefLabel": "cell",
                "synonym": ["cellula", "cell body"]
            }"#,
        )
        .unwrap();

        assert_eq!(hit.pref_label, vec!["cell".to_string()]);
        assert_eq!(hit.synonym.len(), 2);
        assert!(hit.definition.is_empty());
        assert_eq!(hit.ontology_id.len(), 1);
    }

    #[test]
    fn test_raw_hit_tolerates_missing_ontology_id() {
        let hit: RawHit = serde_json::from_str(r#"{"resource_id": "http://x.org/A", "score": 1.0}"#)
            .unwrap();
        assert!(hit.ontology_id.is_empty());
    }
}
