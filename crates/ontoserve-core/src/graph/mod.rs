//! Graph store contract and backends.
//!
//! The query layer never talks to a database directly. It consumes the
//! [`GraphStore`] trait, which exposes the small set of read primitives the
//! hierarchy endpoints are composed from:
//!
//! - ontology and submission lookup with idempotent lazy loading
//! - class lookup with an explicit attribute selection
//! - structural relations (`roots`, `parents`, `children`)
//! - a batched attribute fetch used by the prefetcher
//!
//! Closures (ancestors, descendants, root paths) are built on top of these
//! primitives by [`crate::query::hierarchy`].
//!
//! # Backends
//!
//! - [`InMemoryGraphStore`] - built from a JSON [`GraphSnapshot`]
//! - [`SurrealGraphStore`] - SurrealDB embedded with RocksDB persistence

mod error;
mod iri;
mod memory;
mod models;
mod snapshot;
mod surreal;

pub use error::StoreError;
pub use iri::{Iri, IriError};
pub use memory::InMemoryGraphStore;
pub use models::{
    Attribute, ClassAttributes, ClassNode, Ontology, OntologyMetadata, Submission,
    SubmissionKey, SubmissionMetadata, SubmissionStatus, CLASS_ATTRIBUTES,
};
pub use snapshot::{ClassRecord, GraphSnapshot, OntologyRecord, SubmissionRecord};
pub use surreal::SurrealGraphStore;

use std::collections::HashMap;

use async_trait::async_trait;

/// Read-only access to the versioned class graph.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Look up an ontology by acronym. The result may not be loaded yet.
    async fn find_ontology(&self, acronym: &str) -> Result<Option<Ontology>, StoreError>;

    /// Materialize ontology metadata. Must be idempotent.
    async fn load_ontology(&self, ontology: &mut Ontology) -> Result<(), StoreError>;

    /// Materialize submission metadata. Must be idempotent.
    async fn load_submission(&self, submission: &mut Submission) -> Result<(), StoreError>;

    /// All submissions of an ontology, newest first.
    async fn submissions(&self, ontology: &Ontology) -> Result<Vec<Submission>, StoreError>;

    /// The parsed submission with the greatest id.
    async fn latest_submission(&self, ontology: &Ontology)
        -> Result<Option<Submission>, StoreError>;

    /// A specific submission regardless of status.
    async fn submission_by_id(
        &self,
        ontology: &Ontology,
        submission_id: u32,
    ) -> Result<Option<Submission>, StoreError>;

    /// Raw source document of a submission, if one was stored.
    async fn submission_document(
        &self,
        submission: &SubmissionKey,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// Find a class and fetch the requested attributes in the same call.
    async fn find_class(
        &self,
        submission: &SubmissionKey,
        iri: &Iri,
        attrs: &[Attribute],
    ) -> Result<Option<ClassNode>, StoreError>;

    /// Number of classes in a submission.
    async fn class_count(&self, submission: &SubmissionKey) -> Result<usize, StoreError>;

    /// A window over all classes of a submission, in a stable order.
    ///
    /// An empty `attrs` selection yields structural nodes.
    async fn classes(
        &self,
        submission: &SubmissionKey,
        offset: usize,
        limit: usize,
        attrs: &[Attribute],
    ) -> Result<Vec<ClassNode>, StoreError>;

    /// Classes without parents.
    async fn roots(&self, submission: &SubmissionKey) -> Result<Vec<ClassNode>, StoreError>;

    /// Direct parents of a class.
    async fn parents(&self, node: &ClassNode) -> Result<Vec<ClassNode>, StoreError>;

    /// Direct children of a class.
    async fn children(&self, node: &ClassNode) -> Result<Vec<ClassNode>, StoreError>;

    /// Fetch attributes for many classes in one round trip.
    async fn batch_load_attributes(
        &self,
        submission: &SubmissionKey,
        iris: &[Iri],
        attrs: &[Attribute],
    ) -> Result<HashMap<Iri, ClassAttributes>, StoreError>;
}

/// Canonical ontology identifier under `prefix`.
pub fn ontology_iri(prefix: &str, acronym: &str) -> String {
    format!("{}/ontologies/{}", prefix.trim_end_matches('/'), acronym)
}

/// Canonical submission identifier under `prefix`.
pub fn submission_iri(prefix: &str, acronym: &str, submission_id: u32) -> String {
    format!("{}/submissions/{}", ontology_iri(prefix, acronym), submission_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_scheme() {
        assert_eq!(
            ontology_iri("http://data.example.org/", "GO"),
            "http://data.example.org/ontologies/GO"
        );
        assert_eq!(
            submission_iri("http://data.example.org", "GO", 4),
            "http://data.example.org/ontologies/GO/submissions/4"
        );
    }
}
