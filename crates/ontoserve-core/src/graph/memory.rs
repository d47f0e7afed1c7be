//! In-process graph store backed by a [`GraphSnapshot`].

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::StoreError;
use super::iri::Iri;
use super::models::{
    Attribute, ClassAttributes, ClassNode, Ontology, OntologyMetadata, Submission,
    SubmissionKey, SubmissionMetadata,
};
use super::snapshot::GraphSnapshot;
use super::{ontology_iri, submission_iri, GraphStore};

struct ClassEntry {
    attributes: ClassAttributes,
    parents: Vec<Iri>,
}

struct SubmissionEntry {
    submission: Submission,
    metadata: SubmissionMetadata,
    document: Option<String>,
    /// Classes in snapshot order.
    order: Vec<Iri>,
    classes: HashMap<Iri, ClassEntry>,
    children: HashMap<Iri, Vec<Iri>>,
}

struct OntologyEntry {
    ontology: Ontology,
    metadata: OntologyMetadata,
    submissions: BTreeMap<u32, SubmissionEntry>,
}

/// Graph store holding a whole snapshot in memory.
///
/// Counts batched attribute requests and lazy loads so callers can observe
/// round trips.
pub struct InMemoryGraphStore {
    ontologies: BTreeMap<String, OntologyEntry>,
    batch_requests: AtomicUsize,
    metadata_loads: AtomicUsize,
}

impl InMemoryGraphStore {
    /// Build a store from a snapshot, deriving identifiers under `iri_prefix`.
    pub fn from_snapshot(snapshot: GraphSnapshot, iri_prefix: &str) -> Self {
        let mut ontologies = BTreeMap::new();

        for record in snapshot.ontologies {
            let mut submissions = BTreeMap::new();
            for sub in record.submissions {
                let key = SubmissionKey::new(&record.acronym, sub.id);
                let mut order = Vec::with_capacity(sub.classes.len());
                let mut classes = HashMap::with_capacity(sub.classes.len());
                let mut children: HashMap<Iri, Vec<Iri>> = HashMap::new();

                for class in sub.classes {
                    let attributes = class.attributes();
                    for parent in &class.parents {
                        children
                            .entry(parent.clone())
                            .or_default()
                            .push(class.id.clone());
                    }
                    order.push(class.id.clone());
                    classes.insert(
                        class.id,
                        ClassEntry {
                            attributes,
                            parents: class.parents,
                        },
                    );
                }

                submissions.insert(
                    sub.id,
                    SubmissionEntry {
                        submission: Submission {
                            iri: submission_iri(iri_prefix, &record.acronym, sub.id),
                            key,
                            status: sub.status,
                            metadata: None,
                        },
                        metadata: SubmissionMetadata {
                            version: sub.version,
                            created: sub.created,
                            description: sub.description,
                        },
                        document: sub.document,
                        order,
                        classes,
                        children,
                    },
                );
            }

            ontologies.insert(
                record.acronym.clone(),
                OntologyEntry {
                    ontology: Ontology::new(
                        &record.acronym,
                        ontology_iri(iri_prefix, &record.acronym),
                    ),
                    metadata: OntologyMetadata {
                        name: record.name,
                        description: record.description,
                    },
                    submissions,
                },
            );
        }

        Self {
            ontologies,
            batch_requests: AtomicUsize::new(0),
            metadata_loads: AtomicUsize::new(0),
        }
    }

    /// Number of `batch_load_attributes` calls served so far.
    pub fn batch_requests(&self) -> usize {
        self.batch_requests.load(Ordering::SeqCst)
    }

    /// Number of lazy metadata materializations performed so far.
    pub fn metadata_loads(&self) -> usize {
        self.metadata_loads.load(Ordering::SeqCst)
    }

    fn submission_entry(&self, key: &SubmissionKey) -> Option<&SubmissionEntry> {
        self.ontologies
            .get(&key.acronym)
            .and_then(|o| o.submissions.get(&key.submission_id))
    }

    fn known(&self, key: &SubmissionKey, iris: &[Iri]) -> Vec<ClassNode> {
        let Some(entry) = self.submission_entry(key) else {
            return Vec::new();
        };
        iris.iter()
            .filter(|iri| entry.classes.contains_key(*iri))
            .map(|iri| ClassNode::bare(iri.clone(), key.clone()))
            .collect()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn find_ontology(&self, acronym: &str) -> Result<Option<Ontology>, StoreError> {
        Ok(self.ontologies.get(acronym).map(|e| e.ontology.clone()))
    }

    async fn load_ontology(&self, ontology: &mut Ontology) -> Result<(), StoreError> {
        if ontology.is_loaded() {
            return Ok(());
        }
        if let Some(entry) = self.ontologies.get(&ontology.acronym) {
            self.metadata_loads.fetch_add(1, Ordering::SeqCst);
            ontology.metadata = Some(entry.metadata.clone());
        }
        Ok(())
    }

    async fn load_submission(&self, submission: &mut Submission) -> Result<(), StoreError> {
        if submission.is_loaded() {
            return Ok(());
        }
        if let Some(entry) = self.submission_entry(&submission.key) {
            self.metadata_loads.fetch_add(1, Ordering::SeqCst);
            submission.metadata = Some(entry.metadata.clone());
        }
        Ok(())
    }

    async fn submissions(&self, ontology: &Ontology) -> Result<Vec<Submission>, StoreError> {
        Ok(self
            .ontologies
            .get(&ontology.acronym)
            .map(|e| {
                e.submissions
                    .values()
                    .rev()
                    .map(|s| s.submission.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn latest_submission(
        &self,
        ontology: &Ontology,
    ) -> Result<Option<Submission>, StoreError> {
        Ok(self.ontologies.get(&ontology.acronym).and_then(|e| {
            e.submissions
                .values()
                .rev()
                .find(|s| s.submission.status.is_parsed())
                .map(|s| s.submission.clone())
        }))
    }

    async fn submission_by_id(
        &self,
        ontology: &Ontology,
        submission_id: u32,
    ) -> Result<Option<Submission>, StoreError> {
        Ok(self
            .ontologies
            .get(&ontology.acronym)
            .and_then(|e| e.submissions.get(&submission_id))
            .map(|s| s.submission.clone()))
    }

    async fn submission_document(
        &self,
        submission: &SubmissionKey,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .submission_entry(submission)
            .and_then(|e| e.document.as_ref())
            .map(|d| d.as_bytes().to_vec()))
    }

    async fn find_class(
        &self,
        submission: &SubmissionKey,
        iri: &Iri,
        attrs: &[Attribute],
    ) -> Result<Option<ClassNode>, StoreError> {
        Ok(self
            .submission_entry(submission)
            .and_then(|e| e.classes.get(iri))
            .map(|class| {
                ClassNode::fetched(iri.clone(), submission.clone(), class.attributes.clone(), attrs)
            }))
    }

    async fn class_count(&self, submission: &SubmissionKey) -> Result<usize, StoreError> {
        Ok(self
            .submission_entry(submission)
            .map(|e| e.order.len())
            .unwrap_or(0))
    }

    async fn classes(
        &self,
        submission: &SubmissionKey,
        offset: usize,
        limit: usize,
        attrs: &[Attribute],
    ) -> Result<Vec<ClassNode>, StoreError> {
        let Some(entry) = self.submission_entry(submission) else {
            return Ok(Vec::new());
        };
        Ok(entry
            .order
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|iri| {
                entry.classes.get(iri).map(|class| {
                    ClassNode::fetched(iri.clone(), submission.clone(), class.attributes.clone(), attrs)
                })
            })
            .collect())
    }

    async fn roots(&self, submission: &SubmissionKey) -> Result<Vec<ClassNode>, StoreError> {
        let Some(entry) = self.submission_entry(submission) else {
            return Ok(Vec::new());
        };
        Ok(entry
            .order
            .iter()
            .filter(|iri| {
                entry
                    .classes
                    .get(*iri)
                    .is_some_and(|class| class.parents.is_empty())
            })
            .map(|iri| ClassNode::bare(iri.clone(), submission.clone()))
            .collect())
    }

    async fn parents(&self, node: &ClassNode) -> Result<Vec<ClassNode>, StoreError> {
        let parents = self
            .submission_entry(&node.submission)
            .and_then(|e| e.classes.get(&node.iri))
            .map(|class| class.parents.clone())
            .unwrap_or_default();
        Ok(self.known(&node.submission, &parents))
    }

    async fn children(&self, node: &ClassNode) -> Result<Vec<ClassNode>, StoreError> {
        let children = self
            .submission_entry(&node.submission)
            .and_then(|e| e.children.get(&node.iri))
            .cloned()
            .unwrap_or_default();
        Ok(self.known(&node.submission, &children))
    }

    async fn batch_load_attributes(
        &self,
        submission: &SubmissionKey,
        iris: &[Iri],
        attrs: &[Attribute],
    ) -> Result<HashMap<Iri, ClassAttributes>, StoreError> {
        self.batch_requests.fetch_add(1, Ordering::SeqCst);
        let Some(entry) = self.submission_entry(submission) else {
            return Ok(HashMap::new());
        };
        Ok(iris
            .iter()
            .filter_map(|iri| {
                entry
                    .classes
                    .get(iri)
                    .map(|class| (iri.clone(), class.attributes.clone().select(attrs)))
            })
            .collect())
    }
}
