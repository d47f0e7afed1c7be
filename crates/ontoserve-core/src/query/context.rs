//! Maps a request's ontology/submission reference to a loaded submission.

use tracing::debug;

use crate::error::QueryError;
use crate::graph::{GraphStore, Ontology, Submission};

/// An ontology and one of its submissions, both with metadata loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    pub ontology: Ontology,
    pub submission: Submission,
}

/// Resolves `(ontology, submission id?)` pairs against a [`GraphStore`].
pub struct ContextResolver<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> ContextResolver<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    /// Resolve a context whose class graph can be queried.
    ///
    /// Without a pinned submission id, the latest parsed submission is used.
    pub async fn resolve(
        &self,
        acronym: &str,
        submission_id: Option<&str>,
    ) -> Result<ResolvedContext, QueryError> {
        let context = self.resolve_any(acronym, submission_id).await?;

        if !context.submission.status.is_parsed() {
            return Err(QueryError::bad_request(format!(
                "Ontology {} submission {} has not been parsed.",
                acronym,
                context.submission.id()
            )));
        }

        Ok(context)
    }

    /// Resolve a context without requiring the submission to be parsed.
    pub async fn resolve_any(
        &self,
        acronym: &str,
        submission_id: Option<&str>,
    ) -> Result<ResolvedContext, QueryError> {
        let mut ontology = self.find_ontology(acronym).await?;

        let submission = match submission_id {
            Some(raw) => {
                let id = parse_submission_id(raw)?;
                self.store
                    .submission_by_id(&ontology, id)
                    .await?
                    .ok_or_else(|| {
                        QueryError::bad_request(format!(
                            "You must provide an existing submission ID for the {} ontology. \
                             Submission {} does not exist.",
                            acronym, id
                        ))
                    })?
            }
            None => self
                .store
                .latest_submission(&ontology)
                .await?
                .ok_or_else(|| {
                    QueryError::bad_request(format!(
                        "Ontology {} submission not found.",
                        acronym
                    ))
                })?,
        };

        let mut submission = submission;
        self.store.load_submission(&mut submission).await?;
        if !ontology.is_loaded() {
            self.store.load_ontology(&mut ontology).await?;
        }

        debug!(
            ontology = %ontology.acronym,
            submission = submission.id(),
            status = submission.status.as_str(),
            "resolved request context"
        );

        Ok(ResolvedContext {
            ontology,
            submission,
        })
    }

    /// Look up an ontology and load its metadata.
    pub async fn find_ontology(&self, acronym: &str) -> Result<Ontology, QueryError> {
        let mut ontology = self
            .store
            .find_ontology(acronym)
            .await?
            .ok_or_else(|| QueryError::not_found(format!("Ontology {} not found.", acronym)))?;
        self.store.load_ontology(&mut ontology).await?;
        Ok(ontology)
    }
}

fn parse_submission_id(raw: &str) -> Result<u32, QueryError> {
    raw.trim().parse::<u32>().map_err(|_| {
        QueryError::bad_request(format!(
            "Submission id must be a positive integer. Submission id in request is '{}'.",
            raw
        ))
    })
}
