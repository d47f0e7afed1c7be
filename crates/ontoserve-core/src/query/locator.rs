//! Resolves a raw class identifier to a node of a resolved submission.

use crate::error::QueryError;
use crate::graph::{ClassNode, GraphStore, Iri, CLASS_ATTRIBUTES};

use super::context::ResolvedContext;

/// Finds single classes, fetching display attributes in the same call.
pub struct NodeLocator<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> NodeLocator<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    pub async fn locate(
        &self,
        context: &mut ResolvedContext,
        raw_id: &str,
    ) -> Result<ClassNode, QueryError> {
        let iri = Iri::parse(raw_id).map_err(|_| {
            QueryError::bad_request(format!(
                "The input class id '{}' is not a valid IRI",
                raw_id
            ))
        })?;

        let found = self
            .store
            .find_class(&context.submission.key, &iri, CLASS_ATTRIBUTES)
            .await?;

        match found {
            Some(node) => Ok(node),
            None => {
                // Report against the loaded ontology state
                if !context.ontology.is_loaded() {
                    self.store.load_ontology(&mut context.ontology).await?;
                }
                Err(QueryError::not_found(format!(
                    "Resource '{}' not found in ontology {} submission {}",
                    raw_id,
                    context.ontology.acronym,
                    context.submission.id()
                )))
            }
        }
    }
}
