//! Batched hydration of class display attributes.
//!
//! Nodes reached through structural relations carry no attributes. Before a
//! response is serialized, [`AttributePrefetcher::hydrate`] fills them in with
//! one store request per submission, skipping nodes that are already hydrated.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::QueryError;
use crate::graph::{ClassNode, GraphStore, Iri, SubmissionKey, CLASS_ATTRIBUTES};

pub struct AttributePrefetcher<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> AttributePrefetcher<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    /// Make sure every node carries label, synonyms and definitions.
    ///
    /// Returns the number of store requests issued.
    pub async fn hydrate<'n, I>(&self, nodes: I) -> Result<usize, QueryError>
    where
        I: IntoIterator<Item = &'n mut ClassNode>,
    {
        let mut pending: Vec<&'n mut ClassNode> =
            nodes.into_iter().filter(|n| !n.is_hydrated()).collect();
        if pending.is_empty() {
            return Ok(0);
        }

        // Requests are per submission; a response normally spans one
        let mut wanted: BTreeMap<SubmissionKey, Vec<Iri>> = BTreeMap::new();
        let mut seen: HashSet<(SubmissionKey, Iri)> = HashSet::new();
        for node in &pending {
            if seen.insert((node.submission.clone(), node.iri.clone())) {
                wanted
                    .entry(node.submission.clone())
                    .or_default()
                    .push(node.iri.clone());
            }
        }

        let mut requests = 0;
        for (submission, iris) in wanted {
            let fetched = self
                .store
                .batch_load_attributes(&submission, &iris, CLASS_ATTRIBUTES)
                .await?;
            requests += 1;
            debug!(submission = %submission, nodes = iris.len(), "prefetched class attributes");

            for node in pending.iter_mut().filter(|n| n.submission == submission) {
                node.attributes = Some(fetched.get(&node.iri).cloned().unwrap_or_default());
            }
        }

        Ok(requests)
    }
}
