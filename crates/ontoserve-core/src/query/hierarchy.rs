//! Hierarchy traversal over a submission's class graph.
//!
//! Class graphs are not trees: a class may have several parents and cycles
//! occur in real ontologies. Every closure and path computation here tracks
//! visited IRIs, so traversal always terminates.
//!
//! Nodes returned by the navigator are structural only. Callers hydrate the
//! final response set with [`super::AttributePrefetcher`].

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::debug;

use crate::error::QueryError;
use crate::graph::{ClassNode, GraphStore, Iri, SubmissionKey};

use super::pagination::PageSource;

/// Roots, parents, children and their closures.
pub struct HierarchyNavigator<'a> {
    store: &'a dyn GraphStore,
}

impl<'a> HierarchyNavigator<'a> {
    pub fn new(store: &'a dyn GraphStore) -> Self {
        Self { store }
    }

    /// Classes without parents.
    pub async fn roots(&self, submission: &SubmissionKey) -> Result<Vec<ClassNode>, QueryError> {
        Ok(self.store.roots(submission).await?)
    }

    /// Direct parents; empty for a root.
    pub async fn parents(&self, node: &ClassNode) -> Result<Vec<ClassNode>, QueryError> {
        Ok(self.store.parents(node).await?)
    }

    /// Direct children; empty for a leaf.
    pub async fn children(&self, node: &ClassNode) -> Result<Vec<ClassNode>, QueryError> {
        Ok(self.store.children(node).await?)
    }

    /// Transitive parents in breadth-first order, without duplicates.
    ///
    /// Parent lookups for one level are issued concurrently; results are
    /// merged in frontier order so the output is deterministic. The start
    /// node is never reported as its own ancestor.
    pub async fn ancestors(&self, node: &ClassNode) -> Result<Vec<ClassNode>, QueryError> {
        let mut visited: HashSet<Iri> = HashSet::from([node.iri.clone()]);
        let mut ancestors = Vec::new();
        let mut frontier = vec![node.clone()];

        while !frontier.is_empty() {
            let levels =
                try_join_all(frontier.iter().map(|current| self.store.parents(current))).await?;

            let mut next = Vec::new();
            for parent in levels.into_iter().flatten() {
                if visited.insert(parent.iri.clone()) {
                    ancestors.push(parent.clone());
                    next.push(parent);
                }
            }
            frontier = next;
        }

        debug!(class = %node.iri, count = ancestors.len(), "computed ancestors");
        Ok(ancestors)
    }

    /// Lazily expanded descendant closure, suitable for pagination.
    pub fn descendants(&self, node: &ClassNode) -> DescendantWalk<'a> {
        DescendantWalk::new(self.store, node)
    }

    /// Every simple path from `node` up to a root.
    ///
    /// Each path starts with `node` and ends with a root. When following a
    /// parent would revisit a class already on the path, that path ends at
    /// its current last class instead.
    pub async fn paths_to_root(&self, node: &ClassNode) -> Result<Vec<Vec<ClassNode>>, QueryError> {
        let mut parents_of: HashMap<Iri, Vec<ClassNode>> = HashMap::new();
        let mut paths = Vec::new();
        let mut stack: Vec<Vec<ClassNode>> = vec![vec![node.clone()]];

        while let Some(path) = stack.pop() {
            let Some(last) = path.last() else {
                continue;
            };

            if !parents_of.contains_key(&last.iri) {
                let parents = self.store.parents(last).await?;
                parents_of.insert(last.iri.clone(), parents);
            }
            let parents = parents_of.get(&last.iri).cloned().unwrap_or_default();

            if parents.is_empty() {
                paths.push(path);
                continue;
            }

            let mut cycle = false;
            let mut branches = Vec::with_capacity(parents.len());
            for parent in parents {
                if path.iter().any(|step| step.iri == parent.iri) {
                    cycle = true;
                    continue;
                }
                let mut extended = path.clone();
                extended.push(parent);
                branches.push(extended);
            }

            if cycle {
                paths.push(path);
            }
            // First declared parent is explored first
            stack.extend(branches.into_iter().rev());
        }

        debug!(class = %node.iri, paths = paths.len(), "computed paths to root");
        Ok(paths)
    }
}

/// Breadth-first descendant traversal that expands only as far as requested.
///
/// Descendant sets can cover whole subtrees, so the walk is driven by the
/// windows the pagination engine asks for. The start node is excluded.
pub struct DescendantWalk<'a> {
    store: &'a dyn GraphStore,
    pending: VecDeque<ClassNode>,
    visited: HashSet<Iri>,
    found: Vec<ClassNode>,
}

impl<'a> DescendantWalk<'a> {
    fn new(store: &'a dyn GraphStore, start: &ClassNode) -> Self {
        Self {
            store,
            pending: VecDeque::from([start.clone()]),
            visited: HashSet::from([start.iri.clone()]),
            found: Vec::new(),
        }
    }

    /// Expand until at least `wanted` descendants are known or none remain.
    async fn expand_to(&mut self, wanted: usize) -> Result<(), QueryError> {
        while self.found.len() < wanted {
            let Some(current) = self.pending.pop_front() else {
                break;
            };
            for child in self.store.children(&current).await? {
                if self.visited.insert(child.iri.clone()) {
                    self.pending.push_back(child.clone());
                    self.found.push(child);
                }
            }
        }
        Ok(())
    }

    /// Run the walk to completion.
    pub async fn collect_all(mut self) -> Result<Vec<ClassNode>, QueryError> {
        self.expand_to(usize::MAX).await?;
        Ok(self.found)
    }
}

#[async_trait]
impl<'a> PageSource for DescendantWalk<'a> {
    type Item = ClassNode;

    async fn window(&mut self, offset: usize, limit: usize) -> Result<Vec<ClassNode>, QueryError> {
        self.expand_to(offset.saturating_add(limit)).await?;
        Ok(self.found.iter().skip(offset).take(limit).cloned().collect())
    }
}
