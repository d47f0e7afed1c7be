//! Request-level operations composed from the query building blocks.
//!
//! Every class operation follows the same sequence: resolve the submission,
//! locate the class, navigate, paginate, then hydrate exactly the nodes that
//! will be returned.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{Config, PaginationConfig, RankingConfig, SearchConfig};
use crate::error::QueryError;
use crate::graph::{
    ClassNode, GraphSnapshot, GraphStore, InMemoryGraphStore, StoreError, Submission,
    SubmissionKey, SurrealGraphStore,
};
use crate::query::{
    paginate, AttributePrefetcher, ContextResolver, HierarchyNavigator, NodeLocator, Page,
    PageRequest, PageSource, VecSource,
};
use crate::search::{
    InMemorySearchIndex, QueryBuilder, SearchHit, SearchIndex, SearchMerger, SolrSearchIndex,
};
use crate::settings::{RuntimeSettings, SettingsHandle};

/// Raw source of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDocument {
    pub submission: SubmissionKey,
    pub content: Vec<u8>,
}

/// Read-only browsing over a graph store and a search index.
#[derive(Clone)]
pub struct OntologyBrowser {
    store: Arc<dyn GraphStore>,
    index: Arc<dyn SearchIndex>,
    settings: SettingsHandle,
    pagination: PaginationConfig,
    search: SearchConfig,
}

impl OntologyBrowser {
    pub fn new(
        store: Arc<dyn GraphStore>,
        index: Arc<dyn SearchIndex>,
        settings: SettingsHandle,
        config: &Config,
    ) -> Self {
        Self {
            store,
            index,
            settings,
            pagination: config.pagination,
            search: config.search.clone(),
        }
    }

    /// Build the configured store and index backends.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let snapshot = match &config.store.seed_path {
            Some(path) => GraphSnapshot::from_file(path)?,
            None => GraphSnapshot::default(),
        };
        let prefix = config.store.iri_prefix.as_str();

        let index: Arc<dyn SearchIndex> = match config.search.backend.as_str() {
            "solr" => Arc::new(SolrSearchIndex::new(&config.search.solr_url)),
            _ => Arc::new(InMemorySearchIndex::from_snapshot(&snapshot, prefix)),
        };

        let store: Arc<dyn GraphStore> = match config.store.backend.as_str() {
            "surreal" => {
                let store = SurrealGraphStore::open(Path::new(&config.store.db_path), prefix).await?;
                store.initialize_schema().await?;
                if !snapshot.ontologies.is_empty() {
                    let imported = store.import_snapshot(&snapshot).await?;
                    info!(classes = imported, "imported seed snapshot");
                }
                Arc::new(store)
            }
            _ => Arc::new(InMemoryGraphStore::from_snapshot(snapshot, prefix)),
        };

        info!(
            store = %config.store.backend,
            search = %config.search.backend,
            "ontology browser ready"
        );

        let settings = SettingsHandle::new(RuntimeSettings::from(&config.ranking));
        Ok(Self::new(store, index, settings, config))
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    /// Validate raw pagination parameters against the configured limits.
    pub fn page_request(
        &self,
        page: Option<&str>,
        size: Option<&str>,
    ) -> Result<PageRequest, QueryError> {
        PageRequest::from_params(page, size, &self.pagination)
    }

    /// All classes of a submission, in store order.
    pub async fn list_classes(
        &self,
        acronym: &str,
        submission: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<ClassNode>, QueryError> {
        let context = self.resolver().resolve(acronym, submission).await?;
        let key = context.submission.key;
        let count = self.store.class_count(&key).await?;

        let mut source = SubmissionClasses {
            store: self.store.as_ref(),
            submission: key,
        };
        let mut page = paginate(&mut source, request, count).await?;
        self.hydrate(page.items.iter_mut()).await?;
        Ok(page)
    }

    pub async fn roots(
        &self,
        acronym: &str,
        submission: Option<&str>,
    ) -> Result<Vec<ClassNode>, QueryError> {
        let context = self.resolver().resolve(acronym, submission).await?;
        let mut roots = self.navigator().roots(&context.submission.key).await?;
        self.hydrate(roots.iter_mut()).await?;
        Ok(roots)
    }

    pub async fn class(
        &self,
        acronym: &str,
        submission: Option<&str>,
        class_id: &str,
    ) -> Result<ClassNode, QueryError> {
        let mut node = self.locate(acronym, submission, class_id).await?;
        self.hydrate(std::iter::once(&mut node)).await?;
        Ok(node)
    }

    /// Every path from the class up to a root.
    pub async fn tree(
        &self,
        acronym: &str,
        submission: Option<&str>,
        class_id: &str,
    ) -> Result<Vec<Vec<ClassNode>>, QueryError> {
        let node = self.locate(acronym, submission, class_id).await?;
        let mut paths = self.navigator().paths_to_root(&node).await?;
        self.hydrate(paths.iter_mut().flatten()).await?;
        Ok(paths)
    }

    pub async fn ancestors(
        &self,
        acronym: &str,
        submission: Option<&str>,
        class_id: &str,
    ) -> Result<Vec<ClassNode>, QueryError> {
        let node = self.locate(acronym, submission, class_id).await?;
        let mut ancestors = self.navigator().ancestors(&node).await?;
        self.hydrate(ancestors.iter_mut()).await?;
        Ok(ancestors)
    }

    /// Paginated descendant closure.
    ///
    /// `count` is the number of direct children, not the closure size. Clients
    /// depend on this.
    pub async fn descendants(
        &self,
        acronym: &str,
        submission: Option<&str>,
        class_id: &str,
        request: PageRequest,
    ) -> Result<Page<ClassNode>, QueryError> {
        let node = self.locate(acronym, submission, class_id).await?;
        let navigator = self.navigator();
        let count = navigator.children(&node).await?.len();

        let mut walk = navigator.descendants(&node);
        let mut page = paginate(&mut walk, request, count).await?;
        self.hydrate(page.items.iter_mut()).await?;
        Ok(page)
    }

    pub async fn children(
        &self,
        acronym: &str,
        submission: Option<&str>,
        class_id: &str,
        request: PageRequest,
    ) -> Result<Page<ClassNode>, QueryError> {
        let node = self.locate(acronym, submission, class_id).await?;
        let children = self.navigator().children(&node).await?;
        let count = children.len();

        let mut page = paginate(&mut VecSource(children), request, count).await?;
        self.hydrate(page.items.iter_mut()).await?;
        Ok(page)
    }

    pub async fn parents(
        &self,
        acronym: &str,
        submission: Option<&str>,
        class_id: &str,
    ) -> Result<Vec<ClassNode>, QueryError> {
        let node = self.locate(acronym, submission, class_id).await?;
        let mut parents = self.navigator().parents(&node).await?;
        self.hydrate(parents.iter_mut()).await?;
        Ok(parents)
    }

    /// Full-text search. `page` and `size` are read from `params`; every
    /// other parameter except `q` is passed to the index.
    ///
    /// At most `search.max_hits` documents are fetched per query. Pages past
    /// that cap are empty while `count` still reports the index total.
    pub async fn search(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<Page<SearchHit>, QueryError> {
        let request = self.page_request(
            params.get("page").map(String::as_str),
            params.get("size").map(String::as_str),
        )?;
        let query = QueryBuilder::new(&self.search).build(params)?;
        let settings = self.settings.snapshot();

        let response = self.index.search(&query).await?;
        debug!(q = %query.text, found = response.num_found, "search index answered");

        Ok(SearchMerger::new(&settings).page(response, request))
    }

    /// Submissions of an ontology, newest first, with metadata loaded.
    pub async fn submissions(&self, acronym: &str) -> Result<Vec<Submission>, QueryError> {
        let ontology = self.resolver().find_ontology(acronym).await?;
        let mut submissions = self.store.submissions(&ontology).await?;
        for submission in submissions.iter_mut() {
            self.store.load_submission(submission).await?;
        }
        Ok(submissions)
    }

    /// Raw document of a submission, the latest parsed one unless pinned.
    pub async fn download(
        &self,
        acronym: &str,
        submission: Option<&str>,
    ) -> Result<SubmissionDocument, QueryError> {
        let ontology = self.resolver().find_ontology(acronym).await?;
        if self.settings.snapshot().is_download_restricted(&ontology.acronym) {
            return Err(QueryError::forbidden(format!(
                "License restrictions on download for {}",
                ontology.acronym
            )));
        }

        let context = self.resolver().resolve_any(acronym, submission).await?;
        let key = context.submission.key;
        let content = self
            .store
            .submission_document(&key)
            .await?
            .ok_or_else(|| QueryError::not_found(format!("No document available for {}", key)))?;

        Ok(SubmissionDocument {
            submission: key,
            content,
        })
    }

    /// Swap in a new rank table and download restriction list.
    pub fn reload_settings(&self, ranking: &RankingConfig) {
        self.settings.replace(RuntimeSettings::from(ranking));
        info!(
            ranked = ranking.ontology_rank.len(),
            restricted = ranking.restrict_download.len(),
            "runtime settings reloaded"
        );
    }

    fn resolver(&self) -> ContextResolver<'_> {
        ContextResolver::new(self.store.as_ref())
    }

    fn navigator(&self) -> HierarchyNavigator<'_> {
        HierarchyNavigator::new(self.store.as_ref())
    }

    async fn locate(
        &self,
        acronym: &str,
        submission: Option<&str>,
        class_id: &str,
    ) -> Result<ClassNode, QueryError> {
        let mut context = self.resolver().resolve(acronym, submission).await?;
        NodeLocator::new(self.store.as_ref())
            .locate(&mut context, class_id)
            .await
    }

    async fn hydrate<'n, I>(&self, nodes: I) -> Result<(), QueryError>
    where
        I: IntoIterator<Item = &'n mut ClassNode>,
    {
        AttributePrefetcher::new(self.store.as_ref())
            .hydrate(nodes)
            .await
            .map(|_| ())
    }
}

/// Structural windows over all classes of one submission.
struct SubmissionClasses<'a> {
    store: &'a dyn GraphStore,
    submission: SubmissionKey,
}

#[async_trait]
impl<'a> PageSource for SubmissionClasses<'a> {
    type Item = ClassNode;

    async fn window(&mut self, offset: usize, limit: usize) -> Result<Vec<ClassNode>, QueryError> {
        Ok(self
            .store
            .classes(&self.submission, offset, limit, &[])
            .await?)
    }
}
