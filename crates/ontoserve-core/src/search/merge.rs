//! Turns raw index documents into a ranked, paginated hit list.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::query::{Page, PageRequest};
use crate::settings::RuntimeSettings;

use super::{IndexResponse, RawHit};

const SUBMISSION_SUFFIX_PATTERN: &str = r"/submissions/.*$";
const SUBMISSION_SEGMENT: &str = "/submissions/";

/// A search result after merging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(rename = "@id")]
    pub id: String,
    /// Ontology identifier derived from the indexed submission identifier.
    pub ontology: String,
    #[serde(rename = "submissionAcronym")]
    pub acronym: String,
    pub submission: String,
    pub score: f64,
    #[serde(rename = "ontologyRank")]
    pub ontology_rank: i64,
    #[serde(rename = "prefLabel", skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    #[serde(rename = "synonym")]
    pub synonyms: Vec<String>,
    #[serde(rename = "definition")]
    pub definitions: Vec<String>,
}

/// Strip the `/submissions/...` suffix from an indexed submission identifier.
///
/// Identifiers without that suffix are already ontology identifiers and come
/// back unchanged. Returns `None` for blank input.
pub fn derive_ontology_id(submission_id: &str) -> Option<String> {
    let submission_id = submission_id.trim();
    if submission_id.is_empty() {
        return None;
    }

    static SUFFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let stripped = match SUFFIX.get_or_init(|| Regex::new(SUBMISSION_SUFFIX_PATTERN).ok()) {
        Some(re) => re.replace(submission_id, "").into_owned(),
        None => match submission_id.find(SUBMISSION_SEGMENT) {
            Some(at) => submission_id[..at].to_string(),
            None => submission_id.to_string(),
        },
    };

    (!stripped.is_empty()).then_some(stripped)
}

/// Merges index documents using one snapshot of the runtime settings.
pub struct SearchMerger<'a> {
    settings: &'a RuntimeSettings,
}

impl<'a> SearchMerger<'a> {
    pub fn new(settings: &'a RuntimeSettings) -> Self {
        Self { settings }
    }

    /// Convert and order hits: score descending, then ontology rank
    /// descending. Equal keys keep index order.
    pub fn merge(&self, docs: Vec<RawHit>) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = docs
            .into_iter()
            .filter_map(|doc| self.convert(doc))
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.ontology_rank.cmp(&a.ontology_rank))
        });
        hits
    }

    /// Merge a whole index response and take one page of it.
    ///
    /// `count` is the index's own total, which may include hits dropped here.
    pub fn page(&self, response: IndexResponse, request: PageRequest) -> Page<SearchHit> {
        let total = response.num_found;
        let returned = response.docs.len();
        let hits = self.merge(response.docs);
        debug!(total, returned, kept = hits.len(), "merged search hits");
        Page::from_slice(&hits, request, total)
    }

    fn convert(&self, doc: RawHit) -> Option<SearchHit> {
        let Some(id) = doc.resource_id.filter(|id| !id.trim().is_empty()) else {
            warn!(ontology_id = ?doc.ontology_id, "dropping search hit without a resource id");
            return None;
        };

        let submission = doc.ontology_id.into_iter().next();
        let Some(ontology) = submission.as_deref().and_then(derive_ontology_id) else {
            warn!(resource_id = %id, "dropping search hit without an ontology id");
            return None;
        };

        let acronym = doc
            .submission_acronym
            .filter(|acronym| !acronym.is_empty())
            .or_else(|| ontology.rsplit('/').next().map(str::to_string))
            .unwrap_or_default();

        Some(SearchHit {
            ontology_rank: self.settings.ontology_rank(&acronym),
            submission: submission.unwrap_or_default(),
            id,
            ontology,
            acronym,
            score: doc.score,
            pref_label: doc.pref_label.into_iter().next(),
            synonyms: doc.synonym,
            definitions: doc.definition,
        })
    }
}
