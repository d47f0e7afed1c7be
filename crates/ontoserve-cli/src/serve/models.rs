//! API request/response types (DTOs).
//!
//! These define the JSON shapes of the HTTP surface. Domain types from
//! `ontoserve_core` are converted here and never serialized directly.

use serde::{Deserialize, Serialize};

use ontoserve_core::graph::{ClassNode, Submission};
use ontoserve_core::{Page, SearchHit};

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters accepted by every class endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ClassParams {
    /// Pin a submission instead of using the latest parsed one.
    pub ontology_submission_id: Option<String>,
    /// Raw page number; validated by the service.
    pub page: Option<String>,
    /// Raw page size; validated by the service.
    pub size: Option<String>,
}

impl ClassParams {
    pub fn submission(&self) -> Option<&str> {
        self.ontology_submission_id.as_deref()
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }
}

// =============================================================================
// Classes
// =============================================================================

/// A class with its display attributes.
#[derive(Debug, Serialize)]
pub struct ClassDto {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "prefLabel")]
    pub pref_label: Option<String>,
    pub synonym: Vec<String>,
    pub definition: Vec<String>,
    pub ontology: String,
    #[serde(rename = "submissionId")]
    pub submission_id: u32,
}

impl From<ClassNode> for ClassDto {
    fn from(node: ClassNode) -> Self {
        let attributes = node.attributes.unwrap_or_default();
        Self {
            id: node.iri.into(),
            pref_label: attributes.pref_label,
            synonym: attributes.synonyms,
            definition: attributes.definitions,
            ontology: node.submission.acronym,
            submission_id: node.submission.submission_id,
        }
    }
}

pub fn classes(nodes: Vec<ClassNode>) -> Vec<ClassDto> {
    nodes.into_iter().map(ClassDto::from).collect()
}

/// Paginated class envelope.
#[derive(Debug, Serialize)]
pub struct ClassPage {
    pub classes: Vec<ClassDto>,
    pub page: usize,
    pub size: usize,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
}

impl From<Page<ClassNode>> for ClassPage {
    fn from(page: Page<ClassNode>) -> Self {
        let page = page.map(ClassDto::from);
        Self {
            classes: page.items,
            page: page.page,
            size: page.size,
            count: page.count,
            next: page.next,
        }
    }
}

// =============================================================================
// Search
// =============================================================================

/// Paginated search envelope.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub collection: Vec<SearchHit>,
    pub page: usize,
    pub size: usize,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
}

impl From<Page<SearchHit>> for SearchPage {
    fn from(page: Page<SearchHit>) -> Self {
        Self {
            collection: page.items,
            page: page.page,
            size: page.size,
            count: page.count,
            next: page.next,
        }
    }
}

// =============================================================================
// Submissions
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SubmissionDto {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "submissionId")]
    pub submission_id: u32,
    #[serde(rename = "submissionStatus")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "creationDate", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<Submission> for SubmissionDto {
    fn from(submission: Submission) -> Self {
        let metadata = submission.metadata.unwrap_or_default();
        Self {
            id: submission.iri,
            submission_id: submission.key.submission_id,
            status: submission.status.as_str().to_string(),
            version: metadata.version,
            creation_date: metadata.created.map(|c| c.to_rfc3339()),
            description: metadata.description,
        }
    }
}

// =============================================================================
// Misc
// =============================================================================

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<String>,
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// Summary of the settings installed by a reload.
#[derive(Debug, Serialize)]
pub struct ReloadSummary {
    pub ranked: usize,
    pub restricted: usize,
}
