//! Read models handed out by a [`GraphStore`](super::GraphStore).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::iri::Iri;

// =============================================================================
// Ontologies and submissions
// =============================================================================

/// A named ontology. Metadata is materialized lazily by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ontology {
    /// Short identifier used in request paths (e.g. `GO`).
    pub acronym: String,
    /// Canonical ontology identifier.
    pub iri: String,
    /// Populated by `GraphStore::load_ontology`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OntologyMetadata>,
}

impl Ontology {
    pub fn new(acronym: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            acronym: acronym.into(),
            iri: iri.into(),
            metadata: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.metadata.is_some()
    }
}

/// Descriptive ontology attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Processing state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Uploaded,
    Parsed,
    Indexed,
    Error,
}

impl SubmissionStatus {
    /// Whether the class graph of the submission may be queried.
    pub fn is_parsed(self) -> bool {
        matches!(self, SubmissionStatus::Parsed | SubmissionStatus::Indexed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Uploaded => "uploaded",
            SubmissionStatus::Parsed => "parsed",
            SubmissionStatus::Indexed => "indexed",
            SubmissionStatus::Error => "error",
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(SubmissionStatus::Uploaded),
            "parsed" => Ok(SubmissionStatus::Parsed),
            "indexed" => Ok(SubmissionStatus::Indexed),
            "error" => Ok(SubmissionStatus::Error),
            other => Err(format!("unknown submission status '{}'", other)),
        }
    }
}

/// Identity of a submission: `(acronym, submission id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionKey {
    pub acronym: String,
    pub submission_id: u32,
}

impl SubmissionKey {
    pub fn new(acronym: impl Into<String>, submission_id: u32) -> Self {
        Self {
            acronym: acronym.into(),
            submission_id,
        }
    }
}

impl fmt::Display for SubmissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} submission {}", self.acronym, self.submission_id)
    }
}

/// One versioned snapshot of an ontology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub key: SubmissionKey,
    /// Canonical submission identifier (`<ontology iri>/submissions/<id>`).
    pub iri: String,
    pub status: SubmissionStatus,
    /// Populated by `GraphStore::load_submission`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SubmissionMetadata>,
}

impl Submission {
    pub fn id(&self) -> u32 {
        self.key.submission_id
    }

    pub fn is_loaded(&self) -> bool {
        self.metadata.is_some()
    }
}

/// Descriptive submission attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Classes
// =============================================================================

/// Attributes that can be requested together with a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    PrefLabel,
    Synonym,
    Definition,
}

/// The fixed attribute set every serialized class carries.
pub const CLASS_ATTRIBUTES: &[Attribute] = &[
    Attribute::PrefLabel,
    Attribute::Synonym,
    Attribute::Definition,
];

/// Display attributes of a class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassAttributes {
    pub pref_label: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<String>,
}

impl ClassAttributes {
    /// Keep only the requested attributes.
    pub fn select(mut self, attrs: &[Attribute]) -> Self {
        if !attrs.contains(&Attribute::PrefLabel) {
            self.pref_label = None;
        }
        if !attrs.contains(&Attribute::Synonym) {
            self.synonyms.clear();
        }
        if !attrs.contains(&Attribute::Definition) {
            self.definitions.clear();
        }
        self
    }
}

/// A vertex in a submission's class graph.
///
/// Nodes reached through structural relations carry no attributes until the
/// prefetcher hydrates them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub iri: Iri,
    pub submission: SubmissionKey,
    pub attributes: Option<ClassAttributes>,
}

impl ClassNode {
    /// A structural-only node without attributes.
    pub fn bare(iri: Iri, submission: SubmissionKey) -> Self {
        Self {
            iri,
            submission,
            attributes: None,
        }
    }

    /// A node carrying the `attrs` subset of `attributes`, or a bare node
    /// when nothing was requested.
    pub fn fetched(
        iri: Iri,
        submission: SubmissionKey,
        attributes: ClassAttributes,
        attrs: &[Attribute],
    ) -> Self {
        let node = Self::bare(iri, submission);
        if attrs.is_empty() {
            node
        } else {
            node.with_attributes(attributes.select(attrs))
        }
    }

    pub fn with_attributes(mut self, attributes: ClassAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn is_hydrated(&self) -> bool {
        self.attributes.is_some()
    }
}
