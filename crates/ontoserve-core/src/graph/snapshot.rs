//! JSON snapshot format used to seed stores.
//!
//! ```json
//! {
//!   "ontologies": [{
//!     "acronym": "GO",
//!     "name": "Gene Ontology",
//!     "submissions": [{
//!       "id": 1,
//!       "status": "parsed",
//!       "classes": [
//!         { "id": "http://purl.obolibrary.org/obo/GO_0008150",
//!           "pref_label": "biological_process", "parents": [] }
//!       ]
//!     }]
//!   }]
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use super::iri::Iri;
use super::models::{ClassAttributes, SubmissionStatus};

/// A complete set of ontologies, submissions and classes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub ontologies: Vec<OntologyRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyRecord {
    pub acronym: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: u32,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw source served by the download endpoints.
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: Iri,
    #[serde(default)]
    pub pref_label: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub parents: Vec<Iri>,
}

impl ClassRecord {
    pub fn attributes(&self) -> ClassAttributes {
        ClassAttributes {
            pref_label: self.pref_label.clone(),
            synonyms: self.synonyms.clone(),
            definitions: self.definitions.clone(),
        }
    }
}

impl GraphSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Snapshot {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
