//! SurrealDB embedded graph store.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::Surreal;

use super::error::StoreError;
use super::iri::Iri;
use super::models::{
    Attribute, ClassAttributes, ClassNode, Ontology, OntologyMetadata, Submission,
    SubmissionKey, SubmissionMetadata, SubmissionStatus,
};
use super::snapshot::GraphSnapshot;
use super::{ontology_iri, submission_iri, GraphStore};

// =============================================================================
// Stored rows
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct OntologyRow {
    acronym: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SubmissionRow {
    acronym: String,
    submission_id: u32,
    status: String,
    #[serde(default)]
    version: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    document: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassRow {
    acronym: String,
    submission_id: u32,
    iri: String,
    position: u64,
    #[serde(default)]
    pref_label: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    definitions: Vec<String>,
    #[serde(default)]
    parents: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AcronymRow {
    acronym: String,
}

#[derive(Debug, Deserialize)]
struct StatusRow {
    acronym: String,
    submission_id: u32,
    status: String,
}

#[derive(Debug, Deserialize)]
struct SubmissionMetaRow {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentRow {
    #[serde(default)]
    document: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IriRow {
    iri: String,
}

#[derive(Debug, Deserialize)]
struct ParentsRow {
    #[serde(default)]
    parents: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AttributeRow {
    iri: String,
    #[serde(default)]
    pref_label: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    definitions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: i64,
}

impl AttributeRow {
    fn into_parts(self, attrs: &[Attribute]) -> Result<(Iri, ClassAttributes), StoreError> {
        let (iri, attributes) = self.into_full_parts()?;
        Ok((iri, attributes.select(attrs)))
    }

    fn into_node(
        self,
        submission: &SubmissionKey,
        attrs: &[Attribute],
    ) -> Result<ClassNode, StoreError> {
        let (iri, attributes) = self.into_full_parts()?;
        Ok(ClassNode::fetched(iri, submission.clone(), attributes, attrs))
    }

    fn into_full_parts(self) -> Result<(Iri, ClassAttributes), StoreError> {
        let iri = parse_iri(self.iri)?;
        let attributes = ClassAttributes {
            pref_label: self.pref_label,
            synonyms: self.synonyms,
            definitions: self.definitions,
        };
        Ok((iri, attributes))
    }
}

fn parse_iri(value: String) -> Result<Iri, StoreError> {
    Iri::parse(value).map_err(|e| StoreError::Corrupted(e.to_string()))
}

fn parse_status(value: &str) -> Result<SubmissionStatus, StoreError> {
    value.parse().map_err(StoreError::Corrupted)
}

fn parse_created(value: Option<String>) -> Result<Option<DateTime<Utc>>, StoreError> {
    value
        .map(|v| {
            DateTime::parse_from_rfc3339(&v)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| StoreError::Corrupted(format!("bad creation date '{}': {}", v, e)))
        })
        .transpose()
}

// =============================================================================
// Store
// =============================================================================

/// Graph store persisted in an embedded SurrealDB (RocksDB engine).
pub struct SurrealGraphStore {
    db: Surreal<Db>,
    iri_prefix: String,
}

impl SurrealGraphStore {
    /// Open or create a database at the given path.
    pub async fn open(path: &Path, iri_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns("ontoserve").use_db("graph").await?;

        Ok(Self {
            db,
            iri_prefix: iri_prefix.into(),
        })
    }

    /// Define tables and indexes. Safe to call repeatedly.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS ontology SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS ontology_acronym ON ontology FIELDS acronym UNIQUE;

                DEFINE TABLE IF NOT EXISTS submission SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS submission_key ON submission FIELDS acronym, submission_id UNIQUE;

                DEFINE TABLE IF NOT EXISTS class_node SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS class_key ON class_node FIELDS acronym, submission_id, iri UNIQUE;
                DEFINE INDEX IF NOT EXISTS class_parents ON class_node FIELDS parents;
                "#,
            )
            .await?
            .check()?;
        Ok(())
    }

    /// Replace every ontology present in `snapshot` with its snapshot content.
    pub async fn import_snapshot(&self, snapshot: &GraphSnapshot) -> Result<usize, StoreError> {
        let mut imported = 0;

        for ontology in &snapshot.ontologies {
            // Delete in separate queries, one table at a time
            for table in ["class_node", "submission", "ontology"] {
                self.db
                    .query(format!("DELETE {} WHERE acronym = $acronym", table))
                    .bind(("acronym", ontology.acronym.clone()))
                    .await?
                    .check()?;
            }

            self.db
                .query("CREATE ontology CONTENT $row")
                .bind((
                    "row",
                    OntologyRow {
                        acronym: ontology.acronym.clone(),
                        name: ontology.name.clone(),
                        description: ontology.description.clone(),
                    },
                ))
                .await?
                .check()?;

            for sub in &ontology.submissions {
                self.db
                    .query("CREATE submission CONTENT $row")
                    .bind((
                        "row",
                        SubmissionRow {
                            acronym: ontology.acronym.clone(),
                            submission_id: sub.id,
                            status: sub.status.as_str().to_string(),
                            version: sub.version.clone(),
                            created: sub.created.map(|c| c.to_rfc3339()),
                            description: sub.description.clone(),
                            document: sub.document.clone(),
                        },
                    ))
                    .await?
                    .check()?;

                let rows: Vec<ClassRow> = sub
                    .classes
                    .iter()
                    .enumerate()
                    .map(|(position, class)| ClassRow {
                        acronym: ontology.acronym.clone(),
                        submission_id: sub.id,
                        iri: class.id.to_string(),
                        position: position as u64,
                        pref_label: class.pref_label.clone(),
                        synonyms: class.synonyms.clone(),
                        definitions: class.definitions.clone(),
                        parents: class.parents.iter().map(|p| p.to_string()).collect(),
                    })
                    .collect();
                imported += rows.len();

                if !rows.is_empty() {
                    self.db
                        .query("INSERT INTO class_node $rows")
                        .bind(("rows", rows))
                        .await?
                        .check()?;
                }
            }
        }

        Ok(imported)
    }

    async fn class_iris(
        &self,
        query: &str,
        submission: &SubmissionKey,
        iri: Option<&Iri>,
    ) -> Result<Vec<ClassNode>, StoreError> {
        let mut request = self
            .db
            .query(query)
            .bind(("acronym", submission.acronym.clone()))
            .bind(("submission_id", submission.submission_id));
        if let Some(iri) = iri {
            request = request.bind(("iri", iri.to_string()));
        }
        let rows: Vec<IriRow> = request.await?.take(0)?;

        rows.into_iter()
            .map(|row| Ok(ClassNode::bare(parse_iri(row.iri)?, submission.clone())))
            .collect()
    }

    fn submission_from_row(&self, row: StatusRow) -> Result<Submission, StoreError> {
        Ok(Submission {
            iri: submission_iri(&self.iri_prefix, &row.acronym, row.submission_id),
            status: parse_status(&row.status)?,
            key: SubmissionKey::new(row.acronym, row.submission_id),
            metadata: None,
        })
    }
}

#[async_trait]
impl GraphStore for SurrealGraphStore {
    async fn find_ontology(&self, acronym: &str) -> Result<Option<Ontology>, StoreError> {
        let row: Option<AcronymRow> = self
            .db
            .query("SELECT acronym FROM ontology WHERE acronym = $acronym LIMIT 1")
            .bind(("acronym", acronym.to_string()))
            .await?
            .take(0)?;

        Ok(row.map(|r| {
            let iri = ontology_iri(&self.iri_prefix, &r.acronym);
            Ontology::new(r.acronym, iri)
        }))
    }

    async fn load_ontology(&self, ontology: &mut Ontology) -> Result<(), StoreError> {
        if ontology.is_loaded() {
            return Ok(());
        }
        let row: Option<OntologyRow> = self
            .db
            .query("SELECT acronym, name, description FROM ontology WHERE acronym = $acronym LIMIT 1")
            .bind(("acronym", ontology.acronym.clone()))
            .await?
            .take(0)?;

        if let Some(row) = row {
            ontology.metadata = Some(OntologyMetadata {
                name: row.name,
                description: row.description,
            });
        }
        Ok(())
    }

    async fn load_submission(&self, submission: &mut Submission) -> Result<(), StoreError> {
        if submission.is_loaded() {
            return Ok(());
        }
        let row: Option<SubmissionMetaRow> = self
            .db
            .query(
                "SELECT version, created, description FROM submission \
                 WHERE acronym = $acronym AND submission_id = $submission_id LIMIT 1",
            )
            .bind(("acronym", submission.key.acronym.clone()))
            .bind(("submission_id", submission.key.submission_id))
            .await?
            .take(0)?;

        if let Some(row) = row {
            submission.metadata = Some(SubmissionMetadata {
                version: row.version,
                created: parse_created(row.created)?,
                description: row.description,
            });
        }
        Ok(())
    }

    async fn submissions(&self, ontology: &Ontology) -> Result<Vec<Submission>, StoreError> {
        let rows: Vec<StatusRow> = self
            .db
            .query(
                "SELECT acronym, submission_id, status FROM submission \
                 WHERE acronym = $acronym ORDER BY submission_id DESC",
            )
            .bind(("acronym", ontology.acronym.clone()))
            .await?
            .take(0)?;

        rows.into_iter()
            .map(|row| self.submission_from_row(row))
            .collect()
    }

    async fn latest_submission(
        &self,
        ontology: &Ontology,
    ) -> Result<Option<Submission>, StoreError> {
        Ok(self
            .submissions(ontology)
            .await?
            .into_iter()
            .find(|s| s.status.is_parsed()))
    }

    async fn submission_by_id(
        &self,
        ontology: &Ontology,
        submission_id: u32,
    ) -> Result<Option<Submission>, StoreError> {
        let row: Option<StatusRow> = self
            .db
            .query(
                "SELECT acronym, submission_id, status FROM submission \
                 WHERE acronym = $acronym AND submission_id = $submission_id LIMIT 1",
            )
            .bind(("acronym", ontology.acronym.clone()))
            .bind(("submission_id", submission_id))
            .await?
            .take(0)?;

        row.map(|r| self.submission_from_row(r)).transpose()
    }

    async fn submission_document(
        &self,
        submission: &SubmissionKey,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let row: Option<DocumentRow> = self
            .db
            .query(
                "SELECT document FROM submission \
                 WHERE acronym = $acronym AND submission_id = $submission_id LIMIT 1",
            )
            .bind(("acronym", submission.acronym.clone()))
            .bind(("submission_id", submission.submission_id))
            .await?
            .take(0)?;

        Ok(row.and_then(|r| r.document).map(String::into_bytes))
    }

    async fn find_class(
        &self,
        submission: &SubmissionKey,
        iri: &Iri,
        attrs: &[Attribute],
    ) -> Result<Option<ClassNode>, StoreError> {
        let row: Option<AttributeRow> = self
            .db
            .query(
                "SELECT iri, pref_label, synonyms, definitions FROM class_node \
                 WHERE acronym = $acronym AND submission_id = $submission_id AND iri = $iri LIMIT 1",
            )
            .bind(("acronym", submission.acronym.clone()))
            .bind(("submission_id", submission.submission_id))
            .bind(("iri", iri.to_string()))
            .await?
            .take(0)?;

        row.map(|r| r.into_node(submission, attrs)).transpose()
    }

    async fn class_count(&self, submission: &SubmissionKey) -> Result<usize, StoreError> {
        let row: Option<CountRow> = self
            .db
            .query(
                "SELECT count() AS total FROM class_node \
                 WHERE acronym = $acronym AND submission_id = $submission_id GROUP ALL",
            )
            .bind(("acronym", submission.acronym.clone()))
            .bind(("submission_id", submission.submission_id))
            .await?
            .take(0)?;

        Ok(row.map(|r| r.total.max(0) as usize).unwrap_or(0))
    }

    async fn classes(
        &self,
        submission: &SubmissionKey,
        offset: usize,
        limit: usize,
        attrs: &[Attribute],
    ) -> Result<Vec<ClassNode>, StoreError> {
        // LIMIT and START are formatted as literals
        let query = format!(
            "SELECT iri, pref_label, synonyms, definitions, position FROM class_node \
             WHERE acronym = $acronym AND submission_id = $submission_id \
             ORDER BY position LIMIT {} START {}",
            limit, offset
        );
        let rows: Vec<AttributeRow> = self
            .db
            .query(&query)
            .bind(("acronym", submission.acronym.clone()))
            .bind(("submission_id", submission.submission_id))
            .await?
            .take(0)?;

        rows.into_iter()
            .map(|row| row.into_node(submission, attrs))
            .collect()
    }

    async fn roots(&self, submission: &SubmissionKey) -> Result<Vec<ClassNode>, StoreError> {
        self.class_iris(
            "SELECT iri, position FROM class_node \
             WHERE acronym = $acronym AND submission_id = $submission_id \
             AND array::len(parents) = 0 ORDER BY position",
            submission,
            None,
        )
        .await
    }

    async fn parents(&self, node: &ClassNode) -> Result<Vec<ClassNode>, StoreError> {
        let row: Option<ParentsRow> = self
            .db
            .query(
                "SELECT parents FROM class_node \
                 WHERE acronym = $acronym AND submission_id = $submission_id AND iri = $iri LIMIT 1",
            )
            .bind(("acronym", node.submission.acronym.clone()))
            .bind(("submission_id", node.submission.submission_id))
            .bind(("iri", node.iri.to_string()))
            .await?
            .take(0)?;

        let declared = row.map(|r| r.parents).unwrap_or_default();
        if declared.is_empty() {
            return Ok(Vec::new());
        }

        // Keep only parents that exist in the submission, in declaration order
        let existing: Vec<IriRow> = self
            .db
            .query(
                "SELECT iri FROM class_node \
                 WHERE acronym = $acronym AND submission_id = $submission_id AND iri IN $iris",
            )
            .bind(("acronym", node.submission.acronym.clone()))
            .bind(("submission_id", node.submission.submission_id))
            .bind(("iris", declared.clone()))
            .await?
            .take(0)?;
        let existing: std::collections::HashSet<String> =
            existing.into_iter().map(|r| r.iri).collect();

        declared
            .into_iter()
            .filter(|iri| existing.contains(iri))
            .map(|iri| Ok(ClassNode::bare(parse_iri(iri)?, node.submission.clone())))
            .collect()
    }

    async fn children(&self, node: &ClassNode) -> Result<Vec<ClassNode>, StoreError> {
        self.class_iris(
            "SELECT iri, position FROM class_node \
             WHERE acronym = $acronym AND submission_id = $submission_id \
             AND parents CONTAINS $iri ORDER BY position",
            &node.submission,
            Some(&node.iri),
        )
        .await
    }

    async fn batch_load_attributes(
        &self,
        submission: &SubmissionKey,
        iris: &[Iri],
        attrs: &[Attribute],
    ) -> Result<HashMap<Iri, ClassAttributes>, StoreError> {
        if iris.is_empty() {
            return Ok(HashMap::new());
        }
        let wanted: Vec<String> = iris.iter().map(|i| i.to_string()).collect();
        let rows: Vec<AttributeRow> = self
            .db
            .query(
                "SELECT iri, pref_label, synonyms, definitions FROM class_node \
                 WHERE acronym = $acronym AND submission_id = $submission_id AND iri IN $iris",
            )
            .bind(("acronym", submission.acronym.clone()))
            .bind(("submission_id", submission.submission_id))
            .bind(("iris", wanted))
            .await?
            .take(0)?;

        rows.into_iter().map(|row| row.into_parts(attrs)).collect()
    }
}
