//! Search index over the latest parsed submission of each snapshot ontology.

use async_trait::async_trait;

use crate::graph::{submission_iri, GraphSnapshot};

use super::{IndexError, IndexQuery, IndexResponse, RawHit, SearchIndex};

/// One indexed class, with lowercased copies of the searchable text.
#[derive(Debug, Clone)]
struct IndexedClass {
    hit: RawHit,
    label: Option<String>,
    synonyms: Vec<String>,
    definitions: Vec<String>,
}

impl IndexedClass {
    fn new(hit: RawHit) -> Self {
        Self {
            label: hit.pref_label.first().map(|l| l.to_lowercase()),
            synonyms: lowercase(&hit.synonym),
            definitions: lowercase(&hit.definition),
            hit,
        }
    }

    fn acronym(&self) -> &str {
        self.hit.submission_acronym.as_deref().unwrap_or_default()
    }

    /// Whether `field` of this class matches the lowercased `needle`.
    fn field_matches(&self, field: &str, needle: &str) -> bool {
        match field {
            "prefLabelExact" => self.label.as_deref() == Some(needle),
            "prefLabel" => self.label.as_deref().is_some_and(|l| l.contains(needle)),
            "synonymExact" => self.synonyms.iter().any(|s| s == needle),
            "synonym" => self.synonyms.iter().any(|s| s.contains(needle)),
            "definition" => self.definitions.iter().any(|d| d.contains(needle)),
            _ => false,
        }
    }
}

fn lowercase(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// Case-insensitive field matching, weighted by the query's fields.
///
/// The `ontologies` parameter (comma separated acronyms) restricts the
/// searched ontologies, like the corresponding index filter.
#[derive(Debug, Default)]
pub struct InMemorySearchIndex {
    classes: Vec<IndexedClass>,
}

impl InMemorySearchIndex {
    pub fn from_snapshot(snapshot: &GraphSnapshot, iri_prefix: &str) -> Self {
        let mut docs = Vec::new();

        for ontology in &snapshot.ontologies {
            let latest = ontology
                .submissions
                .iter()
                .filter(|s| s.status.is_parsed())
                .max_by_key(|s| s.id);
            let Some(submission) = latest else {
                continue;
            };

            let submission_id = submission_iri(iri_prefix, &ontology.acronym, submission.id);
            for class in &submission.classes {
                docs.push(RawHit {
                    resource_id: Some(class.id.to_string()),
                    ontology_id: vec![submission_id.clone()],
                    submission_acronym: Some(ontology.acronym.clone()),
                    score: 0.0,
                    pref_label: class.pref_label.iter().cloned().collect(),
                    synonym: class.synonyms.clone(),
                    definition: class.definitions.clone(),
                });
            }
        }

        Self::with_documents(docs)
    }

    /// Index prepared documents as they are, including malformed ones.
    pub fn with_documents(docs: Vec<RawHit>) -> Self {
        Self {
            classes: docs.into_iter().map(IndexedClass::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn search(&self, query: &IndexQuery) -> Result<IndexResponse, IndexError> {
        let needle = query.text.trim().to_lowercase();
        let ontologies: Option<Vec<&str>> = query
            .params
            .get("ontologies")
            .map(|list| list.split(',').map(str::trim).filter(|a| !a.is_empty()).collect());

        let mut matches: Vec<RawHit> = self
            .classes
            .iter()
            .filter(|class| {
                ontologies
                    .as_ref()
                    .map_or(true, |wanted| wanted.contains(&class.acronym()))
            })
            .filter_map(|class| {
                let score: f64 = query
                    .fields
                    .iter()
                    .filter(|f| class.field_matches(&f.field, &needle))
                    .map(|f| f64::from(f.weight))
                    .sum();
                (score > 0.0).then(|| RawHit {
                    score,
                    ..class.hit.clone()
                })
            })
            .collect();

        let num_found = matches.len();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(query.rows);

        Ok(IndexResponse {
            num_found,
            docs: matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::SearchConfig;

    fn doc(id: &str, acronym: &str, label: &str, synonyms: &[&str]) -> RawHit {
        RawHit {
            resource_id: Some(id.to_string()),
            ontology_id: vec![format!("http://x.org/ontologies/{}/submissions/1", acronym)],
            submission_acronym: Some(acronym.to_string()),
            pref_label: vec![label.to_string()],
            synonym: synonyms.iter().map(|s| s.to_string()).collect(),
            ..RawHit::default()
        }
    }

    fn query(text: &str, params: &[(&str, &str)]) -> IndexQuery {
        IndexQuery {
            text: text.to_string(),
            fields: SearchConfig::default().query_fields,
            rows: 100,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn test_exact_label_outranks_synonym() {
        let index = InMemorySearchIndex::with_documents(vec![
            doc("http://x.org/syn", "A", "neoplasm", &["Melanoma"]),
            doc("http://x.org/exact", "B", "Melanoma", &[]),
        ]);

        let response = index.search(&query("melanoma", &[])).await.unwrap();
        assert_eq!(response.num_found, 2);
        assert_eq!(response.docs[0].resource_id.as_deref(), Some("http://x.org/exact"));
        assert!(response.docs[0].score > response.docs[1].score);
    }

    #[tokio::test]
    async fn test_ontologies_filter_and_row_cap() {
        let index = InMemorySearchIndex::with_documents(vec![
            doc("http://x.org/1", "A", "cell", &[]),
            doc("http://x.org/2", "B", "cell wall", &[]),
            doc("http://x.org/3", "B", "cell membrane", &[]),
        ]);

        let response = index.search(&query("cell", &[("ontologies", "B")])).await.unwrap();
        assert_eq!(response.num_found, 2);

        let mut capped = query("cell", &[]);
        capped.rows = 1;
        let response = index.search(&capped).await.unwrap();
        assert_eq!(response.num_found, 3);
        assert_eq!(response.docs.len(), 1);
    }
}
