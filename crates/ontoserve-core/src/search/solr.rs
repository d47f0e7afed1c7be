use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use super::{IndexError, IndexQuery, IndexResponse, RawHit, SearchIndex};

/// Solr `select` client using the edismax query parser.
pub struct SolrSearchIndex {
    base_url: String,
    client: Client,
}

impl SolrSearchIndex {
    /// Creates a client for a Solr core, e.g. `http://localhost:8983/solr/term_search_core1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Query string pairs for one request. Pass-through parameters cannot
    /// override the ones set here.
    fn request_params(query: &IndexQuery) -> Vec<(String, String)> {
        let mut params = vec![
            ("q".to_string(), query.text.clone()),
            ("defType".to_string(), "edismax".to_string()),
            ("qf".to_string(), query.query_fields()),
            ("fl".to_string(), "*,score".to_string()),
            ("rows".to_string(), query.rows.to_string()),
            ("wt".to_string(), "json".to_string()),
        ];
        for (key, value) in &query.params {
            if !params.iter().any(|(set, _)| set == key) {
                params.push((key.clone(), value.clone()));
            }
        }
        params
    }
}

#[async_trait]
impl SearchIndex for SolrSearchIndex {
    async fn search(&self, query: &IndexQuery) -> Result<IndexResponse, IndexError> {
        let url = format!("{}/select", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&Self::request_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IndexError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| IndexError::Parse(e.to_string()))?;
        parse_response(body)
    }
}

#[derive(Deserialize)]
struct SelectResponse {
    response: SelectBody,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectBody {
    num_found: usize,
    #[serde(default)]
    docs: Vec<serde_json::Value>,
}

/// Extract `numFound` and the documents from a Solr JSON response.
///
/// Documents that do not match the expected field types are skipped;
/// `num_found` is reported as the index returned it.
pub(crate) fn parse_response(body: serde_json::Value) -> Result<IndexResponse, IndexError> {
    let parsed: SelectResponse =
        serde_json::from_value(body).map_err(|e| IndexError::Parse(e.to_string()))?;

    let docs = parsed
        .response
        .docs
        .into_iter()
        .filter_map(|doc| match serde_json::from_value::<RawHit>(doc) {
            Ok(hit) => Some(hit),
            Err(e) => {
                warn!(error = %e, "dropping malformed index document");
                None
            }
        })
        .collect();

    Ok(IndexResponse {
        num_found: parsed.response.num_found,
        docs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::QueryField;

    #[test]
    fn test_parse_select_response() {
        let body = serde_json::json!({
            "responseHeader": { "status": 0, "QTime": 3 },
            "response": {
                "numFound": 41,
                "start": 0,
                "docs": [{
                    "resource_id": "http://purl.obolibrary.org/obo/GO_0005623",
                    "ontologyId": ["http://data.example.org/ontologies/GO/submissions/3"],
                    "submissionAcronym": "GO",
                    "prefLabel": "cell",
                    "score": 12.5
                }]
            }
        });

        let response = parse_response(body).unwrap();
        assert_eq!(response.num_found, 41);
        assert_eq!(response.docs.len(), 1);
        assert_eq!(response.docs[0].score, 12.5);
    }

    #[test]
    fn test_malformed_documents_are_skipped() {
        let body = serde_json::json!({
            "response": {
                "numFound": 4,
                "docs": [
                    { "resource_id": "http://x.org/a", "ontologyId": 42 },
                    { "resource_id": "http://x.org/b", "ontologyId": [null] },
                    { "resource_id": "http://x.org/c", "submissionAcronym": ["A"] },
                    {
                        "resource_id": "http://purl.obolibrary.org/obo/GO_0005623",
                        "ontologyId": "http://data.example.org/ontologies/GO/submissions/3",
                        "submissionAcronym": "GO",
                        "score": 2.0
                    }
                ]
            }
        });

        let response = parse_response(body).unwrap();
        assert_eq!(response.num_found, 4);
        assert_eq!(response.docs.len(), 1);
        assert_eq!(
            response.docs[0].resource_id.as_deref(),
            Some("http://purl.obolibrary.org/obo/GO_0005623")
        );
    }

    #[test]
    fn test_malformed_response_is_a_parse_error() {
        let err = parse_response(serde_json::json!({ "error": "boom" })).unwrap_err();
        assert!(matches!(err, IndexError::Parse(_)));
    }

    #[test]
    fn test_passthrough_params_do_not_override_query() {
        let query = IndexQuery {
            text: "cell".to_string(),
            fields: vec![QueryField {
                field: "prefLabel".to_string(),
                weight: 50.0,
            }],
            rows: 10,
            params: BTreeMap::from([
                ("rows".to_string(), "99999".to_string()),
                ("ontologies".to_string(), "GO".to_string()),
            ]),
        };

        let params = SolrSearchIndex::request_params(&query);
        assert!(params.contains(&("rows".to_string(), "10".to_string())));
        assert!(params.contains(&("ontologies".to_string(), "GO".to_string())));
        assert!(!params.contains(&("rows".to_string(), "99999".to_string())));
    }
}
