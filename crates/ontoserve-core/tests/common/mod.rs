//! Shared graph fixture.
//!
//! GO submission 2 (latest parsed):
//!
//! ```text
//! ROOT ─┬─ A ─┐
//!       └─ B ─┴─ C ── D ── E
//! P ─┬─ Q1 ── R1..R4
//!    └─ Q2 ── R5..R8
//! X → Z → Y → X   (parent cycle)
//! ```
//!
//! GO submission 1 is an older parsed copy, submission 3 is only uploaded.
//! NCIT has a single parsed submission; UPL has no parsed submission.

#![allow(dead_code)]

use std::sync::Arc;

use ontoserve_core::config::RankingConfig;
use ontoserve_core::graph::GraphSnapshot;
use ontoserve_core::search::InMemorySearchIndex;
use ontoserve_core::{Config, InMemoryGraphStore, OntologyBrowser, RuntimeSettings, SettingsHandle};

pub const PREFIX: &str = "http://data.example.org";
pub const GO: &str = "http://purl.example.org/GO_";

pub fn go(name: &str) -> String {
    format!("{}{}", GO, name)
}

fn class(name: &str, label: &str, parents: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": go(name),
        "pref_label": label,
        "synonyms": [format!("{} synonym", label)],
        "definitions": [format!("Definition of {}", label)],
        "parents": parents.iter().map(|p| go(p)).collect::<Vec<_>>(),
    })
}

pub fn snapshot() -> GraphSnapshot {
    let mut latest = vec![
        class("ROOT", "entity", &[]),
        class("A", "anatomical entity", &["ROOT"]),
        class("B", "biological process", &["ROOT"]),
        class("C", "cell", &["A", "B"]),
        class("D", "cell part", &["C"]),
        class("E", "membrane", &["D"]),
        class("P", "process", &[]),
        class("Q1", "metabolic process", &["P"]),
        class("Q2", "signaling", &["P"]),
        class("X", "cycle x", &["Z"]),
        class("Y", "cycle y", &["X"]),
        class("Z", "cycle z", &["Y"]),
    ];
    for i in 1..=8 {
        let parent = if i <= 4 { "Q1" } else { "Q2" };
        latest.push(class(&format!("R{}", i), &format!("step {}", i), &[parent]));
    }

    let value = serde_json::json!({
        "ontologies": [
            {
                "acronym": "GO",
                "name": "Gene Ontology",
                "description": "Fixture ontology",
                "submissions": [
                    {
                        "id": 1,
                        "status": "parsed",
                        "version": "2023-01",
                        "classes": [class("ROOT", "old entity", &[])]
                    },
                    {
                        "id": 2,
                        "status": "indexed",
                        "version": "2024-01",
                        "created": "2024-01-15T10:00:00Z",
                        "document": "<rdf:RDF/>",
                        "classes": latest
                    },
                    { "id": 3, "status": "uploaded" }
                ]
            },
            {
                "acronym": "NCIT",
                "name": "NCI Thesaurus",
                "submissions": [{
                    "id": 1,
                    "status": "parsed",
                    "document": "<owl/>",
                    "classes": [{
                        "id": "http://purl.example.org/NCIT_C1",
                        "pref_label": "cell",
                        "synonyms": ["cell synonym"],
                        "definitions": ["Definition of cell"],
                        "parents": []
                    }]
                }]
            },
            {
                "acronym": "UPL",
                "name": "Uploaded Only",
                "submissions": [{ "id": 1, "status": "uploaded" }]
            }
        ]
    });

    serde_json::from_value(value).unwrap()
}

pub fn store() -> Arc<InMemoryGraphStore> {
    Arc::new(InMemoryGraphStore::from_snapshot(snapshot(), PREFIX))
}

/// A browser over the fixture plus the store behind it, for counters.
pub fn browser(ranking: RankingConfig) -> (Arc<InMemoryGraphStore>, OntologyBrowser) {
    browser_with(ranking, &Config::default())
}

pub fn browser_with(
    ranking: RankingConfig,
    config: &Config,
) -> (Arc<InMemoryGraphStore>, OntologyBrowser) {
    let store = store();
    let index = Arc::new(InMemorySearchIndex::from_snapshot(&snapshot(), PREFIX));
    let settings = SettingsHandle::new(RuntimeSettings::from(&ranking));
    let browser = OntologyBrowser::new(store.clone(), index, settings, config);
    (store, browser)
}
