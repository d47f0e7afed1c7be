mod common;

use std::collections::BTreeMap;

use ontoserve_core::config::RankingConfig;
use ontoserve_core::graph::SubmissionKey;
use ontoserve_core::{Config, PageRequest, QueryError};

use common::{browser, browser_with, go};

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn ranking(ranks: &[(&str, i64)], restricted: &[&str]) -> RankingConfig {
    RankingConfig {
        ontology_rank: ranks.iter().map(|(a, r)| (a.to_string(), *r)).collect(),
        restrict_download: restricted.iter().map(|a| a.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_invalid_page_parameters() {
    let (_, browser) = browser(RankingConfig::default());

    for (page, size) in [("1", "501"), ("1", "0"), ("-1", "10"), ("one", "10")] {
        let err = browser.page_request(Some(page), Some(size)).unwrap_err();
        assert!(matches!(err, QueryError::BadRequest(_)), "{page}/{size}");
    }
    assert_eq!(
        browser.page_request(Some("2"), Some("500")).unwrap(),
        PageRequest { page: 2, size: 500 }
    );
}

#[tokio::test]
async fn test_uploaded_submission_rejected_for_class_endpoints() {
    let (_, browser) = browser(RankingConfig::default());
    let err = browser.roots("GO", Some("3")).await.unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
}

#[tokio::test]
async fn test_search_ties_follow_rank_table() {
    let (_, browser) = browser(ranking(&[("NCIT", 5), ("GO", 1)], &[]));
    let page = browser.search(&params(&[("q", "cell")])).await.unwrap();

    // Both ontologies have an exact "cell" label with identical scores
    assert_eq!(page.items[0].acronym, "NCIT");
    assert_eq!(page.items[1].acronym, "GO");
    assert_eq!(page.items[1].id, go("C"));
    assert_eq!(page.items[0].ontology, "http://data.example.org/ontologies/NCIT");
    assert_eq!(page.count, page.items.len());
}

#[tokio::test]
async fn test_search_rank_changes_after_reload() {
    let (_, browser) = browser(ranking(&[("NCIT", 5), ("GO", 1)], &[]));
    browser.reload_settings(&ranking(&[("GO", 9)], &[]));

    let page = browser
        .search(&params(&[("q", "cell"), ("ontologies", "GO,NCIT")]))
        .await
        .unwrap();
    assert_eq!(page.items[0].acronym, "GO");
}

#[tokio::test]
async fn test_search_paginates_merged_hits() {
    let (_, browser) = browser(RankingConfig::default());
    let page = browser
        .search(&params(&[("q", "step"), ("page", "2"), ("size", "5")]))
        .await
        .unwrap();

    assert_eq!(page.count, 8);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn test_search_pages_past_hit_cap_are_empty() {
    let mut config = Config::default();
    config.search.max_hits = 5;
    let (_, browser) = browser_with(RankingConfig::default(), &config);

    let first = browser
        .search(&params(&[("q", "step"), ("page", "1"), ("size", "5")]))
        .await
        .unwrap();
    assert_eq!(first.count, 8);
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.next, None);

    let second = browser
        .search(&params(&[("q", "step"), ("page", "2"), ("size", "5")]))
        .await
        .unwrap();
    assert_eq!(second.count, 8);
    assert!(second.items.is_empty());
}

#[tokio::test]
async fn test_search_requires_query() {
    let (_, browser) = browser(RankingConfig::default());
    let err = browser.search(&params(&[("page", "1")])).await.unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
}

#[tokio::test]
async fn test_submissions_newest_first() {
    let (_, browser) = browser(RankingConfig::default());
    let submissions = browser.submissions("GO").await.unwrap();

    let ids: Vec<u32> = submissions.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert!(submissions.iter().all(|s| s.is_loaded()));
}

#[tokio::test]
async fn test_download_latest_document() {
    let (_, browser) = browser(RankingConfig::default());
    let document = browser.download("GO", None).await.unwrap();

    assert_eq!(document.submission, SubmissionKey::new("GO", 2));
    assert_eq!(document.content, b"<rdf:RDF/>".to_vec());
}

#[tokio::test]
async fn test_download_without_document_is_not_found() {
    let (_, browser) = browser(RankingConfig::default());
    let err = browser.download("GO", Some("1")).await.unwrap_err();
    assert!(matches!(err, QueryError::NotFound(_)));
}

#[tokio::test]
async fn test_restricted_download_is_forbidden() {
    let (_, browser) = browser(ranking(&[], &["NCIT"]));
    let err = browser.download("NCIT", None).await.unwrap_err();
    assert!(matches!(err, QueryError::Forbidden(_)));

    browser.reload_settings(&RankingConfig::default());
    assert!(browser.download("NCIT", None).await.is_ok());
}

#[tokio::test]
async fn test_list_classes_windows() {
    let (_, browser) = browser(RankingConfig::default());
    let request = browser.page_request(Some("4"), Some("6")).unwrap();
    let page = browser.list_classes("GO", None, request).await.unwrap();

    assert_eq!(page.count, 20);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.next, None);
}
