mod common;

use ontoserve_core::config::RankingConfig;
use ontoserve_core::graph::{ClassNode, GraphStore, Iri, SubmissionKey};
use ontoserve_core::query::HierarchyNavigator;
use ontoserve_core::PageRequest;

use common::{browser, go, store};

fn node(name: &str) -> ClassNode {
    ClassNode::bare(Iri::parse(go(name)).unwrap(), SubmissionKey::new("GO", 2))
}

fn names(nodes: &[ClassNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.iri.as_str().trim_start_matches(common::GO).to_string())
        .collect()
}

#[tokio::test]
async fn test_roots() {
    let store = store();
    let roots = HierarchyNavigator::new(&*store)
        .roots(&SubmissionKey::new("GO", 2))
        .await
        .unwrap();
    assert_eq!(names(&roots), vec!["ROOT", "P"]);
}

#[tokio::test]
async fn test_ancestors_are_breadth_first_without_duplicates() {
    let store = store();
    let ancestors = HierarchyNavigator::new(&*store)
        .ancestors(&node("E"))
        .await
        .unwrap();
    assert_eq!(names(&ancestors), vec!["D", "C", "A", "B", "ROOT"]);
}

#[tokio::test]
async fn test_paths_to_root_follow_every_parent() {
    let store = store();
    let paths = HierarchyNavigator::new(&*store)
        .paths_to_root(&node("E"))
        .await
        .unwrap();

    assert_eq!(paths.len(), 2);
    assert_eq!(names(&paths[0]), vec!["E", "D", "C", "A", "ROOT"]);
    assert_eq!(names(&paths[1]), vec!["E", "D", "C", "B", "ROOT"]);
}

#[tokio::test]
async fn test_cycle_terminates() {
    let store = store();
    let navigator = HierarchyNavigator::new(&*store);

    let ancestors = navigator.ancestors(&node("X")).await.unwrap();
    assert_eq!(names(&ancestors), vec!["Z", "Y"]);

    let descendants = navigator.descendants(&node("X")).collect_all().await.unwrap();
    assert_eq!(names(&descendants), vec!["Y", "Z"]);

    let paths = navigator.paths_to_root(&node("X")).await.unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(names(&paths[0]), vec!["X", "Z", "Y"]);
}

#[tokio::test]
async fn test_leaf_has_no_children_and_root_no_parents() {
    let store = store();
    let navigator = HierarchyNavigator::new(&*store);

    assert!(navigator.children(&node("E")).await.unwrap().is_empty());
    assert!(navigator.parents(&node("ROOT")).await.unwrap().is_empty());
    assert!(navigator.descendants(&node("E")).collect_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_structural_nodes_are_not_hydrated() {
    let store = store();
    let children = store.children(&node("ROOT")).await.unwrap();
    assert!(children.iter().all(|c| !c.is_hydrated()));
}

#[tokio::test]
async fn test_descendant_count_is_direct_children() {
    let (_, browser) = browser(RankingConfig::default());
    let page = browser
        .descendants("GO", None, &go("P"), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.count, 2);
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn test_descendant_pages_exhaust_closure_in_order() {
    let (_, browser) = browser(RankingConfig::default());
    let mut seen = Vec::new();

    for page_no in 1..=4 {
        let request = browser
            .page_request(Some(page_no.to_string().as_str()), Some("3"))
            .unwrap();
        let page = browser
            .descendants("GO", None, &go("P"), request)
            .await
            .unwrap();
        assert!(page.items.len() <= 3);
        assert_eq!(page.next.is_some(), page_no < 4);
        seen.extend(names(&page.items));
    }

    assert_eq!(
        seen,
        vec!["Q1", "Q2", "R1", "R2", "R3", "R4", "R5", "R6", "R7", "R8"]
    );
}

#[tokio::test]
async fn test_children_page_is_empty_for_leaf() {
    let (_, browser) = browser(RankingConfig::default());
    let page = browser
        .children("GO", None, &go("E"), PageRequest::default())
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.count, 0);
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn test_children_next_is_probed() {
    let (_, browser) = browser(RankingConfig::default());

    let exact = browser.page_request(Some("1"), Some("2")).unwrap();
    let page = browser.children("GO", None, &go("ROOT"), exact).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.next, None);

    let short = browser.page_request(Some("1"), Some("1")).unwrap();
    let page = browser.children("GO", None, &go("ROOT"), short).await.unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.next, Some(2));
}

#[tokio::test]
async fn test_tree_in_pinned_submission() {
    let (_, browser) = browser(RankingConfig::default());
    let paths = browser.tree("GO", Some("1"), &go("ROOT")).await.unwrap();

    assert_eq!(paths.len(), 1);
    let root = &paths[0][0];
    assert_eq!(root.submission, SubmissionKey::new("GO", 1));
    assert_eq!(
        root.attributes.as_ref().and_then(|a| a.pref_label.as_deref()),
        Some("old entity")
    );
}
