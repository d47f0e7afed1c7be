mod common;

use ontoserve_core::graph::{GraphStore, SubmissionStatus};
use ontoserve_core::query::{ContextResolver, NodeLocator};
use ontoserve_core::QueryError;

use common::{go, store};

#[tokio::test]
async fn test_unknown_ontology_is_not_found() {
    let store = store();
    let err = ContextResolver::new(&*store)
        .resolve("NOPE", None)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::NotFound(_)));
}

#[tokio::test]
async fn test_latest_parsed_submission_is_default() {
    let store = store();
    let context = ContextResolver::new(&*store)
        .resolve("GO", None)
        .await
        .unwrap();

    assert_eq!(context.submission.id(), 2);
    assert_eq!(context.submission.status, SubmissionStatus::Indexed);
    assert!(context.submission.is_loaded());
    assert!(context.ontology.is_loaded());
}

#[tokio::test]
async fn test_pinned_submission() {
    let store = store();
    let context = ContextResolver::new(&*store)
        .resolve("GO", Some("1"))
        .await
        .unwrap();
    assert_eq!(context.submission.id(), 1);
}

#[tokio::test]
async fn test_missing_pinned_submission_is_bad_request() {
    let store = store();
    let err = ContextResolver::new(&*store)
        .resolve("GO", Some("99"))
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
    assert!(err.to_string().contains("Submission 99 does not exist"));
}

#[tokio::test]
async fn test_non_integer_submission_is_bad_request() {
    let store = store();
    let err = ContextResolver::new(&*store)
        .resolve("GO", Some("latest"))
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
}

#[tokio::test]
async fn test_unparsed_submission_is_bad_request() {
    let store = store();
    let resolver = ContextResolver::new(&*store);

    let err = resolver.resolve("GO", Some("3")).await.unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
    assert!(err.to_string().contains("has not been parsed"));

    // Still resolvable where parsing is not required
    let context = resolver.resolve_any("GO", Some("3")).await.unwrap();
    assert_eq!(context.submission.status, SubmissionStatus::Uploaded);
}

#[tokio::test]
async fn test_ontology_without_parsed_submission_is_bad_request() {
    let store = store();
    let err = ContextResolver::new(&*store)
        .resolve("UPL", None)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
}

#[tokio::test]
async fn test_lazy_loading_is_idempotent() {
    let store = store();
    let mut context = ContextResolver::new(&*store)
        .resolve("GO", None)
        .await
        .unwrap();
    let loads = store.metadata_loads();

    store.load_ontology(&mut context.ontology).await.unwrap();
    store.load_submission(&mut context.submission).await.unwrap();
    assert_eq!(store.metadata_loads(), loads);
}

#[tokio::test]
async fn test_invalid_class_id_is_bad_request() {
    let store = store();
    let mut context = ContextResolver::new(&*store)
        .resolve("GO", None)
        .await
        .unwrap();

    let err = NodeLocator::new(&*store)
        .locate(&mut context, "not a uri")
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
    assert_eq!(
        err.to_string(),
        "The input class id 'not a uri' is not a valid IRI"
    );
}

#[tokio::test]
async fn test_absent_class_is_not_found() {
    let store = store();
    let mut context = ContextResolver::new(&*store)
        .resolve("GO", None)
        .await
        .unwrap();

    let missing = go("MISSING");
    let err = NodeLocator::new(&*store)
        .locate(&mut context, &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::NotFound(_)));
    let message = err.to_string();
    assert!(message.contains("GO"));
    assert!(message.contains("submission 2"));
}

#[tokio::test]
async fn test_located_class_carries_attributes() {
    let store = store();
    let mut context = ContextResolver::new(&*store)
        .resolve("GO", None)
        .await
        .unwrap();

    let node = NodeLocator::new(&*store)
        .locate(&mut context, &go("C"))
        .await
        .unwrap();
    let attributes = node.attributes.unwrap();
    assert_eq!(attributes.pref_label.as_deref(), Some("cell"));
    assert_eq!(attributes.synonyms, vec!["cell synonym".to_string()]);
}
