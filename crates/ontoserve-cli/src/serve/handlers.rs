//! HTTP route handlers.
//!
//! Handlers are kept thin: they extract parameters, call the
//! [`OntologyBrowser`](ontoserve_core::OntologyBrowser) and convert the result
//! into DTOs.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use ontoserve_core::Config;

use super::error::ApiError;
use super::models::{
    classes, ClassDto, ClassPage, ClassParams, Health, ReloadSummary, SearchPage, SubmissionDto,
};
use super::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// Classes
// =============================================================================

/// GET `/ontologies/{ontology}/classes`
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
    Path(ontology): Path<String>,
    Query(params): Query<ClassParams>,
) -> ApiResult<ClassPage> {
    let browser = &state.browser;
    let request = browser.page_request(params.page(), params.size())?;
    let page = browser
        .list_classes(&ontology, params.submission(), request)
        .await?;
    Ok(Json(page.into()))
}

/// GET `/ontologies/{ontology}/classes/roots`
pub async fn roots(
    State(state): State<Arc<AppState>>,
    Path(ontology): Path<String>,
    Query(params): Query<ClassParams>,
) -> ApiResult<Vec<ClassDto>> {
    let roots = state.browser.roots(&ontology, params.submission()).await?;
    Ok(Json(classes(roots)))
}

/// GET `/ontologies/{ontology}/classes/{cls}`
pub async fn class(
    State(state): State<Arc<AppState>>,
    Path((ontology, cls)): Path<(String, String)>,
    Query(params): Query<ClassParams>,
) -> ApiResult<ClassDto> {
    let node = state
        .browser
        .class(&ontology, params.submission(), &cls)
        .await?;
    Ok(Json(node.into()))
}

/// GET `/ontologies/{ontology}/classes/{cls}/tree`
///
/// One list per path, each running from the class up to a root.
pub async fn tree(
    State(state): State<Arc<AppState>>,
    Path((ontology, cls)): Path<(String, String)>,
    Query(params): Query<ClassParams>,
) -> ApiResult<Vec<Vec<ClassDto>>> {
    let paths = state
        .browser
        .tree(&ontology, params.submission(), &cls)
        .await?;
    Ok(Json(paths.into_iter().map(classes).collect()))
}

/// GET `/ontologies/{ontology}/classes/{cls}/ancestors`
pub async fn ancestors(
    State(state): State<Arc<AppState>>,
    Path((ontology, cls)): Path<(String, String)>,
    Query(params): Query<ClassParams>,
) -> ApiResult<Vec<ClassDto>> {
    let ancestors = state
        .browser
        .ancestors(&ontology, params.submission(), &cls)
        .await?;
    Ok(Json(classes(ancestors)))
}

/// GET `/ontologies/{ontology}/classes/{cls}/descendants`
pub async fn descendants(
    State(state): State<Arc<AppState>>,
    Path((ontology, cls)): Path<(String, String)>,
    Query(params): Query<ClassParams>,
) -> ApiResult<ClassPage> {
    let browser = &state.browser;
    let request = browser.page_request(params.page(), params.size())?;
    let page = browser
        .descendants(&ontology, params.submission(), &cls, request)
        .await?;
    Ok(Json(page.into()))
}

/// GET `/ontologies/{ontology}/classes/{cls}/children`
pub async fn children(
    State(state): State<Arc<AppState>>,
    Path((ontology, cls)): Path<(String, String)>,
    Query(params): Query<ClassParams>,
) -> ApiResult<ClassPage> {
    let browser = &state.browser;
    let request = browser.page_request(params.page(), params.size())?;
    let page = browser
        .children(&ontology, params.submission(), &cls, request)
        .await?;
    Ok(Json(page.into()))
}

/// GET `/ontologies/{ontology}/classes/{cls}/parents`
pub async fn parents(
    State(state): State<Arc<AppState>>,
    Path((ontology, cls)): Path<(String, String)>,
    Query(params): Query<ClassParams>,
) -> ApiResult<Vec<ClassDto>> {
    let parents = state
        .browser
        .parents(&ontology, params.submission(), &cls)
        .await?;
    Ok(Json(classes(parents)))
}

// =============================================================================
// Search
// =============================================================================

/// GET `/search`
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<SearchPage> {
    let page = state.browser.search(&params).await?;
    Ok(Json(page.into()))
}

/// POST `/search` - form parameters, merged over query string parameters.
pub async fn search_form(
    State(state): State<Arc<AppState>>,
    Query(mut params): Query<BTreeMap<String, String>>,
    Form(form): Form<BTreeMap<String, String>>,
) -> ApiResult<SearchPage> {
    params.extend(form);
    let page = state.browser.search(&params).await?;
    Ok(Json(page.into()))
}

// =============================================================================
// Submissions
// =============================================================================

/// GET `/ontologies/{ontology}/submissions`
pub async fn submissions(
    State(state): State<Arc<AppState>>,
    Path(ontology): Path<String>,
) -> ApiResult<Vec<SubmissionDto>> {
    let submissions = state.browser.submissions(&ontology).await?;
    Ok(Json(
        submissions.into_iter().map(SubmissionDto::from).collect(),
    ))
}

/// GET `/ontologies/{ontology}/download`
pub async fn download_latest(
    State(state): State<Arc<AppState>>,
    Path(ontology): Path<String>,
) -> Result<Response, ApiError> {
    download(&state, &ontology, None).await
}

/// GET `/ontologies/{ontology}/submissions/{id}/download`
pub async fn download_submission(
    State(state): State<Arc<AppState>>,
    Path((ontology, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    download(&state, &ontology, Some(&id)).await
}

async fn download(
    state: &AppState,
    ontology: &str,
    submission: Option<&str>,
) -> Result<Response, ApiError> {
    let document = state.browser.download(ontology, submission).await?;
    let disposition = format!(
        "attachment; filename=\"{}-{}\"",
        document.submission.acronym, document.submission.submission_id
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.content,
    )
        .into_response())
}

// =============================================================================
// Admin
// =============================================================================

/// POST `/admin/settings/reload` - re-read the ranking section of the config.
pub async fn reload_settings(State(state): State<Arc<AppState>>) -> ApiResult<ReloadSummary> {
    let config = match &state.config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    state.browser.reload_settings(&config.ranking);

    Ok(Json(ReloadSummary {
        ranked: config.ranking.ontology_rank.len(),
        restricted: config.ranking.restrict_download.len(),
    }))
}

/// GET `/_health`
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
