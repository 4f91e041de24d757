//! Job posting handlers.
//!
//! Listing and detail are public; everything else needs a bearer token.
//! Job details are cached in Redis when it is configured.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use tracing::warn;
use utoipa::IntoParams;
use uuid::Uuid;

use common::AppResult;
use domain::{
    Application, CallerIdentity, Job, JobFilter, JobPage, JobUpdate, NewJob, PageRequest,
    RemoteType, Seniority,
};

use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Listing filters and page selection
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListJobsQuery {
    /// Case-insensitive exact location match
    pub location: Option<String>,
    pub remote_type: Option<RemoteType>,
    pub seniority: Option<Seniority>,
    /// Page size, 1 to 100 (default 20)
    pub limit: Option<u64>,
    /// `next_cursor` of the previous page
    pub cursor: Option<String>,
}

impl ListJobsQuery {
    fn into_parts(self) -> (JobFilter, PageRequest) {
        (
            JobFilter {
                location: self.location,
                remote_type: self.remote_type,
                seniority: self.seniority,
            },
            PageRequest::new(self.limit, self.cursor),
        )
    }
}

/// Routes reachable without a token
pub fn public_job_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs))
        .route("/:id", get(get_job))
}

/// Routes that need an authenticated caller
pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post_job))
        .route("/:id", axum::routing::patch(update_job))
        .route("/:id/close", post(close_job))
        .route("/:id/applications", get(list_job_applications))
}

/// List open jobs, newest first
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "Jobs",
    params(ListJobsQuery),
    responses(
        (status = 200, description = "One page of open jobs", body = JobPage),
        (status = 400, description = "Invalid filter or cursor")
    )
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListJobsQuery>,
) -> AppResult<Json<JobPage>> {
    let (filter, page) = query.into_parts();
    let page = state.services.jobs().list_jobs(filter, page).await?;
    Ok(Json(page))
}

/// Get a job, open or closed
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job detail", body = Job),
        (status = 404, description = "Job not found")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Job>> {
    if let Some(cache) = &state.cache {
        match cache.get_job(&id).await {
            Ok(Some(job)) => return Ok(Json(job)),
            Ok(None) => {}
            Err(e) => warn!("Job cache read failed for {}: {}", id, e),
        }
    }

    let job = state.services.jobs().get_job(id).await?;
    remember(&state, &job).await;
    Ok(Json(job))
}

/// Post a job (employers only)
#[utoipa::path(
    post,
    path = "/jobs",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    request_body = NewJob,
    responses(
        (status = 201, description = "Job posted", body = Job),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only employers post jobs")
    )
)]
pub async fn post_job(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewJob>,
) -> AppResult<(StatusCode, Json<Job>)> {
    let job = state.services.jobs().post_job(caller, draft).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// Partially update a job (owner only)
#[utoipa::path(
    patch,
    path = "/jobs/{id}",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = JobUpdate,
    responses(
        (status = 200, description = "Updated job", body = Job),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the job owner"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn update_job(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(update): ApiJson<JobUpdate>,
) -> AppResult<Json<Job>> {
    let job = state.services.jobs().update_job(caller, id, update).await?;
    remember(&state, &job).await;
    Ok(Json(job))
}

/// Close a job. Closing twice is not an error.
#[utoipa::path(
    post,
    path = "/jobs/{id}/close",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Closed job", body = Job),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the job owner"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn close_job(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Job>> {
    let job = state.services.jobs().close_job(caller, id).await?;
    remember(&state, &job).await;
    Ok(Json(job))
}

/// Applications received by a job (owner or admin)
#[utoipa::path(
    get,
    path = "/jobs/{id}/applications",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Applications, newest first", body = Vec<Application>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the job owner"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn list_job_applications(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<Application>>> {
    let applications = state
        .services
        .applications()
        .list_for_job(caller, id)
        .await?;
    Ok(Json(applications))
}

/// Write-through for readers and writers alike. The cache keeps whichever
/// version of the job is newest.
async fn remember(state: &AppState, job: &Job) {
    if let Some(cache) = &state.cache {
        if let Err(e) = cache.store_job(job).await {
            warn!("Job cache write failed for {}: {}", job.id, e);
        }
    }
}
