//! Application handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use common::AppResult;
use domain::{Application, CallerIdentity, DecisionRequest, NewApplication};

use crate::extractors::{ApiJson, ApiPath};
use crate::state::AppState;

/// Create application routes
pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(apply))
        .route("/me", get(list_my_applications))
        .route("/:id/review", post(mark_reviewed))
        .route("/:id/decision", post(decide))
}

/// Apply to an open job (candidates only)
#[utoipa::path(
    post,
    path = "/applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    request_body = NewApplication,
    responses(
        (status = 201, description = "Application submitted", body = Application),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only candidates apply"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job closed or already applied")
    )
)]
pub async fn apply(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewApplication>,
) -> AppResult<(StatusCode, Json<Application>)> {
    let application = state
        .services
        .applications()
        .apply(caller, payload.job_id, payload.message)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// The caller's applications, newest first
#[utoipa::path(
    get,
    path = "/applications/me",
    tag = "Applications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own applications", body = Vec<Application>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only candidates apply")
    )
)]
pub async fn list_my_applications(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Application>>> {
    let applications = state.services.applications().list_mine(caller).await?;
    Ok(Json(applications))
}

/// Mark an application as reviewed
#[utoipa::path(
    post,
    path = "/applications/{id}/review",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Reviewed application", body = Application),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the job owner"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application already decided")
    )
)]
pub async fn mark_reviewed(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Application>> {
    let application = state
        .services
        .applications()
        .mark_reviewed(caller, id)
        .await?;
    Ok(Json(application))
}

/// Accept or reject an application
#[utoipa::path(
    post,
    path = "/applications/{id}/decision",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decided application", body = Application),
        (status = 400, description = "Unknown outcome"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the job owner"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application already decided")
    )
)]
pub async fn decide(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<DecisionRequest>,
) -> AppResult<Json<Application>> {
    let application = state
        .services
        .applications()
        .decide(caller, id, payload.outcome)
        .await?;
    Ok(Json(application))
}
