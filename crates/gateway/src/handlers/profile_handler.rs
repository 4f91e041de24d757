//! Candidate profile handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use common::AppResult;
use domain::{CallerIdentity, Profile, ProfileUpdate};

use crate::extractors::ApiJson;
use crate::state::AppState;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_profile).patch(update_profile).post(update_profile),
    )
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Candidate profile", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only candidates have profiles"),
        (status = 404, description = "Profile not created yet")
    )
)]
pub async fn get_profile(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
) -> AppResult<Json<Profile>> {
    let profile = state.services.profiles().get_profile(caller).await?;
    Ok(Json(profile))
}

/// Partially update the caller's profile
///
/// Omitted fields keep their value, `null` clears a field.
#[utoipa::path(
    patch,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only candidates have profiles")
    )
)]
pub async fn update_profile(
    Extension(caller): Extension<CallerIdentity>,
    State(state): State<AppState>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .services
        .profiles()
        .update_profile(caller, update)
        .await?;
    Ok(Json(profile))
}
