//! Route configuration.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    application_routes, auth_routes, health_routes, job_routes, profile_routes,
    public_job_routes, root,
};
use crate::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let authenticated = || middleware::from_fn_with_state(state.clone(), auth_middleware);
    let rate_limited = || middleware::from_fn_with_state(state.clone(), rate_limit_middleware);

    Router::new()
        // Banner and health check (no auth, no rate limit)
        .route("/", get(root))
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth routes (no auth required, stricter rate limit)
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        // Profile routes (auth required, general rate limit)
        .nest(
            "/profile",
            profile_routes()
                .route_layer(authenticated())
                .route_layer(rate_limited()),
        )
        // Job routes: listing and detail are public, the rest needs auth
        .nest(
            "/jobs",
            public_job_routes()
                .merge(job_routes().route_layer(authenticated()))
                .route_layer(rate_limited()),
        )
        // Application routes (auth required, general rate limit)
        .nest(
            "/applications",
            application_routes()
                .route_layer(authenticated())
                .route_layer(rate_limited()),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
