//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{SignInRequest, SignUpRequest};
use crate::handlers::health_handler::RootResponse;
use domain::{
    Application, ApplicationStatus, Decision, DecisionRequest, Job, JobPage, JobStatus,
    JobUpdate, NewApplication, NewJob, Profile, ProfileUpdate, RemoteType, Seniority,
    TokenResponse, UserResponse, UserRole,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::root,
        crate::handlers::auth_handler::sign_up,
        crate::handlers::auth_handler::sign_in,
        crate::handlers::auth_handler::refresh,
        crate::handlers::profile_handler::get_profile,
        crate::handlers::profile_handler::update_profile,
        crate::handlers::job_handler::list_jobs,
        crate::handlers::job_handler::get_job,
        crate::handlers::job_handler::post_job,
        crate::handlers::job_handler::update_job,
        crate::handlers::job_handler::close_job,
        crate::handlers::job_handler::list_job_applications,
        crate::handlers::application_handler::apply,
        crate::handlers::application_handler::list_my_applications,
        crate::handlers::application_handler::mark_reviewed,
        crate::handlers::application_handler::decide,
    ),
    components(
        schemas(
            RootResponse,
            SignUpRequest,
            SignInRequest,
            TokenResponse,
            UserResponse,
            UserRole,
            Profile,
            ProfileUpdate,
            Job,
            JobPage,
            NewJob,
            JobUpdate,
            JobStatus,
            RemoteType,
            Seniority,
            Application,
            ApplicationStatus,
            NewApplication,
            Decision,
            DecisionRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Authentication", description = "Signup, sign-in and token refresh"),
        (name = "Profile", description = "Candidate profiles"),
        (name = "Jobs", description = "Job postings"),
        (name = "Applications", description = "Job applications and decisions"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
