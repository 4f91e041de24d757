//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Role of users looking for work
pub const ROLE_CANDIDATE: &str = "candidate";

/// Role of users publishing jobs
pub const ROLE_EMPLOYER: &str = "employer";

/// Operator role, provisioned out of band
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Jobs
// =============================================================================

pub const REMOTE_ON_SITE: &str = "on-site";
pub const REMOTE_REMOTE: &str = "remote";
pub const REMOTE_HYBRID: &str = "hybrid";

pub const SENIORITY_JUNIOR: &str = "junior";
pub const SENIORITY_MID: &str = "mid";
pub const SENIORITY_SENIOR: &str = "senior";
pub const SENIORITY_LEAD: &str = "lead";

pub const JOB_STATUS_OPEN: &str = "open";
pub const JOB_STATUS_CLOSED: &str = "closed";

/// Maximum job title length in characters
pub const MAX_JOB_TITLE_LENGTH: usize = 200;

/// Maximum job description length in characters
pub const MAX_JOB_DESCRIPTION_LENGTH: usize = 20_000;

// =============================================================================
// Applications
// =============================================================================

pub const APPLICATION_SUBMITTED: &str = "submitted";
pub const APPLICATION_REVIEWED: &str = "reviewed";
pub const APPLICATION_ACCEPTED: &str = "accepted";
pub const APPLICATION_REJECTED: &str = "rejected";

/// Maximum cover message length in characters
pub const MAX_APPLICATION_MESSAGE_LENGTH: usize = 5_000;

// =============================================================================
// Profiles
// =============================================================================

/// Maximum length of short profile fields (headline, location)
pub const MAX_PROFILE_FIELD_LENGTH: usize = 200;

/// Maximum profile summary length in characters
pub const MAX_PROFILE_SUMMARY_LENGTH: usize = 5_000;

// =============================================================================
// Pagination
// =============================================================================

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound for a single page
pub const MAX_PAGE_SIZE: u64 = 100;

// =============================================================================
// Authentication
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
