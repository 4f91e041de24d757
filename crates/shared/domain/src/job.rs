//! Job postings, listing filters and keyset pagination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_PAGE_SIZE, JOB_STATUS_CLOSED, JOB_STATUS_OPEN, MAX_JOB_DESCRIPTION_LENGTH,
    MAX_JOB_TITLE_LENGTH, MAX_PAGE_SIZE, MAX_PROFILE_FIELD_LENGTH, REMOTE_HYBRID, REMOTE_ON_SITE,
    REMOTE_REMOTE, SENIORITY_JUNIOR, SENIORITY_LEAD, SENIORITY_MID, SENIORITY_SENIOR,
};
use crate::error::{DomainError, DomainResult};
use crate::patch::Patch;
use crate::profile::{check_length, merge_text, validate_amount};

string_enum! {
    /// Where the work happens
    #[derive(Default)]
    #[serde(rename_all = "kebab-case")]
    pub enum RemoteType("remote_type") {
        #[default]
        OnSite => REMOTE_ON_SITE,
        Remote => REMOTE_REMOTE,
        Hybrid => REMOTE_HYBRID,
    }
}

string_enum! {
    #[derive(Default)]
    #[serde(rename_all = "lowercase")]
    pub enum Seniority("seniority") {
        Junior => SENIORITY_JUNIOR,
        #[default]
        Mid => SENIORITY_MID,
        Senior => SENIORITY_SENIOR,
        Lead => SENIORITY_LEAD,
    }
}

string_enum! {
    /// Closed jobs are kept for history and never listed
    #[derive(Default)]
    #[serde(rename_all = "lowercase")]
    pub enum JobStatus("status") {
        #[default]
        Open => JOB_STATUS_OPEN,
        Closed => JOB_STATUS_CLOSED,
    }
}

/// Job posting owned by an employer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Job {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub remote_type: RemoteType,
    pub seniority: Seniority,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Build an open job from a draft. The draft is normalised and validated.
    pub fn post(owner_id: Uuid, draft: NewJob) -> DomainResult<Self> {
        let now = crate::now();
        let job = Self {
            id: Uuid::new_v4(),
            owner_id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            location: merge_text(draft.location.into(), None),
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            remote_type: draft.remote_type,
            seniority: draft.seniority,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        };
        job.validate()?;
        Ok(job)
    }

    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open
    }

    /// Close the job. Returns `false` when it was already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.status = JobStatus::Closed;
        self.updated_at = crate::next_stamp(self.updated_at);
        true
    }

    /// Merge a partial update. On error the job is left untouched.
    pub fn apply(&mut self, update: JobUpdate) -> DomainResult<()> {
        let mut merged = self.clone();
        merged.title = required_text("title", update.title, merged.title)?;
        merged.description = required_text("description", update.description, merged.description)?;
        merged.location = merge_text(update.location, merged.location);
        merged.salary_min = update.salary_min.apply_to(merged.salary_min);
        merged.salary_max = update.salary_max.apply_to(merged.salary_max);
        merged.remote_type = update.remote_type.apply_to(Some(merged.remote_type)).unwrap_or_default();
        merged.seniority = update.seniority.apply_to(Some(merged.seniority)).unwrap_or_default();
        merged.validate()?;

        merged.updated_at = crate::next_stamp(self.updated_at);
        *self = merged;
        Ok(())
    }

    fn validate(&self) -> DomainResult<()> {
        if self.title.is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if self.description.is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        check_length("title", Some(&self.title), MAX_JOB_TITLE_LENGTH)?;
        check_length("description", Some(&self.description), MAX_JOB_DESCRIPTION_LENGTH)?;
        check_length("location", self.location.as_ref(), MAX_PROFILE_FIELD_LENGTH)?;

        if let Some(min) = self.salary_min {
            validate_amount("salary_min", min)?;
        }
        if let Some(max) = self.salary_max {
            validate_amount("salary_max", max)?;
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(DomainError::validation(
                    "salary_min must not exceed salary_max",
                ));
            }
        }
        Ok(())
    }
}

fn required_text(field: &str, patch: Patch<String>, current: String) -> DomainResult<String> {
    match patch {
        Patch::Absent => Ok(current),
        Patch::Null => Err(DomainError::validation(format!("{} is required", field))),
        Patch::Value(value) => Ok(value.trim().to_string()),
    }
}

/// Job posting draft
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewJob {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub remote_type: RemoteType,
    #[serde(default)]
    pub seniority: Seniority,
}

/// Partial job update. `null` on an enum field resets it to its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobUpdate {
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub title: Patch<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub description: Patch<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub location: Patch<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub salary_min: Patch<f64>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<f64>))]
    pub salary_max: Patch<f64>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<RemoteType>))]
    pub remote_type: Patch<RemoteType>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Seniority>))]
    pub seniority: Patch<Seniority>,
}

/// Listing filter. Only open jobs are ever listed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobFilter {
    /// Case-insensitive exact match
    pub location: Option<String>,
    pub remote_type: Option<RemoteType>,
    pub seniority: Option<Seniority>,
}

impl JobFilter {
    /// Location in the form it is compared against (trimmed, lowercase)
    pub fn normalized_location(&self) -> Option<String> {
        self.location
            .as_deref()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
    }
}

/// Page request for keyset pagination
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageRequest {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn new(limit: Option<u64>, cursor: Option<String>) -> Self {
        Self { limit, cursor }
    }

    /// Requested size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn cursor(&self) -> DomainResult<Option<JobCursor>> {
        self.cursor.as_deref().map(JobCursor::parse).transpose()
    }
}

/// Position after the last job of a page in `(created_at DESC, id DESC)` order.
///
/// Encoded as `<created_at in microseconds>.<id without hyphens>`. Clients
/// treat it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

impl JobCursor {
    pub fn after(job: &Job) -> Self {
        Self {
            created_at: job.created_at,
            id: job.id,
        }
    }

    pub fn encode(&self) -> String {
        format!("{}.{}", self.created_at.timestamp_micros(), self.id.simple())
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let invalid = || DomainError::validation("Invalid cursor");
        let (micros, id) = raw.split_once('.').ok_or_else(invalid)?;
        let micros: i64 = micros.parse().map_err(|_| invalid())?;
        let created_at = DateTime::from_timestamp_micros(micros).ok_or_else(invalid)?;
        let id = Uuid::try_parse(id).map_err(|_| invalid())?;
        Ok(Self { created_at, id })
    }
}

/// One page of open jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobPage {
    pub data: Vec<Job>,
    /// Present when more jobs follow
    pub next_cursor: Option<String>,
}

impl JobPage {
    /// Build a page from up to `limit + 1` rows fetched in listing order.
    pub fn from_rows(mut rows: Vec<Job>, limit: u64) -> Self {
        let limit = limit as usize;
        let next_cursor = if rows.len() > limit {
            rows.truncate(limit);
            rows.last().map(|job| JobCursor::after(job).encode())
        } else {
            None
        };
        Self {
            data: rows,
            next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewJob {
        NewJob {
            title: "  Rust Engineer ".to_string(),
            description: "Build services".to_string(),
            location: Some("Berlin".to_string()),
            salary_min: Some(60_000.0),
            salary_max: Some(90_000.0),
            remote_type: RemoteType::default(),
            seniority: Seniority::default(),
        }
    }

    #[test]
    fn test_post_defaults() {
        let job = Job::post(Uuid::new_v4(), draft()).unwrap();
        assert_eq!(job.title, "Rust Engineer");
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.remote_type, RemoteType::OnSite);
        assert_eq!(job.seniority, Seniority::Mid);
    }

    #[test]
    fn test_post_rejects_blank_title() {
        let mut draft = draft();
        draft.title = "   ".to_string();
        assert!(matches!(
            Job::post(Uuid::new_v4(), draft),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_post_rejects_inverted_salary_range() {
        let mut draft = draft();
        draft.salary_min = Some(100_000.0);
        assert!(Job::post(Uuid::new_v4(), draft).is_err());
    }

    #[test]
    fn test_post_rejects_negative_salary() {
        let mut draft = draft();
        draft.salary_min = Some(-5.0);
        draft.salary_max = None;
        assert!(Job::post(Uuid::new_v4(), draft).is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut job = Job::post(Uuid::new_v4(), draft()).unwrap();
        assert!(job.close());
        assert!(!job.close());
        assert_eq!(job.status, JobStatus::Closed);
    }

    #[test]
    fn test_every_change_moves_updated_at_forward() {
        let mut job = Job::post(Uuid::new_v4(), draft()).unwrap();
        // A stamp ahead of the clock still has to advance.
        job.updated_at = crate::now() + chrono::Duration::seconds(60);
        let posted_at = job.updated_at;

        job.apply(JobUpdate {
            title: Patch::Value("Staff engineer".to_string()),
            ..Default::default()
        })
        .unwrap();
        let updated_at = job.updated_at;
        assert!(updated_at > posted_at);

        assert!(job.close());
        assert!(job.updated_at > updated_at);
    }

    #[test]
    fn test_update_keeps_job_on_invalid_merge() {
        let mut job = Job::post(Uuid::new_v4(), draft()).unwrap();
        let before = job.clone();
        let result = job.apply(JobUpdate {
            salary_max: Patch::Value(10.0),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(job, before);
    }

    #[test]
    fn test_update_null_title_rejected() {
        let mut job = Job::post(Uuid::new_v4(), draft()).unwrap();
        let result = job.apply(JobUpdate {
            title: Patch::Null,
            ..Default::default()
        });
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_remote_type_wire_format() {
        assert_eq!("on-site".parse::<RemoteType>().unwrap(), RemoteType::OnSite);
        assert_eq!(
            serde_json::to_string(&RemoteType::OnSite).unwrap(),
            "\"on-site\""
        );
        assert!("onsite".parse::<RemoteType>().is_err());
    }

    #[test]
    fn test_page_limit_is_clamped() {
        assert_eq!(PageRequest::default().limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(0), None).limit(), 1);
        assert_eq!(PageRequest::new(Some(1_000), None).limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_cursor_roundtrip_and_garbage() {
        let job = Job::post(Uuid::new_v4(), draft()).unwrap();
        let cursor = JobCursor::after(&job);
        assert_eq!(JobCursor::parse(&cursor.encode()).unwrap(), cursor);

        for raw in ["", "abc", "123", "x.y", "123.not-a-uuid"] {
            assert!(matches!(
                JobCursor::parse(raw),
                Err(DomainError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_page_from_rows_sets_cursor_only_when_more() {
        let owner = Uuid::new_v4();
        let rows: Vec<Job> = (0..3).map(|_| Job::post(owner, draft()).unwrap()).collect();

        let page = JobPage::from_rows(rows.clone(), 2);
        assert_eq!(page.data.len(), 2);
        assert_eq!(
            page.next_cursor,
            Some(JobCursor::after(&rows[1]).encode())
        );

        let page = JobPage::from_rows(rows, 3);
        assert_eq!(page.data.len(), 3);
        assert!(page.next_cursor.is_none());
    }
}
