//! Job applications and the employer decision flow.
//!
//! ```text
//! submitted ──> reviewed ──> accepted | rejected
//!     └───────────────────> accepted | rejected
//! ```
//!
//! `accepted` and `rejected` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    APPLICATION_ACCEPTED, APPLICATION_REJECTED, APPLICATION_REVIEWED, APPLICATION_SUBMITTED,
    MAX_APPLICATION_MESSAGE_LENGTH,
};
use crate::error::{DomainError, DomainResult};
use crate::profile::{check_length, merge_text};

string_enum! {
    #[derive(Default)]
    #[serde(rename_all = "lowercase")]
    pub enum ApplicationStatus("status") {
        #[default]
        Submitted => APPLICATION_SUBMITTED,
        Reviewed => APPLICATION_REVIEWED,
        Accepted => APPLICATION_ACCEPTED,
        Rejected => APPLICATION_REJECTED,
    }
}

impl ApplicationStatus {
    /// Statuses an employer may still decide on
    pub const DECIDABLE: [ApplicationStatus; 2] =
        [ApplicationStatus::Submitted, ApplicationStatus::Reviewed];

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

string_enum! {
    /// Employer outcome for an application
    #[serde(rename_all = "lowercase")]
    pub enum Decision("outcome") {
        Accepted => APPLICATION_ACCEPTED,
        Rejected => APPLICATION_REJECTED,
    }
}

impl From<Decision> for ApplicationStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accepted => ApplicationStatus::Accepted,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Candidate application to a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Application {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub message: Option<String>,
    pub status: ApplicationStatus,
    /// Submission timestamp
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn submit(candidate_id: Uuid, job_id: Uuid, message: Option<String>) -> DomainResult<Self> {
        let message = merge_text(message.into(), None);
        check_length("message", message.as_ref(), MAX_APPLICATION_MESSAGE_LENGTH)?;

        let now = crate::now();
        Ok(Self {
            id: Uuid::new_v4(),
            candidate_id,
            job_id,
            message,
            status: ApplicationStatus::Submitted,
            created_at: now,
            updated_at: now,
        })
    }

    /// Move to a terminal status. Terminal applications are never changed.
    pub fn decide(&mut self, decision: Decision) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(already_decided());
        }
        self.status = decision.into();
        self.updated_at = crate::now();
        Ok(())
    }

    /// Returns `false` when the application was already reviewed.
    pub fn mark_reviewed(&mut self) -> DomainResult<bool> {
        match self.status {
            ApplicationStatus::Submitted => {
                self.status = ApplicationStatus::Reviewed;
                self.updated_at = crate::now();
                Ok(true)
            }
            ApplicationStatus::Reviewed => Ok(false),
            _ => Err(already_decided()),
        }
    }
}

/// Conflict returned when an application has reached a terminal status
pub fn already_decided() -> DomainError {
    DomainError::conflict("application already decided")
}

/// Apply request body
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewApplication {
    pub job_id: Uuid,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decision request body
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DecisionRequest {
    pub outcome: Decision,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted() -> Application {
        Application::submit(Uuid::new_v4(), Uuid::new_v4(), Some(" Hello ".to_string())).unwrap()
    }

    #[test]
    fn test_submit_normalizes_message() {
        let application = submitted();
        assert_eq!(application.status, ApplicationStatus::Submitted);
        assert_eq!(application.message.as_deref(), Some("Hello"));

        let blank = Application::submit(Uuid::new_v4(), Uuid::new_v4(), Some("  ".into())).unwrap();
        assert_eq!(blank.message, None);
    }

    #[test]
    fn test_submit_rejects_long_message() {
        let message = "x".repeat(MAX_APPLICATION_MESSAGE_LENGTH + 1);
        assert!(matches!(
            Application::submit(Uuid::new_v4(), Uuid::new_v4(), Some(message)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_decide_from_submitted_and_reviewed() {
        let mut application = submitted();
        application.decide(Decision::Rejected).unwrap();
        assert_eq!(application.status, ApplicationStatus::Rejected);

        let mut application = submitted();
        assert!(application.mark_reviewed().unwrap());
        application.decide(Decision::Accepted).unwrap();
        assert_eq!(application.status, ApplicationStatus::Accepted);
    }

    #[test]
    fn test_terminal_status_is_final() {
        let mut application = submitted();
        application.decide(Decision::Accepted).unwrap();

        assert!(matches!(
            application.decide(Decision::Rejected),
            Err(DomainError::Conflict(_))
        ));
        assert!(application.mark_reviewed().is_err());
        assert_eq!(application.status, ApplicationStatus::Accepted);
    }

    #[test]
    fn test_mark_reviewed_is_idempotent() {
        let mut application = submitted();
        assert!(application.mark_reviewed().unwrap());
        assert!(!application.mark_reviewed().unwrap());
    }

    #[test]
    fn test_decision_parsing() {
        assert_eq!("accepted".parse::<Decision>().unwrap(), Decision::Accepted);
        assert!("reviewed".parse::<Decision>().is_err());
    }
}
