//! Application service: candidates apply, employers review and decide.
//!
//! Status changes go through a compare-and-set on the stored status, so two
//! concurrent decisions on one application cannot both win.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use common::{bounded, AppError, AppResult, OptionExt};
use domain::application::already_decided;
use domain::{Application, ApplicationStatus, CallerIdentity, Decision, Job, UserRole};

use crate::repository::{ApplicationRepository, JobRepository};

#[async_trait]
pub trait ApplicationService: Send + Sync {
    /// Apply to an open job
    async fn apply(
        &self,
        caller: CallerIdentity,
        job_id: Uuid,
        message: Option<String>,
    ) -> AppResult<Application>;

    /// Accept or reject an application to one of the caller's jobs
    async fn decide(
        &self,
        caller: CallerIdentity,
        application_id: Uuid,
        outcome: Decision,
    ) -> AppResult<Application>;

    /// Mark a submitted application as reviewed
    async fn mark_reviewed(
        &self,
        caller: CallerIdentity,
        application_id: Uuid,
    ) -> AppResult<Application>;

    /// Applications received by one of the caller's jobs, newest first
    async fn list_for_job(&self, caller: CallerIdentity, job_id: Uuid)
        -> AppResult<Vec<Application>>;

    /// The caller's own applications, newest first
    async fn list_mine(&self, caller: CallerIdentity) -> AppResult<Vec<Application>>;
}

pub struct ApplicationManager {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    timeout: Duration,
}

impl ApplicationManager {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            applications,
            jobs,
            timeout,
        }
    }

    async fn job(&self, job_id: Uuid) -> AppResult<Job> {
        self.jobs.find_by_id(job_id).await?.ok_or_not_found()
    }

    /// Load an application the caller may manage through its job.
    async fn managed(
        &self,
        caller: CallerIdentity,
        application_id: Uuid,
    ) -> AppResult<Application> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_not_found()?;
        let job = self.job(application.job_id).await?;
        caller.require_manage(job.owner_id)?;
        Ok(application)
    }
}

#[async_trait]
impl ApplicationService for ApplicationManager {
    async fn apply(
        &self,
        caller: CallerIdentity,
        job_id: Uuid,
        message: Option<String>,
    ) -> AppResult<Application> {
        bounded(self.timeout, "apply", async {
            caller.require_role(UserRole::Candidate)?;

            let job = self.job(job_id).await?;
            if !job.is_open() {
                return Err(AppError::conflict("job closed"));
            }

            let application = Application::submit(caller.user_id, job_id, message)?;
            let application = self.applications.create(application).await?;
            info!(
                application_id = %application.id,
                %job_id,
                candidate_id = %caller.user_id,
                "Application submitted"
            );
            Ok(application)
        })
        .await
    }

    async fn decide(
        &self,
        caller: CallerIdentity,
        application_id: Uuid,
        outcome: Decision,
    ) -> AppResult<Application> {
        bounded(self.timeout, "decide", async {
            let mut application = self.managed(caller, application_id).await?;
            application.decide(outcome)?;

            let changed = self
                .applications
                .transition(
                    application_id,
                    ApplicationStatus::DECIDABLE.to_vec(),
                    application.status,
                    application.updated_at,
                )
                .await?;
            if !changed {
                return Err(AppError::from(already_decided()));
            }

            info!(%application_id, outcome = %outcome, decided_by = %caller.user_id, "Application decided");
            Ok(application)
        })
        .await
    }

    async fn mark_reviewed(
        &self,
        caller: CallerIdentity,
        application_id: Uuid,
    ) -> AppResult<Application> {
        bounded(self.timeout, "mark_reviewed", async {
            let mut application = self.managed(caller, application_id).await?;
            if !application.mark_reviewed()? {
                return Ok(application);
            }

            let changed = self
                .applications
                .transition(
                    application_id,
                    vec![ApplicationStatus::Submitted],
                    ApplicationStatus::Reviewed,
                    application.updated_at,
                )
                .await?;
            if changed {
                return Ok(application);
            }

            // Lost a race: fine if someone else reviewed it, not if it was decided.
            let current = self
                .applications
                .find_by_id(application_id)
                .await?
                .ok_or_not_found()?;
            match current.status {
                ApplicationStatus::Reviewed => Ok(current),
                _ => Err(AppError::from(already_decided())),
            }
        })
        .await
    }

    async fn list_for_job(
        &self,
        caller: CallerIdentity,
        job_id: Uuid,
    ) -> AppResult<Vec<Application>> {
        bounded(self.timeout, "list_for_job", async {
            let job = self.job(job_id).await?;
            caller.require_manage(job.owner_id)?;
            self.applications.list_by_job(job_id).await
        })
        .await
    }

    async fn list_mine(&self, caller: CallerIdentity) -> AppResult<Vec<Application>> {
        bounded(self.timeout, "list_mine", async {
            caller.require_role(UserRole::Candidate)?;
            self.applications.list_by_candidate(caller.user_id).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockApplicationRepository, MockJobRepository};
    use domain::NewJob;

    struct Fixture {
        owner: CallerIdentity,
        candidate: CallerIdentity,
        job: Job,
    }

    impl Fixture {
        fn new() -> Self {
            let owner = CallerIdentity::new(Uuid::new_v4(), UserRole::Employer);
            let candidate = CallerIdentity::new(Uuid::new_v4(), UserRole::Candidate);
            let job = Job::post(
                owner.user_id,
                NewJob {
                    title: "Rust engineer".to_string(),
                    description: "Own the job board backend".to_string(),
                    location: None,
                    salary_min: None,
                    salary_max: None,
                    remote_type: Default::default(),
                    seniority: Default::default(),
                },
            )
            .unwrap();
            Self {
                owner,
                candidate,
                job,
            }
        }

        fn application(&self, status: ApplicationStatus) -> Application {
            let mut application =
                Application::submit(self.candidate.user_id, self.job.id, None).unwrap();
            application.status = status;
            application
        }

        fn jobs(&self) -> MockJobRepository {
            let job = self.job.clone();
            let mut jobs = MockJobRepository::new();
            jobs.expect_find_by_id()
                .returning(move |_| Ok(Some(job.clone())));
            jobs
        }
    }

    fn manager(
        applications: MockApplicationRepository,
        jobs: MockJobRepository,
    ) -> ApplicationManager {
        ApplicationManager::new(Arc::new(applications), Arc::new(jobs), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_employer_cannot_apply() {
        let fx = Fixture::new();
        let mut applications = MockApplicationRepository::new();
        applications.expect_create().never();

        let result = manager(applications, fx.jobs())
            .apply(fx.owner, fx.job.id, None)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_apply_to_unknown_job_is_not_found() {
        let fx = Fixture::new();
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(MockApplicationRepository::new(), jobs)
            .apply(fx.candidate, Uuid::new_v4(), None)
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_apply_to_closed_job_conflicts() {
        let mut fx = Fixture::new();
        fx.job.close();
        let mut applications = MockApplicationRepository::new();
        applications.expect_create().never();

        let result = manager(applications, fx.jobs())
            .apply(fx.candidate, fx.job.id, None)
            .await;
        match result {
            Err(AppError::Conflict(message)) => assert_eq!(message, "job closed"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apply_submits_with_trimmed_message() {
        let fx = Fixture::new();
        let mut applications = MockApplicationRepository::new();
        applications.expect_create().returning(Ok);

        let application = manager(applications, fx.jobs())
            .apply(fx.candidate, fx.job.id, Some("  Hire me  ".to_string()))
            .await
            .unwrap();
        assert_eq!(application.status, ApplicationStatus::Submitted);
        assert_eq!(application.message.as_deref(), Some("Hire me"));
    }

    #[tokio::test]
    async fn test_duplicate_application_conflict_passes_through() {
        let fx = Fixture::new();
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_create()
            .returning(|_| Err(AppError::conflict("already applied")));

        let result = manager(applications, fx.jobs())
            .apply(fx.candidate, fx.job.id, None)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_decide_by_non_owner_is_forbidden() {
        let fx = Fixture::new();
        let application = fx.application(ApplicationStatus::Submitted);
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(application.clone())));
        applications.expect_transition().never();
        let stranger = CallerIdentity::new(Uuid::new_v4(), UserRole::Employer);

        let result = manager(applications, fx.jobs())
            .decide(stranger, Uuid::new_v4(), Decision::Accepted)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_decide_uses_compare_and_set() {
        let fx = Fixture::new();
        let application = fx.application(ApplicationStatus::Reviewed);
        let application_id = application.id;
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(application.clone())));
        applications
            .expect_transition()
            .withf(move |id, from, to, _| {
                *id == application_id
                    && from.as_slice() == &ApplicationStatus::DECIDABLE[..]
                    && *to == ApplicationStatus::Rejected
            })
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let decided = manager(applications, fx.jobs())
            .decide(fx.owner, application_id, Decision::Rejected)
            .await
            .unwrap();
        assert_eq!(decided.status, ApplicationStatus::Rejected);
    }

    #[tokio::test]
    async fn test_decide_on_terminal_application_conflicts() {
        let fx = Fixture::new();
        let application = fx.application(ApplicationStatus::Accepted);
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(application.clone())));
        applications.expect_transition().never();

        let result = manager(applications, fx.jobs())
            .decide(fx.owner, Uuid::new_v4(), Decision::Rejected)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_decide_losing_race_conflicts() {
        let fx = Fixture::new();
        let application = fx.application(ApplicationStatus::Submitted);
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(application.clone())));
        applications
            .expect_transition()
            .returning(|_, _, _, _| Ok(false));

        let result = manager(applications, fx.jobs())
            .decide(fx.owner, Uuid::new_v4(), Decision::Accepted)
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_mark_reviewed_is_idempotent() {
        let fx = Fixture::new();
        let application = fx.application(ApplicationStatus::Reviewed);
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_find_by_id()
            .returning(move |_| Ok(Some(application.clone())));
        applications.expect_transition().never();

        let reviewed = manager(applications, fx.jobs())
            .mark_reviewed(fx.owner, Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::Reviewed);
    }

    #[tokio::test]
    async fn test_admin_lists_any_job_applications() {
        let fx = Fixture::new();
        let application = fx.application(ApplicationStatus::Submitted);
        let job_id = fx.job.id;
        let mut applications = MockApplicationRepository::new();
        applications
            .expect_list_by_job()
            .withf(move |id| *id == job_id)
            .returning(move |_| Ok(vec![application.clone()]));
        let admin = CallerIdentity::new(Uuid::new_v4(), UserRole::Admin);

        let listed = manager(applications, fx.jobs())
            .list_for_job(admin, job_id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_list_mine_is_candidate_only() {
        let fx = Fixture::new();
        let mut applications = MockApplicationRepository::new();
        applications.expect_list_by_candidate().never();

        let result = manager(applications, fx.jobs()).list_mine(fx.owner).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
