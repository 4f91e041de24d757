//! Service container - one place to reach every job board service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use common::AppResult;

use super::{
    ApplicationManager, ApplicationService, IdentityManager, IdentityService, JobManager,
    JobService, ProfileManager, ProfileService,
};
use crate::client::AuthProvider;
use crate::infra::Database;
use crate::repository::{ApplicationStore, JobStore, ProfileStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceContainer: Send + Sync {
    fn identity(&self) -> Arc<dyn IdentityService>;

    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn jobs(&self) -> Arc<dyn JobService>;

    fn applications(&self) -> Arc<dyn ApplicationService>;

    /// Check that the backing database answers
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    db: Database,
    identity: Arc<dyn IdentityService>,
    profiles: Arc<dyn ProfileService>,
    jobs: Arc<dyn JobService>,
    applications: Arc<dyn ApplicationService>,
}

impl Services {
    /// Wire stores and services over one database.
    pub fn new(db: Database, auth: Arc<dyn AuthProvider>, timeout: Duration) -> Self {
        let conn = db.get_connection();
        let users = Arc::new(UserStore::new(conn.clone()));
        let profiles = Arc::new(ProfileStore::new(conn.clone()));
        let jobs = Arc::new(JobStore::new(conn.clone()));
        let applications = Arc::new(ApplicationStore::new(conn));

        Self {
            db,
            identity: Arc::new(IdentityManager::new(users, auth, timeout)),
            profiles: Arc::new(ProfileManager::new(profiles, timeout)),
            jobs: Arc::new(JobManager::new(jobs.clone(), timeout)),
            applications: Arc::new(ApplicationManager::new(applications, jobs, timeout)),
        }
    }
}

#[async_trait]
impl ServiceContainer for Services {
    fn identity(&self) -> Arc<dyn IdentityService> {
        self.identity.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profiles.clone()
    }

    fn jobs(&self) -> Arc<dyn JobService> {
        self.jobs.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationService> {
        self.applications.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}
