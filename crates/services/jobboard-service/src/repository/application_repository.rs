//! Job application repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::conflict_on_unique;
use super::entities::application::{self, ActiveModel, Entity as ApplicationEntity};
use common::AppResult;
use domain::{Application, ApplicationStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Application repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert an application. A second one for the same (candidate, job) is
    /// rejected by the unique index and reported as `Conflict`.
    async fn create(&self, application: Application) -> AppResult<Application>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>>;

    /// Compare-and-set the status: only rows currently in one of `from`
    /// change. Returns whether the row changed.
    async fn transition(
        &self,
        id: Uuid,
        from: Vec<ApplicationStatus>,
        to: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Applications to a job, newest first
    async fn list_by_job(&self, job_id: Uuid) -> AppResult<Vec<Application>>;

    /// Applications of a candidate, newest first
    async fn list_by_candidate(&self, candidate_id: Uuid) -> AppResult<Vec<Application>>;
}

/// SeaORM-backed application repository
pub struct ApplicationStore {
    db: DatabaseConnection,
}

impl ApplicationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepository for ApplicationStore {
    async fn create(&self, application: Application) -> AppResult<Application> {
        let model = ActiveModel::from(application)
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "already applied"))?;
        Application::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        ApplicationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Application::try_from)
            .transpose()
    }

    async fn transition(
        &self,
        id: Uuid,
        from: Vec<ApplicationStatus>,
        to: ApplicationStatus,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = ApplicationEntity::update_many()
            .col_expr(application::Column::Status, Expr::value(to.as_str()))
            .col_expr(application::Column::UpdatedAt, Expr::value(at))
            .filter(application::Column::Id.eq(id))
            .filter(application::Column::Status.is_in(from.iter().map(|s| s.as_str())))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_job(&self, job_id: Uuid) -> AppResult<Vec<Application>> {
        ApplicationEntity::find()
            .filter(application::Column::JobId.eq(job_id))
            .order_by_desc(application::Column::CreatedAt)
            .order_by_desc(application::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Application::try_from)
            .collect()
    }

    async fn list_by_candidate(&self, candidate_id: Uuid) -> AppResult<Vec<Application>> {
        ApplicationEntity::find()
            .filter(application::Column::CandidateId.eq(candidate_id))
            .order_by_desc(application::Column::CreatedAt)
            .order_by_desc(application::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Application::try_from)
            .collect()
    }
}
