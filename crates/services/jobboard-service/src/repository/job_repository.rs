//! Job repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::entities::job::{self, ActiveModel, Entity as JobEntity};
use common::AppResult;
use domain::{Job, JobCursor, JobFilter, JobStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Job repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: Job) -> AppResult<Job>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>>;

    /// Persist edited fields if the row still carries `expected_updated_at`.
    /// Returns `false` when another write got there first. The status column
    /// is never written here.
    async fn update(&self, job: Job, expected_updated_at: DateTime<Utc>) -> AppResult<bool>;

    /// Set an open job to closed. Returns `false` if it was not open.
    async fn close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Open jobs matching `filter`, strictly after `cursor` in
    /// `(created_at DESC, id DESC)` order, at most `limit` rows.
    async fn list_open(
        &self,
        filter: &JobFilter,
        cursor: Option<JobCursor>,
        limit: u64,
    ) -> AppResult<Vec<Job>>;
}

/// SeaORM-backed job repository
pub struct JobStore {
    db: DatabaseConnection,
}

impl JobStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepository for JobStore {
    async fn create(&self, job: Job) -> AppResult<Job> {
        let model = ActiveModel::from(job).insert(&self.db).await?;
        Job::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        JobEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Job::try_from)
            .transpose()
    }

    async fn update(&self, job: Job, expected_updated_at: DateTime<Utc>) -> AppResult<bool> {
        let id = job.id;
        let mut active = ActiveModel::from(job);
        active.id = NotSet;
        active.status = NotSet;
        active.owner_id = NotSet;
        active.created_at = NotSet;

        let result = JobEntity::update_many()
            .set(active)
            .filter(job::Column::Id.eq(id))
            .filter(job::Column::UpdatedAt.eq(expected_updated_at))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn close(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = JobEntity::update_many()
            .col_expr(job::Column::Status, Expr::value(JobStatus::Closed.as_str()))
            .col_expr(job::Column::UpdatedAt, Expr::value(at))
            .filter(job::Column::Id.eq(id))
            .filter(job::Column::Status.eq(JobStatus::Open.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_open(
        &self,
        filter: &JobFilter,
        cursor: Option<JobCursor>,
        limit: u64,
    ) -> AppResult<Vec<Job>> {
        let mut query = JobEntity::find().filter(job::Column::Status.eq(JobStatus::Open.as_str()));

        if let Some(location) = filter.normalized_location() {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((JobEntity, job::Column::Location)))).eq(location),
            );
        }
        if let Some(remote_type) = filter.remote_type {
            query = query.filter(job::Column::RemoteType.eq(remote_type.as_str()));
        }
        if let Some(seniority) = filter.seniority {
            query = query.filter(job::Column::Seniority.eq(seniority.as_str()));
        }
        if let Some(cursor) = cursor {
            query = query.filter(
                Condition::any()
                    .add(job::Column::CreatedAt.lt(cursor.created_at))
                    .add(
                        Condition::all()
                            .add(job::Column::CreatedAt.eq(cursor.created_at))
                            .add(job::Column::Id.lt(cursor.id)),
                    ),
            );
        }

        query
            .order_by_desc(job::Column::CreatedAt)
            .order_by_desc(job::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Job::try_from)
            .collect()
    }
}
