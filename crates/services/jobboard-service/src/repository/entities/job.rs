//! Job posting entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::{AppError, AppResult};
use domain::Job;

use super::corrupt_column;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub remote_type: String,
    pub seniority: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Job {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Job {
            id: model.id,
            owner_id: model.owner_id,
            title: model.title,
            description: model.description,
            location: model.location,
            salary_min: model.salary_min,
            salary_max: model.salary_max,
            remote_type: model.remote_type.parse().map_err(corrupt_column)?,
            seniority: model.seniority.parse().map_err(corrupt_column)?,
            status: model.status.parse().map_err(corrupt_column)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Job> for ActiveModel {
    fn from(job: Job) -> Self {
        ActiveModel {
            id: Set(job.id),
            owner_id: Set(job.owner_id),
            title: Set(job.title),
            description: Set(job.description),
            location: Set(job.location),
            salary_min: Set(job.salary_min),
            salary_max: Set(job.salary_max),
            remote_type: Set(job.remote_type.into()),
            seniority: Set(job.seniority.into()),
            status: Set(job.status.into()),
            created_at: Set(job.created_at),
            updated_at: Set(job.updated_at),
        }
    }
}
