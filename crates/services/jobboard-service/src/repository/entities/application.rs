//! Job application entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use common::{AppError, AppResult};
use domain::Application;

use super::corrupt_column;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Application {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Application {
            id: model.id,
            candidate_id: model.candidate_id,
            job_id: model.job_id,
            message: model.message,
            status: model.status.parse().map_err(corrupt_column)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Application> for ActiveModel {
    fn from(application: Application) -> Self {
        ActiveModel {
            id: Set(application.id),
            candidate_id: Set(application.candidate_id),
            job_id: Set(application.job_id),
            message: Set(application.message),
            status: Set(application.status.into()),
            created_at: Set(application.created_at),
            updated_at: Set(application.updated_at),
        }
    }
}
