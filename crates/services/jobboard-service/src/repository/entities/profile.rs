//! Candidate profile entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::Profile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub headline: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    pub location: Option<String>,
    pub salary_expectation: Option<f64>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Profile {
    fn from(model: Model) -> Self {
        Profile {
            user_id: model.user_id,
            headline: model.headline,
            summary: model.summary,
            location: model.location,
            salary_expectation: model.salary_expectation,
            updated_at: model.updated_at,
        }
    }
}

impl From<Profile> for ActiveModel {
    fn from(profile: Profile) -> Self {
        ActiveModel {
            user_id: Set(profile.user_id),
            headline: Set(profile.headline),
            summary: Set(profile.summary),
            location: Set(profile.location),
            salary_expectation: Set(profile.salary_expectation),
            updated_at: Set(profile.updated_at),
        }
    }
}
