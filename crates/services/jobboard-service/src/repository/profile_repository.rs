//! Candidate profile repository implementation.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use super::entities::profile::{self, ActiveModel, Entity as ProfileEntity};
use common::{AppResult, OptionExt};
use domain::{Profile, ProfileUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Profile repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: Uuid) -> AppResult<Option<Profile>>;

    /// Write the provided fields of `update`, creating the row on first use.
    /// Absent fields are left to whatever the row holds at write time.
    async fn apply_update(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<Profile>;
}

/// SeaORM-backed profile repository
pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn find(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let result = ProfileEntity::find_by_id(user_id).one(&self.db).await?;
        Ok(result.map(Profile::from))
    }

    async fn apply_update(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<Profile> {
        let columns = patched_columns(&update);
        let mut row = Profile::empty(user_id);
        row.apply(update)?;

        // Single statement, so concurrent updates of different fields both land.
        ProfileEntity::insert(ActiveModel::from(row))
            .on_conflict(
                OnConflict::column(profile::Column::UserId)
                    .update_columns(columns)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        self.find(user_id).await?.ok_or_not_found()
    }
}

fn patched_columns(update: &ProfileUpdate) -> Vec<profile::Column> {
    let mut columns: Vec<profile::Column> = [
        (update.headline.is_absent(), profile::Column::Headline),
        (update.summary.is_absent(), profile::Column::Summary),
        (update.location.is_absent(), profile::Column::Location),
        (update.salary_expectation.is_absent(), profile::Column::SalaryExpectation),
    ]
    .into_iter()
    .filter(|(absent, _)| !absent)
    .map(|(_, column)| column)
    .collect();
    columns.push(profile::Column::UpdatedAt);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Patch;
    use sea_orm::IdenStatic;

    #[test]
    fn test_patched_columns_skip_absent_fields() {
        let columns = patched_columns(&ProfileUpdate {
            location: Patch::Value("Lisbon".to_string()),
            summary: Patch::Null,
            ..Default::default()
        });

        let names: Vec<&str> = columns.iter().map(|column| column.as_str()).collect();
        assert_eq!(names, ["summary", "location", "updated_at"]);
    }
}
