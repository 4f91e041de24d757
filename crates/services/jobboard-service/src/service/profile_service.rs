//! Candidate profile service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use common::{bounded, AppResult, OptionExt};
use domain::{CallerIdentity, Profile, ProfileUpdate, UserRole};

use crate::repository::ProfileRepository;

#[async_trait]
pub trait ProfileService: Send + Sync {
    /// The caller's own profile
    async fn get_profile(&self, caller: CallerIdentity) -> AppResult<Profile>;

    /// Partial update, creating the profile on first use
    async fn update_profile(
        &self,
        caller: CallerIdentity,
        update: ProfileUpdate,
    ) -> AppResult<Profile>;
}

pub struct ProfileManager {
    profiles: Arc<dyn ProfileRepository>,
    timeout: Duration,
}

impl ProfileManager {
    pub fn new(profiles: Arc<dyn ProfileRepository>, timeout: Duration) -> Self {
        Self { profiles, timeout }
    }
}

#[async_trait]
impl ProfileService for ProfileManager {
    async fn get_profile(&self, caller: CallerIdentity) -> AppResult<Profile> {
        bounded(self.timeout, "get_profile", async {
            caller.require_role(UserRole::Candidate)?;
            self.profiles.find(caller.user_id).await?.ok_or_not_found()
        })
        .await
    }

    async fn update_profile(
        &self,
        caller: CallerIdentity,
        update: ProfileUpdate,
    ) -> AppResult<Profile> {
        bounded(self.timeout, "update_profile", async {
            caller.require_role(UserRole::Candidate)?;
            let update = update.normalize()?;
            self.profiles.apply_update(caller.user_id, update).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProfileRepository;
    use common::AppError;
    use domain::Patch;
    use uuid::Uuid;

    fn manager(profiles: MockProfileRepository) -> ProfileManager {
        ProfileManager::new(Arc::new(profiles), Duration::from_secs(5))
    }

    fn stored_after(user_id: Uuid, update: ProfileUpdate) -> AppResult<Profile> {
        let mut profile = Profile::empty(user_id);
        profile.apply(update)?;
        Ok(profile)
    }

    #[tokio::test]
    async fn test_employer_cannot_touch_profiles() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().never();
        profiles.expect_apply_update().never();
        let service = manager(profiles);
        let employer = CallerIdentity::new(Uuid::new_v4(), UserRole::Employer);

        assert!(matches!(
            service.get_profile(employer).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service
                .update_profile(employer, ProfileUpdate::default())
                .await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_get_profile_before_first_update_is_not_found() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find().returning(|_| Ok(None));
        let candidate = CallerIdentity::new(Uuid::new_v4(), UserRole::Candidate);

        let result = manager(profiles).get_profile(candidate).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_first_update_creates_profile() {
        let user_id = Uuid::new_v4();
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_apply_update()
            .withf(move |id, _| *id == user_id)
            .returning(stored_after);

        let profile = manager(profiles)
            .update_profile(
                CallerIdentity::new(user_id, UserRole::Candidate),
                ProfileUpdate {
                    headline: Patch::Value("Rust developer".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.headline.as_deref(), Some("Rust developer"));
        assert_eq!(profile.summary, None);
    }

    #[tokio::test]
    async fn test_update_passes_only_provided_fields_trimmed() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_apply_update()
            .withf(|_, update| {
                update.location == Patch::Value("Lisbon".to_string())
                    && update.summary == Patch::Null
                    && update.headline.is_absent()
                    && update.salary_expectation.is_absent()
            })
            .times(1)
            .returning(stored_after);

        manager(profiles)
            .update_profile(
                CallerIdentity::new(Uuid::new_v4(), UserRole::Candidate),
                ProfileUpdate {
                    location: Patch::Value(" Lisbon ".to_string()),
                    summary: Patch::Value("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_negative_salary_is_not_stored() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_apply_update().never();

        let result = manager(profiles)
            .update_profile(
                CallerIdentity::new(Uuid::new_v4(), UserRole::Candidate),
                ProfileUpdate {
                    salary_expectation: Patch::Value(-10.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
