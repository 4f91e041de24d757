//! Credential repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use super::entities::credential::{self, ActiveModel, Entity as CredentialEntity};
use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Stored credential. Never leaves the auth provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Credential repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>>;

    /// Find by normalised email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Credential>>;

    /// Store a new credential. A taken email is a `Conflict`.
    async fn create(&self, email: String, password_hash: String) -> AppResult<Credential>;

    /// Remove a credential. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// SeaORM-backed credential repository
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::conflict("email already registered")
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl CredentialRepository for CredentialStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>> {
        let result = CredentialEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Credential::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Credential>> {
        let result = CredentialEntity::find()
            .filter(credential::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(result.map(Credential::from))
    }

    async fn create(&self, email: String, password_hash: String) -> AppResult<Credential> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now().trunc_subsecs(6)),
        };

        let model = active_model.insert(&self.db).await.map_err(map_insert_error)?;
        Ok(Credential::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = CredentialEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Database;

    async fn store() -> CredentialStore {
        let db = Database::connect_in_memory().await.unwrap();
        CredentialStore::new(db.get_connection())
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = store().await;
        let created = store
            .create("jane@example.com".into(), "hash".into())
            .await
            .unwrap();

        let by_email = store.find_by_email("jane@example.com").await.unwrap();
        assert_eq!(by_email, Some(created.clone()));
        let by_id = store.find_by_id(created.id).await.unwrap();
        assert_eq!(by_id.map(|c| c.email), Some("jane@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = store().await;
        store.create("dup@example.com".into(), "a".into()).await.unwrap();

        let result = store.create("dup@example.com".into(), "b".into()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = store().await;
        let created = store.create("gone@example.com".into(), "h".into()).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }
}
