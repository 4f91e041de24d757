//! Identity service - signup, sign-in and bearer token resolution.
//!
//! Credentials live with the external auth provider. This service only keeps
//! the user row (email, role, credential id) and maps provider token subjects
//! back to it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use common::{bounded, AppError, AppResult};
use domain::{CallerIdentity, Email, TokenResponse, User, UserRole};

use crate::client::AuthProvider;
use crate::repository::UserRepository;

/// Identity service trait for dependency injection.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Register a candidate or employer
    async fn sign_up(&self, email: String, password: String, role: String) -> AppResult<User>;

    /// Exchange email and password for a bearer token
    async fn sign_in(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Resolve a bearer token to the caller it was issued for
    async fn authenticate(&self, bearer_token: &str) -> AppResult<CallerIdentity>;

    /// Re-issue a still valid token
    async fn refresh(&self, bearer_token: &str) -> AppResult<TokenResponse>;

    /// Create an admin user. Only reachable from the operator CLI.
    async fn provision_admin(&self, email: String, password: String) -> AppResult<User>;
}

/// Concrete implementation of IdentityService.
pub struct IdentityManager {
    users: Arc<dyn UserRepository>,
    auth: Arc<dyn AuthProvider>,
    timeout: Duration,
}

impl IdentityManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        auth: Arc<dyn AuthProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            auth,
            timeout,
        }
    }

    async fn register(&self, email: &str, password: &str, role: UserRole) -> AppResult<User> {
        let signup = Signup {
            users: Arc::clone(&self.users),
            auth: Arc::clone(&self.auth),
            email: Email::parse(email)?,
            password: password.to_owned(),
            role,
        };

        // Runs to completion even when the caller stops waiting, so a timeout
        // cannot leave a provider credential without its user row.
        tokio::spawn(signup.run())
            .await
            .map_err(|e| AppError::internal(format!("Signup task failed: {}", e)))?
    }
}

/// One registration, owned so it can outlive the request that started it.
struct Signup {
    users: Arc<dyn UserRepository>,
    auth: Arc<dyn AuthProvider>,
    email: Email,
    password: String,
    role: UserRole,
}

impl Signup {
    async fn run(self) -> AppResult<User> {
        if self.users.find_by_email(self.email.as_str()).await?.is_some() {
            return Err(AppError::conflict("email already registered"));
        }

        let registered = self
            .auth
            .register_credentials(self.email.as_str(), &self.password)
            .await;

        match registered {
            Ok(credential_id) => self.store(credential_id, true).await,
            Err(AppError::Conflict(msg)) => {
                let Some(credential_id) = self.orphaned_credential().await? else {
                    return Err(AppError::Conflict(msg));
                };
                info!(%credential_id, "Adopting credential left by an interrupted signup");
                self.store(credential_id, false).await
            }
            Err(err) => Err(err),
        }
    }

    /// A credential the provider holds for this email that no user row
    /// points at. Only adopted when the caller proves they own it.
    async fn orphaned_credential(&self) -> AppResult<Option<Uuid>> {
        let token = match self.auth.login(self.email.as_str(), &self.password).await {
            Ok(token) => token,
            Err(AppError::InvalidCredentials) => return Ok(None),
            Err(err) => return Err(err),
        };

        let Some(credential_id) = self.auth.verify_token(&token.access_token).await? else {
            return Ok(None);
        };

        if self.users.find_by_credential_id(credential_id).await?.is_some() {
            return Ok(None);
        }
        Ok(Some(credential_id))
    }

    /// Insert the user row. A credential this signup created is revoked when
    /// the insert fails, unless a concurrent signup adopted it first.
    async fn store(self, credential_id: Uuid, owned: bool) -> AppResult<User> {
        let Signup {
            users, auth, email, role, ..
        } = self;

        // The unique indexes have the final word.
        let err = match users.create(User::new(email, role, credential_id)).await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "User signed up");
                return Ok(user);
            }
            Err(err) => err,
        };

        if owned && matches!(users.find_by_credential_id(credential_id).await, Ok(None)) {
            if let Err(revoke_err) = auth.revoke_credentials(credential_id).await {
                warn!(
                    %credential_id,
                    "Failed to revoke credential after signup error: {}", revoke_err
                );
            }
        }
        Err(err)
    }
}

#[async_trait]
impl IdentityService for IdentityManager {
    async fn sign_up(&self, email: String, password: String, role: String) -> AppResult<User> {
        bounded(self.timeout, "sign_up", async {
            let role = UserRole::for_signup(role.trim())?;
            self.register(&email, &password, role).await
        })
        .await
    }

    async fn sign_in(&self, email: String, password: String) -> AppResult<TokenResponse> {
        bounded(self.timeout, "sign_in", async {
            let email = Email::parse(&email).map_err(|_| AppError::InvalidCredentials)?;
            self.auth.login(email.as_str(), &password).await
        })
        .await
    }

    async fn authenticate(&self, bearer_token: &str) -> AppResult<CallerIdentity> {
        bounded(self.timeout, "authenticate", async {
            let token = bearer_token.trim();
            if token.is_empty() {
                return Err(AppError::Unauthorized);
            }

            let credential_id = self
                .auth
                .verify_token(token)
                .await?
                .ok_or(AppError::Unauthorized)?;

            let user = self
                .users
                .find_by_credential_id(credential_id)
                .await?
                .ok_or(AppError::Unauthorized)?;

            Ok(user.identity())
        })
        .await
    }

    async fn refresh(&self, bearer_token: &str) -> AppResult<TokenResponse> {
        bounded(self.timeout, "refresh", async {
            self.auth.refresh_token(bearer_token.trim()).await
        })
        .await
    }

    async fn provision_admin(&self, email: String, password: String) -> AppResult<User> {
        bounded(self.timeout, "provision_admin", async {
            self.register(&email, &password, UserRole::Admin).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockAuthProvider;
    use crate::repository::MockUserRepository;

    fn manager(users: MockUserRepository, auth: MockAuthProvider) -> IdentityManager {
        IdentityManager::new(Arc::new(users), Arc::new(auth), Duration::from_secs(5))
    }

    fn stored_user(role: UserRole) -> User {
        User::new(
            Email::parse("jane@example.com").unwrap(),
            role,
            Uuid::new_v4(),
        )
    }

    #[tokio::test]
    async fn test_sign_up_rejects_admin_and_unknown_roles() {
        for role in ["admin", "recruiter", ""] {
            let mut users = MockUserRepository::new();
            users.expect_find_by_email().never();
            let mut auth = MockAuthProvider::new();
            auth.expect_register_credentials().never();

            let result = manager(users, auth)
                .sign_up("jane@example.com".into(), "Password123".into(), role.into())
                .await;
            assert!(matches!(result, Err(AppError::Validation(_))), "role {role}");
        }
    }

    #[tokio::test]
    async fn test_sign_up_rejects_invalid_email() {
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials().never();

        let result = manager(MockUserRepository::new(), auth)
            .sign_up("not-an-email".into(), "Password123".into(), "candidate".into())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sign_up_existing_email_conflicts() {
        let existing = stored_user(UserRole::Candidate);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "jane@example.com")
            .returning(move |_| Ok(Some(existing.clone())));
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials().never();

        let result = manager(users, auth)
            .sign_up("JANE@Example.com".into(), "Password123".into(), "employer".into())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_sign_up_stores_user_with_credential() {
        let credential_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(move |user| user.credential_id == credential_id && user.role == UserRole::Employer)
            .returning(Ok);
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials()
            .returning(move |_, _| Ok(credential_id));

        let user = manager(users, auth)
            .sign_up("boss@example.com".into(), "Password123".into(), "employer".into())
            .await
            .unwrap();
        assert_eq!(user.email, "boss@example.com");
        assert_eq!(user.role, UserRole::Employer);
    }

    #[tokio::test]
    async fn test_sign_up_revokes_credential_when_insert_loses_race() {
        let credential_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(AppError::conflict("email already registered")));
        users.expect_find_by_credential_id().returning(|_| Ok(None));
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials()
            .returning(move |_, _| Ok(credential_id));
        auth.expect_revoke_credentials()
            .withf(move |id| *id == credential_id)
            .times(1)
            .returning(|_| Ok(()));

        let result = manager(users, auth)
            .sign_up("jane@example.com".into(), "Password123".into(), "candidate".into())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_sign_up_keeps_credential_adopted_by_concurrent_signup() {
        let credential_id = Uuid::new_v4();
        let adopted = stored_user(UserRole::Candidate);
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_create()
            .returning(|_| Err(AppError::conflict("email already registered")));
        users
            .expect_find_by_credential_id()
            .returning(move |_| Ok(Some(adopted.clone())));
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials()
            .returning(move |_, _| Ok(credential_id));
        auth.expect_revoke_credentials().never();

        let result = manager(users, auth)
            .sign_up("jane@example.com".into(), "Password123".into(), "candidate".into())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_sign_up_adopts_credential_without_user_row() {
        let credential_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_credential_id().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(move |user| user.credential_id == credential_id)
            .times(1)
            .returning(Ok);
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials()
            .returning(|_, _| Err(AppError::conflict("email already registered")));
        auth.expect_login()
            .withf(|email, password| email == "jane@example.com" && password == "Password123")
            .returning(|_, _| Ok(TokenResponse::bearer("orphan-token".into(), 3600)));
        auth.expect_verify_token()
            .withf(|token| token == "orphan-token")
            .returning(move |_| Ok(Some(credential_id)));
        auth.expect_revoke_credentials().never();

        let user = manager(users, auth)
            .sign_up("jane@example.com".into(), "Password123".into(), "candidate".into())
            .await
            .unwrap();
        assert_eq!(user.credential_id, credential_id);
    }

    #[tokio::test]
    async fn test_sign_up_does_not_adopt_credential_with_other_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().never();
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials()
            .returning(|_, _| Err(AppError::conflict("email already registered")));
        auth.expect_login()
            .returning(|_, _| Err(AppError::InvalidCredentials));
        auth.expect_verify_token().never();

        let result = manager(users, auth)
            .sign_up("jane@example.com".into(), "Guessed123".into(), "candidate".into())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_sign_up_timeout_still_finishes_registration() {
        let credential_id = Uuid::new_v4();
        let (created_tx, created_rx) = std::sync::mpsc::channel();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().times(1).returning(move |user| {
            let _ = created_tx.send(user.credential_id);
            Ok(user)
        });
        let mut auth = MockAuthProvider::new();
        auth.expect_register_credentials().returning(move |_, _| {
            std::thread::sleep(Duration::from_millis(200));
            Ok(credential_id)
        });
        auth.expect_revoke_credentials().never();
        let service =
            IdentityManager::new(Arc::new(users), Arc::new(auth), Duration::from_millis(50));

        let result = service
            .sign_up("jane@example.com".into(), "Password123".into(), "candidate".into())
            .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));

        let stored = tokio::task::spawn_blocking(move || {
            created_rx.recv_timeout(Duration::from_secs(2))
        })
        .await
        .unwrap();
        assert_eq!(stored.unwrap(), credential_id);
    }

    #[tokio::test]
    async fn test_authenticate_resolves_caller() {
        let user = stored_user(UserRole::Candidate);
        let expected = user.identity();
        let credential_id = user.credential_id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_credential_id()
            .withf(move |id| *id == credential_id)
            .returning(move |_| Ok(Some(user.clone())));
        let mut auth = MockAuthProvider::new();
        auth.expect_verify_token()
            .withf(|token| token == "good-token")
            .returning(move |_| Ok(Some(credential_id)));

        let caller = manager(users, auth).authenticate("good-token").await.unwrap();
        assert_eq!(caller, expected);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_invalid_token_and_unknown_subject() {
        let mut auth = MockAuthProvider::new();
        auth.expect_verify_token().returning(|token| {
            Ok((token == "orphan-token").then(Uuid::new_v4))
        });
        let mut users = MockUserRepository::new();
        users.expect_find_by_credential_id().returning(|_| Ok(None));
        let service = manager(users, auth);

        for token in ["", "bad-token", "orphan-token"] {
            let result = service.authenticate(token).await;
            assert!(matches!(result, Err(AppError::Unauthorized)), "token {token:?}");
        }
    }

    #[tokio::test]
    async fn test_authenticate_keeps_provider_outage_transient() {
        let mut auth = MockAuthProvider::new();
        auth.expect_verify_token()
            .returning(|_| Err(AppError::service_unavailable("auth provider")));

        let result = manager(MockUserRepository::new(), auth)
            .authenticate("token")
            .await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_sign_in_malformed_email_is_invalid_credentials() {
        let mut auth = MockAuthProvider::new();
        auth.expect_login().never();

        let result = manager(MockUserRepository::new(), auth)
            .sign_in("nobody".into(), "Password123".into())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
