//! Credential storage and token issuance.
//!
//! Tokens carry the credential id as subject. The provider knows nothing about
//! users or roles; callers map the subject to their own records.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::password::Password;
use crate::repository::CredentialRepository;
use common::{AppError, AppResult, JwtConfig};
use domain::{Email, TokenResponse, SECONDS_PER_HOUR};

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Credential id
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication provider trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Store a credential and return its id
    async fn register(&self, email: String, password: String) -> AppResult<Uuid>;

    /// Delete a credential. Returns `false` if it was already gone.
    async fn revoke(&self, credential_id: Uuid) -> AppResult<bool>;

    /// Check a password and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Check signature and expiry, and that the credential still exists
    async fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Issue a fresh token for a still valid one
    async fn refresh_token(&self, token: &str) -> AppResult<TokenResponse>;
}

/// Concrete implementation backed by the credential store.
pub struct Authenticator {
    credentials: Arc<dyn CredentialRepository>,
    jwt: JwtConfig,
    /// Verified against when the email is unknown, so both failure paths
    /// cost one Argon2 verification.
    dummy_password: Option<Password>,
}

impl Authenticator {
    pub fn new(credentials: Arc<dyn CredentialRepository>, jwt: JwtConfig) -> Self {
        Self {
            credentials,
            jwt,
            dummy_password: Password::new("timing-equaliser-password").ok(),
        }
    }

    fn generate_token(&self, credential_id: Uuid) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt.expiration_hours);

        let claims = Claims {
            sub: credential_id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt.secret.as_bytes()),
        )?;

        Ok(TokenResponse::bearer(
            token,
            self.jwt.expiration_hours * SECONDS_PER_HOUR,
        ))
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, email: String, password: String) -> AppResult<Uuid> {
        let email = Email::parse(&email)?;

        if self
            .credentials
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::conflict("email already registered"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let credential = self
            .credentials
            .create(email.into_string(), password_hash)
            .await?;

        tracing::info!(credential_id = %credential.id, "Credential registered");
        Ok(credential.id)
    }

    async fn revoke(&self, credential_id: Uuid) -> AppResult<bool> {
        let revoked = self.credentials.delete(credential_id).await?;
        if revoked {
            tracing::info!(%credential_id, "Credential revoked");
        }
        Ok(revoked)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let credential = match Email::parse(&email) {
            Ok(email) => self.credentials.find_by_email(email.as_str()).await?,
            Err(_) => None,
        };

        // Verify even for unknown emails so response time does not reveal
        // which addresses are registered.
        let password_valid = match (&credential, &self.dummy_password) {
            (Some(credential), _) => {
                Password::from_hash(credential.password_hash.as_str()).verify(&password)
            }
            (None, Some(dummy)) => {
                dummy.verify(&password);
                false
            }
            (None, None) => false,
        };

        match credential {
            Some(credential) if password_valid => self.generate_token(credential.id),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.secret.as_bytes()),
            &Validation::default(),
        )?;
        let claims = token_data.claims;

        if self.credentials.find_by_id(claims.sub).await?.is_none() {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }

    async fn refresh_token(&self, token: &str) -> AppResult<TokenResponse> {
        let claims = self.verify_token(token).await?;
        self.generate_token(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{Credential, MockCredentialRepository};

    const SECRET: &str = "test-secret-key-with-at-least-32-characters";

    fn authenticator(repo: MockCredentialRepository) -> Authenticator {
        Authenticator::new(
            Arc::new(repo),
            JwtConfig {
                secret: SECRET.to_string(),
                expiration_hours: 1,
            },
        )
    }

    fn stored(email: &str, password: &str) -> Credential {
        Credential {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "jane@example.com")
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|email, hash| email == "jane@example.com" && hash.starts_with("$argon2"))
            .returning(|email, password_hash| {
                Ok(Credential {
                    id: Uuid::new_v4(),
                    email,
                    password_hash,
                    created_at: Utc::now(),
                })
            });

        let result = authenticator(repo)
            .register("  Jane@Example.com".into(), "Password123".into())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_existing_email_conflicts() {
        let existing = stored("jane@example.com", "Password123");
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create().never();

        let result = authenticator(repo)
            .register("JANE@example.com".into(), "Password123".into())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_short_password_rejected() {
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().never();

        let result = authenticator(repo)
            .register("jane@example.com".into(), "short".into())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_look_the_same() {
        let existing = stored("jane@example.com", "Password123");
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok((email == "jane@example.com").then(|| existing.clone()))
        });
        let auth = authenticator(repo);

        let unknown = auth
            .login("nobody@example.com".into(), "Password123".into())
            .await;
        let wrong = auth
            .login("jane@example.com".into(), "WrongPassword".into())
            .await;

        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_then_verify_yields_credential_subject() {
        let existing = stored("jane@example.com", "Password123");
        let credential_id = existing.id;
        let found = existing.clone();
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        let auth = authenticator(repo);

        let token = auth
            .login("jane@example.com".into(), "Password123".into())
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let claims = auth.verify_token(&token.access_token).await.unwrap();
        assert_eq!(claims.sub, credential_id);
    }

    #[tokio::test]
    async fn test_revoked_credential_token_is_rejected() {
        let existing = stored("jane@example.com", "Password123");
        let mut repo = MockCredentialRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_id().returning(|_| Ok(None));
        let auth = authenticator(repo);

        let token = auth
            .login("jane@example.com".into(), "Password123".into())
            .await
            .unwrap();
        let result = auth.verify_token(&token.access_token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let auth = authenticator(MockCredentialRepository::new());
        let err = auth.verify_token("not.a.jwt").await.unwrap_err();
        assert_eq!(err.status().as_u16(), 401);
    }
}
