//! gRPC client for the authentication provider.

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult, GrpcClientConfig};
use domain::TokenResponse;
use proto::auth::{
    LoginRequest, RefreshTokenRequest, RegisterCredentialsRequest, RevokeCredentialsRequest,
    TokenReply, VerifyTokenRequest,
};
use proto::AuthProviderClient;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Credential storage and token checks, owned by an external provider.
///
/// The platform never sees password hashes or token internals: it forwards
/// what the caller sent and keeps the opaque credential id it gets back.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Store credentials, returning the credential id
    async fn register_credentials(&self, email: &str, password: &str) -> AppResult<Uuid>;

    /// Remove credentials (compensation after a failed signup)
    async fn revoke_credentials(&self, credential_id: Uuid) -> AppResult<()>;

    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Credential id the token was issued for, `None` if the token is rejected
    async fn verify_token(&self, token: &str) -> AppResult<Option<Uuid>>;

    async fn refresh_token(&self, token: &str) -> AppResult<TokenResponse>;
}

/// gRPC client wrapper for the auth provider.
#[derive(Clone)]
pub struct AuthClient {
    client: AuthProviderClient<Channel>,
}

impl AuthClient {
    /// Build a client that connects on first use.
    ///
    /// Connection and per-request timeouts come from `config`; an unreachable
    /// provider surfaces as `ServiceUnavailable` or `Timeout` on the call.
    pub fn connect_lazy(config: &GrpcClientConfig) -> AppResult<Self> {
        debug!("Configuring auth provider client for {}", config.endpoint);
        let channel = Endpoint::from_shared(config.endpoint.clone())
            .map_err(|e| AppError::internal(format!("Invalid auth provider URL: {}", e)))?
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .connect_lazy();
        Ok(Self {
            client: AuthProviderClient::new(channel),
        })
    }
}

/// Map a provider status, keeping transient failures distinguishable.
fn provider_error(status: Status) -> AppError {
    match status.code() {
        Code::DeadlineExceeded => AppError::timeout("auth provider"),
        Code::Unavailable | Code::Cancelled | Code::Unknown => {
            AppError::service_unavailable("auth provider")
        }
        _ => AppError::from(status),
    }
}

fn token_response(reply: TokenReply) -> TokenResponse {
    TokenResponse {
        access_token: reply.access_token,
        token_type: reply.token_type,
        expires_in: reply.expires_in,
    }
}

fn parse_credential_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::internal("Auth provider returned an invalid credential id"))
}

#[async_trait]
impl AuthProvider for AuthClient {
    async fn register_credentials(&self, email: &str, password: &str) -> AppResult<Uuid> {
        let request = tonic::Request::new(RegisterCredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        });

        let mut client = self.client.clone();
        let response = client
            .register_credentials(request)
            .await
            .map_err(provider_error)?;
        parse_credential_id(&response.into_inner().credential_id)
    }

    async fn revoke_credentials(&self, credential_id: Uuid) -> AppResult<()> {
        let request = tonic::Request::new(RevokeCredentialsRequest {
            credential_id: credential_id.to_string(),
        });

        let mut client = self.client.clone();
        client
            .revoke_credentials(request)
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let request = tonic::Request::new(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });

        let mut client = self.client.clone();
        let response = client.login(request).await.map_err(|status| {
            if status.code() == Code::Unauthenticated {
                AppError::InvalidCredentials
            } else {
                provider_error(status)
            }
        })?;
        Ok(token_response(response.into_inner()))
    }

    async fn verify_token(&self, token: &str) -> AppResult<Option<Uuid>> {
        let request = tonic::Request::new(VerifyTokenRequest {
            token: token.to_string(),
        });

        let mut client = self.client.clone();
        let response = client.verify_token(request).await.map_err(provider_error)?;
        let proto = response.into_inner();

        if !proto.valid {
            return Ok(None);
        }
        parse_credential_id(&proto.subject).map(Some)
    }

    async fn refresh_token(&self, token: &str) -> AppResult<TokenResponse> {
        let request = tonic::Request::new(RefreshTokenRequest {
            token: token.to_string(),
        });

        let mut client = self.client.clone();
        let response = client.refresh_token(request).await.map_err(provider_error)?;
        Ok(token_response(response.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses_are_distinguished() {
        assert!(matches!(
            provider_error(Status::deadline_exceeded("slow")),
            AppError::Timeout(_)
        ));
        assert!(matches!(
            provider_error(Status::unavailable("down")),
            AppError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            provider_error(Status::already_exists("email already registered")),
            AppError::Conflict(msg) if msg == "email already registered"
        ));
        assert!(matches!(
            provider_error(Status::unauthenticated("bad token")),
            AppError::Unauthorized
        ));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let config = GrpcClientConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(AuthClient::connect_lazy(&config).is_err());
    }
}
